use crate::constants::*;
use crate::dom;
use crate::frame::FrameContext;
use crate::textures;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::rc::Rc;
use tree_core::{Shape, TreeEngine, VisualConfig, PHOTO_COUNT};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything the control surface mutates, shared with the frame loop.
#[derive(Clone)]
pub struct ControlContext {
    pub engine: Rc<RefCell<TreeEngine>>,
    pub config: Rc<RefCell<VisualConfig>>,
    pub rng: Rc<RefCell<StdRng>>,
    pub frame_ctx: Rc<RefCell<FrameContext<'static>>>,
}

#[inline]
pub fn shape_for_digit(key: &str) -> Option<Shape> {
    match key {
        "1" => Some(Shape::Cone),
        "2" => Some(Shape::Heart),
        "3" => Some(Shape::Star),
        "4" => Some(Shape::Snowflake),
        "5" => Some(Shape::Fireworks),
        _ => None,
    }
}

fn shape_button_id(shape: Shape) -> String {
    format!("shape-{}", shape.as_str().to_ascii_lowercase())
}

pub fn apply_shape(ctx: &ControlContext, shape: Shape) {
    ctx.config.borrow_mut().shape = shape;
    ctx.engine
        .borrow_mut()
        .set_shape(shape, &mut *ctx.rng.borrow_mut());
    if let Some(doc) = dom::window_document() {
        for s in Shape::ALL {
            if let Some(el) = doc.get_element_by_id(&shape_button_id(s)) {
                let _ = el.class_list().toggle_with_force("active", s == shape);
            }
        }
    }
}

fn apply_colors(ctx: &ControlContext) {
    let (c1, c2) = {
        let cfg = ctx.config.borrow();
        (cfg.color1, cfg.color2)
    };
    ctx.engine
        .borrow_mut()
        .set_colors(c1, c2, &mut *ctx.rng.borrow_mut());
}

/// Re-point every plane at its cycled source and kick off texture loads.
pub fn refresh_photos(ctx: &ControlContext) {
    let sources: Vec<Option<String>> = {
        let cfg = ctx.config.borrow();
        ctx.engine
            .borrow_mut()
            .set_photo_source_count(cfg.photo_sources.len());
        (0..PHOTO_COUNT)
            .map(|plane| cfg.photo_source_for(plane).map(str::to_owned))
            .collect()
    };
    for (plane, source) in sources.into_iter().enumerate() {
        if let Some(url) = source {
            textures::load_into_plane(ctx.frame_ctx.clone(), plane, url);
        }
    }
}

pub fn apply_reset(ctx: &ControlContext) {
    ctx.config.borrow_mut().reset();
    let shape = ctx.config.borrow().shape;
    apply_shape(ctx, shape);
    apply_colors(ctx);
    refresh_photos(ctx);
    if let Some(doc) = dom::window_document() {
        set_input_value(&doc, COLOR1_INPUT_ID, tree_core::DEFAULT_COLOR_1);
        set_input_value(&doc, COLOR2_INPUT_ID, tree_core::DEFAULT_COLOR_2);
    }
}

fn set_input_value(document: &web::Document, element_id: &str, value: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        if let Some(input) = el.dyn_ref::<web::HtmlInputElement>() {
            input.set_value(value);
        }
    }
}

fn toggle_fullscreen(document: &web::Document) {
    if document.fullscreen_element().is_some() {
        document.exit_fullscreen();
    } else if let Some(root) = document.document_element() {
        let _ = root.request_fullscreen();
    }
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, ctx: &ControlContext) {
    let key = ev.key();
    if let Some(shape) = shape_for_digit(&key) {
        apply_shape(ctx, shape);
        return;
    }
    match key.as_str() {
        "f" | "F" => {
            if let Some(doc) = dom::window_document() {
                toggle_fullscreen(&doc);
            }
        }
        "r" | "R" => apply_reset(ctx),
        _ => {}
    }
}

pub fn wire_controls(document: &web::Document, ctx: &ControlContext) {
    for shape in Shape::ALL {
        let ctx_btn = ctx.clone();
        dom::add_click_listener(document, &shape_button_id(shape), move || {
            apply_shape(&ctx_btn, shape);
        });
    }

    let ctx_c1 = ctx.clone();
    dom::add_value_listener(document, COLOR1_INPUT_ID, "input", move |value| {
        match ctx_c1.config.borrow_mut().set_color1(&value) {
            Ok(()) => apply_colors(&ctx_c1),
            Err(e) => log::warn!("color input rejected: {e}"),
        }
    });
    let ctx_c2 = ctx.clone();
    dom::add_value_listener(document, COLOR2_INPUT_ID, "input", move |value| {
        match ctx_c2.config.borrow_mut().set_color2(&value) {
            Ok(()) => apply_colors(&ctx_c2),
            Err(e) => log::warn!("color input rejected: {e}"),
        }
    });

    wire_photo_input(document, ctx);

    dom::add_click_listener(document, FULLSCREEN_BUTTON_ID, move || {
        if let Some(doc) = dom::window_document() {
            toggle_fullscreen(&doc);
        }
    });

    let ctx_reset = ctx.clone();
    dom::add_click_listener(document, RESET_BUTTON_ID, move || apply_reset(&ctx_reset));

    let ctx_keys = ctx.clone();
    let keydown = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_global_keydown(&ev, &ctx_keys);
    }) as Box<dyn FnMut(web::KeyboardEvent)>);
    if let Some(w) = web::window() {
        let _ = w.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());
    }
    keydown.forget();
}

fn wire_photo_input(document: &web::Document, ctx: &ControlContext) {
    let Some(el) = document.get_element_by_id(PHOTO_INPUT_ID) else {
        return;
    };
    let target = el.clone();
    let ctx_photos = ctx.clone();
    let closure = Closure::wrap(Box::new(move || {
        let Some(input) = target.dyn_ref::<web::HtmlInputElement>() else {
            return;
        };
        let Some(files) = input.files() else {
            return;
        };
        let mut urls = Vec::with_capacity(files.length() as usize);
        for i in 0..files.length() {
            if let Some(file) = files.get(i) {
                match web::Url::create_object_url_with_blob(&file) {
                    Ok(url) => urls.push(url),
                    Err(e) => log::warn!("object URL failed: {e:?}"),
                }
            }
        }
        // An empty selection keeps whatever was showing before.
        if urls.is_empty() {
            return;
        }
        ctx_photos.config.borrow_mut().set_photo_sources(urls);
        refresh_photos(&ctx_photos);
    }) as Box<dyn FnMut()>);
    let _ = el.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
}
