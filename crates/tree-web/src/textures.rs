use crate::frame::FrameContext;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Decode `url` off the main loop and hand the pixels to one photo plane's
/// texture slot. Failures leave the plane on its placeholder.
pub fn load_into_plane(frame_ctx: Rc<RefCell<FrameContext<'static>>>, plane: usize, url: String) {
    spawn_local(async move {
        match decode_rgba(&url).await {
            Ok((width, height, rgba)) => {
                if let Some(gpu) = frame_ctx.borrow_mut().gpu.as_mut() {
                    gpu.set_photo_texture(plane, width, height, &rgba);
                }
            }
            Err(e) => log::warn!("photo decode failed for {url}: {e:?}"),
        }
    });
}

// Images land as RGBA via a scratch 2d canvas; that keeps format handling
// (JPEG, PNG, object URLs) in the browser.
async fn decode_rgba(url: &str) -> Result<(u32, u32, Vec<u8>), JsValue> {
    let img = web::HtmlImageElement::new()?;
    img.set_cross_origin(Some("anonymous"));
    img.set_src(url);
    JsFuture::from(img.decode()).await?;

    let width = img.natural_width().max(1);
    let height = img.natural_height().max(1);
    let document =
        crate::dom::window_document().ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: web::HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx: web::CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    ctx.draw_image_with_html_image_element(&img, 0.0, 0.0)?;
    let data = ctx.get_image_data(0.0, 0.0, width as f64, height as f64)?;
    Ok((width, height, data.data().0))
}
