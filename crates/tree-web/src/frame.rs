use crate::dom;
use crate::render;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tree_core::{
    GestureClassifier, TreeEngine, DECORATION_COUNT, PARTICLE_COUNT, RIBBON_COUNT,
    RIBBON_POINTS_PER_TURN,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

// Ribbons carry at most five turns of points each (inclusive endpoints),
// plus one topper sprite.
const MAX_SPRITE_INSTANCES: usize =
    PARTICLE_COUNT + DECORATION_COUNT + RIBBON_COUNT * (5 * RIBBON_POINTS_PER_TURN + 1) + 1;

pub struct FrameContext<'a> {
    pub engine: Rc<RefCell<TreeEngine>>,
    pub classifier: Rc<RefCell<GestureClassifier>>,
    pub gpu: Option<render::GpuState<'a>>,
    pub canvas: web::HtmlCanvasElement,
    pub start: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        if dom::sync_canvas_backing_size(&self.canvas) {
            let aspect = self.canvas.width() as f32 / self.canvas.height().max(1) as f32;
            self.engine.borrow_mut().resize(aspect);
        }
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize_if_needed(self.canvas.width(), self.canvas.height());
        }

        let time_sec = self.start.elapsed().as_secs_f32();
        let (targets, state) = {
            let c = self.classifier.borrow();
            (c.targets(), c.state())
        };

        let mut engine = self.engine.borrow_mut();
        engine.step(time_sec, targets, state);
        if let Some(gpu) = self.gpu.as_mut() {
            if let Err(e) = gpu.render(&engine) {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, MAX_SPRITE_INSTANCES).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>, running: Rc<Cell<bool>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        // A torn-down session schedules no further frames.
        if !running.get() {
            return;
        }
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}
