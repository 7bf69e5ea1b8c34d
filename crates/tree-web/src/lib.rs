#![cfg(target_arch = "wasm32")]

mod constants;
mod dom;
mod events;
mod frame;
mod hands;
mod render;
mod textures;

use constants::*;
use frame::FrameContext;
use instant::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tree_core::{GestureClassifier, TreeEngine, VisualConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

thread_local! {
    static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
}

struct Session {
    running: Rc<Cell<bool>>,
    tracker: Option<hands::HandTracker>,
    frame_ctx: Rc<RefCell<FrameContext<'static>>>,
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("tree-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Stop the frame loop and camera pipeline. Safe to call more than once; a
/// results callback still in flight sees the cleared running flag and drops
/// its sample.
#[wasm_bindgen]
pub fn shutdown() {
    SESSION.with(|s| {
        if let Some(session) = s.borrow_mut().take() {
            session.running.set(false);
            if let Some(tracker) = session.tracker {
                tracker.stop();
            }
            session.frame_ctx.borrow_mut().gpu = None;
            log::info!("tree-web stopped");
        }
    });
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{CANVAS_ID}"))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    dom::sync_canvas_backing_size(&canvas);

    let mut rng = StdRng::seed_from_u64(js_sys::Date::now() as u64);
    let config = VisualConfig::default();
    let aspect = canvas.width() as f32 / canvas.height().max(1) as f32;
    let engine = Rc::new(RefCell::new(TreeEngine::new(&config, aspect, &mut rng)));
    let config = Rc::new(RefCell::new(config));
    let rng = Rc::new(RefCell::new(rng));
    let classifier = Rc::new(RefCell::new(GestureClassifier::new()));

    let gpu = frame::init_gpu(&canvas).await;
    let frame_ctx = Rc::new(RefCell::new(FrameContext {
        engine: engine.clone(),
        classifier: classifier.clone(),
        gpu,
        canvas: canvas.clone(),
        start: Instant::now(),
    }));

    let ctx = events::ControlContext {
        engine: engine.clone(),
        config,
        rng,
        frame_ctx: frame_ctx.clone(),
    };
    events::wire_controls(&document, &ctx);
    events::refresh_photos(&ctx);

    let running = Rc::new(Cell::new(true));
    let tracker = match document
        .get_element_by_id(VIDEO_ID)
        .and_then(|el| el.dyn_into::<web::HtmlVideoElement>().ok())
    {
        Some(video) => {
            match hands::HandTracker::start(&video, engine, classifier, running.clone()) {
                Ok(t) => Some(t),
                Err(e) => {
                    log::warn!("hand tracking unavailable: {e:?}");
                    None
                }
            }
        }
        None => {
            log::warn!("missing #{VIDEO_ID}; running without hand tracking");
            None
        }
    };

    SESSION.with(|s| {
        *s.borrow_mut() = Some(Session {
            running: running.clone(),
            tracker,
            frame_ctx: frame_ctx.clone(),
        })
    });
    frame::start_loop(frame_ctx, running);
    log::info!("tree-web running");
    Ok(())
}
