//! MediaPipe Hands interop. The tracking pipeline runs entirely in JS; we
//! bind its `Hands` and `Camera` classes, feed video frames, and parse the
//! landmark arrays out of each results callback.

use crate::constants::*;
use crate::dom;
use glam::Vec2;
use js_sys::{Array, Object, Promise, Reflect};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tree_core::{GestureClassifier, TreeEngine};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

#[wasm_bindgen]
extern "C" {
    type Hands;

    #[wasm_bindgen(constructor, js_class = "Hands")]
    fn new(config: &JsValue) -> Hands;

    #[wasm_bindgen(method, js_name = setOptions)]
    fn set_options(this: &Hands, options: &JsValue);

    #[wasm_bindgen(method, js_name = onResults)]
    fn on_results(this: &Hands, callback: &js_sys::Function);

    #[wasm_bindgen(method)]
    fn send(this: &Hands, inputs: &JsValue) -> Promise;

    #[wasm_bindgen(method)]
    fn close(this: &Hands) -> Promise;

    type HandCamera;

    #[wasm_bindgen(constructor, js_class = "Camera")]
    fn new(video: &web::HtmlVideoElement, config: &JsValue) -> HandCamera;

    #[wasm_bindgen(method)]
    fn start(this: &HandCamera) -> Promise;

    #[wasm_bindgen(method)]
    fn stop(this: &HandCamera);
}

pub struct HandTracker {
    hands: Rc<Hands>,
    camera: HandCamera,
}

impl HandTracker {
    /// Spin up the tracking pipeline against `video`. Each results callback
    /// feeds one landmark sample to the classifier and refreshes the gesture
    /// indicator when the gesture changes.
    pub fn start(
        video: &web::HtmlVideoElement,
        engine: Rc<RefCell<TreeEngine>>,
        classifier: Rc<RefCell<GestureClassifier>>,
        running: Rc<Cell<bool>>,
    ) -> Result<Self, JsValue> {
        let locate = Closure::wrap(Box::new(move |file: JsValue| -> JsValue {
            let name = file.as_string().unwrap_or_default();
            JsValue::from_str(&format!("{MEDIAPIPE_HANDS_CDN}/{name}"))
        }) as Box<dyn FnMut(JsValue) -> JsValue>);
        let hands_config = Object::new();
        Reflect::set(&hands_config, &"locateFile".into(), locate.as_ref())?;
        locate.forget();
        let hands = Rc::new(Hands::new(&hands_config));

        let options = Object::new();
        Reflect::set(&options, &"maxNumHands".into(), &JsValue::from_f64(1.0))?;
        Reflect::set(&options, &"modelComplexity".into(), &JsValue::from_f64(1.0))?;
        Reflect::set(
            &options,
            &"minDetectionConfidence".into(),
            &JsValue::from_f64(MIN_HAND_CONFIDENCE),
        )?;
        Reflect::set(
            &options,
            &"minTrackingConfidence".into(),
            &JsValue::from_f64(MIN_HAND_CONFIDENCE),
        )?;
        hands.set_options(&options);

        let results_cb = Closure::wrap(Box::new(move |results: JsValue| {
            if !running.get() {
                return;
            }
            let landmarks = parse_first_hand(&results);
            let (photo_positions, camera_eye) = {
                let e = engine.borrow();
                (e.photo_world_positions(), e.camera.eye)
            };
            let event =
                classifier
                    .borrow_mut()
                    .observe(landmarks.as_deref(), &photo_positions, camera_eye);
            if let Some(gesture) = event {
                log::info!("gesture: {}", gesture.as_str());
                if let Some(doc) = dom::window_document() {
                    dom::set_text(&doc, GESTURE_INDICATOR_ID, gesture.as_str());
                }
            }
        }) as Box<dyn FnMut(JsValue)>);
        hands.on_results(results_cb.as_ref().unchecked_ref());
        results_cb.forget();

        let hands_frame = hands.clone();
        let video_frame = video.clone();
        let on_frame = Closure::wrap(Box::new(move || -> Promise {
            let inputs = Object::new();
            match Reflect::set(&inputs, &"image".into(), video_frame.as_ref()) {
                Ok(_) => hands_frame.send(&inputs),
                Err(e) => Promise::reject(&e),
            }
        }) as Box<dyn FnMut() -> Promise>);
        let camera_config = Object::new();
        Reflect::set(&camera_config, &"onFrame".into(), on_frame.as_ref())?;
        on_frame.forget();
        Reflect::set(
            &camera_config,
            &"width".into(),
            &JsValue::from_f64(HAND_CAMERA_WIDTH as f64),
        )?;
        Reflect::set(
            &camera_config,
            &"height".into(),
            &JsValue::from_f64(HAND_CAMERA_HEIGHT as f64),
        )?;
        let camera = HandCamera::new(video, &camera_config);
        let _ = camera.start();

        Ok(Self { hands, camera })
    }

    pub fn stop(&self) {
        self.camera.stop();
        let _ = self.hands.close();
    }
}

/// Pull the first hand's landmarks out of a results object. Missing or
/// malformed fields read as "no hand"; the classifier rejects short samples
/// on its own.
fn parse_first_hand(results: &JsValue) -> Option<Vec<Vec2>> {
    let hands: Array = Reflect::get(results, &"multiHandLandmarks".into())
        .ok()?
        .dyn_into()
        .ok()?;
    let first: Array = hands.get(0).dyn_into().ok()?;
    let mut out = Vec::with_capacity(first.length() as usize);
    for landmark in first.iter() {
        let x = Reflect::get(&landmark, &"x".into()).ok()?.as_f64()?;
        let y = Reflect::get(&landmark, &"y".into()).ok()?.as_f64()?;
        out.push(Vec2::new(x as f32, y as f32));
    }
    Some(out)
}
