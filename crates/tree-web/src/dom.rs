use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Attach an `input`/`change`-style listener that hands back the element's
/// current string value.
#[inline]
pub fn add_value_listener(
    document: &web::Document,
    element_id: &str,
    event: &str,
    mut handler: impl FnMut(String) + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let target = el.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || {
            if let Some(input) = target.dyn_ref::<web::HtmlInputElement>() {
                handler(input.value());
            }
        }) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[inline]
pub fn set_text(document: &web::Document, element_id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        el.set_text_content(Some(text));
    }
}

/// Match the canvas backing store to its CSS size, capping the device pixel
/// ratio at 2. Returns true when the backing size changed.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> bool {
    let Some(w) = web::window() else {
        return false;
    };
    let dpr = w.device_pixel_ratio().min(2.0);
    let rect = canvas.get_bounding_client_rect();
    let w_px = ((rect.width() * dpr) as u32).max(1);
    let h_px = ((rect.height() * dpr) as u32).max(1);
    if w_px == canvas.width() && h_px == canvas.height() {
        return false;
    }
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    true
}
