use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget};

use crate::error::SetupError;

/// Every element matching `selector`, in document order.
pub fn select_all(document: &Document, selector: &str) -> Result<Vec<Element>, SetupError> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Looks up a required element by id and casts it to the expected interface.
pub fn require_by_id<T: JsCast>(
    document: &Document,
    id: &str,
    expected: &'static str,
) -> Result<T, SetupError> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| SetupError::MissingElement {
            selector: format!("#{}", id),
        })?;
    element
        .dyn_into::<T>()
        .map_err(|_| SetupError::WrongElementType {
            selector: format!("#{}", id),
            expected,
        })
}

/// Attaches `callback` to every target. The closure lives as long as the page.
pub fn listen_all<'a, I>(
    targets: I,
    event: &str,
    callback: Closure<dyn FnMut(Event)>,
) -> Result<(), SetupError>
where
    I: IntoIterator<Item = &'a EventTarget>,
{
    for target in targets {
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    }
    callback.forget();
    Ok(())
}
