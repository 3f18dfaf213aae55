use log::{debug, info};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition,
};

use crate::config::PageConfig;
use crate::dom;
use crate::error::SetupError;

/// Id of the element a same-page link should scroll to, or `None` when the
/// link is left to the browser: reserved fragments, hrefs that are not a bare
/// fragment, and empty ids.
pub fn scroll_target(href: &str, config: &PageConfig) -> Option<String> {
    if config.is_reserved(href) {
        return None;
    }
    let id = href.strip_prefix('#')?;
    if id.is_empty() {
        return None;
    }
    let id = urlencoding::decode(id)
        .map(|id| id.into_owned())
        .unwrap_or_else(|_| id.to_string());
    Some(id)
}

fn smooth_scroll(target: &Element) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

/// Intercepts clicks on same-page links and scrolls smoothly to their target.
/// Returns the number of links bound.
pub fn bind(document: &Document, config: &PageConfig) -> Result<usize, SetupError> {
    let links = dom::select_all(document, &config.anchor_selector)?;
    let config = config.clone();

    let on_click = {
        let document = document.clone();
        Closure::<dyn FnMut(Event)>::new(move |e: Event| {
            let href = e
                .current_target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|link| link.get_attribute("href"));
            let Some(id) = href.and_then(|href| scroll_target(&href, &config)) else {
                return;
            };
            if let Some(target) = document.get_element_by_id(&id) {
                e.prevent_default();
                debug!("Scrolling to #{}", id);
                smooth_scroll(&target);
            }
        })
    };
    dom::listen_all(links.iter().map(|el| el.unchecked_ref::<EventTarget>()), "click", on_click)?;

    info!("Smooth scrolling bound to {} anchor links", links.len());
    Ok(links.len())
}
