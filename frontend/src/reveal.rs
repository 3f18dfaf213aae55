use log::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Reflect};
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    Window,
};

use crate::config::PageConfig;
use crate::dom;
use crate::error::SetupError;

/// Fade-in state of one section. Only ever moves from `Hidden` to `Revealed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reveal {
    #[default]
    Hidden,
    Revealed,
}

/// What to do with a section whose visibility just changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealAction {
    /// Add the visible class and stop observing the section.
    ShowAndUnobserve,
}

impl Reveal {
    pub fn on_intersection(
        &mut self,
        ratio: f64,
        intersecting: bool,
        threshold: f64,
    ) -> Option<RevealAction> {
        match self {
            Reveal::Hidden if intersecting && ratio >= threshold => {
                *self = Reveal::Revealed;
                Some(RevealAction::ShowAndUnobserve)
            }
            _ => None,
        }
    }
}

/// IntersectionObserver is missing on old browsers and some embedded views.
pub fn observer_supported(window: &Window) -> bool {
    Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

/// Handles one intersection report for `section`. The section's own visible
/// class is its reveal state, so a report arriving after the reveal is a no-op.
/// Returns true when the section was just revealed and should be unobserved.
pub fn reveal_entry(
    section: &Element,
    ratio: f64,
    intersecting: bool,
    threshold: f64,
    visible_class: &str,
) -> bool {
    let classes = section.class_list();
    let mut state = if classes.contains(visible_class) {
        Reveal::Revealed
    } else {
        Reveal::Hidden
    };
    match state.on_intersection(ratio, intersecting, threshold) {
        Some(RevealAction::ShowAndUnobserve) => {
            if let Err(e) = classes.add_1(visible_class) {
                warn!("Could not reveal section: {:?}", e);
            }
            debug!("Revealed section #{}", section.id());
            true
        }
        None => false,
    }
}

/// Tags every section as hidden and fades each one in the first time it is
/// sufficiently on screen. Returns the number of sections observed, or zero
/// when the runtime has no IntersectionObserver.
pub fn bind(window: &Window, document: &Document, config: &PageConfig) -> Result<usize, SetupError> {
    if !observer_supported(window) {
        info!("IntersectionObserver unavailable, sections render without fade-in");
        return Ok(0);
    }

    let sections = dom::select_all(document, &config.section_selector)?;
    for section in &sections {
        section.class_list().add_1(&config.fade_class)?;
    }

    let visible_class = config.visible_class.clone();
    let threshold = config.reveal_threshold;
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let section: Element = entry.target();
                let reveal = reveal_entry(
                    &section,
                    entry.intersection_ratio(),
                    entry.is_intersecting(),
                    threshold,
                    &visible_class,
                );
                if reveal {
                    observer.unobserve(&section);
                }
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();

    for section in &sections {
        observer.observe(section);
    }

    info!("Fade-in observer watching {} sections", sections.len());
    Ok(sections.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f64 = 0.1;

    #[test]
    fn reveals_once_past_threshold() {
        let mut section = Reveal::default();
        assert_eq!(
            section.on_intersection(0.25, true, THRESHOLD),
            Some(RevealAction::ShowAndUnobserve)
        );
        assert_eq!(section, Reveal::Revealed);
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut section = Reveal::default();
        assert!(section.on_intersection(0.1, true, THRESHOLD).is_some());
    }

    #[test]
    fn below_threshold_stays_hidden() {
        let mut section = Reveal::default();
        assert_eq!(section.on_intersection(0.05, true, THRESHOLD), None);
        assert_eq!(section.on_intersection(0.0, false, THRESHOLD), None);
        assert_eq!(section, Reveal::Hidden);
    }

    #[test]
    fn reentering_the_viewport_does_not_reveal_again() {
        let mut section = Reveal::default();
        let actions: Vec<_> = [(0.5, true), (0.0, false), (0.8, true), (0.0, false), (1.0, true)]
            .into_iter()
            .filter_map(|(ratio, intersecting)| section.on_intersection(ratio, intersecting, THRESHOLD))
            .collect();
        assert_eq!(actions, vec![RevealAction::ShowAndUnobserve]);
        assert_eq!(section, Reveal::Revealed);
    }

    #[test]
    fn not_intersecting_never_reveals_even_with_stale_ratio() {
        let mut section = Reveal::default();
        assert_eq!(section.on_intersection(0.5, false, THRESHOLD), None);
    }
}
