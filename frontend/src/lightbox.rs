use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, HtmlImageElement, KeyboardEvent};

use crate::config::PageConfig;
use crate::dom;
use crate::error::SetupError;

/// The picture shown in the overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    pub src: String,
    pub alt: String,
}

impl Slide {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
        }
    }

    /// Reads the picture off a clicked thumbnail. `<img>` elements give their
    /// resolved `src`; anything else falls back to its attributes.
    pub fn from_element(element: &Element) -> Self {
        match element.dyn_ref::<HtmlImageElement>() {
            Some(img) => Self::new(img.src(), img.alt()),
            None => Self::new(
                element.get_attribute("src").unwrap_or_default(),
                element.get_attribute("alt").unwrap_or_default(),
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Lightbox {
    #[default]
    Closed,
    Open(Slide),
}

/// DOM work a transition asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show the slide, mark the overlay active and lock page scroll.
    Show(Slide),
    /// Unmark the overlay, unlock page scroll and blank the image slot.
    Hide,
}

/// Where a click on the overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOrigin {
    /// The overlay container itself.
    Backdrop,
    /// The image or any other descendant.
    Inside,
}

impl Lightbox {
    pub fn is_open(&self) -> bool {
        matches!(self, Lightbox::Open(_))
    }

    pub fn open(&mut self, slide: Slide) -> Effect {
        *self = Lightbox::Open(slide.clone());
        Effect::Show(slide)
    }

    /// Close is unconditional so the close control always leaves a clean overlay.
    pub fn close(&mut self) -> Effect {
        *self = Lightbox::Closed;
        Effect::Hide
    }

    pub fn overlay_click(&mut self, origin: ClickOrigin) -> Option<Effect> {
        match origin {
            ClickOrigin::Backdrop => Some(self.close()),
            ClickOrigin::Inside => None,
        }
    }

    pub fn key_down(&mut self, key: &str) -> Option<Effect> {
        if key == "Escape" && self.is_open() {
            Some(self.close())
        } else {
            None
        }
    }
}

/// Classifies an overlay click by comparing the event target to the overlay.
pub fn click_origin(event: &Event, overlay: &Element) -> ClickOrigin {
    let overlay: &EventTarget = overlay.as_ref();
    if event.target().as_ref() == Some(overlay) {
        ClickOrigin::Backdrop
    } else {
        ClickOrigin::Inside
    }
}

/// The overlay elements plus the state they render.
pub struct LightboxView {
    overlay: Element,
    image: HtmlImageElement,
    body: Option<HtmlElement>,
    active_class: String,
    state: RefCell<Lightbox>,
}

impl LightboxView {
    pub fn find(document: &Document, config: &PageConfig) -> Result<Self, SetupError> {
        let overlay: Element = dom::require_by_id(document, &config.lightbox_id, "element")?;
        let image: HtmlImageElement = dom::require_by_id(document, &config.image_id, "HTMLImageElement")?;

        Ok(Self {
            overlay,
            image,
            body: document.body(),
            active_class: config.active_class.clone(),
            state: RefCell::new(Lightbox::Closed),
        })
    }

    fn transition(&self, step: impl FnOnce(&mut Lightbox) -> Option<Effect>) {
        let effect = {
            let mut state = self.state.borrow_mut();
            step(&mut *state)
        };
        if let Some(effect) = effect {
            self.apply(effect);
        }
    }

    fn apply(&self, effect: Effect) {
        let classes = self.overlay.class_list();
        let result = match effect {
            Effect::Show(slide) => {
                debug!("Opening lightbox for {}", slide.src);
                self.image.set_src(&slide.src);
                self.image.set_alt(&slide.alt);
                classes
                    .add_1(&self.active_class)
                    .and_then(|_| self.set_overflow("hidden"))
            }
            Effect::Hide => {
                debug!("Closing lightbox");
                let result = classes
                    .remove_1(&self.active_class)
                    .and_then(|_| self.set_overflow(""));
                self.image.set_src("");
                self.image.set_alt("");
                result
            }
        };
        if let Err(e) = result {
            warn!("Lightbox update failed: {:?}", e);
        }
    }

    fn set_overflow(&self, value: &str) -> Result<(), wasm_bindgen::JsValue> {
        match &self.body {
            Some(body) => body.style().set_property("overflow", value),
            None => Ok(()),
        }
    }
}

/// Wires the lightbox into the page: thumbnails open it, and the close control,
/// a backdrop click or Escape shut it. Returns the number of thumbnails bound.
pub fn bind(document: &Document, config: &PageConfig) -> Result<usize, SetupError> {
    let view = Rc::new(LightboxView::find(document, config)?);
    let close_control = view
        .overlay
        .query_selector(&config.close_selector)?
        .ok_or_else(|| SetupError::MissingElement {
            selector: config.close_selector.clone(),
        })?;

    let thumbnails = dom::select_all(document, &config.gallery_selector)?;
    let on_thumbnail = {
        let view = view.clone();
        Closure::<dyn FnMut(Event)>::new(move |e: Event| {
            let slide = e
                .current_target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .map(|el| Slide::from_element(&el))
                .unwrap_or_default();
            view.transition(|lb| Some(lb.open(slide)));
        })
    };
    dom::listen_all(thumbnails.iter().map(|el| el.unchecked_ref::<EventTarget>()), "click", on_thumbnail)?;

    let on_close = {
        let view = view.clone();
        Closure::<dyn FnMut(Event)>::new(move |_e: Event| {
            view.transition(|lb| Some(lb.close()));
        })
    };
    dom::listen_all([close_control.unchecked_ref::<EventTarget>()], "click", on_close)?;

    let on_backdrop = {
        let view = view.clone();
        Closure::<dyn FnMut(Event)>::new(move |e: Event| {
            let origin = click_origin(&e, &view.overlay);
            view.transition(|lb| lb.overlay_click(origin));
        })
    };
    dom::listen_all([view.overlay.unchecked_ref::<EventTarget>()], "click", on_backdrop)?;

    let on_key = {
        let view = view.clone();
        Closure::<dyn FnMut(Event)>::new(move |e: Event| {
            if let Some(key) = e.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) {
                view.transition(|lb| lb.key_down(&key));
            }
        })
    };
    let document_target: &EventTarget = document.as_ref();
    dom::listen_all([document_target], "keydown", on_key)?;

    info!("Lightbox bound to {} gallery images", thumbnails.len());
    Ok(thumbnails.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> Slide {
        Slide::new("/img/stage-1.jpg", "Main stage at night")
    }

    #[test]
    fn starts_closed_and_empty() {
        let lightbox = Lightbox::default();
        assert!(!lightbox.is_open());
        assert_eq!(lightbox, Lightbox::Closed);
    }

    #[test]
    fn thumbnail_click_opens_with_its_picture() {
        let mut lightbox = Lightbox::default();
        let effect = lightbox.open(photo());
        assert_eq!(effect, Effect::Show(photo()));
        assert!(lightbox.is_open());
        assert_eq!(lightbox, Lightbox::Open(photo()));
    }

    #[test]
    fn opening_again_replaces_the_picture() {
        let mut lightbox = Lightbox::default();
        lightbox.open(photo());
        let other = Slide::new("/img/crowd.jpg", "Crowd");
        lightbox.open(other.clone());
        assert_eq!(lightbox, Lightbox::Open(other));
    }

    #[test]
    fn close_control_closes_and_clears() {
        let mut lightbox = Lightbox::default();
        lightbox.open(photo());
        assert_eq!(lightbox.close(), Effect::Hide);
        assert_eq!(lightbox, Lightbox::Closed);
    }

    #[test]
    fn backdrop_click_closes() {
        let mut lightbox = Lightbox::default();
        lightbox.open(photo());
        assert_eq!(lightbox.overlay_click(ClickOrigin::Backdrop), Some(Effect::Hide));
        assert!(!lightbox.is_open());
    }

    #[test]
    fn click_on_the_picture_keeps_it_open() {
        let mut lightbox = Lightbox::default();
        lightbox.open(photo());
        assert_eq!(lightbox.overlay_click(ClickOrigin::Inside), None);
        assert_eq!(lightbox, Lightbox::Open(photo()));
    }

    #[test]
    fn escape_closes_only_when_open() {
        let mut lightbox = Lightbox::default();
        assert_eq!(lightbox.key_down("Escape"), None);
        assert!(!lightbox.is_open());

        lightbox.open(photo());
        assert_eq!(lightbox.key_down("Enter"), None);
        assert!(lightbox.is_open());
        assert_eq!(lightbox.key_down("Escape"), Some(Effect::Hide));
        assert!(!lightbox.is_open());
    }
}
