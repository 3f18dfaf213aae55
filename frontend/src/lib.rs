//! Page script for the Jammix site: gallery lightbox, smooth same-page
//! scrolling and fade-in of sections as they scroll into view.
//!
//! Build with `wasm-pack build frontend --target web` and load it from the
//! page with:
//!
//! ```html
//! <script type="module">
//!   import init from "/pkg/jammix_site.js";
//!   init();
//! </script>
//! ```

use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::Document;

pub mod anchors;
pub mod config;
mod dom;
pub mod error;
pub mod lightbox;
pub mod reveal;
pub mod styles;

pub use config::PageConfig;
pub use error::SetupError;

/// What `mount` bound, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mounted {
    pub gallery_images: usize,
    pub anchor_links: usize,
    pub sections: usize,
}

/// Wires every behaviour into `document`. A missing lightbox element aborts the
/// whole mount, since it means the markup and this script are out of sync.
pub fn mount(document: &Document, config: &PageConfig) -> Result<Mounted, SetupError> {
    let window = web_sys::window().ok_or(SetupError::NoWindow)?;

    styles::inject(document, config)?;
    let gallery_images = lightbox::bind(document, config)?;
    let anchor_links = anchors::bind(document, config)?;
    let sections = reveal::bind(&window, document, config)?;

    Ok(Mounted {
        gallery_images,
        anchor_links,
        sections,
    })
}

fn run() -> Result<Mounted, SetupError> {
    let document = web_sys::window()
        .ok_or(SetupError::NoWindow)?
        .document()
        .ok_or(SetupError::NoDocument)?;
    let config = PageConfig::from_document(&document);
    mount(&document, &config)
}

#[cfg_attr(feature = "autostart", wasm_bindgen(start))]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // A second logger init only happens if the host calls start again.
    let _ = console_log::init_with_level(config::log_level());

    match run() {
        Ok(mounted) => {
            info!(
                "Page ready: {} gallery images, {} anchor links, {} sections",
                mounted.gallery_images, mounted.anchor_links, mounted.sections
            );
            Ok(())
        }
        Err(e) => {
            error!("Page setup failed: {}", e);
            Err(e.into())
        }
    }
}
