use log::{debug, warn};
use serde::Deserialize;
use web_sys::Document;

/// Id of the optional `<script type="application/json">` block that overrides
/// the defaults below.
pub const CONFIG_ELEMENT_ID: &str = "jammix-config";

#[cfg(debug_assertions)]
pub fn log_level() -> log::Level {
    log::Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> log::Level {
    log::Level::Info
}

/// Selectors, ids and class names shared with the page markup and stylesheet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub lightbox_id: String,
    pub image_id: String,
    pub close_selector: String,
    pub gallery_selector: String,
    pub anchor_selector: String,
    pub section_selector: String,
    pub active_class: String,
    pub fade_class: String,
    pub visible_class: String,
    /// Fragments left to the browser (or to other scripts) untouched.
    pub reserved_fragments: Vec<String>,
    /// Fraction of a section that has to be on screen before it fades in.
    pub reveal_threshold: f64,
    pub style_element_id: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            lightbox_id: "lightbox".to_string(),
            image_id: "lightbox-img".to_string(),
            close_selector: ".lightbox-close".to_string(),
            gallery_selector: ".gallery-img".to_string(),
            anchor_selector: "a[href^=\"#\"]".to_string(),
            section_selector: "section".to_string(),
            active_class: "active".to_string(),
            fade_class: "fade-section".to_string(),
            visible_class: "visible".to_string(),
            reserved_fragments: vec![
                "#".to_string(),
                "#purchase".to_string(),
                "#guides".to_string(),
            ],
            reveal_threshold: 0.1,
            style_element_id: "fade-in-styles".to_string(),
        }
    }
}

impl PageConfig {
    /// Parses an override block. Fields missing from the JSON keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Reads the override block from the page, falling back to defaults when it
    /// is absent or malformed. A bad override never stops the page from working.
    pub fn from_document(document: &Document) -> Self {
        let raw = match document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Self::default(),
        };

        match Self::from_json(&raw) {
            Ok(config) => {
                debug!("Loaded page config from #{}", CONFIG_ELEMENT_ID);
                config
            }
            Err(e) => {
                warn!("Ignoring malformed #{}: {}", CONFIG_ELEMENT_ID, e);
                Self::default()
            }
        }
    }

    pub fn is_reserved(&self, fragment: &str) -> bool {
        self.reserved_fragments.iter().any(|r| r == fragment)
    }
}
