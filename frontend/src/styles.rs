use log::debug;
use web_sys::Document;

use crate::config::PageConfig;
use crate::error::SetupError;

/// Stylesheet for the fade-in effect. Users asking for reduced motion get the
/// sections fully visible with no transition, whatever the observer did.
pub fn fade_in_css(config: &PageConfig) -> String {
    let fade = &config.fade_class;
    let visible = &config.visible_class;
    format!(
        r#"
.{fade} {{
    opacity: 0;
    transform: translateY(20px);
    transition: opacity 0.6s ease-out, transform 0.6s ease-out;
}}
.{fade}.{visible} {{
    opacity: 1;
    transform: none;
}}
@media (prefers-reduced-motion: reduce) {{
    .{fade} {{
        opacity: 1;
        transform: none;
        transition: none;
    }}
}}
"#
    )
}

/// Appends the fade-in stylesheet to `<head>`. A second call finds the element
/// already there and does nothing. Returns whether a stylesheet was added.
pub fn inject(document: &Document, config: &PageConfig) -> Result<bool, SetupError> {
    if document.get_element_by_id(&config.style_element_id).is_some() {
        return Ok(false);
    }
    let head = document.head().ok_or_else(|| SetupError::MissingElement {
        selector: "head".to_string(),
    })?;

    let style = document.create_element("style")?;
    style.set_id(&config.style_element_id);
    style.set_text_content(Some(&fade_in_css(config)));
    head.append_child(&style)?;

    debug!("Injected #{} stylesheet", config.style_element_id);
    Ok(true)
}
