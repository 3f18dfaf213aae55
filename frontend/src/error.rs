use thiserror::Error;
use wasm_bindgen::JsValue;

/// Faults that stop the page script from mounting. They all mean the markup and
/// the script disagree, so nothing here is retried.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("required element `{selector}` not found")]
    MissingElement { selector: String },
    #[error("element `{selector}` is not a {expected}")]
    WrongElementType {
        selector: String,
        expected: &'static str,
    },
    #[error("DOM call failed: {0}")]
    Js(String),
}

impl From<JsValue> for SetupError {
    fn from(value: JsValue) -> Self {
        SetupError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<SetupError> for JsValue {
    fn from(err: SetupError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
