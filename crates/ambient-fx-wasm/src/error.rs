use thiserror::Error;
use wasm_bindgen::JsValue;

/// Anything the browser refused. Always logged and turned into an inert
/// widget, never surfaced to the page.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no global window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("2d drawing context unavailable")]
    NoContext,
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for HostError {
    fn from(value: JsValue) -> Self {
        HostError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
