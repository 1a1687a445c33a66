use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error, PartialEq)]
pub enum SiteError {
    /// The page does not carry the element a component needs.
    #[error("required element `{0}` is missing")]
    MissingElement(&'static str),
    #[error("invalid site config: {0}")]
    InvalidConfig(String),
    #[error("page {requested} is outside 1..={page_count}")]
    PageOutOfRange { requested: usize, page_count: usize },
    #[error("no portfolio item at index {0}")]
    UnknownItem(usize),
    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        SiteError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        SiteError::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
