use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlFormElement, Window};

use crate::dom;
use crate::error::{Result, SiteError};
use crate::listener::EventListener;

pub const FORM_ID: &str = "inquiryForm";

pub trait InquiryForm {
    fn reset(&self);
}

/// Where the user-facing confirmation goes.
pub trait Notice {
    fn notify(&self, message: &str);
}

impl InquiryForm for HtmlFormElement {
    fn reset(&self) {
        HtmlFormElement::reset(self);
    }
}

impl Notice for Window {
    fn notify(&self, message: &str) {
        let _ = self.alert_with_message(message);
    }
}

/// Placeholder submission: confirm and clear, never send anything.
pub struct FormStub<F, N> {
    form: F,
    notice: N,
    message: String,
}

impl<F: InquiryForm, N: Notice> FormStub<F, N> {
    pub fn new(form: F, notice: N, message: impl Into<String>) -> Self {
        Self {
            form,
            notice,
            message: message.into(),
        }
    }

    pub fn on_submit(&self) {
        self.notice.notify(&self.message);
        self.form.reset();
    }
}

pub fn mount(window: &Window, document: &Document, message: &str) -> Result<EventListener> {
    let form = dom::by_id(document, FORM_ID)?
        .dyn_into::<HtmlFormElement>()
        .map_err(|_| SiteError::MissingElement(FORM_ID))?;
    let stub = FormStub::new(form.clone(), window.clone(), message);
    EventListener::new(&form, "submit", move |event| {
        event.prevent_default();
        stub.on_submit();
    })
}
