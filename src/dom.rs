//! Small capability traits the components are written against, and their
//! `web-sys` implementations.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList};

use crate::error::{Result, SiteError};

/// Class shared by nav links, hero slides and page buttons.
pub const ACTIVE_CLASS: &str = "active";

pub trait ClassList {
    fn add_class(&self, name: &str);
    fn remove_class(&self, name: &str);
    fn has_class(&self, name: &str) -> bool;

    fn toggle_class(&self, name: &str, on: bool) {
        if on {
            self.add_class(name);
        } else {
            self.remove_class(name);
        }
    }
}

pub trait InlineStyle {
    fn set_style(&self, property: &str, value: &str);
}

pub trait Attributes {
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute_value(&self, name: &str, value: &str);
}

pub trait Markup {
    fn inner_html(&self) -> String;
    fn replace_inner_html(&self, html: &str);
}

/// Forces a synchronous layout so a style reset is observed before the next
/// write.
pub trait Reflow {
    fn force_reflow(&self);
}

impl ClassList for Element {
    fn add_class(&self, name: &str) {
        let _ = self.class_list().add_1(name);
    }

    fn remove_class(&self, name: &str) {
        let _ = self.class_list().remove_1(name);
    }

    fn has_class(&self, name: &str) -> bool {
        self.class_list().contains(name)
    }
}

impl InlineStyle for Element {
    fn set_style(&self, property: &str, value: &str) {
        if let Some(element) = self.dyn_ref::<HtmlElement>() {
            let _ = element.style().set_property(property, value);
        }
    }
}

impl Attributes for Element {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn set_attribute_value(&self, name: &str, value: &str) {
        let _ = self.set_attribute(name, value);
    }
}

impl Markup for Element {
    fn inner_html(&self) -> String {
        Element::inner_html(self)
    }

    fn replace_inner_html(&self, html: &str) {
        self.set_inner_html(html);
    }
}

impl Reflow for Element {
    fn force_reflow(&self) {
        if let Some(element) = self.dyn_ref::<HtmlElement>() {
            let _ = element.offset_width();
        }
    }
}

/// First element matching `selector`, or `MissingElement`.
pub fn select_one(document: &Document, selector: &'static str) -> Result<Element> {
    document
        .query_selector(selector)?
        .ok_or(SiteError::MissingElement(selector))
}

fn elements(nodes: NodeList) -> Vec<Element> {
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn select_all(root: &Document, selector: &str) -> Result<Vec<Element>> {
    Ok(elements(root.query_selector_all(selector)?))
}

/// Like [`select_all`] but scoped to the descendants of `root`.
pub fn select_within(root: &Element, selector: &str) -> Result<Vec<Element>> {
    Ok(elements(root.query_selector_all(selector)?))
}

pub fn by_id(document: &Document, id: &'static str) -> Result<Element> {
    document
        .get_element_by_id(id)
        .ok_or(SiteError::MissingElement(id))
}

/// Element the event was dispatched to, if it is an element.
pub fn event_element(event: &web_sys::Event) -> Option<Element> {
    event.target().and_then(|target| target.dyn_into::<Element>().ok())
}
