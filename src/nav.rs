use web_sys::{Document, Window};

use crate::dom::{self, Attributes, ClassList, ACTIVE_CLASS};
use crate::error::Result;

pub const NAV_LINK_SELECTOR: &str = ".nav-link";

/// Last segment of `pathname`, or `index_document` at the site root.
pub fn current_path(pathname: &str, index_document: &str) -> String {
    match pathname.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => index_document.to_string(),
    }
}

/// Marks every link whose `href` equals `current` exactly. Returns how many
/// were marked.
pub fn highlight<L: ClassList + Attributes>(links: &[L], current: &str) -> usize {
    let mut marked = 0;
    for link in links {
        if link.attribute("href").as_deref() == Some(current) {
            link.add_class(ACTIVE_CLASS);
            marked += 1;
        }
    }
    marked
}

pub fn location_path(window: &Window, index_document: &str) -> String {
    let pathname = window.location().pathname().unwrap_or_default();
    current_path(&pathname, index_document)
}

pub fn mount(document: &Document, current: &str) -> Result<usize> {
    let links = dom::select_all(document, NAV_LINK_SELECTOR)?;
    Ok(highlight(&links, current))
}
