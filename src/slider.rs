use log::debug;
use web_sys::Document;

use crate::dom::{self, Attributes, Markup};
use crate::error::Result;

pub const TRACK_ID: &str = "sliderTrack";
pub const SEEDED_ATTRIBUTE: &str = "data-seeded";

/// Appends one copy of the track's content after itself so the CSS marquee
/// can wrap without a seam. Returns false if the track was already doubled.
pub fn seed<T: Markup + Attributes>(track: &T) -> bool {
    if track.attribute(SEEDED_ATTRIBUTE).is_some() {
        return false;
    }
    let items = track.inner_html();
    track.replace_inner_html(&format!("{items}{items}"));
    track.set_attribute_value(SEEDED_ATTRIBUTE, "true");
    true
}

pub fn mount(document: &Document) -> Result<bool> {
    let track = dom::by_id(document, TRACK_ID)?;
    let seeded = seed(&track);
    if !seeded {
        debug!("#{} already seeded", TRACK_ID);
    }
    Ok(seeded)
}
