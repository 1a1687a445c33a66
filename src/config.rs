use log::{warn, Level};
use serde::Deserialize;
use web_sys::Document;

use crate::error::{Result, SiteError};

/// Id of the optional JSON island overriding [`SiteConfig`] defaults.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Policy values shared by every component on the page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// Vertical offset in CSS pixels past which the header is "scrolled".
    pub scroll_threshold: f64,
    /// Delay between the fade-out start and the actual navigation. Also
    /// published to CSS as `--page-fade-duration`.
    pub transition_delay_ms: u32,
    pub entrance_animation: String,
    pub slide_interval_ms: u32,
    pub items_per_page: usize,
    /// Gap kept above the portfolio grid when a page is selected.
    pub scroll_offset: f64,
    pub reveal_threshold: f64,
    pub reveal_offset: String,
    pub reveal_transition: String,
    /// Document name used when the location path ends in `/`.
    pub index_document: String,
    pub page_suffix: String,
    pub inquiry_confirmation: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: 50.0,
            transition_delay_ms: 800,
            entrance_animation: "fadeInPage 1.2s ease-out forwards".to_string(),
            slide_interval_ms: 3000,
            items_per_page: 12,
            scroll_offset: 100.0,
            reveal_threshold: 0.1,
            reveal_offset: "translateY(40px)".to_string(),
            reveal_transition: "all 1.2s cubic-bezier(0.2, 0, 0.2, 1)".to_string(),
            index_document: "index.html".to_string(),
            page_suffix: ".html".to_string(),
            inquiry_confirmation:
                "Your inquiry has been received. We will get back to you shortly.".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: SiteConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.items_per_page == 0 {
            return Err(SiteError::InvalidConfig("itemsPerPage must be at least 1".into()));
        }
        if self.slide_interval_ms == 0 {
            return Err(SiteError::InvalidConfig("slideIntervalMs must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(SiteError::InvalidConfig(format!(
                "revealThreshold {} is outside 0..=1",
                self.reveal_threshold
            )));
        }
        if self.page_suffix.is_empty() {
            return Err(SiteError::InvalidConfig("pageSuffix must not be empty".into()));
        }
        Ok(())
    }

    /// Reads the config island from the document.
    pub fn load(document: &Document) -> Self {
        Self::from_island(
            document
                .get_element_by_id(CONFIG_ELEMENT_ID)
                .and_then(|element| element.text_content()),
        )
    }

    /// Config from the island's text; defaults when it is absent, blank or
    /// invalid.
    pub fn from_island(raw: Option<String>) -> Self {
        match raw {
            Some(raw) if !raw.trim().is_empty() => Self::from_json(&raw).unwrap_or_else(|err| {
                warn!("Ignoring #{}: {}", CONFIG_ELEMENT_ID, err);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// CSS value for `--page-fade-duration`.
    pub fn fade_duration_css(&self) -> String {
        format!("{}ms", self.transition_delay_ms)
    }
}
