// src/site/models.rs
use serde::Serialize;
use std::path::PathBuf;

/// Prefix under which images are stored next to the README
pub const IMAGE_DIR: &str = "img";

/// One classified unit of tutorial content, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    BigHeader { text: String },
    Header { text: String },
    SubHeader { text: String },
    List { items: Vec<String> },
    Code { text: String },
    /// `None` means the attribute was missing on the page.
    Image { href: Option<String>, src: Option<String> },
    Text { text: String },
}

/// A scraped tutorial page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Tutorial {
    pub url: String,
    pub title: String,
    pub content: Vec<ContentBlock>,
    pub images: Vec<String>, // Raw image URLs as found on the page, may repeat until deduped
    pub directory: Option<PathBuf>, // Set by main once the output folder exists
}

impl Tutorial {
    /// Drops repeated image URLs, keeping the first occurrence of each.
    pub fn dedup_images(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.images.retain(|url| seen.insert(url.clone()));
    }
}

/// Final path segment of an image URL.
pub fn file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// The file name alone, used as alt text and on disk.
pub fn bare_name(url: &str) -> String {
    file_name(url).to_string()
}

/// Relative path used inside the Markdown, e.g. `img/foo.png`.
pub fn display_path(url: &str) -> String {
    format!("{}/{}", IMAGE_DIR, file_name(url))
}
