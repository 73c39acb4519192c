pub mod datetime;
pub mod item;
pub mod splice;

use chrono::{DateTime, Utc};

pub use datetime::{format_rfc2822, parse_timestamp, Locale};
pub use item::{build_all_items, build_item};
pub use splice::FeedSplicer;

/// One `<item>` entry, derived from a catalog record. Never persisted on its
/// own; the feed document is the only durable form.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub slug: String,
    pub title: String,
    pub link: String,
    pub description: String,
    pub published: DateTime<Utc>,
}

impl FeedItem {
    /// Render the fixed-shape item fragment. Title and description are
    /// escaped here; link and guid are slug-derived and never need it. The
    /// locale only affects the pubDate's day and month names.
    pub fn render(&self, locale: Locale) -> String {
        [
            "        <item>".to_string(),
            format!("            <title>{}</title>", escape_xml(&self.title)),
            format!("            <link>{}</link>", self.link),
            format!("            <description>{}</description>", escape_xml(&self.description)),
            format!("            <pubDate>{}</pubDate>", format_rfc2822(self.published, locale)),
            format!("            <guid>{}</guid>", self.link),
            "        </item>".to_string(),
        ]
        .join("\n")
    }
}

/// Escape `&`, `<` and `>` for embedding in XML text content. Ampersand
/// first, or already-escaped entities would be double-escaped.
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
