use regex::Regex;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

/// Pulls feed-facing fragments out of hand-authored article HTML. Not a
/// parser: each lookup is a single first-match scan, which is all the
/// stable article templates need.
pub struct ArticleScanner {
    patterns: ScanPatterns,
}

#[derive(Debug)]
struct ScanPatterns {
    paragraph: Regex,
    tag: Regex,
    whitespace: Regex,
    time_attribute: Regex,
}

impl ScanPatterns {
    fn new() -> Result<Self> {
        Ok(Self {
            paragraph: Regex::new(r"(?s)<p[^>]*>(.*?)</p>")
                .map_err(|e| Error::Invalid(e.to_string()))?,
            tag: Regex::new(r"<[^>]*>").map_err(|e| Error::Invalid(e.to_string()))?,
            whitespace: Regex::new(r"\s+").map_err(|e| Error::Invalid(e.to_string()))?,
            time_attribute: Regex::new(r#"<time[^>]*\bdatetime="([^"]*)""#)
                .map_err(|e| Error::Invalid(e.to_string()))?,
        })
    }
}

impl ArticleScanner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            patterns: ScanPatterns::new()?,
        })
    }

    /// First `<p>…</p>` of the file, inner tags stripped and whitespace
    /// collapsed. Empty string when the file is missing or has no
    /// paragraph; description-less items are fine.
    pub fn first_paragraph<P: AsRef<Path>>(&self, path: P) -> String {
        let Ok(html) = std::fs::read_to_string(path.as_ref()) else {
            debug!("No article file at {}", path.as_ref().display());
            return String::new();
        };

        let Some(captures) = self.patterns.paragraph.captures(&html) else {
            return String::new();
        };

        let inner = self.patterns.tag.replace_all(&captures[1], "");
        self.patterns
            .whitespace
            .replace_all(&inner, " ")
            .trim()
            .to_string()
    }

    /// First `<time datetime="...">` attribute value, used by the add
    /// workflow as the default publication date.
    pub fn time_attribute<P: AsRef<Path>>(&self, path: P) -> Option<String> {
        let html = std::fs::read_to_string(path.as_ref()).ok()?;
        self.patterns
            .time_attribute
            .captures(&html)
            .map(|captures| captures[1].to_string())
    }
}
