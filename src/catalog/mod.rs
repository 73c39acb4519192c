use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::Result;

/// One catalog entry. Known fields are typed; anything else an author has
/// put in the record rides along in `extra` and survives the rewrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Filename of the English variant. Records without it are catalog-only
    /// and never appear in the feed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,

    /// Author-supplied ISO date or date-time string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pubdate: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// The slug → record store. Backed by a `BTreeMap`, so iteration is always
/// in ascending slug order and serialization is canonical by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(flatten)]
    records: BTreeMap<String, ArticleRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the store from disk. A missing or undecodable file yields an
    /// empty catalog; the rebuild workflow must not die on a bad store.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Could not read catalog {}: {}", path.display(), e);
                return Self::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Could not decode catalog {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    /// Write the store in canonical form: keys sorted ascending, pretty
    /// JSON, trailing newline. Saving the output of a previous save is
    /// byte-identical.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        std::fs::write(path.as_ref(), content)?;
        debug!("Wrote catalog with {} records", self.records.len());
        Ok(())
    }

    pub fn insert(&mut self, slug: String, record: ArticleRecord) {
        self.records.insert(slug, record);
    }

    pub fn get(&self, slug: &str) -> Option<&ArticleRecord> {
        self.records.get(slug)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ascending slug order, always.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ArticleRecord)> {
        self.records.iter()
    }
}
