use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::debug;

use crate::catalog::{ArticleRecord, Catalog};
use crate::content::ArticleScanner;
use crate::feed::{datetime, FeedItem};

/// Synthesize the feed item for one catalog record, or `None` when the
/// record has no English variant filename and is skipped.
///
/// The publication instant comes from the first of: the record's `pubdate`
/// string, the article file's modification time, the `now` passed by the
/// caller.
pub fn build_item(
    record: &ArticleRecord,
    article_dir: &Path,
    scanner: &ArticleScanner,
    now: DateTime<Utc>,
) -> Option<FeedItem> {
    let filename = record.en.as_deref()?;
    let slug = filename.strip_suffix(".html").unwrap_or(filename);
    let article_path = article_dir.join(format!("{}.html", slug));

    let title = record
        .title_en
        .clone()
        .unwrap_or_else(|| slug.to_string());
    let description = scanner.first_paragraph(&article_path);
    let published = resolve_timestamp(record, &article_path, now);
    let link = format!("./../articles/{}.html", slug);

    Some(FeedItem {
        slug: slug.to_string(),
        title,
        link,
        description,
        published,
    })
}

fn resolve_timestamp(record: &ArticleRecord, article_path: &Path, now: DateTime<Utc>) -> DateTime<Utc> {
    if let Some(instant) = record.pubdate.as_deref().and_then(datetime::parse_timestamp) {
        return instant;
    }
    if let Ok(modified) = std::fs::metadata(article_path).and_then(|m| m.modified()) {
        return DateTime::<Utc>::from(modified);
    }
    now
}

/// Build every feed item, most recent first. Records are visited in
/// ascending slug order and the sort is stable, so items with equal
/// timestamps stay in slug order.
pub fn build_all_items(
    catalog: &Catalog,
    article_dir: &Path,
    scanner: &ArticleScanner,
    now: DateTime<Utc>,
) -> Vec<FeedItem> {
    let mut items: Vec<FeedItem> = catalog
        .iter()
        .filter_map(|(_, record)| build_item(record, article_dir, scanner, now))
        .collect();

    items.sort_by(|a, b| b.published.cmp(&a.published));
    debug!("Built {} feed items", items.len());
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn record(en: Option<&str>, title: Option<&str>, pubdate: Option<&str>) -> ArticleRecord {
        ArticleRecord {
            en: en.map(str::to_string),
            title_en: title.map(str::to_string),
            pubdate: pubdate.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_skips_record_without_variant_filename() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = ArticleScanner::new().unwrap();
        let rec = record(None, Some("Orphan"), None);
        assert!(build_item(&rec, dir.path(), &scanner, now()).is_none());
    }

    #[test]
    fn test_title_defaults_to_slug() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = ArticleScanner::new().unwrap();
        let rec = record(Some("widget-teardown.html"), None, Some("2024-01-01"));

        let item = build_item(&rec, dir.path(), &scanner, now()).unwrap();
        assert_eq!(item.slug, "widget-teardown");
        assert_eq!(item.title, "widget-teardown");
        assert_eq!(item.link, "./../articles/widget-teardown.html");
        assert_eq!(item.description, "");
    }

    #[test]
    fn test_pubdate_beats_mtime() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("alpha.html"), "<p>Body.</p>").unwrap();
        let scanner = ArticleScanner::new().unwrap();
        let rec = record(Some("alpha.html"), Some("Alpha"), Some("2020-02-02T02:02:02Z"));

        let item = build_item(&rec, dir.path(), &scanner, now()).unwrap();
        assert_eq!(item.published, Utc.with_ymd_and_hms(2020, 2, 2, 2, 2, 2).unwrap());
        assert_eq!(item.description, "Body.");
    }

    #[test]
    fn test_unparsable_pubdate_falls_through_to_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alpha.html");
        std::fs::write(&path, "<p>Body.</p>").unwrap();
        let scanner = ArticleScanner::new().unwrap();
        let rec = record(Some("alpha.html"), Some("Alpha"), Some("not a date"));

        let item = build_item(&rec, dir.path(), &scanner, now()).unwrap();
        let mtime = DateTime::<Utc>::from(std::fs::metadata(&path).unwrap().modified().unwrap());
        assert_eq!(item.published, mtime);
    }

    #[test]
    fn test_missing_file_falls_through_to_now() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = ArticleScanner::new().unwrap();
        let rec = record(Some("ghost.html"), Some("Ghost"), None);

        let item = build_item(&rec, dir.path(), &scanner, now()).unwrap();
        assert_eq!(item.published, now());
    }

    #[test]
    fn test_items_sorted_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = ArticleScanner::new().unwrap();

        let mut catalog = Catalog::new();
        catalog.insert(
            "older".to_string(),
            record(Some("older.html"), Some("Older"), Some("2023-06-01T00:00:00Z")),
        );
        catalog.insert(
            "newer".to_string(),
            record(Some("newer.html"), Some("Newer"), Some("2024-06-01T00:00:00Z")),
        );

        let items = build_all_items(&catalog, dir.path(), &scanner, now());
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].slug, "newer");
        assert_eq!(items[1].slug, "older");
    }

    #[test]
    fn test_equal_timestamps_keep_slug_order() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = ArticleScanner::new().unwrap();

        let mut catalog = Catalog::new();
        for slug in ["charlie", "alpha", "bravo"] {
            catalog.insert(
                slug.to_string(),
                record(Some(&format!("{}.html", slug)), None, Some("2024-01-01")),
            );
        }

        let items = build_all_items(&catalog, dir.path(), &scanner, now());
        let slugs: Vec<&str> = items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["alpha", "bravo", "charlie"]);
    }
}
