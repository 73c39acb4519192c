use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::feed::{datetime, FeedItem, Locale};

/// Targeted span replacement over the feed document text. The template is
/// hand-authored; everything outside the anchored spans must survive
/// byte-for-byte, so this never round-trips through an XML parser.
pub struct FeedSplicer {
    patterns: SplicePatterns,
}

#[derive(Debug)]
struct SplicePatterns {
    pub_date: Regex,
    last_build_date: Regex,
    item_block: Regex,
    blank_runs: Regex,
}

impl SplicePatterns {
    fn new() -> Result<Self> {
        Ok(Self {
            pub_date: Regex::new(r"(?s)<pubDate>.*?</pubDate>")
                .map_err(|e| Error::Invalid(e.to_string()))?,
            last_build_date: Regex::new(r"(?s)<lastBuildDate>.*?</lastBuildDate>")
                .map_err(|e| Error::Invalid(e.to_string()))?,
            item_block: Regex::new(r"(?s)[ \t]*<item>.*?</item>")
                .map_err(|e| Error::Invalid(e.to_string()))?,
            blank_runs: Regex::new(r"\n{3,}").map_err(|e| Error::Invalid(e.to_string()))?,
        })
    }
}

impl FeedSplicer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            patterns: SplicePatterns::new()?,
        })
    }

    /// Full rebuild: replace the build-time fields, drop every existing
    /// item block and splice in the freshly computed ones. The tail from
    /// `</channel>` onward is passed through untouched. Item pubDates use
    /// the site locale; the channel's build-time fields are always English.
    pub fn rebuild(
        &self,
        document: &str,
        items: &[FeedItem],
        build_time: DateTime<Utc>,
        locale: Locale,
    ) -> Result<String> {
        if !document.contains("<channel") {
            return Err(Error::Template("feed document has no <channel> tag".to_string()));
        }
        let close = document
            .find("</channel>")
            .ok_or_else(|| Error::Template("feed document has no </channel> tag".to_string()))?;
        let (prefix, tail) = document.split_at(close);

        let stamp = datetime::format_rfc2822(build_time, Locale::En);
        let prefix = self
            .patterns
            .pub_date
            .replace(prefix, format!("<pubDate>{}</pubDate>", stamp).as_str());
        let prefix = self
            .patterns
            .last_build_date
            .replace(&prefix, format!("<lastBuildDate>{}</lastBuildDate>", stamp).as_str());
        let prefix = self.patterns.item_block.replace_all(&prefix, "");

        let rendered: Vec<String> = items.iter().map(|item| item.render(locale)).collect();
        let mut body = String::with_capacity(document.len());
        body.push_str(prefix.trim_end());
        body.push_str("\n\n");
        body.push_str(&rendered.join("\n\n"));
        body.push('\n');

        // Blank runs only ever accumulate where items are removed and
        // reinserted; the tail must stay byte-for-byte as authored.
        let mut output = self.patterns.blank_runs.replace_all(&body, "\n\n").into_owned();
        output.push_str(tail);

        debug!("Spliced {} items into feed document", items.len());
        Ok(output)
    }

    /// Fast-path insert used by the add workflow: one new item goes in
    /// right after the lastBuildDate element, or before `</channel>` when
    /// the template has none. Existing items are left exactly where they
    /// are; a later full rebuild restores global ordering.
    pub fn insert_item(&self, document: &str, item: &FeedItem, locale: Locale) -> Result<String> {
        let rendered = item.render(locale);

        let close = document
            .find("</channel>")
            .ok_or_else(|| Error::Template("feed document has no </channel> tag".to_string()))?;

        // Anchor inside the channel only; a lastBuildDate past </channel>
        // is tail content and must not attract the insert.
        let mut output = String::with_capacity(document.len() + rendered.len() + 2);
        if let Some(found) = self.patterns.last_build_date.find(&document[..close]) {
            output.push_str(&document[..found.end()]);
            output.push('\n');
            output.push_str(&rendered);
            output.push_str(&document[found.end()..]);
        } else {
            output.push_str(&document[..close]);
            output.push_str(&rendered);
            output.push('\n');
            output.push_str(&document[close..]);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TEMPLATE: &str = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<rss version=\"2.0\">
    <channel>
        <title>Workbench Notes</title>
        <link>https://example.com</link>
        <description>Articles</description>
        <pubDate>Wed, 15 Mar 2023 10:00:00 GMT</pubDate>
        <lastBuildDate>Wed, 15 Mar 2023 10:00:00 GMT</lastBuildDate>

        <item>
            <title>Stale One</title>
            <link>./../articles/stale.html</link>
            <description>old</description>
            <pubDate>Wed, 15 Mar 2023 09:00:00 GMT</pubDate>
            <guid>./../articles/stale.html</guid>
        </item>
    </channel>
</rss>
<!-- trailing comment kept verbatim -->
";

    fn build_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn sample_item(slug: &str, title: &str) -> FeedItem {
        FeedItem {
            slug: slug.to_string(),
            title: title.to_string(),
            link: format!("./../articles/{}.html", slug),
            description: "fresh".to_string(),
            published: build_time(),
        }
    }

    #[test]
    fn test_rebuild_replaces_build_time_fields() {
        let splicer = FeedSplicer::new().unwrap();
        let output = splicer.rebuild(TEMPLATE, &[], build_time(), Locale::En).unwrap();

        assert!(output.contains("<pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>"));
        assert!(output.contains("<lastBuildDate>Mon, 01 Jan 2024 00:00:00 GMT</lastBuildDate>"));
        assert!(!output.contains("Wed, 15 Mar 2023 10:00:00 GMT"));
    }

    #[test]
    fn test_rebuild_removes_stale_items() {
        let splicer = FeedSplicer::new().unwrap();
        let output = splicer
            .rebuild(TEMPLATE, &[sample_item("alpha", "Alpha")], build_time(), Locale::En)
            .unwrap();

        assert!(!output.contains("Stale One"));
        assert!(output.contains("<title>Alpha</title>"));
    }

    #[test]
    fn test_rebuild_preserves_tail_verbatim() {
        let splicer = FeedSplicer::new().unwrap();
        let output = splicer
            .rebuild(TEMPLATE, &[sample_item("alpha", "Alpha")], build_time(), Locale::En)
            .unwrap();

        let tail = "</channel>\n</rss>\n<!-- trailing comment kept verbatim -->\n";
        assert!(output.ends_with(tail));
    }

    #[test]
    fn test_rebuild_joins_items_with_single_blank_line() {
        let splicer = FeedSplicer::new().unwrap();
        let items = [sample_item("alpha", "Alpha"), sample_item("beta", "Beta")];
        let output = splicer.rebuild(TEMPLATE, &items, build_time(), Locale::En).unwrap();

        assert!(output.contains("</item>\n\n        <item>"));
        assert!(!output.contains("\n\n\n"));
    }

    #[test]
    fn test_rebuild_is_stable_across_runs() {
        let splicer = FeedSplicer::new().unwrap();
        let items = [sample_item("alpha", "Alpha")];

        let once = splicer.rebuild(TEMPLATE, &items, build_time(), Locale::En).unwrap();
        let twice = splicer.rebuild(&once, &items, build_time(), Locale::En).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rebuild_keeps_blank_runs_in_tail() {
        let template = "\
<rss>\n    <channel>\n        <title>T</title>\n        <lastBuildDate>x</lastBuildDate>\n    </channel>\n\n\n\n<!-- spaced-out tail notes -->\n\n\n\n</rss>\n";
        let splicer = FeedSplicer::new().unwrap();
        let output = splicer
            .rebuild(template, &[sample_item("alpha", "Alpha")], build_time(), Locale::En)
            .unwrap();

        // Blank-line collapsing is bounded to the rebuilt region; the
        // authored tail keeps its runs byte-for-byte.
        assert!(output
            .ends_with("</channel>\n\n\n\n<!-- spaced-out tail notes -->\n\n\n\n</rss>\n"));
    }

    #[test]
    fn test_rebuild_without_channel_is_fatal() {
        let splicer = FeedSplicer::new().unwrap();
        let result = splicer.rebuild("<rss></rss>", &[], build_time(), Locale::En);
        assert!(matches!(result, Err(Error::Template(_))));
    }

    #[test]
    fn test_rebuild_without_closing_channel_is_fatal() {
        let splicer = FeedSplicer::new().unwrap();
        let result = splicer.rebuild("<rss><channel></rss>", &[], build_time(), Locale::En);
        assert!(matches!(result, Err(Error::Template(_))));
    }

    #[test]
    fn test_insert_item_after_last_build_date() {
        let splicer = FeedSplicer::new().unwrap();
        let output = splicer.insert_item(TEMPLATE, &sample_item("gamma", "Gamma"), Locale::En).unwrap();

        // New item lands between lastBuildDate and the stale item, which
        // stays in place.
        let last_build = output.find("</lastBuildDate>").unwrap();
        let gamma = output.find("<title>Gamma</title>").unwrap();
        let stale = output.find("<title>Stale One</title>").unwrap();
        assert!(last_build < gamma && gamma < stale);
    }

    #[test]
    fn test_insert_item_falls_back_to_channel_close() {
        let template = "<rss>\n    <channel>\n        <title>T</title>\n    </channel>\n</rss>\n";
        let splicer = FeedSplicer::new().unwrap();
        let output = splicer.insert_item(template, &sample_item("gamma", "Gamma"), Locale::En).unwrap();

        let gamma = output.find("<title>Gamma</title>").unwrap();
        let close = output.find("</channel>").unwrap();
        assert!(gamma < close);
        assert!(output.ends_with("</rss>\n"));
    }

    #[test]
    fn test_insert_item_ignores_last_build_date_in_tail() {
        let template = "\
<rss>\n    <channel>\n        <title>T</title>\n    </channel>\n<!-- example: <lastBuildDate>never</lastBuildDate> -->\n</rss>\n";
        let splicer = FeedSplicer::new().unwrap();
        let output = splicer
            .insert_item(template, &sample_item("gamma", "Gamma"), Locale::En)
            .unwrap();

        // The only lastBuildDate is past </channel>; the item must land
        // inside the channel, not after the tail anchor.
        let gamma = output.find("<title>Gamma</title>").unwrap();
        let close = output.find("</channel>").unwrap();
        assert!(gamma < close);
        assert!(output.ends_with("<!-- example: <lastBuildDate>never</lastBuildDate> -->\n</rss>\n"));
    }

    #[test]
    fn test_insert_item_without_anchors_is_fatal() {
        let splicer = FeedSplicer::new().unwrap();
        let result = splicer.insert_item("<rss></rss>", &sample_item("gamma", "Gamma"), Locale::En);
        assert!(matches!(result, Err(Error::Template(_))));
    }
}
