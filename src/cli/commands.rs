use chrono::Utc;
use tracing::{debug, info, warn};

use crate::catalog::{ArticleRecord, Catalog};
use crate::cli::prompt::{self, PromptStyle};
use crate::config::Config;
use crate::content::ArticleScanner;
use crate::error::{Error, Result};
use crate::feed::{self, FeedItem, FeedSplicer, Locale};
use crate::page::{self, Category, PatchOutcome, Position};

/// Full rebuild: rewrite the catalog in canonical form, recompute every
/// feed item and splice them into the feed template.
pub fn rebuild(config: &Config) -> Result<()> {
    let catalog_path = config.catalog_path();
    let feed_path = config.feed_path();

    let catalog = Catalog::load(&catalog_path);
    // Rewritten even when nothing changed, to enforce canonical form.
    catalog.save(&catalog_path)?;

    let scanner = ArticleScanner::new()?;
    let now = Utc::now();
    let items = feed::build_all_items(&catalog, &config.articles_path(), &scanner, now);

    let document = std::fs::read_to_string(&feed_path)
        .map_err(|_| Error::NotFound(format!("feed template {}", feed_path.display())))?;
    let splicer = FeedSplicer::new()?;
    let output = splicer.rebuild(&document, &items, now, Locale::from_tag(&config.locale))?;
    std::fs::write(&feed_path, output)?;

    info!("Rebuilt {} with {} items", feed_path.display(), items.len());
    Ok(())
}

/// Interactive registration of one new article: prompts, fast-path feed
/// insert, catalog update, index page link, then (unless suppressed) a
/// full rebuild to restore global ordering.
pub fn add(config: &Config, style: &PromptStyle, at_end: bool, no_rebuild: bool) -> Result<()> {
    let category: Category = prompt::ask_required(style, "Category (desktop/mobile)")?.parse()?;
    let title_input = prompt::ask(style, "Title")?;
    let slug = prompt::ask_required(style, "Slug")?;
    let title = title_input.unwrap_or_else(|| slug.clone());
    let description = prompt::ask(style, "Description")?.unwrap_or_default();
    let date_input = prompt::ask(style, "Publication date (ISO, empty for default)")?;

    let scanner = ArticleScanner::new()?;
    let article_path = config.articles_path().join(format!("{}.html", slug));
    let now = Utc::now();

    // Explicit date, then the article's own <time> attribute, then now.
    let pubdate_string = date_input.or_else(|| scanner.time_attribute(&article_path));
    let published = pubdate_string
        .as_deref()
        .and_then(feed::parse_timestamp)
        .unwrap_or(now);

    let item = FeedItem {
        slug: slug.clone(),
        title: title.clone(),
        link: format!("./../articles/{}.html", slug),
        description,
        published,
    };

    let feed_path = config.feed_path();
    let document = std::fs::read_to_string(&feed_path)
        .map_err(|_| Error::NotFound(format!("feed template {}", feed_path.display())))?;
    let splicer = FeedSplicer::new()?;
    let locale = Locale::from_tag(&config.locale);
    std::fs::write(&feed_path, splicer.insert_item(&document, &item, locale)?)?;
    debug!("Inserted item for {} into {}", slug, feed_path.display());

    let catalog_path = config.catalog_path();
    let mut catalog = Catalog::load(&catalog_path);
    catalog.insert(
        slug.clone(),
        ArticleRecord {
            en: Some(format!("{}.html", slug)),
            title_en: Some(title.clone()),
            pubdate: pubdate_string,
            ..Default::default()
        },
    );
    catalog.save(&catalog_path)?;

    let index_path = config.index_path();
    let index = std::fs::read_to_string(&index_path)
        .map_err(|_| Error::NotFound(format!("index page {}", index_path.display())))?;
    let position = if at_end { Position::Last } else { Position::First };
    let (patched, outcome) = page::insert_link(&index, category, &slug, &title, position)?;
    match outcome {
        PatchOutcome::Updated => {
            std::fs::write(&index_path, patched)?;
            info!("Added {} link to {}", slug, index_path.display());
        }
        PatchOutcome::AlreadyPresent => {
            info!("Index page already links {}, skipped", slug);
        }
    }

    if !no_rebuild && prompt::confirm(style, "Run full rebuild now?", true)? {
        // Reconciles the fast-path insert; a failure here never fails the
        // add itself.
        if let Err(e) = rebuild(config) {
            warn!("Full rebuild after add failed: {}", e);
        }
    }

    Ok(())
}

pub fn init_logging(debug: bool, verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(debug)
        .with_line_number(debug)
        .init();

    Ok(())
}
