use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::error::{Error, Result};

/// Which navigation section of the index page a new article belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Desktop,
    Mobile,
}

impl Category {
    fn heading(self) -> &'static str {
        match self {
            Category::Desktop => "<h3>Desktop Systems</h3>",
            Category::Mobile => "<h3>Mobile Systems</h3>",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "desktop" => Ok(Category::Desktop),
            "mobile" => Ok(Category::Mobile),
            other => Err(Error::Input(format!(
                "category must be 'desktop' or 'mobile', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Desktop => write!(f, "desktop"),
            Category::Mobile => write!(f, "mobile"),
        }
    }
}

/// Where the new link lands within its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Updated,
    /// The href was already present somewhere in the document; nothing was
    /// written and the operation still counts as success.
    AlreadyPresent,
}

/// Splice a navigation link for `slug` into the index page text. Anchored
/// text search over a hand-authored template, same contract as the feed
/// splicer: everything outside the insertion point is untouched.
pub fn insert_link(
    document: &str,
    category: Category,
    slug: &str,
    title: &str,
    position: Position,
) -> Result<(String, PatchOutcome)> {
    let href = format!("./articles/{}.html", slug);
    if document.contains(&href) {
        info!("Link {} already present, leaving index page unchanged", href);
        return Ok((document.to_string(), PatchOutcome::AlreadyPresent));
    }

    let heading = document.find(category.heading()).ok_or_else(|| {
        Error::Template(format!("index page has no {} heading", category.heading()))
    })?;
    // The section runs to the next heading; a list match past it would
    // belong to the other category.
    let body_start = heading + category.heading().len();
    let section_end = document[body_start..]
        .find("<h3>")
        .map(|offset| body_start + offset)
        .unwrap_or(document.len());
    let section = &document[heading..section_end];

    // Mobile sections may nest a topic-list inside the article-list; the
    // new link goes into the innermost list when one exists.
    let list_tag = match category {
        Category::Mobile => section
            .find("topic-list")
            .or_else(|| section.find("article-list")),
        Category::Desktop => section.find("article-list"),
    }
    .ok_or_else(|| {
        Error::Template(format!(
            "no article list after the {} heading",
            category.heading()
        ))
    })?;

    let fragment = format!("<li><a href=\"{}\">{}</a></li>", href, title);
    let insert_at = match position {
        Position::First => {
            // Just past the list's opening tag.
            let open_end = section[list_tag..]
                .find('>')
                .ok_or_else(|| Error::Template("unterminated list tag".to_string()))?;
            heading + list_tag + open_end + 1
        }
        Position::Last => {
            let close = section[list_tag..]
                .find("</ul>")
                .ok_or_else(|| Error::Template("article list never closes".to_string()))?;
            heading + list_tag + close
        }
    };

    let mut output = String::with_capacity(document.len() + fragment.len() + 1);
    output.push_str(&document[..insert_at]);
    match position {
        Position::First => {
            output.push('\n');
            output.push_str(&fragment);
        }
        Position::Last => {
            output.push_str(&fragment);
            output.push('\n');
        }
    }
    output.push_str(&document[insert_at..]);
    Ok((output, PatchOutcome::Updated))
}
