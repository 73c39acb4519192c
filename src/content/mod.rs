pub mod extractor;

pub use extractor::ArticleScanner;
