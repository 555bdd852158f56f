//! Shared test harness utilities for markdown-gdoc crates.

use markdown_gdoc_config::Config;
use markdown_gdoc_core::{HeaderSpec, HeadingLevel, Node, Operation, OperationBatch, Span};

/// Markdown exercising every renderable construct plus a few skipped ones.
pub const SAMPLE_MARKDOWN: &str = "\
# Quarterly Review

Revenue grew **12%** this quarter, driven by *new* accounts.

## Highlights

- shipped search
- shipped export

### Next steps

Plan the roadmap.
";

/// Returns a baseline configuration for tests.
pub fn test_config() -> Config {
    Config::builtin(".")
}

pub fn h1(text: &str) -> Node {
    Node::heading(HeadingLevel::One, text)
}

pub fn h2(text: &str) -> Node {
    Node::heading(HeadingLevel::Two, text)
}

pub fn h3(text: &str) -> Node {
    Node::heading(HeadingLevel::Three, text)
}

pub fn para<I>(spans: I) -> Node
where
    I: IntoIterator<Item = Span>,
{
    Node::paragraph(spans)
}

/// Header spec with a 100pt square image and the given caption.
pub fn sample_header_spec(caption: &str) -> HeaderSpec {
    HeaderSpec {
        image_uri: "https://example.com/logo.png".to_owned(),
        image_width_pt: 100.0,
        image_height_pt: 100.0,
        caption_text: caption.to_owned(),
        font_size_pt: 16.0,
    }
}

/// Concatenation of every inserted string, in batch order.
pub fn inserted_text(batch: &OperationBatch) -> String {
    batch
        .iter()
        .filter_map(|op| match op {
            Operation::InsertText { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Indices of every insert-like operation, in batch order.
pub fn insert_indices(batch: &OperationBatch) -> Vec<usize> {
    batch
        .iter()
        .filter_map(|op| match op {
            Operation::InsertText { location, .. } | Operation::InsertInlineImage { location, .. } => {
                Some(location.index)
            }
            _ => None,
        })
        .collect()
}
