use std::fmt;

use serde::{Deserialize, Serialize};

/// Heading depth accepted by the compiler. Deeper headings never reach the
/// core; the parser reports them as [`Node::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HeadingLevel {
    One,
    Two,
    Three,
}

impl HeadingLevel {
    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    pub fn depth(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_depth(value as usize)
            .ok_or_else(|| format!("heading level must be 1, 2 or 3 (received {value})"))
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.depth()
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.depth())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    #[default]
    None,
    Bold,
    Italic,
}

/// A run of paragraph text sharing one emphasis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    #[serde(default)]
    pub emphasis: Emphasis,
}

impl Span {
    pub fn new(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            text: text.into(),
            emphasis,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Emphasis::None)
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(text, Emphasis::Bold)
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self::new(text, Emphasis::Italic)
    }
}

/// Top-level block of the formatted-text tree, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Heading { level: HeadingLevel, text: String },
    Paragraph { spans: Vec<Span> },
    /// Markup the compiler does not render (lists, tables, code blocks, ...).
    Unsupported { kind: String },
}

impl Node {
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Node::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(spans: impl IntoIterator<Item = Span>) -> Self {
        Node::Paragraph {
            spans: spans.into_iter().collect(),
        }
    }

    pub fn unsupported(kind: impl Into<String>) -> Self {
        Node::Unsupported { kind: kind.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_level_rejects_out_of_range_depths() {
        assert_eq!(HeadingLevel::from_depth(2), Some(HeadingLevel::Two));
        assert!(HeadingLevel::from_depth(0).is_none());
        assert!(HeadingLevel::from_depth(4).is_none());
        assert!(HeadingLevel::try_from(7u8).is_err());
    }

    #[test]
    fn nodes_deserialize_from_tagged_json() {
        let json = r#"[
            {"type": "heading", "level": 2, "text": "Intro"},
            {"type": "paragraph", "spans": [{"text": "a"}, {"text": "b", "emphasis": "italic"}]}
        ]"#;
        let nodes: Vec<Node> = serde_json::from_str(json).unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::heading(HeadingLevel::Two, "Intro"),
                Node::paragraph([Span::plain("a"), Span::italic("b")]),
            ]
        );
    }

    #[test]
    fn heading_level_four_fails_to_deserialize() {
        let json = r#"{"type": "heading", "level": 4, "text": "Deep"}"#;
        assert!(serde_json::from_str::<Node>(json).is_err());
    }
}
