//! Style table and the style payloads carried by formatting operations.
//!
//! Payload types serialize to the Google Docs `batchUpdate` request shape so
//! a batch can be submitted verbatim. Every payload reports the `fields` mask
//! naming exactly the attributes it sets.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::node::{Emphasis, HeadingLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedStyleType {
    #[serde(rename = "NORMAL_TEXT")]
    NormalText,
    #[serde(rename = "TITLE")]
    Title,
    #[serde(rename = "SUBTITLE")]
    Subtitle,
    #[serde(rename = "HEADING_3")]
    Heading3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alignment {
    Start,
    Center,
    End,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Unit {
    Pt,
}

/// A magnitude in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: Unit,
}

impl Dimension {
    pub fn pt(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: Unit::Pt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub rgb_color: RgbColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionalColor {
    pub color: Color,
}

impl OptionalColor {
    pub fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self {
            color: Color {
                rgb_color: RgbColor { red, green, blue },
            },
        }
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }
}

/// Character-level formatting. Unset attributes are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<OptionalColor>,
}

impl TextStyle {
    pub fn bold(value: bool) -> Self {
        Self {
            bold: Some(value),
            ..Self::default()
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: Some(true),
            ..Self::default()
        }
    }

    pub fn with_font_size(mut self, points: f64) -> Self {
        self.font_size = Some(Dimension::pt(points));
        self
    }

    pub fn with_foreground(mut self, color: OptionalColor) -> Self {
        self.foreground_color = Some(color);
        self
    }

    /// Comma-separated field mask, e.g. `bold,fontSize`.
    pub fn fields(&self) -> String {
        let mut fields = Vec::new();
        if self.bold.is_some() {
            fields.push("bold");
        }
        if self.italic.is_some() {
            fields.push("italic");
        }
        if self.font_size.is_some() {
            fields.push("fontSize");
        }
        if self.foreground_color.is_some() {
            fields.push("foregroundColor");
        }
        fields.join(",")
    }
}

/// Paragraph-level formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_style_type: Option<NamedStyleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl ParagraphStyle {
    pub fn named(style: NamedStyleType) -> Self {
        Self {
            named_style_type: Some(style),
            alignment: None,
        }
    }

    pub fn aligned(alignment: Alignment) -> Self {
        Self {
            named_style_type: None,
            alignment: Some(alignment),
        }
    }

    pub fn fields(&self) -> String {
        let mut fields = Vec::new();
        if self.named_style_type.is_some() {
            fields.push("namedStyleType");
        }
        if self.alignment.is_some() {
            fields.push("alignment");
        }
        fields.join(",")
    }
}

/// Formatting bundle associated with one node kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_style: Option<ParagraphStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
}

/// Key into the style table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    Heading(HeadingLevel),
    Span(Emphasis),
}

impl StyleKind {
    pub const ALL: [StyleKind; 6] = [
        StyleKind::Heading(HeadingLevel::One),
        StyleKind::Heading(HeadingLevel::Two),
        StyleKind::Heading(HeadingLevel::Three),
        StyleKind::Span(Emphasis::Bold),
        StyleKind::Span(Emphasis::None),
        StyleKind::Span(Emphasis::Italic),
    ];
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleKind::Heading(level) => write!(f, "heading {}", level.depth()),
            StyleKind::Span(Emphasis::None) => f.write_str("span plain"),
            StyleKind::Span(Emphasis::Bold) => f.write_str("span bold"),
            StyleKind::Span(Emphasis::Italic) => f.write_str("span italic"),
        }
    }
}

/// Fixed mapping from node kind to formatting.
#[derive(Debug, Clone)]
pub struct StyleTable {
    headings: [StyleDescriptor; 3],
    plain: StyleDescriptor,
    bold: StyleDescriptor,
    italic: StyleDescriptor,
}

impl StyleTable {
    /// Shared instance; safe to use from any number of threads.
    pub fn standard() -> &'static StyleTable {
        static TABLE: OnceLock<StyleTable> = OnceLock::new();
        TABLE.get_or_init(StyleTable::build)
    }

    fn build() -> Self {
        let heading = |named: NamedStyleType, text: TextStyle| StyleDescriptor {
            paragraph_style: Some(ParagraphStyle::named(named)),
            text_style: Some(text),
        };
        let span = |text: TextStyle| StyleDescriptor {
            paragraph_style: None,
            text_style: Some(text),
        };

        StyleTable {
            headings: [
                heading(
                    NamedStyleType::Title,
                    TextStyle::bold(true).with_font_size(20.0),
                ),
                heading(
                    NamedStyleType::Subtitle,
                    TextStyle::bold(true).with_font_size(18.0),
                ),
                heading(
                    NamedStyleType::Heading3,
                    TextStyle::bold(true)
                        .with_font_size(15.0)
                        .with_foreground(OptionalColor::black()),
                ),
            ],
            plain: span(TextStyle::bold(false)),
            bold: span(TextStyle::bold(true)),
            italic: span(TextStyle::italic()),
        }
    }

    pub fn lookup(&self, kind: StyleKind) -> &StyleDescriptor {
        match kind {
            StyleKind::Heading(HeadingLevel::One) => &self.headings[0],
            StyleKind::Heading(HeadingLevel::Two) => &self.headings[1],
            StyleKind::Heading(HeadingLevel::Three) => &self.headings[2],
            StyleKind::Span(Emphasis::None) => &self.plain,
            StyleKind::Span(Emphasis::Bold) => &self.bold,
            StyleKind::Span(Emphasis::Italic) => &self.italic,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (StyleKind, &StyleDescriptor)> {
        StyleKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.lookup(kind)))
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::build()
    }
}
