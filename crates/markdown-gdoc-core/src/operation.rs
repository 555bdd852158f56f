use serde::{Deserialize, Serialize};

use crate::style::{Dimension, ParagraphStyle, TextStyle};

/// Insertion point within a segment. A missing segment id addresses the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,
    pub index: usize,
}

/// Half-open `[start, end)` range of text units within a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,
    #[serde(rename = "startIndex")]
    pub start: usize,
    #[serde(rename = "endIndex")]
    pub end: usize,
}

impl TextRange {
    pub fn new(segment_id: Option<String>, start: usize, end: usize) -> Self {
        Self {
            segment_id,
            start,
            end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub height: Dimension,
    pub width: Dimension,
}

/// One edit command of a batch, serialized as a Docs API request object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Operation {
    InsertText {
        location: Location,
        text: String,
    },
    #[serde(rename = "updateParagraphStyle")]
    SetParagraphStyle {
        range: TextRange,
        paragraph_style: ParagraphStyle,
        fields: String,
    },
    #[serde(rename = "updateTextStyle")]
    SetTextStyle {
        range: TextRange,
        text_style: TextStyle,
        fields: String,
    },
    InsertInlineImage {
        location: Location,
        uri: String,
        object_size: Size,
    },
}

impl Operation {
    pub fn insert_text(segment_id: Option<String>, index: usize, text: impl Into<String>) -> Self {
        Operation::InsertText {
            location: Location { segment_id, index },
            text: text.into(),
        }
    }

    pub fn paragraph_style(range: TextRange, style: ParagraphStyle) -> Self {
        let fields = style.fields();
        Operation::SetParagraphStyle {
            range,
            paragraph_style: style,
            fields,
        }
    }

    pub fn text_style(range: TextRange, style: TextStyle) -> Self {
        let fields = style.fields();
        Operation::SetTextStyle {
            range,
            text_style: style,
            fields,
        }
    }

    pub fn inline_image(
        segment_id: Option<String>,
        index: usize,
        uri: impl Into<String>,
        width_pt: f64,
        height_pt: f64,
    ) -> Self {
        Operation::InsertInlineImage {
            location: Location { segment_id, index },
            uri: uri.into(),
            object_size: Size {
                height: Dimension::pt(height_pt),
                width: Dimension::pt(width_pt),
            },
        }
    }

    pub fn segment_id(&self) -> Option<&str> {
        match self {
            Operation::InsertText { location, .. }
            | Operation::InsertInlineImage { location, .. } => location.segment_id.as_deref(),
            Operation::SetParagraphStyle { range, .. } | Operation::SetTextStyle { range, .. } => {
                range.segment_id.as_deref()
            }
        }
    }

    /// Wire name of the request, e.g. `insertText`.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::InsertText { .. } => "insertText",
            Operation::SetParagraphStyle { .. } => "updateParagraphStyle",
            Operation::SetTextStyle { .. } => "updateTextStyle",
            Operation::InsertInlineImage { .. } => "insertInlineImage",
        }
    }

    pub fn range(&self) -> Option<&TextRange> {
        match self {
            Operation::SetParagraphStyle { range, .. } | Operation::SetTextStyle { range, .. } => {
                Some(range)
            }
            _ => None,
        }
    }
}

/// Ordered list of operations; order is significant and preserved verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationBatch {
    operations: Vec<Operation>,
}

impl OperationBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, operation: Operation) {
        log::trace!("emit {} {:?}", operation.name(), operation);
        self.operations.push(operation);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    pub fn as_slice(&self) -> &[Operation] {
        &self.operations
    }

    pub fn into_vec(self) -> Vec<Operation> {
        self.operations
    }
}

impl From<Vec<Operation>> for OperationBatch {
    fn from(operations: Vec<Operation>) -> Self {
        Self { operations }
    }
}

impl FromIterator<Operation> for OperationBatch {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for OperationBatch {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

impl<'a> IntoIterator for &'a OperationBatch {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

/// Body of a `documents.batchUpdate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchUpdateRequest {
    pub requests: OperationBatch,
}

impl From<OperationBatch> for BatchUpdateRequest {
    fn from(requests: OperationBatch) -> Self {
        Self { requests }
    }
}
