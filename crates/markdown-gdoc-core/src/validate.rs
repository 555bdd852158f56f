//! Independent re-check of a single segment's batch.
//!
//! The compiler enforces these rules while it builds; this walker verifies a
//! finished batch the same way the document service would apply it, so batches
//! from any source can be checked before submission.

use crate::error::{CompileResult, Violation};
use crate::operation::{Operation, OperationBatch, TextRange};
use crate::units::TextUnit;

/// What a segment batch materializes once applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSummary {
    pub segment_id: Option<String>,
    pub operations: usize,
    pub end_index: usize,
}

/// Check that every insert appends at the segment end, every style range lies
/// within inserted text, and that style ranges of the same kind never overlap.
pub fn validate_segment(
    batch: &OperationBatch,
    origin: usize,
    units: TextUnit,
) -> CompileResult<SegmentSummary> {
    let segment_id = batch
        .iter()
        .next()
        .and_then(|op| op.segment_id().map(str::to_owned));
    let mut extent = origin;
    let mut paragraph_end = origin;
    let mut text_end = origin;

    for operation in batch {
        if operation.segment_id() != segment_id.as_deref() {
            return Err(Violation::ForeignSegment {
                expected: segment_id.clone(),
                found: operation.segment_id().map(str::to_owned),
            }
            .into());
        }

        match operation {
            Operation::InsertText { location, text } => {
                check_append(location.index, extent)?;
                extent += units.len(text);
            }
            Operation::InsertInlineImage { location, .. } => {
                check_append(location.index, extent)?;
                extent += 1;
            }
            Operation::SetParagraphStyle { range, .. } => {
                check_range(range, origin, extent)?;
                paragraph_end = check_overlap("paragraph style", range, paragraph_end)?;
            }
            Operation::SetTextStyle { range, .. } => {
                check_range(range, origin, extent)?;
                text_end = check_overlap("text style", range, text_end)?;
            }
        }
    }

    Ok(SegmentSummary {
        segment_id,
        operations: batch.len(),
        end_index: extent,
    })
}

fn check_append(index: usize, extent: usize) -> Result<(), Violation> {
    if index < extent {
        return Err(Violation::CursorRegression {
            from: extent,
            to: index,
        });
    }
    if index > extent {
        return Err(Violation::DetachedInsert { index, extent });
    }
    Ok(())
}

fn check_range(range: &TextRange, origin: usize, extent: usize) -> Result<(), Violation> {
    let (start, end) = (range.start, range.end);
    if end < start {
        return Err(Violation::InvertedRange { start, end });
    }
    if start < origin {
        return Err(Violation::BeforeOrigin { start, end, origin });
    }
    if end > extent {
        return Err(Violation::OutOfBounds { start, end, extent });
    }
    Ok(())
}

fn check_overlap(
    kind: &'static str,
    range: &TextRange,
    previous_end: usize,
) -> Result<usize, Violation> {
    if range.is_empty() {
        return Ok(previous_end);
    }
    if range.start < previous_end {
        return Err(Violation::Overlap {
            kind,
            start: range.start,
            end: range.end,
            previous_end,
        });
    }
    Ok(range.end)
}
