use thiserror::Error;

/// Broken bookkeeping detected while building or checking a segment batch.
/// Any of these indicates a compiler bug, never bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("cursor moved backwards from {from} to {to}")]
    CursorRegression { from: usize, to: usize },

    #[error("range [{start}, {end}) is inverted")]
    InvertedRange { start: usize, end: usize },

    #[error("range [{start}, {end}) starts before segment origin {origin}")]
    BeforeOrigin {
        start: usize,
        end: usize,
        origin: usize,
    },

    #[error("range [{start}, {end}) extends past inserted text ending at {extent}")]
    OutOfBounds {
        start: usize,
        end: usize,
        extent: usize,
    },

    #[error("{kind} range [{start}, {end}) overlaps an earlier range ending at {previous_end}")]
    Overlap {
        kind: &'static str,
        start: usize,
        end: usize,
        previous_end: usize,
    },

    #[error("insert at {index} does not append to the segment end at {extent}")]
    DetachedInsert { index: usize, extent: usize },

    #[error("operation addresses segment {found:?} while checking segment {expected:?}")]
    ForeignSegment {
        expected: Option<String>,
        found: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("invariant violation: {0}")]
    InvariantViolation(#[from] Violation),
}

pub type CompileResult<T> = Result<T, CompileError>;
