//! Compiles a Markdown block tree into an ordered batch of rich-text edit
//! operations (Google Docs `batchUpdate` requests).
//!
//! The body is compiled with a cursor starting at index 1; the optional header
//! is built separately in its own segment starting at 0; [`assemble`] joins
//! the two. Everything here is pure and synchronous.

pub mod assemble;
pub mod compiler;
pub mod cursor;
pub mod error;
pub mod header;
pub mod node;
pub mod operation;
pub mod style;
pub mod units;
pub mod validate;

pub use assemble::assemble;
pub use compiler::{compile_body, CompiledSegment, Compiler, BLOCK_SEPARATOR};
pub use cursor::Cursor;
pub use error::{CompileError, CompileResult, Violation};
pub use header::{build_header, HeaderBuilder, HeaderSpec};
pub use node::{Emphasis, HeadingLevel, Node, Span};
pub use operation::{BatchUpdateRequest, Location, Operation, OperationBatch, Size, TextRange};
pub use style::{
    Alignment, Dimension, NamedStyleType, OptionalColor, ParagraphStyle, StyleDescriptor,
    StyleKind, StyleTable, TextStyle,
};
pub use units::TextUnit;
pub use validate::{validate_segment, SegmentSummary};
