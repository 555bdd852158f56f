//! Cursor-tracked compilation of a block tree into body operations.
//!
//! Nodes are visited once, in document order. Each inserted string is
//! followed by the style operations covering it, and the cursor advances by
//! the inserted length measured in the configured [`TextUnit`]. Heading
//! paragraph styles stop one unit short of the inserted text and heading text
//! styles two units short, so the trailing blank line keeps normal styling.

use crate::cursor::Cursor;
use crate::error::{CompileResult, Violation};
use crate::node::{HeadingLevel, Node, Span};
use crate::operation::{Operation, OperationBatch};
use crate::style::{StyleKind, StyleTable};
use crate::units::TextUnit;

/// Appended to heading text; separates blocks in the target document.
pub const BLOCK_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone)]
pub struct Compiler<'t> {
    table: &'t StyleTable,
    units: TextUnit,
    segment_id: Option<String>,
}

/// Output of one compilation pass over a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSegment {
    pub operations: OperationBatch,
    /// Cursor position after the last insertion.
    pub end_index: usize,
    /// Number of top-level nodes skipped as unsupported.
    pub skipped: usize,
}

impl Default for Compiler<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler<'static> {
    pub fn new() -> Self {
        Self::with_table(StyleTable::standard())
    }
}

impl<'t> Compiler<'t> {
    pub fn with_table(table: &'t StyleTable) -> Self {
        Self {
            table,
            units: TextUnit::default(),
            segment_id: None,
        }
    }

    pub fn units(mut self, units: TextUnit) -> Self {
        self.units = units;
        self
    }

    /// Address the body through an explicit segment id (tabs, for instance).
    pub fn segment(mut self, segment_id: Option<String>) -> Self {
        self.segment_id = segment_id;
        self
    }

    pub fn compile(&self, nodes: &[Node]) -> CompileResult<CompiledSegment> {
        let mut pass = Pass {
            table: self.table,
            units: self.units,
            cursor: Cursor::starting_at(self.segment_id.clone(), Cursor::BODY_ORIGIN),
            operations: OperationBatch::new(),
        };
        let mut skipped = 0usize;

        for node in nodes {
            match node {
                Node::Heading { level, text } => pass.heading(*level, text)?,
                Node::Paragraph { spans } => pass.paragraph(spans)?,
                Node::Unsupported { kind } => {
                    log::debug!("skipping unsupported {kind} block");
                    skipped += 1;
                }
            }
        }

        log::debug!(
            "compiled {} nodes into {} operations ({} skipped), cursor at {}",
            nodes.len(),
            pass.operations.len(),
            skipped,
            pass.cursor.index()
        );

        Ok(CompiledSegment {
            end_index: pass.cursor.index(),
            operations: pass.operations,
            skipped,
        })
    }
}

/// Compile a body tree with the standard style table and UTF-16 indices.
pub fn compile_body(nodes: &[Node]) -> CompileResult<OperationBatch> {
    Compiler::new()
        .compile(nodes)
        .map(|compiled| compiled.operations)
}

struct Pass<'t> {
    table: &'t StyleTable,
    units: TextUnit,
    cursor: Cursor,
    operations: OperationBatch,
}

impl Pass<'_> {
    fn heading(&mut self, level: HeadingLevel, text: &str) -> Result<(), Violation> {
        let descriptor = self.table.lookup(StyleKind::Heading(level));
        let start = self.insert(format!("{text}{BLOCK_SEPARATOR}"))?;
        let end = self.cursor.index();

        if let Some(style) = &descriptor.paragraph_style {
            let range = self.cursor.range(start, end - 1)?;
            self.operations
                .push(Operation::paragraph_style(range, style.clone()));
        }
        if let Some(style) = &descriptor.text_style {
            let range = self.cursor.range(start, end - 2)?;
            self.operations
                .push(Operation::text_style(range, style.clone()));
        }
        Ok(())
    }

    fn paragraph(&mut self, spans: &[Span]) -> Result<(), Violation> {
        for span in spans {
            let descriptor = self.table.lookup(StyleKind::Span(span.emphasis));
            let start = self.insert(span.text.clone())?;
            if let Some(style) = &descriptor.text_style {
                let range = self.cursor.range(start, self.cursor.index())?;
                self.operations
                    .push(Operation::text_style(range, style.clone()));
            }
        }
        self.insert(BLOCK_SEPARATOR.to_string())?;
        Ok(())
    }

    fn insert(&mut self, text: String) -> Result<usize, Violation> {
        let start = self.cursor.index();
        let end = start + self.units.len(&text);
        self.operations.push(Operation::InsertText {
            location: self.cursor.location(),
            text,
        });
        self.cursor.advance_to(end)?;
        Ok(start)
    }
}
