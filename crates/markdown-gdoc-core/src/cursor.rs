use crate::error::Violation;
use crate::operation::{Location, TextRange};

/// Next free text-unit position in one segment.
///
/// The body starts at 1 (index 0 is the document's implicit start boundary);
/// headers, footers and footnotes start at 0. The position only ever moves
/// forward, by the length of text just inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    segment_id: Option<String>,
    origin: usize,
    index: usize,
}

impl Cursor {
    pub const BODY_ORIGIN: usize = 1;
    pub const SEGMENT_ORIGIN: usize = 0;

    pub fn body() -> Self {
        Self::starting_at(None, Self::BODY_ORIGIN)
    }

    pub fn segment(segment_id: Option<String>) -> Self {
        Self::starting_at(segment_id, Self::SEGMENT_ORIGIN)
    }

    pub fn starting_at(segment_id: Option<String>, origin: usize) -> Self {
        Self {
            segment_id,
            origin,
            index: origin,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn location(&self) -> Location {
        Location {
            segment_id: self.segment_id.clone(),
            index: self.index,
        }
    }

    /// Claim `len` units at the current position and return where they start.
    pub fn advance(&mut self, len: usize) -> usize {
        let start = self.index;
        self.index += len;
        start
    }

    /// Move to `index`, which must not lie behind the current position.
    pub fn advance_to(&mut self, index: usize) -> Result<(), Violation> {
        if index < self.index {
            return Err(Violation::CursorRegression {
                from: self.index,
                to: index,
            });
        }
        self.index = index;
        Ok(())
    }

    /// Range over text already claimed in this segment.
    pub fn range(&self, start: usize, end: usize) -> Result<TextRange, Violation> {
        if end < start {
            return Err(Violation::InvertedRange { start, end });
        }
        if start < self.origin {
            return Err(Violation::BeforeOrigin {
                start,
                end,
                origin: self.origin,
            });
        }
        if end > self.index {
            return Err(Violation::OutOfBounds {
                start,
                end,
                extent: self.index,
            });
        }
        Ok(TextRange::new(self.segment_id.clone(), start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_cursor_starts_after_boundary() {
        let mut cursor = Cursor::body();
        assert_eq!(cursor.index(), 1);
        assert_eq!(cursor.advance(7), 1);
        assert_eq!(cursor.index(), 8);
    }

    #[test]
    fn refuses_to_move_backwards() {
        let mut cursor = Cursor::segment(Some("kix.h".into()));
        cursor.advance(3);
        assert_eq!(
            cursor.advance_to(2),
            Err(Violation::CursorRegression { from: 3, to: 2 })
        );
        assert!(cursor.advance_to(3).is_ok());
    }

    #[test]
    fn ranges_must_cover_claimed_text() {
        let mut cursor = Cursor::body();
        cursor.advance(5);
        assert!(cursor.range(1, 6).is_ok());
        assert!(matches!(
            cursor.range(1, 7),
            Err(Violation::OutOfBounds { extent: 6, .. })
        ));
        assert!(matches!(
            cursor.range(0, 2),
            Err(Violation::BeforeOrigin { .. })
        ));
        assert!(matches!(
            cursor.range(4, 3),
            Err(Violation::InvertedRange { .. })
        ));
    }
}
