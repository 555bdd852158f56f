use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;
use crate::operation::{Operation, OperationBatch, TextRange};
use crate::style::{Alignment, ParagraphStyle, TextStyle};
use crate::units::TextUnit;

/// An inline image occupies a single index in its segment.
const IMAGE_UNITS: usize = 1;

/// Fixed header content: a centered image with a centered bold caption below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderSpec {
    pub image_uri: String,
    pub image_width_pt: f64,
    pub image_height_pt: f64,
    pub caption_text: String,
    pub font_size_pt: f64,
}

/// Builds the header sub-batch in its own index space starting at 0.
///
/// The recipe is fixed and order-dependent:
///
/// 1. insert the image at 0
/// 2. center `[0, 1)`
/// 3. insert the caption at 1
/// 4. bold + font size over the caption
/// 5. center the caption paragraph
///
/// An empty caption stops after step 2.
#[derive(Debug, Clone)]
pub struct HeaderBuilder<'s> {
    spec: &'s HeaderSpec,
    segment_id: Option<String>,
    units: TextUnit,
}

impl<'s> HeaderBuilder<'s> {
    pub fn new(spec: &'s HeaderSpec) -> Self {
        Self {
            spec,
            segment_id: None,
            units: TextUnit::default(),
        }
    }

    /// Header id returned by the service when the header was created.
    pub fn segment(mut self, segment_id: Option<String>) -> Self {
        self.segment_id = segment_id;
        self
    }

    pub fn units(mut self, units: TextUnit) -> Self {
        self.units = units;
        self
    }

    pub fn build(&self) -> OperationBatch {
        let spec = self.spec;
        let segment = &self.segment_id;
        let centered = ParagraphStyle::aligned(Alignment::Center);
        let mut cursor = Cursor::segment(segment.clone());
        let mut operations = OperationBatch::new();

        operations.push(Operation::inline_image(
            segment.clone(),
            cursor.index(),
            spec.image_uri.clone(),
            spec.image_width_pt,
            spec.image_height_pt,
        ));
        let image_start = cursor.advance(IMAGE_UNITS);
        operations.push(Operation::paragraph_style(
            TextRange::new(segment.clone(), image_start, cursor.index()),
            centered.clone(),
        ));

        if spec.caption_text.is_empty() {
            log::debug!("header caption is empty; emitting image only");
            return operations;
        }

        operations.push(Operation::insert_text(
            segment.clone(),
            cursor.index(),
            spec.caption_text.clone(),
        ));
        let caption_start = cursor.advance(self.units.len(&spec.caption_text));
        let caption = TextRange::new(segment.clone(), caption_start, cursor.index());
        operations.push(Operation::text_style(
            caption.clone(),
            TextStyle::bold(true).with_font_size(spec.font_size_pt),
        ));
        operations.push(Operation::paragraph_style(caption, centered));

        operations
    }
}

/// Header batch with no segment id and UTF-16 indices.
pub fn build_header(spec: &HeaderSpec) -> OperationBatch {
    HeaderBuilder::new(spec).build()
}
