use markdown_gdoc_core::{
    assemble, build_header, compile_body, validate_segment, Alignment, Cursor, HeaderBuilder,
    HeaderSpec, HeadingLevel, Node, Operation, ParagraphStyle, TextRange, TextStyle, TextUnit,
};
use pretty_assertions::assert_eq;

fn spec(caption: &str) -> HeaderSpec {
    HeaderSpec {
        image_uri: "u".into(),
        image_width_pt: 100.0,
        image_height_pt: 100.0,
        caption_text: caption.into(),
        font_size_pt: 16.0,
    }
}

#[test]
fn builds_fixed_five_operation_recipe() {
    let batch = build_header(&spec("Caption"));
    let centered = ParagraphStyle::aligned(Alignment::Center);

    assert_eq!(
        batch.into_vec(),
        vec![
            Operation::inline_image(None, 0, "u", 100.0, 100.0),
            Operation::paragraph_style(TextRange::new(None, 0, 1), centered.clone()),
            Operation::insert_text(None, 1, "Caption"),
            Operation::text_style(
                TextRange::new(None, 1, 8),
                TextStyle::bold(true).with_font_size(16.0)
            ),
            Operation::paragraph_style(TextRange::new(None, 1, 8), centered),
        ]
    );
}

#[test]
fn header_is_deterministic() {
    let spec = spec("Acme Corp — Confidential");
    let first = HeaderBuilder::new(&spec).segment(Some("kix.1".into())).build();
    let second = HeaderBuilder::new(&spec).segment(Some("kix.1".into())).build();
    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
    let names: Vec<_> = first.iter().map(Operation::name).collect();
    assert_eq!(
        names,
        vec![
            "insertInlineImage",
            "updateParagraphStyle",
            "insertText",
            "updateTextStyle",
            "updateParagraphStyle"
        ]
    );
}

#[test]
fn header_validates_in_its_own_index_space() {
    let spec = spec("Caption");
    let batch = HeaderBuilder::new(&spec).segment(Some("kix.1".into())).build();
    let summary = validate_segment(&batch, Cursor::SEGMENT_ORIGIN, TextUnit::Utf16).unwrap();
    assert_eq!(summary.segment_id.as_deref(), Some("kix.1"));
    assert_eq!(summary.end_index, 8);
}

#[test]
fn assembled_batch_keeps_segments_contiguous() {
    let spec = spec("Caption");
    let header = HeaderBuilder::new(&spec).segment(Some("kix.1".into())).build();
    let body = compile_body(&[Node::heading(HeadingLevel::One, "Title")]).unwrap();
    let (header_len, body_len) = (header.len(), body.len());

    let combined = assemble(header, body);
    assert_eq!(combined.len(), header_len + body_len);
    assert!(combined.as_slice()[..header_len]
        .iter()
        .all(|op| op.segment_id() == Some("kix.1")));
    assert!(combined.as_slice()[header_len..]
        .iter()
        .all(|op| op.segment_id().is_none()));
    assert_eq!(
        combined.as_slice()[header_len],
        Operation::insert_text(None, 1, "Title\n\n")
    );
}
