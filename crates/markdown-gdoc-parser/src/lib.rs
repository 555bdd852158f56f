//! Markdown front end producing the block tree consumed by the compiler.
//!
//! Only headings of depth 1–3 and paragraphs of plain, bold and italic text
//! survive as renderable nodes. Everything else (lists, quotes, code, tables,
//! raw HTML, deeper headings) is reported as a single `Unsupported` node per
//! top-level block so the compiler can skip it without losing its place.

use markdown_gdoc_core::{Emphasis, HeadingLevel, Node, Span};
use pulldown_cmark::{Event, Options, Parser, Tag};

/// Switches applied before and after parsing.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Drop a leading YAML front matter block delimited by `---`.
    pub strip_front_matter: bool,
    /// Drop the first top-level block of the document. Model output often
    /// opens with a preamble line that should not reach the document.
    pub skip_first_block: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strip_front_matter: true,
            skip_first_block: false,
        }
    }
}

impl ParseOptions {
    pub fn with_skip_first_block(mut self, skip: bool) -> Self {
        self.skip_first_block = skip;
        self
    }
}

/// Parser configured once and reused across documents.
#[derive(Clone, Debug, Default)]
pub struct MarkdownParser {
    options: ParseOptions,
}

impl MarkdownParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn parse(&self, input: &str) -> Vec<Node> {
        parse_markdown(input, &self.options)
    }
}

/// Parse `input` into top-level nodes in document order.
pub fn parse_markdown(input: &str, options: &ParseOptions) -> Vec<Node> {
    let source = if options.strip_front_matter {
        strip_front_matter(input)
    } else {
        input
    };

    let mut nodes = collect_nodes(source);
    if options.skip_first_block && !nodes.is_empty() {
        let dropped = nodes.remove(0);
        log::debug!("dropping leading block {dropped:?}");
    }
    nodes
}

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

enum Block {
    Heading { depth: usize, text: String },
    Paragraph(SpanCollector),
    Skip { kind: &'static str, depth: usize },
}

fn collect_nodes(source: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut current: Option<Block> = None;
    let mut in_html_block = false;

    for event in Parser::new_ext(source, markdown_options()) {
        let Some(block) = current.as_mut() else {
            let is_html = matches!(event, Event::Html(_));
            match event {
                Event::Start(Tag::Heading(level, ..)) => {
                    current = Some(Block::Heading {
                        depth: level as usize,
                        text: String::new(),
                    });
                }
                Event::Start(Tag::Paragraph) => {
                    current = Some(Block::Paragraph(SpanCollector::default()));
                }
                Event::Start(tag) => {
                    current = Some(Block::Skip {
                        kind: block_kind(&tag),
                        depth: 1,
                    });
                }
                Event::Rule => nodes.push(Node::unsupported("thematic-break")),
                Event::Html(_) if !in_html_block => nodes.push(Node::unsupported("html")),
                other => log::trace!("ignoring top-level event {other:?}"),
            }
            in_html_block = is_html;
            continue;
        };
        in_html_block = false;

        let finished = match block {
            Block::Heading { text, .. } => match event {
                Event::Text(value) | Event::Code(value) => {
                    text.push_str(&value);
                    false
                }
                Event::SoftBreak | Event::HardBreak => {
                    text.push(' ');
                    false
                }
                Event::End(Tag::Heading(..)) => true,
                _ => false,
            },
            Block::Paragraph(spans) => match event {
                Event::End(Tag::Paragraph) => true,
                other => {
                    spans.consume(other);
                    false
                }
            },
            Block::Skip { depth, .. } => {
                match event {
                    Event::Start(_) => *depth += 1,
                    Event::End(_) => *depth -= 1,
                    _ => {}
                }
                *depth == 0
            }
        };

        if finished {
            if let Some(block) = current.take() {
                nodes.push(finish_block(block));
            }
        }
    }

    nodes
}

fn finish_block(block: Block) -> Node {
    match block {
        Block::Heading { depth, text } => match HeadingLevel::from_depth(depth) {
            Some(level) => Node::heading(level, text),
            None => Node::unsupported(format!("heading-{depth}")),
        },
        Block::Paragraph(spans) => {
            let spans = spans.finish();
            if spans.is_empty() {
                Node::unsupported("empty-paragraph")
            } else {
                Node::paragraph(spans)
            }
        }
        Block::Skip { kind, .. } => Node::unsupported(kind),
    }
}

fn block_kind(tag: &Tag<'_>) -> &'static str {
    match tag {
        Tag::BlockQuote => "block-quote",
        Tag::CodeBlock(_) => "code-block",
        Tag::List(_) | Tag::Item => "list",
        Tag::Table(_) | Tag::TableHead | Tag::TableRow | Tag::TableCell => "table",
        Tag::FootnoteDefinition(_) => "footnote-definition",
        _ => "inline",
    }
}

/// Accumulates paragraph text into runs of uniform emphasis. Strong wins over
/// emphasis when the two are nested.
#[derive(Default)]
struct SpanCollector {
    spans: Vec<Span>,
    strong: usize,
    emphasis: usize,
}

impl SpanCollector {
    fn consume(&mut self, event: Event<'_>) {
        match event {
            Event::Text(text) | Event::Code(text) => self.push(&text),
            Event::FootnoteReference(name) => self.push(&format!("[{name}]")),
            Event::SoftBreak => self.push(" "),
            Event::HardBreak => self.push("\n"),
            Event::Start(Tag::Strong) => self.strong += 1,
            Event::End(Tag::Strong) => self.strong = self.strong.saturating_sub(1),
            Event::Start(Tag::Emphasis) => self.emphasis += 1,
            Event::End(Tag::Emphasis) => self.emphasis = self.emphasis.saturating_sub(1),
            _ => {}
        }
    }

    fn current(&self) -> Emphasis {
        if self.strong > 0 {
            Emphasis::Bold
        } else if self.emphasis > 0 {
            Emphasis::Italic
        } else {
            Emphasis::None
        }
    }

    fn push(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let emphasis = self.current();
        match self.spans.last_mut() {
            Some(last) if last.emphasis == emphasis => last.text.push_str(text),
            _ => self.spans.push(Span::new(text, emphasis)),
        }
    }

    fn finish(self) -> Vec<Span> {
        self.spans
    }
}

/// Remove a leading `---` delimited metadata block. Unterminated blocks are
/// left in place.
pub fn strip_front_matter(input: &str) -> &str {
    let mut lines = input.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return input;
    };
    if first.trim() != "---" {
        return input;
    }

    let mut offset = first.len();
    for line in lines {
        offset += line.len();
        let trimmed = line.trim();
        if trimmed == "---" || trimmed == "..." {
            return &input[offset..];
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_adjacent_runs_with_same_emphasis() {
        let mut collector = SpanCollector::default();
        collector.consume(Event::Text("Hello ".into()));
        collector.consume(Event::Code("cargo".into()));
        collector.consume(Event::Start(Tag::Strong));
        collector.consume(Event::Text("loud".into()));
        collector.consume(Event::End(Tag::Strong));
        assert_eq!(
            collector.finish(),
            vec![Span::plain("Hello cargo"), Span::bold("loud")]
        );
    }

    #[test]
    fn strong_wins_inside_emphasis() {
        let mut collector = SpanCollector::default();
        collector.consume(Event::Start(Tag::Emphasis));
        collector.consume(Event::Text("a".into()));
        collector.consume(Event::Start(Tag::Strong));
        collector.consume(Event::Text("b".into()));
        collector.consume(Event::End(Tag::Strong));
        collector.consume(Event::End(Tag::Emphasis));
        assert_eq!(collector.finish(), vec![Span::italic("a"), Span::bold("b")]);
    }

    #[test]
    fn front_matter_requires_closing_delimiter() {
        assert_eq!(strip_front_matter("---\ntitle: x\n---\n# Hi\n"), "# Hi\n");
        assert_eq!(strip_front_matter("---\nno end\n"), "---\nno end\n");
        assert_eq!(strip_front_matter("# Hi\n"), "# Hi\n");
    }
}
