use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use markdown_gdoc_config::{Config, LoadOptions};
use markdown_gdoc_core::{
    assemble, validate_segment, BatchUpdateRequest, Compiler, Cursor, HeaderBuilder, HeaderSpec,
    OperationBatch, StyleDescriptor, StyleTable, TextUnit,
};
use markdown_gdoc_parser::{MarkdownParser, ParseOptions};
use markdown_gdoc_utils::{atomic_write, parallel_map, requests_path};
use serde::Serialize;

pub mod error;
pub mod input;

pub use error::{CliError, CliResult, ExitCode};
use input::{read_markdown, InputSource};

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut options = LoadOptions::default();
    if let Some(path) = cli.config {
        options = options.with_override_path(path);
    }
    let config = Config::load(options).map_err(CliError::from)?;

    match cli.command {
        Command::Compile(args) => handle_compile(&config, args),
        Command::Header(args) => handle_header(&config, args),
        Command::Styles(args) => handle_styles(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

/// Target document metadata plus the requests to apply to it.
#[derive(Debug, Serialize)]
struct Submission {
    document: DocumentInfo,
    requests: OperationBatch,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentInfo {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_id: Option<String>,
}

/// Everything needed to turn one input into a submission.
struct CompileJob<'c> {
    parser: MarkdownParser,
    json_key: &'c str,
    units: TextUnit,
    header: Option<HeaderSpec>,
    header_segment: Option<String>,
    document: DocumentInfo,
}

impl CompileJob<'_> {
    fn run(&self, source: &InputSource) -> CliResult<Submission> {
        let label = source.label();
        let markdown = read_markdown(source, self.json_key)?;
        let nodes = self.parser.parse(&markdown);

        let body = Compiler::new().units(self.units).compile(&nodes)?;
        if body.skipped > 0 {
            log::info!("{label}: skipped {} unsupported blocks", body.skipped);
        }
        validate_segment(&body.operations, Cursor::BODY_ORIGIN, self.units)?;

        let header = match &self.header {
            Some(spec) => {
                let batch = HeaderBuilder::new(spec)
                    .segment(self.header_segment.clone())
                    .units(self.units)
                    .build();
                validate_segment(&batch, Cursor::SEGMENT_ORIGIN, self.units)?;
                batch
            }
            None => OperationBatch::new(),
        };

        let requests = assemble(header, body.operations);
        log::debug!("{label}: {} requests", requests.len());
        Ok(Submission {
            document: self.document.clone(),
            requests,
        })
    }
}

enum Emitted {
    Stdout(String),
    File(PathBuf),
}

fn handle_compile(config: &Config, args: CompileArgs) -> Result<i32> {
    let CompileArgs {
        inputs,
        out_dir,
        document_id,
        header_segment,
        no_header,
        text_unit,
        skip_first_block,
        compact,
    } = args;

    let units = text_unit
        .map(TextUnit::from)
        .unwrap_or(config.compiler.text_unit);
    let parse_options = ParseOptions::default()
        .with_skip_first_block(skip_first_block || config.input.skip_first_block);
    let job = CompileJob {
        parser: MarkdownParser::new(parse_options),
        json_key: &config.input.json_key,
        units,
        header: if no_header { None } else { config.header.spec() },
        header_segment,
        document: DocumentInfo {
            title: config.document.title.clone(),
            folder_id: config.document.folder_id.clone(),
            document_id,
        },
    };

    let to_files = out_dir.is_some() || inputs.len() > 1;
    let sources: Vec<InputSource> = inputs.iter().map(|arg| InputSource::from_arg(arg)).collect();
    let planned = plan_outputs(sources, to_files, out_dir.as_deref())?;

    let results = parallel_map(planned, |(source, target)| {
        let outcome = job.run(&source).and_then(|submission| {
            let rendered = render(&submission, compact)?;
            let Some(path) = target else {
                return Ok(Emitted::Stdout(rendered));
            };
            atomic_write(&path, &rendered).map_err(|error| CliError::Write {
                path: path.clone(),
                error,
            })?;
            Ok(Emitted::File(path))
        });
        (source, outcome)
    });

    let mut exit = ExitCode::Success;
    for (source, outcome) in results {
        match outcome {
            Ok(Emitted::Stdout(rendered)) => emit(&rendered)?,
            Ok(Emitted::File(path)) => {
                log::info!("{} -> {}", source.label(), path.display());
            }
            Err(err) => {
                eprintln!("markdown-gdoc: {}: {err}", source.label());
                if exit == ExitCode::Success {
                    exit = err.exit_code();
                }
            }
        }
    }

    Ok(exit.code())
}

/// Pair each input with its output file, if any. Two inputs may not share an
/// output file, and stdin can only be read once.
fn plan_outputs(
    sources: Vec<InputSource>,
    to_files: bool,
    out_dir: Option<&Path>,
) -> CliResult<Vec<(InputSource, Option<PathBuf>)>> {
    if sources.iter().filter(|s| **s == InputSource::Stdin).count() > 1 {
        return Err(CliError::RepeatedStdin);
    }
    if !to_files {
        return Ok(sources.into_iter().map(|source| (source, None)).collect());
    }

    let mut claimed: HashMap<PathBuf, String> = HashMap::new();
    let mut planned = Vec::with_capacity(sources.len());
    for source in sources {
        let path = requests_path(source.output_hint(), out_dir);
        if let Some(first) = claimed.insert(path.clone(), source.label()) {
            return Err(CliError::OutputCollision {
                first,
                second: source.label(),
                path,
            });
        }
        planned.push((source, Some(path)));
    }
    Ok(planned)
}

fn handle_header(config: &Config, args: HeaderArgs) -> Result<i32> {
    let HeaderArgs {
        image_uri,
        caption,
        header_segment,
        text_unit,
        compact,
    } = args;

    let settings = &config.header;
    let image_uri = image_uri
        .or_else(|| settings.image_uri.clone())
        .ok_or(CliError::MissingHeaderImage)?;
    let spec = HeaderSpec {
        image_uri,
        image_width_pt: settings.image_width_pt,
        image_height_pt: settings.image_height_pt,
        caption_text: caption.unwrap_or_else(|| settings.caption.clone()),
        font_size_pt: settings.font_size_pt,
    };

    let units = text_unit
        .map(TextUnit::from)
        .unwrap_or(config.compiler.text_unit);
    let batch = HeaderBuilder::new(&spec)
        .segment(header_segment)
        .units(units)
        .build();
    validate_segment(&batch, Cursor::SEGMENT_ORIGIN, units).map_err(CliError::from)?;

    emit(&render(&BatchUpdateRequest::from(batch), compact)?)?;
    Ok(ExitCode::Success.code())
}

#[derive(Serialize)]
struct StyleEntry<'t> {
    kind: String,
    #[serde(flatten)]
    style: &'t StyleDescriptor,
}

fn handle_styles(args: StylesArgs) -> Result<i32> {
    let table = StyleTable::standard();

    match args.format.unwrap_or(StylesFormatValue::Plain) {
        StylesFormatValue::Plain => {
            for (kind, descriptor) in table.entries() {
                let paragraph = match &descriptor.paragraph_style {
                    Some(style) => serde_json::to_string(style)?,
                    None => "-".to_owned(),
                };
                let text = match &descriptor.text_style {
                    Some(style) => serde_json::to_string(style)?,
                    None => "-".to_owned(),
                };
                emit(&format!(
                    "{:<12} paragraph={paragraph} text={text}",
                    kind.to_string()
                ))?;
            }
        }
        StylesFormatValue::Json => {
            let entries: Vec<StyleEntry<'_>> = table
                .entries()
                .map(|(kind, style)| StyleEntry {
                    kind: kind.to_string(),
                    style,
                })
                .collect();
            emit(&serde_json::to_string_pretty(&entries)?)?;
        }
    }

    Ok(ExitCode::Success.code())
}

fn render<T: Serialize>(value: &T, compact: bool) -> CliResult<String> {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    rendered.map_err(CliError::Serialize)
}

fn emit(content: &str) -> Result<()> {
    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Compile Markdown into Google Docs batchUpdate requests",
    propagate_version = true
)]
struct Cli {
    /// Explicit config file, taking precedence over discovered ones
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile Markdown or JSON inputs into request batches
    Compile(CompileArgs),
    /// Print the header request batch on its own
    Header(HeaderArgs),
    /// Show the style applied to each node kind
    Styles(StylesArgs),
}

#[derive(Args)]
struct CompileArgs {
    /// Markdown or JSON files to compile (`-` reads stdin)
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,
    /// Write `<stem>.requests.json` files into this directory
    #[arg(long = "out-dir", value_name = "DIR")]
    out_dir: Option<PathBuf>,
    /// Id of an already created document to target
    #[arg(long = "document-id", value_name = "ID")]
    document_id: Option<String>,
    /// Segment id of the document header
    #[arg(long = "header-segment", value_name = "ID")]
    header_segment: Option<String>,
    /// Leave out the header even when it is enabled in config
    #[arg(long = "no-header")]
    no_header: bool,
    /// Unit used to measure inserted text
    #[arg(long = "text-unit", value_enum)]
    text_unit: Option<TextUnitValue>,
    /// Drop the first top-level block of each input
    #[arg(long = "skip-first-block")]
    skip_first_block: bool,
    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Args)]
struct HeaderArgs {
    /// Image URI, overriding header.image_uri
    #[arg(long = "image-uri", value_name = "URI")]
    image_uri: Option<String>,
    /// Caption text, overriding header.caption
    #[arg(long, value_name = "TEXT")]
    caption: Option<String>,
    /// Segment id of the document header
    #[arg(long = "header-segment", value_name = "ID")]
    header_segment: Option<String>,
    /// Unit used to measure the caption
    #[arg(long = "text-unit", value_enum)]
    text_unit: Option<TextUnitValue>,
    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Args)]
struct StylesArgs {
    /// Output format (plain or json)
    #[arg(long, value_enum)]
    format: Option<StylesFormatValue>,
}

#[derive(Clone, Copy, ValueEnum)]
enum TextUnitValue {
    Utf16,
    Chars,
    Bytes,
}

impl From<TextUnitValue> for TextUnit {
    fn from(value: TextUnitValue) -> Self {
        match value {
            TextUnitValue::Utf16 => TextUnit::Utf16,
            TextUnitValue::Chars => TextUnit::Chars,
            TextUnitValue::Bytes => TextUnit::Bytes,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StylesFormatValue {
    Plain,
    Json,
}
