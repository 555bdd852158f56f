use std::fmt::Write as _;
use std::hint::black_box;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use markdown_gdoc_core::{build_header, validate_segment, Compiler, Cursor, HeaderSpec, TextUnit};
use markdown_gdoc_parser::{parse_markdown, ParseOptions};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Benchmark harness for markdown-gdoc parsing and compilation"
)]
struct Args {
    /// Number of heading + paragraph sections in the synthetic document
    #[arg(long, default_value_t = 500)]
    sections: usize,

    /// Number of warm-up iterations (not counted in results)
    #[arg(long, default_value_t = 1)]
    warmup: usize,

    /// Number of measured iterations
    #[arg(long, default_value_t = 10)]
    iterations: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.iterations == 0 {
        anyhow::bail!("--iterations must be at least 1");
    }

    let source = synthetic_document(args.sections)?;
    let options = ParseOptions::default();
    let nodes = parse_markdown(&source, &options);

    let parse_result = benchmark("parse", args.warmup, args.iterations, || {
        black_box(parse_markdown(&source, &options));
        Ok(())
    })?;

    let compiler = Compiler::new();
    let compile_result = benchmark("compile", args.warmup, args.iterations, || {
        black_box(compiler.compile(&nodes)?);
        Ok(())
    })?;

    let header = HeaderSpec {
        image_uri: "https://example.com/logo.png".to_owned(),
        image_width_pt: 100.0,
        image_height_pt: 100.0,
        caption_text: "Benchmark".to_owned(),
        font_size_pt: 16.0,
    };
    let end_to_end = benchmark("parse+compile+validate", args.warmup, args.iterations, || {
        let nodes = parse_markdown(&source, &options);
        let body = compiler.compile(&nodes)?;
        validate_segment(&body.operations, Cursor::BODY_ORIGIN, TextUnit::Utf16)?;
        black_box(build_header(&header));
        Ok(())
    })?;

    let operations = compiler
        .compile(&nodes)
        .context("compiling synthetic document")?
        .operations
        .len();
    println!(
        "synthetic document: {} sections, {} bytes, {} nodes, {} operations\n",
        args.sections,
        source.len(),
        nodes.len(),
        operations
    );
    print_summary(&[parse_result, compile_result, end_to_end]);
    Ok(())
}

fn synthetic_document(sections: usize) -> Result<String> {
    let mut out = String::from("# Synthetic report\n\n");
    for idx in 0..sections {
        let heading = if idx % 2 == 0 { "##" } else { "###" };
        write!(
            out,
            "{heading} Section {idx}\n\nPlain text with **bold {idx}** and *italic* runs, \
             plus non-ASCII ünïcödé and 😀.\n\n- skipped list item\n\n"
        )?;
    }
    Ok(out)
}

struct BenchResult {
    name: String,
    iterations: usize,
    average: Duration,
    median: Duration,
}

fn benchmark<F>(name: &str, warmup: usize, iterations: usize, mut f: F) -> Result<BenchResult>
where
    F: FnMut() -> Result<()>,
{
    for _ in 0..warmup {
        f()?;
    }

    let mut samples = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let start = Instant::now();
        f()?;
        samples.push(start.elapsed());
    }

    samples.sort();
    let total = samples
        .iter()
        .copied()
        .fold(Duration::ZERO, |acc, sample| acc + sample);
    let average = total / (iterations as u32);
    let median = samples[samples.len() / 2];

    Ok(BenchResult {
        name: name.to_string(),
        iterations,
        average,
        median,
    })
}

fn print_summary(results: &[BenchResult]) {
    println!("markdown-gdoc benchmark results:\n");
    for result in results {
        println!(
            "- {}: avg {:?} (median {:?}) over {} iterations",
            result.name, result.average, result.median, result.iterations
        );
    }
}
