///
/// This module implements the CLI surface of old2new: argument parsing, environment
/// configuration and the `run` entrypoint wiring stdin -> converter -> stdout.
///
/// All conversion logic (reading, BMC aggregation, group normalisation, writing) lives in
/// the [`old2new-core`] crate. This module only chooses formats and moves bytes.
///
/// ## How To Use
/// - For command-line users: pipe a document through the `old2new` binary (`--help` for examples).
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`] and any reader/writer.
///
/// [`old2new-core`]: ../../old2new-core/
use anyhow::Result;
use clap::Parser;
use old2new_core::{
    convert_with_summary, read_from, write_to, ConversionSummary, InputFormat, OutputFormat,
    YamlCodec,
};
use std::io::{Read, Write};

const EXAMPLES: &str = "\
Examples:
  # Default: detect input, match output format
  old2new < nodes.yaml > nodes-new.yaml
  old2new < nodes.json > nodes-new.json

  # Force output JSON regardless of input
  old2new -o json < nodes.yaml > nodes-new.json

  # Force output YAML regardless of input
  old2new -o yaml < nodes.json > nodes-new.yaml

  # Force the input parser (rarely needed; defaults to auto)
  old2new -i yaml < nodes.yaml > nodes-new.yaml";

/// CLI for old2new: convert an old node inventory (JSON or YAML) to the new format.
#[derive(Parser, Debug)]
#[clap(
    name = "old2new",
    version,
    about = "Convert old node inventory format (JSON or YAML) to the new format.\nReads from STDIN and writes to STDOUT.",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// Input format: auto, json or yaml
    #[clap(
        short = 'i',
        long = "in-format",
        env = "OLD2NEW_IN_FORMAT",
        default_value = "auto"
    )]
    pub in_format: InputFormat,

    /// Output format: match (same as input), json or yaml
    #[clap(
        short = 'o',
        long = "out-format",
        env = "OLD2NEW_OUT_FORMAT",
        default_value = "match"
    )]
    pub out_format: OutputFormat,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Read one document from `input`, convert it and write the result to `output`.
///
/// Nothing is written unless the whole document converted and rendered.
pub fn run<R: Read, W: Write>(
    cli: &Cli,
    input: R,
    output: W,
    yaml: Option<&dyn YamlCodec>,
) -> Result<ConversionSummary> {
    tracing::info!(
        in_format = ?cli.in_format,
        out_format = ?cli.out_format,
        yaml_available = yaml.is_some(),
        "Starting conversion"
    );

    let (detected, doc) = read_from(input, cli.in_format, yaml)?;
    let (converted, summary) = convert_with_summary(&doc)?;
    let out_format = cli.out_format.resolve(detected);
    tracing::debug!(%detected, %out_format, "Resolved output format");

    write_to(output, &converted, out_format, yaml)?;
    tracing::info!(?summary, "Conversion written");
    Ok(summary)
}

/// Exit code for a failed run: the core error's code, or 1 for anything else.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<old2new_core::Error>()
        .map(|e| e.exit_code())
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(1)
}

/// Diagnostic text for stderr, collapsed onto a single line.
pub fn one_line(err: &anyhow::Error) -> String {
    format!("{err:#}")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
