// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! txcodec-inspect - Decode binary ledger objects by type name
//!
//! Runs the dispatch facade over hex or file input and prints the decoded
//! value, the error chain, or every validation violation.

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use txcodec::ledger::{self, LEDGER_SCHEMA_VERSION};
use txcodec::{CodecConfig, CodecError, Codecs, TaggedResult, Value};

/// Decode binary ledger objects by type name
#[derive(Parser, Debug)]
#[command(name = "txcodec-inspect")]
#[command(version)]
#[command(about = "Decode and inspect binary ledger objects by type name")]
struct Args {
    /// Type name to decode as (see --list)
    #[arg(short = 't', long = "type", required_unless_present = "list")]
    type_name: Option<String>,

    /// Hex-encoded input (whitespace and a 0x prefix are ignored)
    #[arg(conflicts_with = "file")]
    hex: Option<String>,

    /// Read raw input bytes from a file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output format: pretty, json
    #[arg(long, default_value = "pretty")]
    format: OutputFormat,

    /// Skip validation rules (structural decode only)
    #[arg(long)]
    structural: bool,

    /// List built-in type names and exit
    #[arg(short, long)]
    list: bool,

    /// TOML file with codec limits
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "p" => Ok(OutputFormat::Pretty),
            "json" | "j" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = args.log_level.parse().unwrap_or(tracing::Level::WARN);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the input decoded (and validated) successfully.
fn run(args: &Args) -> Result<bool> {
    let config = match &args.config {
        Some(path) => CodecConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CodecConfig::default(),
    };
    tracing::debug!(?config, "codec limits");

    let registry = ledger::registry().context("building ledger schema set")?;
    let codecs = Codecs::with_config(registry, config);

    if args.list {
        list_types(&codecs);
        return Ok(true);
    }

    let Some(type_name) = args.type_name.as_deref() else {
        bail!("--type is required");
    };
    let bytes = read_input(args)?;
    tracing::debug!(type_name, len = bytes.len(), "decoding");

    let result = if args.structural {
        codecs.decode_structural(type_name, &bytes)
    } else {
        codecs.decode_named(type_name, &bytes)
    };

    match args.format {
        OutputFormat::Json => {
            let tagged = TaggedResult::from_result(type_name, result.clone());
            println!("{}", serde_json::to_string_pretty(&tagged)?);
        }
        OutputFormat::Pretty => match &result {
            Ok(value) => print_value(type_name, bytes.len(), value),
            Err(err) => print_error(type_name, err),
        },
    }

    Ok(result.is_ok())
}

fn read_input(args: &Args) -> Result<Vec<u8>> {
    if let Some(path) = &args.file {
        return std::fs::read(path).with_context(|| format!("reading {}", path.display()));
    }
    let Some(text) = &args.hex else {
        bail!("no input: pass hex bytes or --file");
    };
    let cleaned: String = text.split_whitespace().collect();
    let cleaned = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
        .unwrap_or(&cleaned);
    hex::decode(cleaned).context("invalid hex input")
}

fn list_types(codecs: &Codecs) {
    println!(
        "{} ledger schema v{} ({} types)",
        ">>>".green().bold(),
        LEDGER_SCHEMA_VERSION,
        codecs.registry().len()
    );
    for name in codecs.registry().names() {
        let Some(codec) = codecs.registry().get(name) else {
            continue;
        };
        let mut line = format!("  {:<24} {}", name.bold(), codec.kind.label().dimmed());
        if codec.whole_buffer {
            line.push_str(&format!(" {}", "[whole-buffer]".yellow()));
        }
        if !codec.rules.is_empty() {
            let rules: Vec<&str> = codec.rules.iter().map(|r| r.name()).collect();
            line.push_str(&format!(" {}", format!("rules: {}", rules.join(", ")).cyan()));
        }
        println!("{}", line);
    }
}

fn print_value(type_name: &str, len: usize, value: &Value) {
    println!(
        "{} {} ({} bytes)",
        "OK".green().bold(),
        type_name.bold(),
        len
    );
    let mut out = String::new();
    render(value, 1, &mut out);
    print!("{}", out);
}

fn print_error(type_name: &str, err: &CodecError) {
    println!(
        "{} {} [{:?}]",
        "ERROR".red().bold(),
        type_name.bold(),
        err.kind()
    );
    match err {
        CodecError::Decode { source, .. } => {
            let path = source.path();
            if !path.is_empty() {
                println!("  {} {}", "at".dimmed(), path);
            }
            println!("  {} {}", "cause".dimmed(), source.root_cause());
        }
        CodecError::Validation(validation) => {
            for violation in &validation.violations {
                println!(
                    "  {} {} {}",
                    violation.path.bold(),
                    violation.rule.yellow(),
                    violation.message
                );
            }
        }
        other => println!("  {}", other),
    }
}

/// Indented tree rendering, one node per line.
fn render(value: &Value, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Record(fields) => {
            for (name, field) in fields {
                if is_scalar(field) {
                    out.push_str(&format!("{}{}: {}\n", pad, name.cyan(), field));
                } else {
                    out.push_str(&format!("{}{}:\n", pad, name.cyan()));
                    render(field, indent + 1, out);
                }
            }
        }
        Value::Sequence(items) => {
            if items.is_empty() {
                out.push_str(&format!("{}{}\n", pad, "(empty)".dimmed()));
            }
            for (i, item) in items.iter().enumerate() {
                if is_scalar(item) {
                    out.push_str(&format!("{}[{}] {}\n", pad, i, item));
                } else {
                    out.push_str(&format!("{}[{}]\n", pad, i));
                    render(item, indent + 1, out);
                }
            }
        }
        Value::Map(entries) => {
            if entries.is_empty() {
                out.push_str(&format!("{}{}\n", pad, "(empty)".dimmed()));
            }
            for (key, entry) in entries {
                if is_scalar(entry) {
                    out.push_str(&format!("{}{} => {}\n", pad, key, entry));
                } else {
                    out.push_str(&format!("{}{} =>\n", pad, key));
                    render(entry, indent + 1, out);
                }
            }
        }
        Value::Variant(tag, arm, payload) => {
            out.push_str(&format!("{}{}#{}\n", pad, arm.magenta(), tag));
            if !payload.is_unit() {
                render(payload, indent + 1, out);
            }
        }
        scalar => out.push_str(&format!("{}{}\n", pad, scalar)),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(
        value,
        Value::Record(_) | Value::Sequence(_) | Value::Map(_) | Value::Variant(..)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert!(matches!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!(matches!("P".parse::<OutputFormat>(), Ok(OutputFormat::Pretty)));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_nested_value() {
        colored::control::set_override(false);
        let value = Value::record([
            ("fee", Value::Uint(10)),
            (
                "inputs",
                Value::Sequence(vec![Value::variant(0, "KeyHash", Value::from([0xABu8, 0xCD]))]),
            ),
        ]);
        let mut out = String::new();
        render(&value, 0, &mut out);
        assert_eq!(out, "fee: 10\ninputs:\n  [0]\n    KeyHash#0\n      0xabcd\n");
    }

    #[test]
    fn test_read_hex_input() {
        let args = Args::parse_from(["txcodec-inspect", "--type", "Coin", "0x00 00 00 2a"]);
        assert_eq!(read_input(&args).expect("hex"), vec![0, 0, 0, 0x2a]);
    }
}
