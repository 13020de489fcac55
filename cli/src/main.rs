use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jsonschema_ref_core::{DotSegments, ReferenceResolver, ResolveOptions, UriRef};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "jsonschema-ref")]
#[command(about = "Resolve JSON Schema $ref/$id segments against a resolution scope")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Keep `.` and `..` segments in merged paths instead of removing them
    #[arg(long, global = true)]
    keep_dot_segments: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one or more segments, each against the result of the previous one
    Resolve {
        /// Parent resolution scope (omit to make the first segment the root)
        #[arg(short, long)]
        scope: Option<String>,

        /// Segments to resolve, outermost first
        #[arg(required = true, allow_hyphen_values = true)]
        segments: Vec<String>,

        /// Print every intermediate scope as JSON instead of the final URI
        #[arg(long)]
        steps: bool,

        /// Output format for --steps
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Print the components of a URI reference as JSON
    Parse {
        /// URI reference to parse
        uri: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Resolve a JSON array of {"scope", "ref"} pairs
    Batch {
        /// Input JSON file
        input: PathBuf,

        /// Output file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

#[derive(Serialize)]
struct Step<'a> {
    scope: Option<&'a str>,
    #[serde(rename = "ref")]
    reference: &'a str,
    resolved: &'a str,
}

#[derive(Deserialize)]
struct BatchItem {
    scope: Option<String>,
    #[serde(rename = "ref")]
    reference: String,
}

#[derive(Serialize)]
struct BatchResult {
    scope: Option<String>,
    #[serde(rename = "ref")]
    reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolved: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<serde_json::Value>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for output
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let options = ResolveOptions {
        dot_segments: if cli.keep_dot_segments {
            DotSegments::Preserve
        } else {
            DotSegments::Remove
        },
    };
    let resolver = ReferenceResolver::new(options);

    match cli.command {
        Commands::Resolve {
            scope,
            segments,
            steps,
            format,
        } => {
            let mut current = scope;
            let mut trail = Vec::with_capacity(segments.len());

            for segment in &segments {
                let resolved = resolver
                    .resolve(current.as_deref(), segment)
                    .map_err(|e| anyhow::Error::from(e).context("Resolution failed"))?;
                tracing::debug!(scope = ?current, segment = %segment, resolved = %resolved, "resolved");
                trail.push((current.take(), resolved.clone()));
                current = Some(resolved);
            }

            if steps {
                let records: Vec<Step<'_>> = trail
                    .iter()
                    .zip(&segments)
                    .map(|((scope, resolved), segment)| Step {
                        scope: scope.as_deref(),
                        reference: segment,
                        resolved,
                    })
                    .collect();
                emit(Output::Json(&records, format), None)?;
            } else if let Some(last) = current {
                emit(Output::text(&last), None)?;
            }
        }
        Commands::Parse { uri, format } => {
            let parsed = UriRef::parse(&uri)
                .map_err(|e| anyhow::Error::from(e).context("Parse failed"))?;
            let components = serde_json::json!({
                "scheme": parsed.scheme(),
                "authority": parsed.authority(),
                "path": parsed.path(),
                "query": parsed.query(),
                "fragment": parsed.fragment(),
                "absolute": parsed.is_absolute(),
            });
            emit(Output::Json(&components, format), None)?;
        }
        Commands::Batch {
            input,
            output,
            format,
        } => {
            let file = File::open(&input)
                .with_context(|| format!("Failed to open input file: {}", input.display()))?;
            let reader = BufReader::new(file);
            let items: Vec<BatchItem> = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse batch from: {}", input.display()))?;

            let results: Vec<BatchResult> = items
                .into_iter()
                .map(|item| match resolver.resolve(item.scope.as_deref(), &item.reference) {
                    Ok(resolved) => BatchResult {
                        scope: item.scope,
                        reference: item.reference,
                        resolved: Some(resolved),
                        error: None,
                    },
                    Err(e) => {
                        tracing::warn!(reference = %item.reference, "{}", e);
                        BatchResult {
                            scope: item.scope,
                            reference: item.reference,
                            resolved: None,
                            error: Some(e.to_json()),
                        }
                    }
                })
                .collect();

            emit(Output::Json(&results, format), output.as_ref())?;
        }
    }

    Ok(())
}

/// What a subcommand prints: a bare URI line or a JSON document.
enum Output<'a, T: Serialize> {
    Text(&'a str),
    Json(&'a T, OutputFormat),
}

impl Output<'_, ()> {
    /// Text output carries no JSON payload.
    fn text(line: &str) -> Output<'_, ()> {
        Output::Text(line)
    }
}

/// Write `output` to `path`, or to stdout, always ending with a newline.
fn emit<T: Serialize>(output: Output<'_, T>, path: Option<&PathBuf>) -> Result<()> {
    let mut writer: Box<dyn Write> = match path {
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("Failed to create output file: {}", p.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };

    match output {
        Output::Text(line) => {
            writer.write_all(line.as_bytes()).context("Failed to write output")?;
        }
        Output::Json(val, OutputFormat::Pretty) => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
        Output::Json(val, OutputFormat::Compact) => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}
