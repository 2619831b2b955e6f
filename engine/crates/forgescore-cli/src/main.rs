//! ForgeScore - command-line CVSS calculator
//!
//! Scores CVSS v2.0, v3.0, v3.1 and v4.0 vectors, detects vector versions,
//! shows the score impact of changing a metric and lists metric tables.

mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use forgescore_common::{Config, LogConfig};
use forgescore_core::CvssVersion;
use forgescore_cvss::{detect_version, CvssCalculator, ParseMode};
use output::{MetricListing, Printer, ScoredVector};
use std::path::PathBuf;
use tracing::{debug, info};

const DEFAULT_CONFIG: &str = "forgescore.toml";

/// ForgeScore CVSS calculator
#[derive(Parser, Debug)]
#[command(name = "forgescore")]
#[command(author = "Forge Cyber Defense")]
#[command(version)]
#[command(about = "CVSS v2.0 / v3.x / v4.0 calculator", long_about = None)]
struct Cli {
    /// Configuration file path (default: forgescore.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format (pretty, json, compact)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score one or more vectors
    Score {
        /// Vector strings, version detected from their prefix
        #[arg(required = true)]
        vectors: Vec<String>,

        /// Reject unknown metric codes and values
        #[arg(long)]
        strict: bool,

        /// Label attached to every scored vector
        #[arg(long)]
        label: Option<String>,

        /// Output format (overrides config)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Emit persistence records (id, timestamp) instead of results
        #[arg(long)]
        record: bool,
    },

    /// Print the CVSS version of a vector
    Detect {
        vector: String,
    },

    /// Show how changing metrics would change the score
    Impact {
        vector: String,

        /// Reject unknown metric codes and values
        #[arg(long)]
        strict: bool,

        /// Metric code to change; every option is listed when omitted
        #[arg(long, requires = "value")]
        metric: Option<String>,

        /// Candidate value for --metric
        #[arg(long, requires = "metric")]
        value: Option<String>,

        /// Output format (overrides config)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// List the metric codes of a version and their legal values
    Metrics {
        /// CVSS version (2.0, 3.0, 3.1, 4.0)
        version: String,

        /// Output format (overrides config)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load(DEFAULT_CONFIG)?,
    };
    let mut config = config.merge_env();

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    config.validate()?;
    Ok(config)
}

fn printer(config: &Config, flag: Option<OutputFormat>) -> Printer {
    let json = match flag {
        Some(format) => format == OutputFormat::Json,
        None => config.output.format == "json",
    };
    Printer::new(json, config.output.pretty_json)
}

fn parse_mode(config: &Config, strict: bool) -> ParseMode {
    if strict || config.scoring.strict_parsing {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Initialize logging
    let log_config = LogConfig::try_from(&config.logging)?;
    forgescore_common::init_logging_with_config(log_config)?;

    debug!(version = env!("CARGO_PKG_VERSION"), "ForgeScore starting");

    match cli.command {
        Command::Score {
            vectors,
            strict,
            label,
            format,
            record,
        } => {
            let calc = CvssCalculator::with_mode(parse_mode(&config, strict));
            let printer = printer(&config, format);

            let mut scored = Vec::with_capacity(vectors.len());
            for vector in &vectors {
                let result = calc
                    .score_vector(vector)
                    .with_context(|| format!("failed to score {:?}", vector))?;
                scored.push(result);
            }
            info!(count = scored.len(), "Scored vectors");

            if record {
                let records: Vec<_> = scored.iter().map(|r| r.to_record(label.clone())).collect();
                printer.print_records(&records)?;
            } else {
                let rows: Vec<_> = scored
                    .iter()
                    .map(|result| ScoredVector {
                        label: label.as_deref(),
                        result,
                    })
                    .collect();
                printer.print_scores(&rows)?;
            }
        }

        Command::Detect { vector } => {
            let version = detect_version(&vector)
                .with_context(|| format!("cannot detect the CVSS version of {:?}", vector))?;
            println!("{}", version.as_str());
        }

        Command::Impact {
            vector,
            strict,
            metric,
            value,
            format,
        } => {
            let calc = CvssCalculator::with_mode(parse_mode(&config, strict));
            let metrics = calc
                .parse(&vector)
                .with_context(|| format!("failed to parse {:?}", vector))?;
            let printer = printer(&config, format);

            match (metric, value) {
                (Some(code), Some(value)) => {
                    let delta = calc.option_impact(&metrics, &code, &value)?;
                    printer.print_delta(&code, &value, delta)?;
                }
                _ => {
                    let impacts = calc.option_impacts(&metrics)?;
                    printer.print_impacts(&impacts)?;
                }
            }
        }

        Command::Metrics { version, format } => {
            let version: CvssVersion = version.parse()?;
            let listing = MetricListing::of(version);
            printer(&config, format).print_listing(&listing)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_score_command() {
        let cli = Cli::try_parse_from([
            "forgescore",
            "score",
            "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H",
            "AV:N/AC:L/Au:N/C:C/I:C/A:C",
            "--strict",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Command::Score {
                vectors,
                strict,
                format,
                ..
            } => {
                assert_eq!(vectors.len(), 2);
                assert!(strict);
                assert_eq!(format, Some(OutputFormat::Json));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_impact_metric_requires_value() {
        assert!(Cli::try_parse_from([
            "forgescore",
            "impact",
            "CVSS:3.1/AV:N",
            "--metric",
            "AV"
        ])
        .is_err());
    }

    #[test]
    fn test_impact_accepts_strict() {
        let cli = Cli::try_parse_from([
            "forgescore",
            "impact",
            "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H",
            "--strict",
        ])
        .unwrap();
        match cli.command {
            Command::Impact { strict, .. } => {
                assert!(strict);
                assert_eq!(parse_mode(&Config::default(), strict), ParseMode::Strict);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(parse_mode(&Config::default(), false), ParseMode::Lenient);
    }

    #[test]
    fn test_flag_overrides_config_format() {
        let config = Config::builder().output_format("json").build();
        assert!(printer(&config, None).is_json());
        assert!(!printer(&config, Some(OutputFormat::Text)).is_json());
    }
}
