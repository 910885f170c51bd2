// CLI configuration
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use opuscaf::DEFAULT_ENCODER;

/// opuscaf - Ogg/Opus to CAF remuxer
#[derive(Parser, Debug)]
#[command(name = "opuscaf")]
#[command(about = "Remux Ogg/Opus audio into Core Audio Format files", long_about = None)]
#[command(version)]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    /// Quiet mode (suppress progress messages)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Pretty,
    /// Compact JSON
    Json,
    /// Key-value pairs
    KeyValue,
    /// Table format
    Table,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert one Ogg/Opus file into a CAF file
    Convert {
        /// Ogg/Opus input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// CAF output file (created or truncated)
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Assemble the file in memory and write it once
        #[arg(long)]
        in_memory: bool,

        /// Verify the checksum of every Ogg page
        #[arg(long)]
        verify_crc: bool,

        /// Encoder string for the information chunk
        #[arg(long, value_name = "NAME", default_value = DEFAULT_ENCODER)]
        encoder: String,
    },

    /// Show CAF file information
    Info {
        /// CAF file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Convert every matching Ogg/Opus file in a directory
    Batch {
        /// Directory path
        #[arg(short, long)]
        directory: PathBuf,

        /// File pattern
        #[arg(short, long, default_value = "*.opus")]
        pattern: String,

        /// Verify the checksum of every Ogg page
        #[arg(long)]
        verify_crc: bool,
    },
}

impl Config {
    /// Default log filter when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert() {
        let config = Config::parse_from(["opuscaf", "convert", "in.opus", "out.caf", "--in-memory"]);
        match config.command {
            Commands::Convert {
                input,
                output,
                in_memory,
                verify_crc,
                encoder,
            } => {
                assert_eq!(input, PathBuf::from("in.opus"));
                assert_eq!(output, PathBuf::from("out.caf"));
                assert!(in_memory);
                assert!(!verify_crc);
                assert_eq!(encoder, DEFAULT_ENCODER);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_convert_requires_both_paths() {
        assert!(Config::try_parse_from(["opuscaf", "convert", "in.opus"]).is_err());
    }

    #[test]
    fn test_log_level() {
        let config = Config::parse_from(["opuscaf", "--verbose", "info", "a.caf"]);
        assert_eq!(config.log_level(), "debug");
        let config = Config::parse_from(["opuscaf", "info", "a.caf", "-q"]);
        assert_eq!(config.log_level(), "warn");
        assert_eq!(config.format, OutputFormat::Pretty);
    }

    #[test]
    fn test_batch_default_pattern() {
        let config = Config::parse_from(["opuscaf", "-f", "json", "batch", "-d", "music"]);
        assert_eq!(config.format, OutputFormat::Json);
        match config.command {
            Commands::Batch { pattern, .. } => assert_eq!(pattern, "*.opus"),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
