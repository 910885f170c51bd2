// CLI module for opuscaf
//
// Compiled into the binary only; the library carries no CLI dependencies
// in its public API.

pub mod commands;
pub mod config;
pub mod output;

pub use config::{Commands, Config};
pub use output::OutputFormatter;

use opuscaf::TranscodeOptions;

/// Dispatch the parsed command line
pub fn run(config: &Config) -> anyhow::Result<()> {
    let formatter = OutputFormatter::new(config.format, config.quiet);

    match &config.command {
        Commands::Convert {
            input,
            output,
            in_memory,
            verify_crc,
            encoder,
        } => {
            let options = TranscodeOptions::default()
                .verify_checksums(*verify_crc)
                .encoder(encoder.as_str());
            commands::command_convert(input, output, *in_memory, &options, &formatter)
        }
        Commands::Info { files } => commands::command_info(files, &formatter),
        Commands::Batch {
            directory,
            pattern,
            verify_crc,
        } => {
            let options = TranscodeOptions::default().verify_checksums(*verify_crc);
            commands::command_batch(directory, pattern, &options, &formatter)
        }
    }
}
