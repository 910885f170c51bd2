// CLI command implementations
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::debug;

use opuscaf::caf::{CafFile, Chunk, ChunkContents};
use opuscaf::opus::is_opus_file;
use opuscaf::utils::encoding::decode_info_string;
use opuscaf::{convert_file, convert_file_in_memory, TranscodeOptions};

use super::output::OutputFormatter;

/// Convert one file
pub fn command_convert(
    input: &Path,
    output: &Path,
    in_memory: bool,
    options: &TranscodeOptions,
    formatter: &OutputFormatter,
) -> Result<()> {
    let result = if in_memory {
        convert_file_in_memory(input, output, options)
    } else {
        convert_file(input, output, options)
    };

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            // Leave no half-written file behind
            let _ = std::fs::remove_file(output);
            return Err(e).with_context(|| format!("failed to convert {}", input.display()));
        }
    };

    formatter.print_success(&format!("{} -> {}", input.display(), output.display()));
    formatter.output(&serde_json::to_value(&summary)?, &mut io::stdout())?;
    Ok(())
}

/// Show CAF file information
pub fn command_info(files: &[PathBuf], formatter: &OutputFormatter) -> Result<()> {
    let mut failed = 0;

    for path in files {
        if !path.exists() {
            formatter.print_error(&format!("File not found: {}", path.display()));
            failed += 1;
            continue;
        }

        match file_report(path) {
            Ok(report) => formatter.output(&report, &mut io::stdout())?,
            Err(e) => {
                formatter.print_error(&format!("{}: {:#}", path.display(), e));
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} files could not be read", failed, files.len());
    }
    Ok(())
}

/// Batch convert a directory
pub fn command_batch(
    directory: &Path,
    pattern: &str,
    options: &TranscodeOptions,
    formatter: &OutputFormatter,
) -> Result<()> {
    let joined = directory.join(pattern);
    let glob_pattern = joined
        .to_str()
        .with_context(|| format!("path is not valid UTF-8: {}", joined.display()))?;

    // Find matching files
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in glob::glob(glob_pattern).with_context(|| format!("invalid glob pattern: {}", pattern))? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => formatter.print_error(&format!("Error reading path: {}", e)),
        }
    }

    let total = files.len();
    if total == 0 {
        formatter.print_info("No files found matching pattern");
        return Ok(());
    }
    formatter.print_info(&format!("Processing {} files...", total));

    let mut converted = 0;
    let mut skipped = 0;
    let mut failed = 0;

    for input in &files {
        if !is_opus_file(input) {
            debug!(path = %input.display(), "not an ogg/opus file, skipping");
            skipped += 1;
            continue;
        }

        let output = input.with_extension("caf");
        match convert_file(input, &output, options) {
            Ok(summary) => {
                formatter.print_success(&format!(
                    "{} -> {} ({} packets)",
                    input.display(),
                    output.display(),
                    summary.packet_count
                ));
                converted += 1;
            }
            Err(e) => {
                let _ = std::fs::remove_file(&output);
                formatter.print_error(&format!("{}: {}", input.display(), e));
                failed += 1;
            }
        }
    }

    let report = json!({
        "directory": directory.display().to_string(),
        "pattern": pattern,
        "converted": converted,
        "skipped": skipped,
        "failed": failed
    });
    formatter.output(&report, &mut io::stdout())?;

    if failed > 0 {
        bail!("{} of {} files failed to convert", failed, total);
    }
    Ok(())
}

/// File system facts plus the decoded chunk list
fn file_report(path: &Path) -> Result<Value> {
    let metadata = std::fs::metadata(path)?;
    let modified = metadata
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .and_then(|since| DateTime::<Utc>::from_timestamp(since.as_secs() as i64, 0))
        .map(|date| date.format("%Y-%m-%d %H:%M:%S UTC").to_string());

    let file = CafFile::decode_from_path(path)?;
    let chunks = file.chunks.iter().map(chunk_report).collect::<Result<Vec<_>>>()?;

    Ok(json!({
        "path": path.display().to_string(),
        "size": metadata.len(),
        "modified": modified,
        "header": file.header,
        "chunks": chunks
    }))
}

fn chunk_report(chunk: &Chunk) -> Result<Value> {
    let contents = match &chunk.contents {
        ChunkContents::AudioDescription(desc) => serde_json::to_value(desc)?,
        ChunkContents::ChannelLayout(layout) => serde_json::to_value(layout)?,
        ChunkContents::Information(info) => {
            let entries: Map<String, Value> = info
                .entries
                .iter()
                .map(|(k, v)| (decode_info_string(k), Value::String(decode_info_string(v))))
                .collect();
            Value::Object(entries)
        }
        ChunkContents::AudioData(data) => json!({
            "edit_count": data.edit_count,
            "audio_bytes": data.data.len()
        }),
        ChunkContents::PacketTable(table) => json!({
            "header": table.header,
            "entries": table.entries.len()
        }),
        ChunkContents::Midi(bytes) | ChunkContents::Unknown(bytes) => json!({ "bytes": bytes.len() }),
    };

    Ok(json!({
        "type": chunk.header.chunk_type.to_string(),
        "size": chunk.header.chunk_size,
        "contents": contents
    }))
}
