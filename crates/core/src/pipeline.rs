//! Pipeline for turning transcript files into JSONL training records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::extract::extract_messages;
use crate::filter::filter_content;
use crate::pairing::{pair_messages, SpeakerRoles};
use crate::record::{build_records, TrainingRecord};

/// Counters collected while converting one or more transcripts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub messages: usize,
    pub records: usize,
    pub skipped_pairs: usize,
    pub dropped_replies: usize,
    pub dropped_trailing: usize,
}

impl ConversionStats {
    pub fn merge(&mut self, other: &ConversionStats) {
        self.messages += other.messages;
        self.records += other.records;
        self.skipped_pairs += other.skipped_pairs;
        self.dropped_replies += other.dropped_replies;
        self.dropped_trailing += other.dropped_trailing;
    }
}

/// Records produced from one transcript, with their counters.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    pub records: Vec<TrainingRecord>,
    pub stats: ConversionStats,
}

/// Result of converting one file in batch mode.
#[derive(Debug)]
pub struct TranscriptResult {
    pub source_path: PathBuf,
    pub conversion: Conversion,
}

/// Result of converting every transcript under a directory.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub transcripts: Vec<TranscriptResult>,
}

impl BatchResult {
    pub fn stats(&self) -> ConversionStats {
        let mut total = ConversionStats::default();
        for t in &self.transcripts {
            total.merge(&t.conversion.stats);
        }
        total
    }

    pub fn records(&self) -> impl Iterator<Item = &TrainingRecord> {
        self.transcripts.iter().flat_map(|t| t.conversion.records.iter())
    }
}

/// Run filter, extraction, pairing and record building over raw transcript text.
pub fn convert_transcript(raw: &str, roles: &SpeakerRoles) -> Conversion {
    let filtered = filter_content(raw);
    let messages = extract_messages(&filtered);
    let outcome = pair_messages(&messages, roles);
    let records = build_records(&outcome.pairs);

    Conversion {
        stats: ConversionStats {
            messages: messages.len(),
            records: records.len(),
            skipped_pairs: outcome.skipped_pairs,
            dropped_replies: outcome.dropped_replies,
            dropped_trailing: outcome.dropped_trailing,
        },
        records,
    }
}

/// Read and convert a single transcript file.
pub fn process_transcript(path: &Path, roles: &SpeakerRoles) -> Result<Conversion> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(convert_transcript(&raw, roles))
}

/// Discover all `.txt` transcripts under a directory, sorted by path.
pub fn discover_transcript_files(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "txt"))
        .map(|e| e.path().to_path_buf())
        .collect();
    paths.sort();
    paths
}

/// Convert every transcript under `root` in parallel.
///
/// Any file that cannot be read aborts the whole batch. Results keep the
/// sorted discovery order.
pub fn process_all_transcripts(root: &Path, roles: &SpeakerRoles) -> Result<BatchResult> {
    let files = discover_transcript_files(root);
    if files.is_empty() {
        return Err(Error::NoTranscripts(root.to_path_buf()));
    }

    let total_files = files.len();
    let processed_count = AtomicUsize::new(0);

    let transcripts = files
        .into_par_iter()
        .map(|path| -> Result<TranscriptResult> {
            let conversion = process_transcript(&path, roles)?;
            let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::debug!(
                path = %path.display(),
                records = conversion.stats.records,
                "converted transcript {}/{}",
                count,
                total_files
            );
            Ok(TranscriptResult {
                source_path: path,
                conversion,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BatchResult { transcripts })
}

/// Serialize records as JSON Lines, one record per line.
pub fn records_to_jsonl<'a, I>(records: I) -> Result<String>
where
    I: IntoIterator<Item = &'a TrainingRecord>,
{
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Write records to `path` as JSON Lines, creating parent directories.
///
/// Returns the number of lines written.
pub fn write_jsonl_output<'a, I>(records: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'a TrainingRecord>,
{
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut writer = BufWriter::new(File::create(path).map_err(write_err)?);
    let mut written = 0;
    for record in records {
        let json_line = serde_json::to_string(record)?;
        writeln!(writer, "{}", json_line).map_err(write_err)?;
        written += 1;
    }
    writer.flush().map_err(write_err)?;

    Ok(written)
}
