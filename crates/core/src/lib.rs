//! Core parsing logic for KakaoTalk chat exports.
//!
//! A raw export goes through four stages: metadata lines are filtered out,
//! the remaining lines are assembled into speaker-tagged messages, consecutive
//! messages are paired into `user`/`model` turns, and each pair becomes a
//! training record suitable for supervised fine-tuning.

mod error;
mod extract;
mod filter;
mod pairing;
pub mod pipeline;
mod record;

pub use error::{Error, Result};
pub use extract::{extract_messages, Message, MessageExtractor};
pub use filter::{filter_content, strip_date_banners, strip_media_placeholders};
pub use pairing::{pair_messages, PairingOutcome, Role, SpeakerRoles, Turn, TurnPair};
pub use pipeline::{
    convert_transcript, discover_transcript_files, process_all_transcripts, process_transcript,
    records_to_jsonl, write_jsonl_output, BatchResult, Conversion, ConversionStats,
    TranscriptResult,
};
pub use record::{build_records, Content, Part, TrainingRecord};

/// File name used when no output path is given.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "output.jsonl";
