//! Node.js bindings for the kakao2jsonl converter.
//!
//! Everything here works on in-memory strings; reading and writing files is
//! left to the JavaScript caller.

use napi::bindgen_prelude::*;
use napi_derive::napi;

use kakao2jsonl_core::{
    Content as CoreContent, Message as CoreMessage, SpeakerRoles,
    TrainingRecord as CoreRecord,
};

/// A speaker-tagged chat message.
#[napi(object)]
pub struct Message {
    /// Speaker token including brackets, e.g. `[Alice]`.
    pub speaker: String,
    /// Speaker name without brackets, as passed to `userName` / `modelName`.
    pub name: String,
    pub text: String,
}

impl From<CoreMessage> for Message {
    fn from(msg: CoreMessage) -> Self {
        Self {
            name: msg.speaker_name().to_string(),
            speaker: msg.speaker,
            text: msg.text,
        }
    }
}

/// One role-labeled entry of a training record.
#[napi(object)]
pub struct Content {
    /// Either "user" or "model".
    pub role: String,
    pub text: String,
}

impl From<CoreContent> for Content {
    fn from(content: CoreContent) -> Self {
        Self {
            role: content.role.as_str().to_string(),
            text: content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A training record: one or two contents in conversation order.
#[napi(object)]
pub struct TrainingRecord {
    pub contents: Vec<Content>,
}

impl From<CoreRecord> for TrainingRecord {
    fn from(record: CoreRecord) -> Self {
        Self {
            contents: record.contents.into_iter().map(Into::into).collect(),
        }
    }
}

/// Conversion counters.
#[napi(object)]
pub struct ConversionStats {
    pub messages: u32,
    pub records: u32,
    pub skipped_pairs: u32,
    pub dropped_replies: u32,
    pub dropped_trailing: u32,
}

/// Records plus counters for one transcript.
#[napi(object)]
pub struct ConversionResult {
    pub records: Vec<TrainingRecord>,
    pub stats: ConversionStats,
}

/// Remove media placeholders and date banners from a raw export.
#[napi]
pub fn filter_content(raw: String) -> String {
    kakao2jsonl_core::filter_content(&raw)
}

/// Extract speaker-tagged messages from an export.
///
/// @param raw - The raw export text; metadata lines are filtered first.
#[napi]
pub fn extract_messages(raw: String) -> Vec<Message> {
    let filtered = kakao2jsonl_core::filter_content(&raw);
    kakao2jsonl_core::extract_messages(&filtered)
        .into_iter()
        .map(Into::into)
        .collect()
}

/// Convert an export into training records.
///
/// @param raw - The raw export text.
/// @param userName - Speaker name assigned the "user" role.
/// @param modelName - Speaker name assigned the "model" role.
#[napi]
pub fn convert_transcript(raw: String, user_name: String, model_name: String) -> ConversionResult {
    let roles = SpeakerRoles::new(user_name, model_name);
    let conversion = kakao2jsonl_core::convert_transcript(&raw, &roles);
    let stats = conversion.stats;

    ConversionResult {
        records: conversion.records.into_iter().map(Into::into).collect(),
        stats: ConversionStats {
            messages: stats.messages as u32,
            records: stats.records as u32,
            skipped_pairs: stats.skipped_pairs as u32,
            dropped_replies: stats.dropped_replies as u32,
            dropped_trailing: stats.dropped_trailing as u32,
        },
    }
}

/// Convert an export straight to JSON Lines text.
#[napi]
pub fn to_jsonl(raw: String, user_name: String, model_name: String) -> Result<String> {
    let roles = SpeakerRoles::new(user_name, model_name);
    let conversion = kakao2jsonl_core::convert_transcript(&raw, &roles);
    kakao2jsonl_core::records_to_jsonl(&conversion.records)
        .map_err(|e| Error::from_reason(e.to_string()))
}
