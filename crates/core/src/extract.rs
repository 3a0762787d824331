//! Line classifier that assembles transcript lines into speaker-tagged messages.

use regex::Regex;
use std::sync::LazyLock;

// `[speaker] [timestamp] body`, searched anywhere in the line; the speaker is
// the first bracket pair of the leftmost match.
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\] \[(.*?)\] (.*)$").unwrap());

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Speaker token including its brackets, e.g. `[Alice]`.
    pub speaker: String,
    /// Trimmed body; continuation lines are joined with `\n`.
    pub text: String,
}

impl Message {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    /// The speaker name without the surrounding brackets.
    pub fn speaker_name(&self) -> &str {
        self.speaker
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(&self.speaker)
    }
}

#[derive(Debug, Default)]
enum ExtractState {
    #[default]
    Empty,
    Building { speaker: String, buffer: String },
}

/// Incremental extractor fed one physical line at a time.
///
/// A header line closes the message being built and opens a new one; any other
/// non-blank line extends the open message, or is dropped if none is open yet.
#[derive(Debug, Default)]
pub struct MessageExtractor {
    state: ExtractState,
    messages: Vec<Message>,
}

impl MessageExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify and consume one line of filtered transcript text.
    pub fn feed_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        if let Some(caps) = HEADER_RE.captures(line) {
            self.flush();
            self.state = ExtractState::Building {
                speaker: format!("[{}]", &caps[1]),
                buffer: caps[3].to_string(),
            };
            return;
        }

        match &mut self.state {
            ExtractState::Building { buffer, .. } => {
                buffer.push('\n');
                buffer.push_str(line);
            }
            ExtractState::Empty => {}
        }
    }

    /// Flush the open message, if any, and return everything extracted.
    pub fn finish(mut self) -> Vec<Message> {
        self.flush();
        self.messages
    }

    fn flush(&mut self) {
        if let ExtractState::Building { speaker, buffer } = std::mem::take(&mut self.state) {
            self.messages.push(Message {
                speaker,
                text: buffer.trim().to_string(),
            });
        }
    }
}

/// Extract all messages from filtered transcript text, in transcript order.
pub fn extract_messages(filtered: &str) -> Vec<Message> {
    let mut extractor = MessageExtractor::new();
    for line in filtered.lines() {
        extractor.feed_line(line);
    }
    extractor.finish()
}
