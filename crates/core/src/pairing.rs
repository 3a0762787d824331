//! Grouping of consecutive messages into role-labeled training turns.

use serde::{Deserialize, Serialize};

use crate::extract::Message;

/// Semantic role of a turn in the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn opposite(self) -> Self {
        match self {
            Role::User => Role::Model,
            Role::Model => Role::User,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// Speaker names mapped to the two roles. Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerRoles {
    pub user_name: String,
    pub model_name: String,
}

impl SpeakerRoles {
    pub fn new(user_name: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            model_name: model_name.into(),
        }
    }

    /// Resolve a bracketed speaker token. Unknown speakers default to `User`.
    pub fn resolve(&self, speaker_token: &str) -> Role {
        if bracket_matches(speaker_token, &self.user_name) {
            Role::User
        } else if bracket_matches(speaker_token, &self.model_name) {
            Role::Model
        } else {
            Role::User
        }
    }
}

fn bracket_matches(token: &str, name: &str) -> bool {
    token
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .is_some_and(|inner| inner == name)
}

/// One role-labeled message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// A training example: a first turn and, when available, the reply to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPair {
    pub first: Turn,
    pub second: Option<Turn>,
}

/// Outcome of pairing a message sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingOutcome {
    pub pairs: Vec<TurnPair>,
    /// Pairs dropped because their first message was malformed.
    pub skipped_pairs: usize,
    /// Second halves dropped because the reply message was malformed.
    pub dropped_replies: usize,
    /// 1 when an odd trailing message was left unpaired.
    pub dropped_trailing: usize,
}

/// Split a message into its bracketed speaker token and body.
///
/// Returns `None` for messages whose speaker is not a `[...]` token or whose
/// body is blank. The extractor never produces such messages; they can only
/// come from callers building `Message` values by hand.
fn split_message(message: &Message) -> Option<(&str, &str)> {
    let token = message.speaker.as_str();
    let text = message.text.trim();
    let well_formed = token.len() >= 2 && token.starts_with('[') && token.ends_with(']');
    if !well_formed || text.is_empty() {
        return None;
    }
    Some((token, text))
}

/// Pair messages `(0, 1)`, `(2, 3)`, ... into turns.
///
/// An odd trailing message is never emitted. The second turn's role is always
/// the opposite of the first's, whoever actually sent it: the transcript is
/// assumed to strictly alternate between the two configured speakers.
pub fn pair_messages(messages: &[Message], roles: &SpeakerRoles) -> PairingOutcome {
    let mut outcome = PairingOutcome {
        dropped_trailing: messages.len() % 2,
        ..Default::default()
    };

    for (index, chunk) in messages.chunks_exact(2).enumerate() {
        let (current, next) = (&chunk[0], &chunk[1]);

        let Some((token, body)) = split_message(current) else {
            tracing::debug!(pair = index, speaker = %current.speaker, "skipping malformed pair");
            outcome.skipped_pairs += 1;
            continue;
        };

        let role = roles.resolve(token);
        let first = Turn {
            role,
            text: body.to_string(),
        };

        let second = match split_message(next) {
            Some((_, body)) => Some(Turn {
                role: role.opposite(),
                text: body.to_string(),
            }),
            None => {
                tracing::debug!(pair = index, speaker = %next.speaker, "dropping malformed reply");
                outcome.dropped_replies += 1;
                None
            }
        };

        outcome.pairs.push(TurnPair { first, second });
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(speaker: &str, text: &str) -> Message {
        Message::new(speaker, text)
    }

    #[test]
    fn test_resolve_roles() {
        let roles = SpeakerRoles::new("Alice", "Bob");
        assert_eq!(roles.resolve("[Alice]"), Role::User);
        assert_eq!(roles.resolve("[Bob]"), Role::Model);
        assert_eq!(roles.resolve("[Carol]"), Role::User);
        // Case-sensitive, exact
        assert_eq!(roles.resolve("[bob]"), Role::User);
        assert_eq!(roles.resolve("Bob"), Role::User);
    }

    #[test]
    fn test_alternating_pair() {
        let roles = SpeakerRoles::new("Alice", "Bob");
        let pairs = pair_messages(&[msg("[Alice]", "hi"), msg("[Bob]", "hey")], &roles).pairs;
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].first, Turn { role: Role::User, text: "hi".into() });
        assert_eq!(
            pairs[0].second,
            Some(Turn { role: Role::Model, text: "hey".into() })
        );
    }

    #[test]
    fn test_second_role_is_forced_opposite() {
        // Bob is configured as model, so the reply is forced to user even though
        // Carol is unknown.
        let roles = SpeakerRoles::new("Alice", "Bob");
        let pairs = pair_messages(&[msg("[Bob]", "hi"), msg("[Carol]", "hey")], &roles).pairs;
        assert_eq!(pairs[0].first.role, Role::Model);
        assert_eq!(pairs[0].second.as_ref().map(|t| t.role), Some(Role::User));

        // Neither speaker configured: first defaults to user, reply forced to model.
        let roles = SpeakerRoles::new("Alice", "Dave");
        let pairs = pair_messages(&[msg("[Bob]", "hi"), msg("[Carol]", "hey")], &roles).pairs;
        assert_eq!(pairs[0].first.role, Role::User);
        assert_eq!(pairs[0].second.as_ref().map(|t| t.role), Some(Role::Model));
    }

    #[test]
    fn test_same_speaker_twice_still_alternates() {
        let roles = SpeakerRoles::new("Alice", "Bob");
        let pairs = pair_messages(&[msg("[Alice]", "one"), msg("[Alice]", "two")], &roles).pairs;
        assert_eq!(pairs[0].second.as_ref().map(|t| t.role), Some(Role::Model));
    }

    #[test]
    fn test_odd_trailing_message_is_dropped() {
        let roles = SpeakerRoles::new("A", "B");
        let messages: Vec<Message> = (0..5)
            .map(|i| msg(if i % 2 == 0 { "[A]" } else { "[B]" }, &format!("m{i}")))
            .collect();
        let outcome = pair_messages(&messages, &roles);
        assert_eq!(outcome.pairs.len(), 2);
        assert_eq!(outcome.dropped_trailing, 1);
        assert_eq!(outcome.pairs[0].first.text, "m0");
        assert_eq!(outcome.pairs[1].second.as_ref().unwrap().text, "m3");
        assert!(outcome.pairs.iter().all(|p| {
            p.first.text != "m4" && p.second.as_ref().map_or(true, |s| s.text != "m4")
        }));
    }

    #[test]
    fn test_fewer_than_two_messages() {
        let roles = SpeakerRoles::new("A", "B");
        assert!(pair_messages(&[], &roles).pairs.is_empty());
        assert!(pair_messages(&[msg("[A]", "alone")], &roles).pairs.is_empty());
    }

    #[test]
    fn test_malformed_first_drops_only_that_pair() {
        let roles = SpeakerRoles::new("A", "B");
        let messages = vec![
            msg("A", "no brackets"),
            msg("[B]", "reply"),
            msg("[A]", "fine"),
            msg("[B]", "also fine"),
        ];
        let outcome = pair_messages(&messages, &roles);
        assert_eq!(outcome.skipped_pairs, 1);
        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].first.text, "fine");
        assert_eq!(outcome.pairs[0].second.as_ref().unwrap().role, Role::Model);
    }

    #[test]
    fn test_malformed_reply_keeps_first_turn() {
        let roles = SpeakerRoles::new("A", "B");
        let outcome = pair_messages(&[msg("[A]", "question"), msg("[B]", "   ")], &roles);
        assert_eq!(outcome.dropped_replies, 1);
        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].first.text, "question");
        assert!(outcome.pairs[0].second.is_none());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
        assert_eq!(Role::Model.as_str(), "model");
    }
}
