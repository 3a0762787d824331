//! Removal of non-dialogue lines from a raw KakaoTalk export.

use regex::Regex;
use std::sync::LazyLock;

// Attachment placeholders: `[name] [time] 사진`, `[name] [time] 사진 3장`, ...
static MEDIA_PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*\[[^\n]*?\] \[[^\n]*?\] (?:사진|동영상|음성메시지)(?:[ \t]*\d*장?)?[ \t]*(?:\r?\n|\z)",
    )
    .unwrap()
});

// Day separators: `--------------- 2024년 1월 15일 월요일 ---------------`
static DATE_BANNER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*-{3,}[ \t]*\d{4}년[ \t]*\d{1,2}월[ \t]*\d{1,2}일[ \t]*[월화수목금토일]요일[ \t]*-{3,}[ \t]*(?:\r?\n|\z)",
    )
    .unwrap()
});

/// Remove photo, video and voice-message placeholder lines.
pub fn strip_media_placeholders(text: &str) -> String {
    MEDIA_PLACEHOLDER_RE.replace_all(text, "").into_owned()
}

/// Remove date separator banners.
pub fn strip_date_banners(text: &str) -> String {
    DATE_BANNER_RE.replace_all(text, "").into_owned()
}

/// Strip every metadata line from the transcript.
///
/// Whole lines are removed together with their terminator, so the result never
/// contains a residual match of either pattern and filtering twice is a no-op.
pub fn filter_content(raw: &str) -> String {
    strip_date_banners(&strip_media_placeholders(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_media_placeholders() {
        let raw = "[Alice] [오후 1:00] 사진\n[Bob] [오후 1:01] 동영상\n[Alice] [오후 1:02] 음성메시지\n[Bob] [오후 1:03] hi\n";
        assert_eq!(strip_media_placeholders(raw), "[Bob] [오후 1:03] hi\n");
    }

    #[test]
    fn test_media_count_suffix() {
        let raw = "[Alice] [오후 1:00] 사진 3장\n[Bob] [오후 1:01] ok\n";
        assert_eq!(strip_media_placeholders(raw), "[Bob] [오후 1:01] ok\n");
    }

    #[test]
    fn test_media_keyword_inside_sentence_is_kept() {
        let raw = "[Alice] [오후 1:00] 사진 보냈어\n";
        assert_eq!(strip_media_placeholders(raw), raw);
    }

    #[test]
    fn test_media_on_last_line_without_terminator() {
        let raw = "[Bob] [오후 1:01] ok\n[Alice] [오후 1:02] 사진";
        assert_eq!(strip_media_placeholders(raw), "[Bob] [오후 1:01] ok\n");
    }

    #[test]
    fn test_strip_date_banners() {
        let raw = "--------------- 2024년 1월 15일 월요일 ---------------\n[Alice] [오전 9:00] 안녕\n";
        assert_eq!(strip_date_banners(raw), "[Alice] [오전 9:00] 안녕\n");
    }

    #[test]
    fn test_crlf_line_endings() {
        let raw = "--- 2023년 12월 3일 일요일 ---\r\n[Alice] [오전 9:00] 사진\r\n[Bob] [오전 9:01] hey\r\n";
        assert_eq!(filter_content(raw), "[Bob] [오전 9:01] hey\r\n");
    }

    #[test]
    fn test_dashes_without_date_are_kept() {
        let raw = "[Alice] [오전 9:00] look\n---------\n";
        assert_eq!(filter_content(raw), raw);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let raw = "\
--------------- 2024년 1월 15일 월요일 ---------------
[Alice] [오전 9:00] 안녕
[Bob] [오전 9:01] 사진 2장
--------------- 2024년 1월 16일 화요일 ---------------
[Bob] [오전 9:02] 반가워
continued
[Alice] [오전 9:03] 음성메시지";
        let once = filter_content(raw);
        assert_eq!(once, "[Alice] [오전 9:00] 안녕\n[Bob] [오전 9:02] 반가워\ncontinued\n");
        assert_eq!(filter_content(&once), once);
    }

    #[test]
    fn test_no_matches_is_noop() {
        assert_eq!(filter_content(""), "");
        assert_eq!(filter_content("plain text\n"), "plain text\n");
    }
}
