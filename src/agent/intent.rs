//! Video-idea intent classification.
//!
//! A cheap keyword/regex gate that decides whether a message should run the
//! full video-idea pipeline instead of single-tool selection. Runs before
//! any model call.

use std::sync::LazyLock;

use regex::Regex;

const VIDEO_IDEA_KEYWORDS: [&str; 10] = [
    "video idea",
    "script",
    "content",
    "going to",
    "trip",
    "visiting",
    "traveling",
    "give me ideas",
    "what should i make",
    "help me create",
];

static TRAVEL_PLAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)i'm (going|traveling|visiting|planning)").expect("valid travel pattern")
});

/// Whether a message reads like a high-level video-idea request.
#[must_use]
pub fn is_video_idea_request(message: &str) -> bool {
    let lower = message.to_lowercase();
    VIDEO_IDEA_KEYWORDS.iter().any(|kw| lower.contains(kw)) || TRAVEL_PLAN_RE.is_match(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_matches() {
        assert!(is_video_idea_request("Give me a video idea for my channel"));
        assert!(is_video_idea_request("I need a SCRIPT about cooking"));
        assert!(is_video_idea_request("what should I make next?"));
        assert!(is_video_idea_request("I'm going to San Francisco next week"));
    }

    #[test]
    fn test_travel_regex_matches() {
        assert!(is_video_idea_request("I'm visiting Tokyo"));
        assert!(is_video_idea_request("i'M PLANNING a big event"));
    }

    #[test]
    fn test_non_matches() {
        assert!(!is_video_idea_request("How do hashtags work?"));
        assert!(!is_video_idea_request("Transcribe this video please"));
        assert!(!is_video_idea_request("hello"));
    }
}
