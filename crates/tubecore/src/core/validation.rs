//! YouTube link screening
//!
//! Purely syntactic: no network call is made. Patterns are anchored at the
//! start only, so `https://youtu.be/abc<anything>` is accepted.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The string matches none of the accepted YouTube address shapes
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),
}

/// Accepted address shapes: watch, short, embed, legacy `/v/`, mobile watch
static YOUTUBE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^(?:https?://)?(?:www\.)?youtube\.com/watch\?v=[\w-]+",
        r"^(?:https?://)?(?:www\.)?youtu\.be/[\w-]+",
        r"^(?:https?://)?(?:www\.)?youtube\.com/embed/[\w-]+",
        r"^(?:https?://)?(?:www\.)?youtube\.com/v/[\w-]+",
        r"^(?:https?://)?(?:m\.)?youtube\.com/watch\?v=[\w-]+",
    ]
    .iter()
    .filter_map(|pattern| match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            log::error!("Invalid YouTube URL pattern {}: {}", pattern, e);
            None
        }
    })
    .collect()
});

/// Returns true if `url` looks like a YouTube video link.
///
/// # Examples
/// ```
/// use tubecore::core::validation::is_valid_youtube_url;
///
/// assert!(is_valid_youtube_url("https://youtu.be/dQw4w9WgXcQ"));
/// assert!(!is_valid_youtube_url("https://vimeo.com/12345"));
/// ```
pub fn is_valid_youtube_url(url: &str) -> bool {
    YOUTUBE_PATTERNS.iter().any(|re| re.is_match(url))
}

/// Typed form of [`is_valid_youtube_url`] for `?`-style callers.
pub fn validate_youtube_url(url: &str) -> Result<(), ValidationError> {
    if is_valid_youtube_url(url) {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrl(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(YOUTUBE_PATTERNS.len(), 5);
    }

    #[test]
    fn test_accepts_every_address_shape() {
        let valid = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/watch?v=dQw4w9WgXcQ",
            "youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/v/dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
        ];
        for url in valid {
            assert!(is_valid_youtube_url(url), "expected valid: {}", url);
        }
    }

    #[test]
    fn test_rejects_other_shapes() {
        let invalid = [
            "https://vimeo.com/12345",
            "https://www.youtube.com/",
            "https://www.youtube.com/watch?list=PL123",
            "https://youtube.com/shorts/abc123",
            "https://music.youtube.com/watch?v=dQw4w9WgXcQ",
            "check this https://youtu.be/dQw4w9WgXcQ",
            "ftp://youtu.be/dQw4w9WgXcQ",
            "",
        ];
        for url in invalid {
            assert!(!is_valid_youtube_url(url), "expected invalid: {}", url);
        }
    }

    #[test]
    fn test_prefix_match_keeps_trailing_garbage() {
        assert!(is_valid_youtube_url("https://youtu.be/dQw4w9WgXcQ?t=42&garbage=<>"));
        assert!(is_valid_youtube_url("https://www.youtube.com/watch?v=abc&list=PL1"));
    }

    #[test]
    fn test_validate_returns_typed_error() {
        assert!(validate_youtube_url("https://youtu.be/dQw4w9WgXcQ").is_ok());
        assert_eq!(
            validate_youtube_url("https://vimeo.com/12345"),
            Err(ValidationError::InvalidUrl("https://vimeo.com/12345".to_string()))
        );
    }
}
