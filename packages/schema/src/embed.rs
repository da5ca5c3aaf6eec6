//! Embed URL identifier extraction and embed URL construction.
//!
//! Video identifiers are recognized across the watch, short, embed and
//! shorts URL shapes; post identifiers across the twitter.com and x.com
//! status shapes. Extraction is pure and never fails loudly: an
//! unrecognized URL yields `None`.

use regex::Regex;
use std::sync::LazyLock;

static VIDEO_ID_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([A-Za-z0-9_-]{11})")
            .expect("video id pattern"),
        Regex::new(r"youtube\.com/shorts/([A-Za-z0-9_-]{11})").expect("shorts pattern"),
    ]
});

static POST_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:twitter\.com|x\.com)/\w+/status/(\d+)").expect("post id pattern")
});

/// Extract the 11-character video identifier from a video URL
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .map(|captures| captures[1].to_string())
}

/// Extract the numeric post identifier from a social post URL
pub fn extract_post_id(url: &str) -> Option<String> {
    POST_ID_PATTERN
        .captures(url)
        .map(|captures| captures[1].to_string())
}

/// Options for the generated video embed URL
#[derive(Debug, Clone)]
pub struct VideoEmbedOptions {
    /// Use the privacy-enhanced embed host
    pub nocookie: bool,
    /// Show player controls
    pub controls: bool,
}

impl Default for VideoEmbedOptions {
    fn default() -> Self {
        Self {
            nocookie: true,
            controls: true,
        }
    }
}

/// Build the iframe src for an extracted video identifier
pub fn video_embed_url(video_id: &str, options: &VideoEmbedOptions) -> String {
    let host = if options.nocookie {
        "www.youtube-nocookie.com"
    } else {
        "www.youtube.com"
    };
    let controls = if options.controls { 1 } else { 0 };
    format!("https://{host}/embed/{video_id}?controls={controls}")
}

/// 16:9 height for a given embed width
pub fn video_height(width: u32) -> u32 {
    ((width as f64) * 9.0 / 16.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_video_id_from_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_video_id_from_embed_and_shorts_urls() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/abc123XYZ_-"),
            Some("abc123XYZ_-".to_string())
        );
    }

    #[test]
    fn test_video_id_rejects_other_urls() {
        assert_eq!(extract_video_id("https://vimeo.com/12345"), None);
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id(""), None);
        // Too-short identifier
        assert_eq!(extract_video_id("https://youtu.be/short"), None);
    }

    #[test]
    fn test_post_id_from_status_urls() {
        assert_eq!(
            extract_post_id("https://x.com/user/status/12345"),
            Some("12345".to_string())
        );
        assert_eq!(
            extract_post_id("https://twitter.com/someone/status/987654321"),
            Some("987654321".to_string())
        );
    }

    #[test]
    fn test_post_id_rejects_non_status_urls() {
        assert_eq!(extract_post_id("https://example.com/not-a-post"), None);
        assert_eq!(extract_post_id("https://x.com/user"), None);
        assert_eq!(extract_post_id(""), None);
    }

    #[test]
    fn test_embed_url_options() {
        let default = video_embed_url("dQw4w9WgXcQ", &VideoEmbedOptions::default());
        assert_eq!(
            default,
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ?controls=1"
        );

        let plain = video_embed_url(
            "dQw4w9WgXcQ",
            &VideoEmbedOptions {
                nocookie: false,
                controls: false,
            },
        );
        assert_eq!(plain, "https://www.youtube.com/embed/dQw4w9WgXcQ?controls=0");
    }

    #[test]
    fn test_video_height_is_16_9() {
        assert_eq!(video_height(640), 360);
        assert_eq!(video_height(500), 281);
    }
}
