use std::fmt;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::core::config::formats;

/// Video qualities offered to users, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
pub enum VideoQuality {
    #[strum(serialize = "144p")]
    P144,
    #[strum(serialize = "240p")]
    P240,
    #[strum(serialize = "360p")]
    P360,
    #[strum(serialize = "480p")]
    P480,
    #[strum(serialize = "720p")]
    P720,
    #[strum(serialize = "1080p")]
    P1080,
    #[strum(serialize = "4K")]
    P2160,
}

impl VideoQuality {
    /// Engine format selector for this quality.
    ///
    /// Low qualities pick the smallest stream under the height cap to keep
    /// files small; 720p and above pick the best one.
    pub fn selector(self) -> &'static str {
        match self {
            VideoQuality::P144 => "worst[height<=144]",
            VideoQuality::P240 => "worst[height<=240]",
            VideoQuality::P360 => "worst[height<=360]",
            VideoQuality::P480 => "worst[height<=480]",
            VideoQuality::P720 => "best[height<=720]",
            VideoQuality::P1080 => "best[height<=1080]",
            VideoQuality::P2160 => "best[height<=2160]",
        }
    }

    pub fn all() -> impl Iterator<Item = VideoQuality> {
        VideoQuality::iter()
    }
}

/// Output kind, used as the filename type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

/// What the user asked for: a video quality label or audio.
///
/// Video labels are kept as given; a label outside the quality table still
/// downloads, with the generic `best` selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Variant {
    Video(String),
    Audio,
}

impl Variant {
    pub fn video(quality: VideoQuality) -> Self {
        Variant::Video(quality.to_string())
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Variant::Video(_) => MediaKind::Video,
            Variant::Audio => MediaKind::Audio,
        }
    }

    /// Known table entry for a video label, if any
    pub fn quality(&self) -> Option<VideoQuality> {
        match self {
            Variant::Video(label) => VideoQuality::from_str(label).ok(),
            Variant::Audio => None,
        }
    }

    pub fn format_selector(&self) -> &'static str {
        match self {
            Variant::Audio => formats::AUDIO_SELECTOR,
            Variant::Video(_) => self
                .quality()
                .map(VideoQuality::selector)
                .unwrap_or(formats::FALLBACK_SELECTOR),
        }
    }

    pub fn is_4k(&self) -> bool {
        self.quality() == Some(VideoQuality::P2160)
    }

    /// Extension the produced artifact must carry, when it is fixed
    pub fn expected_extension(&self) -> Option<&'static str> {
        match self {
            Variant::Audio => Some(formats::AUDIO_FORMAT),
            Variant::Video(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Variant::Video(label) => label,
            Variant::Audio => "audio",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Variant {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("audio") || s.eq_ignore_ascii_case(formats::AUDIO_FORMAT) {
            Ok(Variant::Audio)
        } else {
            Ok(Variant::Video(s.to_string()))
        }
    }
}
