//! Validated mashup request parameters

use crate::error::UsageError;

/// Fewer videos than this is rejected as a usage error.
pub const MIN_VIDEO_COUNT: u32 = 11;
/// Shorter trim offsets than this are rejected as a usage error.
pub const MIN_CLIP_OFFSET_SECS: u32 = 20;

/// The three pipeline parameters, validated on construction and immutable
/// afterwards. The destination (output path or recipient address) is
/// carried separately by each entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MashupRequest {
    singer_name: String,
    video_count: u32,
    clip_offset_secs: u32,
}

impl MashupRequest {
    /// Validate the raw parameters. Runs before any network access.
    pub fn new(
        singer_name: &str,
        video_count: u32,
        clip_offset_secs: u32,
    ) -> Result<Self, UsageError> {
        let singer_name = singer_name.trim();
        if singer_name.is_empty() {
            return Err(UsageError::EmptySingerName);
        }
        if video_count < MIN_VIDEO_COUNT {
            return Err(UsageError::TooFewVideos(video_count));
        }
        if clip_offset_secs < MIN_CLIP_OFFSET_SECS {
            return Err(UsageError::OffsetTooShort(clip_offset_secs));
        }

        Ok(Self {
            singer_name: singer_name.to_string(),
            video_count,
            clip_offset_secs,
        })
    }

    pub fn singer_name(&self) -> &str {
        &self.singer_name
    }

    pub fn video_count(&self) -> u32 {
        self.video_count
    }

    /// Seconds removed from the start of each clip's source audio.
    pub fn clip_offset_secs(&self) -> u32 {
        self.clip_offset_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_minimum_parameters() {
        let req = MashupRequest::new("Tom Misch", 11, 20).unwrap();
        assert_eq!(req.singer_name(), "Tom Misch");
        assert_eq!(req.video_count(), 11);
        assert_eq!(req.clip_offset_secs(), 20);
    }

    #[test]
    fn test_rejects_ten_videos() {
        assert_eq!(
            MashupRequest::new("Tom Misch", 10, 20),
            Err(UsageError::TooFewVideos(10))
        );
    }

    #[test]
    fn test_rejects_short_offset() {
        assert_eq!(
            MashupRequest::new("Tom Misch", 11, 19),
            Err(UsageError::OffsetTooShort(19))
        );
    }

    #[test]
    fn test_rejects_blank_singer() {
        assert_eq!(MashupRequest::new("", 11, 20), Err(UsageError::EmptySingerName));
        assert_eq!(
            MashupRequest::new("   ", 11, 20),
            Err(UsageError::EmptySingerName)
        );
    }

    #[test]
    fn test_trims_singer_name() {
        let req = MashupRequest::new("  Nujabes  ", 12, 25).unwrap();
        assert_eq!(req.singer_name(), "Nujabes");
    }
}
