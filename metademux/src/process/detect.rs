use log::{debug, warn};

use crate::structs::dialect::{DetectedBy, Detection, Dialect};
use crate::utils::errors::DetectError;
use crate::utils::scan::starts_with_ignore_case;

/// Number of leading bytes inspected when sniffing content.
pub const PEEK_SIZE: usize = 1024;

/// Content markers, in the priority they are tested at each offset.
const MARKERS: [(&[u8], Dialect); 4] = [
    (b"[playlist]", Dialect::Pls),
    (b"<html>", Dialect::Html),
    (b"<asx", Dialect::Asx),
    (b"<?xml", Dialect::B4s),
];

/// Length of the longest marker. The last `SNIFF_TAIL` bytes of the peek are
/// never used as a starting offset.
const SNIFF_TAIL: usize = b"[playlist]".len();

/// Chooses the dialect of a playlist from its name and a bounded peek at its
/// content.
///
/// # Example
///
/// ```rust
/// use metademux::process::detect::Detector;
/// use metademux::structs::dialect::{DetectedBy, Dialect};
///
/// let detector = Detector::default();
///
/// let detection = detector.detect(Some("stream.php"), b"junk\n[playlist]\nFile1=a\n")?;
/// assert_eq!(detection.dialect, Dialect::Pls);
/// assert_eq!(detection.detected_by, DetectedBy::Content);
///
/// let detection = detector.detect(Some("/music/list.m3u"), b"<asx>")?;
/// assert_eq!(detection.dialect, Dialect::M3u);
/// # Ok::<(), metademux::utils::errors::DetectError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Detector {
    forced: Option<Dialect>,
}

impl Detector {
    /// Detector honouring a caller-forced dialect, which takes the place of
    /// the extension lookup.
    pub fn with_forced(forced: Option<Dialect>) -> Self {
        Self { forced }
    }

    /// Scans `peek` for the first offset where a content marker starts,
    /// ignoring ASCII case.
    ///
    /// Peeks no longer than the longest marker are never classified.
    pub fn sniff(peek: &[u8]) -> Option<Dialect> {
        let window = peek.len().checked_sub(SNIFF_TAIL)?;
        (0..window).find_map(|offset| {
            MARKERS
                .iter()
                .find(|(marker, _)| starts_with_ignore_case(&peek[offset..], marker))
                .map(|&(_, dialect)| dialect)
        })
    }

    /// Classifies a stream.
    ///
    /// An M3U name is trusted outright since M3U has no content signature.
    /// Otherwise a content marker wins. When the name points at another
    /// dialect but the content carries no marker, the stream is treated as
    /// M3U.
    ///
    /// # Arguments
    ///
    /// * `location` - Playlist location, used for its extension
    /// * `peek` - First bytes of the stream, at most [`PEEK_SIZE`] are used
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::Unclassified`] when neither the name nor the
    /// content identifies a dialect.
    pub fn detect(&self, location: Option<&str>, peek: &[u8]) -> Result<Detection, DetectError> {
        let by_extension = location.and_then(Dialect::from_location);
        let (by_name, name_signal) = match self.forced {
            Some(forced) => (Some(forced), DetectedBy::Forced),
            None => (by_extension, DetectedBy::Extension),
        };

        let by_content = if by_name == Some(Dialect::M3u) {
            None
        } else {
            Self::sniff(&peek[..peek.len().min(PEEK_SIZE)])
        };

        let (dialect, detected_by) = match (by_name, by_content) {
            (Some(Dialect::M3u), _) => (Dialect::M3u, name_signal),
            (_, Some(content)) => (content, DetectedBy::Content),
            (Some(name), None) => {
                warn!("Name suggests {name} but content has no {name} marker, reading as M3U");
                (Dialect::M3u, DetectedBy::Fallback)
            }
            (None, None) => return Err(DetectError::Unclassified),
        };

        debug!("Detected {dialect} playlist by {detected_by}");

        Ok(Detection {
            dialect,
            detected_by,
            by_name,
            by_content,
        })
    }
}
