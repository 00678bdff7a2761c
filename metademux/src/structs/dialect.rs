use std::fmt::Display;
use std::str::FromStr;

use crate::utils::errors::DetectError;

/// The playlist document shapes understood by the demuxer.
///
/// A dialect is fixed once detected. It selects both the record terminator
/// used by [`Splitter`](crate::process::split::Splitter) and the extraction
/// strategy used by [`Parser`](crate::process::parse::Parser).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    M3u,
    Pls,
    Asx,
    Html,
    B4s,
}

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::M3u,
        Dialect::Asx,
        Dialect::Html,
        Dialect::Pls,
        Dialect::B4s,
    ];

    /// Byte that ends one logical record.
    ///
    /// Line-oriented dialects split on `\n`, tag-oriented ones on `>`.
    pub const fn terminator(self) -> u8 {
        match self {
            Dialect::M3u | Dialect::Pls => b'\n',
            Dialect::Asx | Dialect::Html | Dialect::B4s => b'>',
        }
    }

    /// Short name, also accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Dialect::M3u => "m3u",
            Dialect::Pls => "pls",
            Dialect::Asx => "asx",
            Dialect::Html => "html",
            Dialect::B4s => "b4s",
        }
    }

    /// File extension, including the leading dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Dialect::M3u => ".m3u",
            Dialect::Pls => ".pls",
            Dialect::Asx => ".asx",
            Dialect::Html => ".html",
            Dialect::B4s => ".b4s",
        }
    }

    /// Maps a location's extension (text after its last `.`) to a dialect,
    /// ignoring ASCII case.
    pub fn from_location(location: &str) -> Option<Self> {
        let ext = &location[location.rfind('.')?..];
        Self::ALL
            .into_iter()
            .find(|dialect| ext.eq_ignore_ascii_case(dialect.extension()))
    }
}

impl Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::M3u => write!(f, "M3U"),
            Dialect::Pls => write!(f, "PLS"),
            Dialect::Asx => write!(f, "ASX"),
            Dialect::Html => write!(f, "HTML"),
            Dialect::B4s => write!(f, "B4S"),
        }
    }
}

impl FromStr for Dialect {
    type Err = DetectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dialect| dialect.name() == s)
            .ok_or_else(|| DetectError::UnknownDialect(s.to_string()))
    }
}

/// Which signal settled the dialect of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedBy {
    /// Caller forced the dialect by name.
    Forced,
    /// Location extension.
    Extension,
    /// A marker found in the content peek.
    Content,
    /// Name said something other than M3U but the content had no marker.
    Fallback,
}

impl Display for DetectedBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectedBy::Forced => write!(f, "forced dialect"),
            DetectedBy::Extension => write!(f, "file extension"),
            DetectedBy::Content => write!(f, "content marker"),
            DetectedBy::Fallback => write!(f, "M3U fallback"),
        }
    }
}

/// Outcome of dialect detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub dialect: Dialect,
    pub detected_by: DetectedBy,
    /// Dialect suggested by the forced name or extension, if any.
    pub by_name: Option<Dialect>,
    /// Dialect suggested by a content marker, if any.
    pub by_content: Option<Dialect>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_lookup_ignores_case() {
        assert_eq!(Dialect::from_location("/a/b/list.M3U"), Some(Dialect::M3u));
        assert_eq!(Dialect::from_location("radio.Pls"), Some(Dialect::Pls));
        assert_eq!(Dialect::from_location("x.b4s"), Some(Dialect::B4s));
        assert_eq!(Dialect::from_location("page.htm"), None);
        assert_eq!(Dialect::from_location("noext"), None);
    }

    #[test]
    fn extension_uses_last_dot_of_location() {
        assert_eq!(Dialect::from_location("/lists.m3u/stream"), None);
        assert_eq!(Dialect::from_location("/v1.2/show.asx"), Some(Dialect::Asx));
    }

    #[test]
    fn names_round_trip_and_are_exact() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.name().parse::<Dialect>().unwrap(), dialect);
        }
        assert!(matches!(
            "M3U".parse::<Dialect>(),
            Err(DetectError::UnknownDialect(_))
        ));
    }

    #[test]
    fn terminators() {
        assert_eq!(Dialect::M3u.terminator(), b'\n');
        assert_eq!(Dialect::Pls.terminator(), b'\n');
        assert_eq!(Dialect::Asx.terminator(), b'>');
        assert_eq!(Dialect::Html.terminator(), b'>');
        assert_eq!(Dialect::B4s.terminator(), b'>');
    }
}
