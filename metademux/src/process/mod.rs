/// Dialect detection from a playlist's name and first bytes.
///
/// Provides the [`Detector`](detect::Detector).
pub mod detect;

/// Record splitting of a chunked byte stream.
///
/// Provides the [`Splitter`](split::Splitter), which turns arbitrary chunks
/// into bounded [`Record`](crate::structs::record::Record)s.
pub mod split;

/// Reference extraction, one [`Strategy`](parse::Strategy) per dialect.
///
/// Provides the [`Parser`](parse::Parser).
pub mod parse;

/// Resolution of relative references against the playlist location.
///
/// Provides the [`Resolver`](resolve::Resolver) and [`PathStyle`](resolve::PathStyle).
pub mod resolve;

/// The pipeline driver.
///
/// Provides the [`Demuxer`](demux::Demuxer), which runs detection, splitting,
/// extraction and resolution and hands [`Entry`](crate::structs::reference::Entry)
/// values to a [`Sink`](crate::utils::sink::Sink).
pub mod demux;

/// A small extended M3U playlist, used in examples.
pub const SAMPLE_M3U: &[u8] = b"http://example.com/foo.mp3\n#EXTINF:1\nsong.mp3\n";
