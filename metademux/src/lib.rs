#![doc = include_str!("../README.md")]
//!
//! ## Technical Overview
//!
//! Extracts media references from playlist documents whose dialect is not
//! known in advance, reading the document incrementally with bounded memory.
//!
//! ### Dialects
//!
//! | Dialect | Records split on | Reference taken from               |
//! |---------|------------------|------------------------------------|
//! | M3U     | `\n`             | every non-`#` line                 |
//! | PLS     | `\n`             | `FileN=<value>` lines              |
//! | ASX     | `>`              | `<ref href="scheme://...">`        |
//! | HTML    | `>`              | `<param name="filename" value=...>`|
//! | B4S     | `>`              | `<entry Playstring="...">`         |
//!
//! The markup dialects are read with a tolerant substring scanner, not an XML
//! or HTML parser.
//!
//! ### Memory
//!
//! A record longer than the configured limit (1024 bytes by default) is
//! dropped up to its next terminator, so memory use stays bounded by one
//! record plus one input chunk whatever the playlist size.
//!
//! ## Quick Start
//!
//! 1. Wrap the input in a [`utils::source::ByteSource`], e.g.
//!    [`utils::source::PeekReader`]
//! 2. Detect the dialect with [`process::demux::Demuxer::open`]
//! 3. Run it into any [`utils::sink::Sink`]
//!
//! ```rust
//! use metademux::process::demux::{DemuxOptions, Demuxer};
//! use metademux::structs::reference::Entry;
//! use metademux::utils::source::PeekReader;
//!
//! let playlist = b"[playlist]\nNumberOfEntries=2\nFile1=http://a/b.mp3\nFile2=c.mp3\n";
//! let options = DemuxOptions::default().with_location("/music/radio.pls");
//!
//! let mut source = PeekReader::new(&playlist[..]);
//! let mut entries: Vec<Entry> = Vec::new();
//! Demuxer::open(&mut source, &options)?.run(&mut source, &mut entries)?;
//!
//! let locations: Vec<_> = entries.iter().map(|e| e.location.as_str()).collect();
//! assert_eq!(locations, ["http://a/b.mp3", "/music/c.mp3"]);
//! # Ok::<(), metademux::utils::errors::DemuxError>(())
//! ```

/// Processing stages of a playlist stream.
///
/// 1. **Detection** ([`process::detect`]): picks the dialect from the name and
///    a content peek.
///
/// 2. **Splitting** ([`process::split`]): cuts chunks into bounded records.
///
/// 3. **Parsing** ([`process::parse`]): pulls a candidate reference out of a
///    record.
///
/// 4. **Resolution** ([`process::resolve`]): roots relative references at the
///    playlist's directory.
///
/// 5. **Demuxing** ([`process::demux`]): drives all of the above.
pub mod process;

/// Data structures passed between stages.
///
/// - **Dialects** ([`structs::dialect`]): supported playlist shapes
/// - **Records** ([`structs::record`]): one line or tag fragment
/// - **References** ([`structs::reference`]): candidates and resolved entries
pub mod structs;

/// Utility functions and supporting infrastructure.
///
/// - **Record Buffer** ([`utils::record_buffer`]): bounded accumulator
/// - **Scanning** ([`utils::scan`]): forward-only case-insensitive search
/// - **Entities** ([`utils::entities`]): fixed XML entity table
/// - **Source / Sink** ([`utils::source`], [`utils::sink`]): collaborator seams
/// - **Error Handling** ([`utils::errors`]): error types
pub mod utils;
