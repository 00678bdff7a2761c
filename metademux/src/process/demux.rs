use log::{debug, info, trace};

use crate::log_or_err;
use crate::process::detect::{Detector, PEEK_SIZE};
use crate::process::parse::Parser;
use crate::process::resolve::{PathStyle, Resolver};
use crate::process::split::Splitter;
use crate::structs::dialect::{Detection, Dialect};
use crate::structs::reference::{Candidate, Entry};
use crate::utils::errors::{DemuxError, DetectError};
use crate::utils::record_buffer::MAX_RECORD_LEN;
use crate::utils::sink::Sink;
use crate::utils::source::ByteSource;

/// Default number of bytes pulled from the source per read.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Settings for one demux run.
#[derive(Debug, Clone)]
pub struct DemuxOptions {
    /// Location of the playlist itself. Used for the extension check and as
    /// the base of relative references.
    pub location: Option<String>,
    /// Dialect forced by the caller, replacing the extension lookup.
    pub forced_dialect: Option<Dialect>,
    pub path_style: PathStyle,
    pub max_record_len: usize,
    pub chunk_size: usize,
    /// Recoverable conditions at or above this level abort the run.
    pub fail_level: log::Level,
}

impl Default for DemuxOptions {
    fn default() -> Self {
        Self {
            location: None,
            forced_dialect: None,
            path_style: PathStyle::Posix,
            max_record_len: MAX_RECORD_LEN,
            chunk_size: DEFAULT_CHUNK_SIZE,
            fail_level: log::Level::Error,
        }
    }
}

impl DemuxOptions {
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_forced_dialect(mut self, dialect: Option<Dialect>) -> Self {
        self.forced_dialect = dialect;
        self
    }

    pub fn with_path_style(mut self, style: PathStyle) -> Self {
        self.path_style = style;
        self
    }

    pub fn with_max_record_len(mut self, len: usize) -> Self {
        self.max_record_len = len.max(1);
        self
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Sets the failure level for recoverable conditions.
    ///
    /// - `log::Level::Error`: nothing recoverable is fatal (default)
    /// - `log::Level::Warn`: over-length records abort the run (strict mode)
    pub fn with_fail_level(mut self, level: log::Level) -> Self {
        self.fail_level = level;
        self
    }
}

/// Per-stream state owned by one [`Demuxer`].
#[derive(Debug)]
pub struct ParserState {
    pub dialect: Dialect,
    pub fail_level: log::Level,
    /// Position the next entry will take. Set from the sink's cursor on
    /// first use.
    pub next_position: Option<usize>,
    pub skipped: usize,
    pub emitted: usize,
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemuxSummary {
    pub dialect: Dialect,
    /// Records seen, over-length ones included.
    pub records: usize,
    /// Records without a reference.
    pub skipped: usize,
    /// Over-length records discarded.
    pub overflowed: usize,
    pub emitted: usize,
}

/// Drives detection, splitting, extraction and resolution for one playlist
/// stream and hands the resulting entries to a [`Sink`].
///
/// # Example
///
/// ```rust
/// use metademux::process::SAMPLE_M3U;
/// use metademux::process::demux::{DemuxOptions, Demuxer};
/// use metademux::structs::reference::Entry;
/// use metademux::utils::source::PeekReader;
///
/// let options = DemuxOptions::default().with_location("/a/b/list.m3u");
/// let mut source = PeekReader::new(SAMPLE_M3U);
/// let mut entries: Vec<Entry> = Vec::new();
///
/// let demuxer = Demuxer::open(&mut source, &options)?;
/// let summary = demuxer.run(&mut source, &mut entries)?;
///
/// assert_eq!(summary.emitted, 2);
/// assert_eq!(entries[0].location, "http://example.com/foo.mp3");
/// assert_eq!(entries[1].location, "/a/b/song.mp3");
/// assert_eq!(entries[1].position, 2);
/// # Ok::<(), metademux::utils::errors::DemuxError>(())
/// ```
#[derive(Debug)]
pub struct Demuxer {
    state: ParserState,
    splitter: Splitter,
    parser: Parser,
    resolver: Resolver,
    chunk_size: usize,
}

impl Demuxer {
    /// Creates a demuxer for a stream whose dialect is already known.
    pub fn new(dialect: Dialect, options: &DemuxOptions) -> Self {
        let resolver = match &options.location {
            Some(location) => Resolver::new(location, options.path_style),
            None => Resolver::detached(options.path_style),
        };

        Self {
            splitter: Splitter::new(dialect.terminator(), options.max_record_len),
            parser: Parser::new(dialect),
            resolver,
            chunk_size: options.chunk_size,
            state: ParserState {
                dialect,
                fail_level: options.fail_level,
                next_position: None,
                skipped: 0,
                emitted: 0,
            },
        }
    }

    /// Detects the dialect of `source` from its location and a peek at its
    /// first bytes, then creates a demuxer for it. Nothing is consumed.
    ///
    /// # Errors
    ///
    /// Fails if the peek fails or the stream cannot be classified.
    pub fn open<S>(source: &mut S, options: &DemuxOptions) -> Result<Self, DemuxError>
    where
        S: ByteSource + ?Sized,
    {
        let detection = Self::detect(source, options)?;
        Ok(Self::new(detection.dialect, options))
    }

    /// Runs dialect detection only.
    pub fn detect<S>(source: &mut S, options: &DemuxOptions) -> Result<Detection, DetectError>
    where
        S: ByteSource + ?Sized,
    {
        let peek = source.peek(PEEK_SIZE)?;
        Detector::with_forced(options.forced_dialect).detect(options.location.as_deref(), peek)
    }

    /// Feeds one chunk and emits every entry it completes.
    ///
    /// Returns the number of entries emitted for this chunk.
    pub fn push_bytes<K>(&mut self, data: &[u8], sink: &mut K) -> Result<usize, DemuxError>
    where
        K: Sink + ?Sized,
    {
        self.splitter.push_bytes(data);
        self.drain(sink)
    }

    /// Ends the stream, emits a trailing unterminated line if the dialect
    /// allows one, and reports the run.
    pub fn finish<K>(mut self, sink: &mut K) -> Result<DemuxSummary, DemuxError>
    where
        K: Sink + ?Sized,
    {
        self.splitter.finish();
        self.drain(sink)?;

        let summary = self.summary();
        info!(
            "Read {} {} entries from {} records ({} without reference, {} over-length)",
            summary.emitted,
            summary.dialect,
            summary.records,
            summary.skipped,
            summary.overflowed
        );
        Ok(summary)
    }

    /// Pulls `source` to exhaustion, emitting entries as records complete.
    ///
    /// # Errors
    ///
    /// A failing read or sink aborts the run. Entries already handed to the
    /// sink stay there.
    pub fn run<S, K>(mut self, source: &mut S, sink: &mut K) -> Result<DemuxSummary, DemuxError>
    where
        S: ByteSource + ?Sized,
        K: Sink + ?Sized,
    {
        let mut buffer = vec![0u8; self.chunk_size];
        loop {
            let read = source
                .read_chunk(&mut buffer)
                .map_err(|source| DemuxError::Io {
                    emitted: self.state.emitted,
                    source,
                })?;
            if read == 0 {
                break;
            }
            self.push_bytes(&buffer[..read], sink)?;
        }
        self.finish(sink)
    }

    pub fn summary(&self) -> DemuxSummary {
        DemuxSummary {
            dialect: self.state.dialect,
            records: self.splitter.records_seen(),
            skipped: self.state.skipped,
            overflowed: self.splitter.overflows(),
            emitted: self.state.emitted,
        }
    }

    fn drain<K>(&mut self, sink: &mut K) -> Result<usize, DemuxError>
    where
        K: Sink + ?Sized,
    {
        let mut emitted = 0;

        while let Some(result) = self.splitter.next() {
            let record = match result {
                Ok(record) => record,
                Err(err) => {
                    log_or_err!(self.state, log::Level::Warn, err);
                    continue;
                }
            };

            match self.parser.parse(&record) {
                Some(candidate) => {
                    Self::emit(&mut self.state, &self.resolver, &candidate, sink)?;
                    emitted += 1;
                }
                None => {
                    self.state.skipped += 1;
                    debug!("Record {} carries no reference", record.index);
                }
            }
        }

        Ok(emitted)
    }

    fn emit<K>(
        state: &mut ParserState,
        resolver: &Resolver,
        candidate: &Candidate<'_>,
        sink: &mut K,
    ) -> Result<(), DemuxError>
    where
        K: Sink + ?Sized,
    {
        let position = *state.next_position.get_or_insert_with(|| sink.cursor() + 1);
        let text = candidate.to_text();
        let location = resolver.resolve(&text).into_owned();

        trace!("Entry {position}: {location}");
        sink.add(Entry { location, position })
            .map_err(|source| DemuxError::Sink { position, source })?;

        state.next_position = Some(position + 1);
        state.emitted += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::utils::source::PeekReader;

    fn demux_with(input: &[u8], options: &DemuxOptions) -> Result<Vec<Entry>, DemuxError> {
        let mut source = PeekReader::new(input);
        let mut entries = Vec::new();
        Demuxer::open(&mut source, options)?.run(&mut source, &mut entries)?;
        Ok(entries)
    }

    fn locations(input: &[u8], location: &str) -> Result<Vec<String>, DemuxError> {
        let options = DemuxOptions::default().with_location(location);
        let entries = demux_with(input, &options)?;
        Ok(entries.into_iter().map(|entry| entry.location).collect())
    }

    #[test]
    fn m3u_end_to_end() -> anyhow::Result<()> {
        let input = b"http://example.com/foo.mp3\n#EXTINF:1\nsong.mp3\n";
        assert_eq!(
            locations(input, "/a/b/list.m3u")?,
            ["http://example.com/foo.mp3", "/a/b/song.mp3"]
        );
        Ok(())
    }

    #[test]
    fn pls_end_to_end() -> anyhow::Result<()> {
        let input = b"[playlist]\nFile1=http://a/b.mp3\nFile2=c.mp3\n";
        let options = DemuxOptions::default()
            .with_location("/a/b/list.m3u")
            .with_forced_dialect(Some(Dialect::Pls));
        let entries = demux_with(input, &options)?;
        let found: Vec<_> = entries.iter().map(|e| e.location.as_str()).collect();
        assert_eq!(found, ["http://a/b.mp3", "/a/b/c.mp3"]);

        assert_eq!(
            locations(input, "/a/b/list.pls")?,
            ["http://a/b.mp3", "/a/b/c.mp3"]
        );
        Ok(())
    }

    #[test]
    fn m3u_name_wins_over_pls_content() -> anyhow::Result<()> {
        let input = b"[playlist]\nFile1=http://a/b.mp3\nFile2=c.mp3\n";
        assert_eq!(
            locations(input, "/a/b/list.m3u")?,
            ["/a/b/[playlist]", "File1=http://a/b.mp3", "/a/b/File2=c.mp3"]
        );
        Ok(())
    }

    #[test]
    fn asx_end_to_end() -> anyhow::Result<()> {
        let input = b"<asx><entry><ref href=\"mms://server/stream\"/></entry></asx>";
        assert_eq!(locations(input, "/a/b/show.asx")?, ["mms://server/stream"]);
        Ok(())
    }

    #[test]
    fn b4s_end_to_end() -> anyhow::Result<()> {
        let input = b"<?xml version=\"1.0\" encoding='UTF-8' standalone=\"yes\"?>\n\
            <WinampXML><playlist num_entries=\"1\" label=\"x\">\n\
            <entry Playstring=\"http://a&apos;s/b\"><Name>b</Name></entry>\n\
            </playlist></WinampXML>\n";
        assert_eq!(locations(input, "/a/b/list.b4s")?, ["http://a's/b"]);
        Ok(())
    }

    #[test]
    fn html_end_to_end() -> anyhow::Result<()> {
        let input = b"<html><body><object>\n\
            <param name=\"FileName\" value=\"http://media.example/clip.asf\">\n\
            <param name=\"AutoStart\" value=\"true\">\n\
            </object></body></html>";
        assert_eq!(
            locations(input, "/pages/watch.php")?,
            ["http://media.example/clip.asf"]
        );
        Ok(())
    }

    #[test]
    fn output_does_not_depend_on_chunk_size() -> anyhow::Result<()> {
        let input = b"#EXTM3U\r\n#EXTINF:10,One\r\none.mp3\r\n\r\nhttp://h/two.mp3\r\nthree.ogg";
        let base = DemuxOptions::default().with_location("/m/list.m3u");
        let whole = demux_with(input, &base)?;
        assert_eq!(whole.len(), 3);
        assert_eq!(whole[2].location, "/m/three.ogg");

        for chunk in [1, 2, 3, 7, 64] {
            let options = base.clone().with_chunk_size(chunk);
            assert_eq!(demux_with(input, &options)?, whole, "chunk size {chunk}");
        }
        Ok(())
    }

    #[test]
    fn positions_follow_sink_cursor_and_skip_nothing() -> anyhow::Result<()> {
        let input = b"a.mp3\n#skip\n\nb.mp3\n";
        let options = DemuxOptions::default().with_location("/l/x.m3u");
        let mut source = PeekReader::new(&input[..]);
        let mut entries = vec![Entry {
            location: "/l/x.m3u".into(),
            position: 7,
        }];

        let summary = Demuxer::open(&mut source, &options)?.run(&mut source, &mut entries)?;

        let positions: Vec<_> = entries.iter().map(|entry| entry.position).collect();
        assert_eq!(positions, [7, 8, 9]);
        assert_eq!(
            summary,
            DemuxSummary {
                dialect: Dialect::M3u,
                records: 3,
                skipped: 1,
                overflowed: 0,
                emitted: 2,
            }
        );
        Ok(())
    }

    #[test]
    fn overflow_record_is_skipped_by_default() -> anyhow::Result<()> {
        let mut input = vec![b'x'; 9];
        input.extend_from_slice(b"\nok.mp3\n");
        let options = DemuxOptions::default()
            .with_location("/d/l.m3u")
            .with_max_record_len(8);

        let entries = demux_with(&input, &options)?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].location, "/d/ok.mp3");
        assert_eq!(entries[0].position, 1);
        Ok(())
    }

    #[test]
    fn strict_mode_rejects_overflow_record() {
        let mut input = vec![b'x'; 9];
        input.extend_from_slice(b"\nok.mp3\n");
        let options = DemuxOptions::default()
            .with_location("/d/l.m3u")
            .with_max_record_len(8)
            .with_fail_level(log::Level::Warn);

        assert!(matches!(
            demux_with(&input, &options),
            Err(DemuxError::Strict(_))
        ));
    }

    #[test]
    fn unclassified_stream_emits_nothing() {
        let mut source = PeekReader::new(&b"just some text that is no playlist"[..]);
        let options = DemuxOptions::default().with_location("/d/notes.txt");
        let result = Demuxer::open(&mut source, &options);
        assert!(matches!(
            result,
            Err(DemuxError::Detect(DetectError::Unclassified))
        ));
    }

    #[test]
    fn forced_dialect_without_location() -> anyhow::Result<()> {
        let options = DemuxOptions::default().with_forced_dialect(Some(Dialect::M3u));
        let entries = demux_with(b"relative.mp3\n", &options)?;
        assert_eq!(entries[0].location, "relative.mp3");
        Ok(())
    }

    #[test]
    fn location_without_directory() -> anyhow::Result<()> {
        assert_eq!(locations(b"song.mp3\n", "list.m3u")?, ["/song.mp3"]);

        let options = DemuxOptions::default()
            .with_location("list.m3u")
            .with_path_style(PathStyle::Windows);
        let entries = demux_with(b"song.mp3\n", &options)?;
        assert_eq!(entries[0].location, "song.mp3");
        Ok(())
    }

    #[test]
    fn latin1_reference_is_not_mangled() -> anyhow::Result<()> {
        let found = locations(b"caf\xe9.mp3\n", "/a/b/list.m3u")?;
        assert_eq!(found, ["/a/b/caf\u{e9}.mp3"]);
        assert!(!found[0].contains('\u{fffd}'));
        Ok(())
    }

    #[test]
    fn windows_style_resolution() -> anyhow::Result<()> {
        let options = DemuxOptions::default()
            .with_location("C:\\lists\\mix.pls")
            .with_path_style(PathStyle::Windows);
        let input = b"[playlist]\r\nFile1=D:\\a.mp3\r\nFile2=b.mp3\r\n";
        let entries = demux_with(input, &options)?;
        let found: Vec<_> = entries.iter().map(|e| e.location.as_str()).collect();
        assert_eq!(found, ["D:\\a.mp3", "C:\\lists\\b.mp3"]);
        Ok(())
    }

    /// Yields `data`, then fails.
    struct Broken<'a> {
        data: &'a [u8],
    }

    impl ByteSource for Broken<'_> {
        fn peek(&mut self, len: usize) -> io::Result<&[u8]> {
            Ok(&self.data[..len.min(self.data.len())])
        }

        fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "gone"));
            }
            let n = buf.len().min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn upstream_failure_keeps_emitted_entries() {
        let mut source = Broken {
            data: b"one.mp3\ntwo.mp3\nthr",
        };
        let options = DemuxOptions::default().with_location("/x/l.m3u");
        let mut entries = Vec::new();

        let result = Demuxer::open(&mut source, &options)
            .and_then(|demuxer| demuxer.run(&mut source, &mut entries));

        assert!(matches!(result, Err(DemuxError::Io { emitted: 2, .. })));
        assert_eq!(entries.len(), 2);
    }

    /// Accepts `capacity` entries, then refuses.
    struct Full {
        entries: Vec<Entry>,
        capacity: usize,
    }

    impl Sink for Full {
        fn cursor(&self) -> usize {
            0
        }

        fn add(&mut self, entry: Entry) -> anyhow::Result<()> {
            if self.entries.len() == self.capacity {
                anyhow::bail!("playlist full");
            }
            self.entries.push(entry);
            Ok(())
        }
    }

    #[test]
    fn sink_failure_aborts_run() {
        let mut source = PeekReader::new(&b"a\nb\nc\n"[..]);
        let options = DemuxOptions::default().with_location("/l.m3u");
        let mut sink = Full {
            entries: Vec::new(),
            capacity: 1,
        };

        let result = Demuxer::open(&mut source, &options)
            .and_then(|demuxer| demuxer.run(&mut source, &mut sink));

        assert!(matches!(result, Err(DemuxError::Sink { position: 2, .. })));
        assert_eq!(sink.entries.len(), 1);
    }

    #[test]
    fn host_driven_chunks() -> anyhow::Result<()> {
        let options = DemuxOptions::default().with_location("/r/list.asx");
        let mut demuxer = Demuxer::new(Dialect::Asx, &options);
        let mut entries = Vec::new();

        assert_eq!(demuxer.push_bytes(b"<asx><entry><ref hre", &mut entries)?, 0);
        assert_eq!(
            demuxer.push_bytes(b"f=\"http://h/a.asf\"/><ref href=\"x\"/>", &mut entries)?,
            1
        );
        let summary = demuxer.finish(&mut entries)?;

        assert_eq!(summary.emitted, 1);
        assert_eq!(entries[0].location, "http://h/a.asf");
        Ok(())
    }
}
