use std::fmt::Debug;

use crate::structs::dialect::Dialect;
use crate::structs::record::Record;
use crate::structs::reference::Candidate;
use crate::utils::scan::{Scanner, starts_with_ignore_case};

/// Schemes an ASX `<ref href=...>` must start with to be accepted.
const ASX_SCHEMES: [&[u8]; 5] = [b"mms://", b"mmsu://", b"mmst://", b"http://", b"file://"];

/// Pulls at most one candidate reference out of a record.
///
/// Implementations receive the record with leading whitespace already
/// trimmed and return `None` for anything that is not a reference.
pub trait Strategy: Debug + Sync {
    fn extract<'r>(&self, record: &'r [u8]) -> Option<Candidate<'r>>;
}

/// Every non-comment line is a reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct M3uStrategy;

impl Strategy for M3uStrategy {
    fn extract<'r>(&self, record: &'r [u8]) -> Option<Candidate<'r>> {
        // comments and #EXT directives
        if record.first() == Some(&b'#') {
            return None;
        }
        Some(Candidate::new(record))
    }
}

/// Shoutcast style `FileN=<reference>` lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlsStrategy;

impl Strategy for PlsStrategy {
    fn extract<'r>(&self, record: &'r [u8]) -> Option<Candidate<'r>> {
        const KEY: &[u8] = b"File";

        if !starts_with_ignore_case(record, KEY) {
            return None;
        }
        let mut scanner = Scanner::new(record);
        scanner.advance(KEY.len())?;
        scanner.seek_byte(b'=')?;
        scanner.advance(1)?;
        Some(Candidate::new(scanner.rest()))
    }
}

/// `<ref href="scheme://...">` fragments of Windows Media metafiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsxStrategy;

impl Strategy for AsxStrategy {
    fn extract<'r>(&self, record: &'r [u8]) -> Option<Candidate<'r>> {
        let mut scanner = Scanner::new(record);
        scanner.seek(b"ref")?;
        scanner.seek(b"href")?;
        scanner.seek_any(&ASX_SCHEMES)?;
        scanner.take_until(b'"').map(Candidate::new)
    }
}

/// `<param name="filename" value="http://...">` of pages embedding a player.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlStrategy;

impl Strategy for HtmlStrategy {
    fn extract<'r>(&self, record: &'r [u8]) -> Option<Candidate<'r>> {
        let mut scanner = Scanner::new(record);
        scanner.seek(b"param")?;
        scanner.seek(b"filename")?;
        scanner.seek(b"http://")?;
        scanner.take_until(b'"').map(Candidate::new)
    }
}

/// Winamp 3 `<entry Playstring="...">` elements, with XML entities decoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct B4sStrategy;

impl Strategy for B4sStrategy {
    fn extract<'r>(&self, record: &'r [u8]) -> Option<Candidate<'r>> {
        let mut scanner = Scanner::new(record);
        scanner.seek(b"Playstring")?;
        scanner.seek_byte(b'=')?;
        // '=' and the opening quote
        scanner.advance(2)?;
        let value = scanner.take_until(b'"')?;
        Some(Candidate::new(value).decode_entities())
    }
}

/// Returns the extraction strategy of a dialect.
pub fn strategy(dialect: Dialect) -> &'static dyn Strategy {
    match dialect {
        Dialect::M3u => &M3uStrategy,
        Dialect::Pls => &PlsStrategy,
        Dialect::Asx => &AsxStrategy,
        Dialect::Html => &HtmlStrategy,
        Dialect::B4s => &B4sStrategy,
    }
}

/// Turns records into candidate references using the strategy of one dialect.
#[derive(Debug, Clone, Copy)]
pub struct Parser {
    dialect: Dialect,
    strategy: &'static dyn Strategy,
}

impl Parser {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            strategy: strategy(dialect),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Extracts the candidate reference of a record, if it has one.
    ///
    /// Leading spaces, tabs, CRs and LFs are trimmed before the dialect's
    /// strategy runs. An empty candidate counts as no candidate.
    pub fn parse<'r>(&self, record: &'r Record) -> Option<Candidate<'r>> {
        self.strategy
            .extract(record.trimmed())
            .filter(|candidate| !candidate.is_empty())
    }
}
