//! The downstream side of the demuxer: the playlist receiving entries.

use crate::structs::reference::Entry;

/// Destination of resolved entries.
///
/// Entries arrive in strictly increasing position order, starting right after
/// [`Sink::cursor`]. No position is ever offered twice.
pub trait Sink {
    /// Position of the item being expanded. The first entry goes to
    /// `cursor() + 1`.
    fn cursor(&self) -> usize;

    /// Stores one entry. An error aborts the demux run.
    fn add(&mut self, entry: Entry) -> anyhow::Result<()>;
}

/// Collects entries in memory. The cursor is the position of the last entry,
/// or `0` when empty.
impl Sink for Vec<Entry> {
    fn cursor(&self) -> usize {
        self.last().map_or(0, |entry| entry.position)
    }

    fn add(&mut self, entry: Entry) -> anyhow::Result<()> {
        self.push(entry);
        Ok(())
    }
}

impl<K: Sink + ?Sized> Sink for &mut K {
    fn cursor(&self) -> usize {
        (**self).cursor()
    }

    fn add(&mut self, entry: Entry) -> anyhow::Result<()> {
        (**self).add(entry)
    }
}
