/// One terminator-delimited unit of playlist input: a line for M3U/PLS, a
/// `>`-delimited tag fragment for the markup dialects.
///
/// The terminator is not part of the data. Records are never empty and never
/// longer than the splitter's configured limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Zero-based ordinal among all records of the stream, discarded
    /// overflow records included.
    pub index: usize,
    pub data: Vec<u8>,
}

impl AsRef<[u8]> for Record {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl Record {
    /// Record body with leading spaces, tabs, CRs and LFs removed.
    pub fn trimmed(&self) -> &[u8] {
        let start = self
            .data
            .iter()
            .position(|b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
            .unwrap_or(self.data.len());
        &self.data[start..]
    }
}
