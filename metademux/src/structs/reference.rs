use std::borrow::Cow;

use crate::utils::entities;

/// An unresolved path or URL taken from one record.
///
/// Borrows from the record unless entity decoding had to rewrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'r> {
    bytes: Cow<'r, [u8]>,
}

impl<'r> Candidate<'r> {
    pub fn new(bytes: &'r [u8]) -> Self {
        Self {
            bytes: Cow::Borrowed(bytes),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Replaces the known XML character entities in place of the raw text.
    pub fn decode_entities(self) -> Self {
        Self {
            bytes: entities::decode(self.bytes),
        }
    }

    /// Candidate text. Valid UTF-8 is used as-is; anything else is read as
    /// Latin-1, one char per byte, so no byte is lost.
    pub fn to_text(&self) -> Cow<'_, str> {
        match std::str::from_utf8(&self.bytes) {
            Ok(text) => Cow::Borrowed(text),
            Err(_) => Cow::Owned(self.bytes.iter().copied().map(char::from).collect()),
        }
    }
}

impl AsRef<[u8]> for Candidate<'_> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// A resolved reference, ready for the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub location: String,
    /// Slot the entry occupies in the destination playlist.
    pub position: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_text_is_borrowed() {
        let candidate = Candidate::new("café.mp3".as_bytes());
        assert!(matches!(candidate.to_text(), Cow::Borrowed("café.mp3")));
    }

    #[test]
    fn non_utf8_text_keeps_every_byte() {
        let raw = b"caf\xe9 \x80.mp3";
        let candidate = Candidate::new(raw);
        let text = candidate.to_text();
        assert_eq!(text, "caf\u{e9} \u{80}.mp3");

        let back: Vec<u8> = text.chars().map(|c| c as u8).collect();
        assert_eq!(back, raw);
    }
}
