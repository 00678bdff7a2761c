//! Decoding of the small fixed set of XML character entities found in B4S
//! playlists.
//!
//! Only the six entities below are recognized, each exactly six bytes long, matched ignoring ASCII
//! case. Anything else starting with `&` is copied through untouched.

use std::borrow::Cow;

const ENTITY_LEN: usize = 6;

const ENTITIES: [(&[u8; ENTITY_LEN], char); 6] = [
    (b"&#xe0;", 'à'),
    (b"&#xe9;", 'é'),
    (b"&#xee;", 'î'),
    (b"&apos;", '\''),
    (b"&#xe8;", 'è'),
    (b"&#xea;", 'ê'),
];

fn lookup(bytes: &[u8]) -> Option<char> {
    let head = bytes.get(..ENTITY_LEN)?;
    ENTITIES
        .iter()
        .find(|(entity, _)| head.eq_ignore_ascii_case(&entity[..]))
        .map(|&(_, c)| c)
}

/// Replaces every recognized entity with its character, UTF-8 encoded.
///
/// The output is never longer than the input. Input without any `&` is
/// returned as-is.
pub fn decode(input: Cow<'_, [u8]>) -> Cow<'_, [u8]> {
    if !input.contains(&b'&') {
        return input;
    }

    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let byte = input[i];
        if byte == b'&' {
            if let Some(c) = lookup(&input[i..]) {
                let mut utf8 = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                i += ENTITY_LEN;
                continue;
            }
        }
        out.push(byte);
        i += 1;
    }

    Cow::Owned(out)
}
