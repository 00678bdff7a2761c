use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use metademux::utils::source::{ByteSource, PeekReader};

/// Playlist input from a file or stdin, with a peek window for detection.
pub struct InputReader {
    reader: PeekReader<Box<dyn Read>>,
    is_pipe: bool,
    bytes_read: usize,
}

impl InputReader {
    /// Create a new InputReader from a path
    /// Use "-" for stdin pipe input
    pub fn new<P: AsRef<Path>>(input_path: P) -> Result<Self> {
        let path = input_path.as_ref();
        let is_pipe = path.as_os_str() == "-";

        let reader: Box<dyn Read> = if is_pipe {
            Box::new(io::stdin().lock())
        } else {
            let file = File::open(path)
                .with_context(|| format!("cannot open playlist {}", path.display()))?;
            Box::new(BufReader::new(file))
        };

        Ok(Self {
            reader: PeekReader::new(reader),
            is_pipe,
            bytes_read: 0,
        })
    }

    #[cfg(test)]
    pub fn from_reader(reader: impl Read + 'static) -> Self {
        Self {
            reader: PeekReader::new(Box::new(reader)),
            is_pipe: true,
            bytes_read: 0,
        }
    }

    /// Check if this is pipe input
    pub fn is_pipe(&self) -> bool {
        self.is_pipe
    }

    /// Bytes consumed so far, not counting peeks.
    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }
}

impl ByteSource for InputReader {
    fn peek(&mut self, len: usize) -> io::Result<&[u8]> {
        self.reader.peek(len)
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.reader.read_chunk(buf)?;
        self.bytes_read += read;
        Ok(read)
    }
}

/// Location used for detection and resolution: the explicit one if given,
/// otherwise the input path. Stdin without `--location` has none.
pub fn playlist_location(input_path: &Path, explicit: Option<&str>) -> Option<String> {
    match explicit {
        Some(location) => Some(location.to_string()),
        None if input_path.as_os_str() == "-" => None,
        None => Some(input_path.to_string_lossy().into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_then_read_sees_every_byte() -> Result<()> {
        let mut input = InputReader::from_reader(&b"[playlist]\nFile1=a.mp3\n"[..]);
        assert_eq!(input.peek(10)?, b"[playlist]");

        let mut buf = [0u8; 64];
        let mut data = Vec::new();
        loop {
            let read = input.read_chunk(&mut buf)?;
            if read == 0 {
                break;
            }
            data.extend_from_slice(&buf[..read]);
        }
        assert_eq!(data, b"[playlist]\nFile1=a.mp3\n");
        assert_eq!(input.bytes_read(), data.len());
        Ok(())
    }

    #[test]
    fn location_defaults_to_input_path() {
        let path = Path::new("/music/list.m3u");
        assert_eq!(
            playlist_location(path, None).as_deref(),
            Some("/music/list.m3u")
        );
        assert_eq!(
            playlist_location(path, Some("http://host/list.pls")).as_deref(),
            Some("http://host/list.pls")
        );
        assert_eq!(playlist_location(Path::new("-"), None), None);
    }
}
