use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use metademux::structs::reference::Entry;
use metademux::utils::sink::Sink;
use serde::Serialize;

use crate::cli::command::OutputFormat;

/// One YAML sequence item.
#[derive(Debug, Serialize)]
struct EntryRecord<'a> {
    position: usize,
    location: &'a str,
}

/// Writes entries as they arrive, either one location per line or as a
/// streamed YAML sequence.
pub struct EntryWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    cursor: usize,
    written: usize,
    pb: Option<ProgressBar>,
}

impl EntryWriter<Box<dyn Write>> {
    /// Opens `output`, or stdout when `None`.
    pub fn create(output: Option<&Path>, format: OutputFormat, start: usize) -> Result<Self> {
        let writer: Box<dyn Write> = match output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("cannot create {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(BufWriter::new(io::stdout().lock())),
        };
        Ok(Self::new(writer, format, start))
    }
}

impl<W: Write> EntryWriter<W> {
    pub fn new(writer: W, format: OutputFormat, start: usize) -> Self {
        Self {
            writer,
            format,
            cursor: start,
            written: 0,
            pb: None,
        }
    }

    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.pb = Some(pb);
        self
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes and returns the writer, clearing the progress spinner.
    pub fn finish(mut self) -> Result<W> {
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_entry(&mut self, entry: &Entry) -> Result<()> {
        match self.format {
            OutputFormat::Plain => writeln!(self.writer, "{}", entry.location)?,
            OutputFormat::Yaml => {
                let item = [EntryRecord {
                    position: entry.position,
                    location: &entry.location,
                }];
                self.writer
                    .write_all(serde_yaml_ng::to_string(&item)?.as_bytes())?;
            }
        }
        Ok(())
    }
}

impl<W: Write> Sink for EntryWriter<W> {
    fn cursor(&self) -> usize {
        self.cursor
    }

    fn add(&mut self, entry: Entry) -> Result<()> {
        self.write_entry(&entry)
            .with_context(|| format!("cannot write entry {}", entry.position))?;
        self.cursor = entry.position;
        self.written += 1;

        if self.written.is_multiple_of(100) {
            if let Some(ref pb) = self.pb {
                pb.set_message(format!("Reading playlist...       {}", self.written));
                pb.tick();
            }
        }
        Ok(())
    }
}
