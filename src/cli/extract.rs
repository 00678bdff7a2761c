use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use metademux::process::demux::{DemuxOptions, DemuxSummary, Demuxer};

use super::command::{Cli, ExtractArgs};
use crate::input::{InputReader, playlist_location};
use crate::output::EntryWriter;

pub fn cmd_extract(args: &ExtractArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    log::info!("Reading playlist: {}", args.input.display());

    let mut input = InputReader::new(&args.input)?;

    let mut options = DemuxOptions::default()
        .with_forced_dialect(args.source.dialect)
        .with_path_style(args.path_style.into())
        .with_max_record_len(args.max_record_len)
        .with_fail_level(super::fail_level(cli));
    options.location = playlist_location(&args.input, args.source.location.as_deref());
    if input.is_pipe() && options.location.is_none() {
        log::warn!("No playlist location for stdin input; relative references stay unresolved");
    }

    let demuxer = Demuxer::open(&mut input, &options)?;

    let mut writer = EntryWriter::create(args.output.as_deref(), args.format, args.start)?;
    if let Some(multi) = multi {
        let pb = multi.add(ProgressBar::new_spinner());
        pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb.set_message("Reading playlist...");
        writer = writer.with_progress(pb);
    }

    let summary = demuxer.run(&mut input, &mut writer)?;
    log::debug!("Wrote {} entries", writer.written());
    writer.finish()?;

    display_summary(&summary, input.bytes_read());
    Ok(())
}

fn display_summary(summary: &DemuxSummary, total_bytes: usize) {
    eprintln!();
    eprintln!("Extraction Summary");
    eprintln!("  Dialect                   {}", summary.dialect);
    eprintln!("  Size                      {total_bytes} bytes");
    eprintln!("  Records                   {}", summary.records);
    eprintln!("  Entries                   {}", summary.emitted);
    eprintln!("  Without reference         {}", summary.skipped);
    eprintln!("  Over-length               {}", summary.overflowed);
}
