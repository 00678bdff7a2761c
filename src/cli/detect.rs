use anyhow::Result;
use metademux::process::demux::{DemuxOptions, Demuxer};
use metademux::structs::dialect::{Detection, Dialect};

use super::command::DetectArgs;
use crate::input::{InputReader, playlist_location};

pub fn cmd_detect(args: &DetectArgs) -> Result<()> {
    log::info!("Detecting playlist dialect: {}", args.input.display());

    let mut input = InputReader::new(&args.input)?;

    let mut options = DemuxOptions::default().with_forced_dialect(args.source.dialect);
    options.location = playlist_location(&args.input, args.source.location.as_deref());

    let detection = Demuxer::detect(&mut input, &options)?;
    display_detection(&detection);
    Ok(())
}

fn signal(dialect: Option<Dialect>) -> String {
    dialect.map_or_else(|| "none".to_string(), |d| d.to_string())
}

fn display_detection(detection: &Detection) {
    println!("Playlist Dialect");
    println!("  Dialect                   {}", detection.dialect);
    println!("  Decided by                {}", detection.detected_by);
    println!("  Name says                 {}", signal(detection.by_name));
    println!("  Content says              {}", signal(detection.by_content));
}
