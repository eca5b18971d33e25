use std::io::{self, Write};

use serde::Serialize;

use crate::app::{GencodeResult, ProgressEvent, ProgressSink, TrackResult};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_gencode(result: &GencodeResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_track(result: &TrackResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

/// Prints progress events to stderr as they happen.
pub struct HumanOutput;

impl ProgressSink for HumanOutput {
    fn event(&self, event: ProgressEvent) {
        eprintln!("{}", event.message);
    }
}
