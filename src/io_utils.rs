//! File and stream I/O for the pipeline.
//!
//! All reads and writes flow through this module:
//!
//! - **Input**: whole-file reads with `encoding_rs` decoding. An explicit
//!   `--input-encoding` decodes strictly; without one the file is tried as
//!   UTF-8 and falls back to windows-1252 with a warning.
//! - **stdin**: the `-` path convention routes the ledger through stdin.
//! - **Output**: plain text via `write_text`, and the pipe-delimited enriched
//!   file via a csv writer configured with `|` and no quoting.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, WINDOWS_1252};
use log::warn;

pub const LEDGER_DELIMITER: u8 = b'|';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

/// Maps an encoding label to a strict decoder. `None` keeps the default
/// behavior of UTF-8 with a windows-1252 fallback.
pub fn resolve_encoding(label: Option<&str>) -> Result<Option<&'static Encoding>> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .map(Some)
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'")),
        None => Ok(None),
    }
}

/// Reads the whole ledger (file or stdin for `-`) and splits it into lines.
/// A supplied encoding decodes strictly; otherwise invalid UTF-8 falls back
/// to windows-1252, which accepts any byte sequence.
pub fn read_input_lines(path: &Path, encoding: Option<&'static Encoding>) -> Result<Vec<String>> {
    let bytes = if is_dash(path) {
        let mut buffer = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buffer)
            .context("Reading from stdin")?;
        buffer
    } else {
        fs::read(path).with_context(|| format!("Reading input file {path:?}"))?
    };
    let text = match encoding {
        Some(encoding) => decode_bytes(&bytes, encoding)?,
        None => decode_with_fallback(&bytes, path),
    };
    Ok(text.lines().map(str::to_string).collect())
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

fn decode_with_fallback(bytes: &[u8], path: &Path) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            warn!("Input {path:?} is not valid UTF-8; decoding as windows-1252");
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}

/// Writes a fully rendered text artifact, creating parent directories first.
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, contents).with_context(|| format!("Writing output file {path:?}"))
}

/// Opens the pipe-delimited writer used for the enriched data file. Quoting
/// is disabled to match the ledger format; field values never contain the
/// delimiter by construction.
pub fn open_pipe_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
    ensure_parent_dir(path)?;
    let file = File::create(path).with_context(|| format!("Creating output file {path:?}"))?;
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(LEDGER_DELIMITER)
        .quote_style(QuoteStyle::Never);
    Ok(builder.from_writer(BufWriter::new(file)))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Creating output directory {parent:?}"))?;
    }
    Ok(())
}
