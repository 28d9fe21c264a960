//! Wire encoding of designs.
//!
//! A compacted design goes out as JSON, optionally pretty-printed and
//! optionally gzipped. Raw designs come in the same way; gzip input is
//! recognized by its magic bytes.

use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
};

use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use log::{debug, trace};
use tempfile::NamedTempFile;

use layoutdb_core::design::RawDesign;
use layoutdb_graph::CompactDesign;

use crate::{config::OutputConfig, error::LayoutDbError};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Encodes a compacted design to bytes.
///
/// # Errors
///
/// Returns [`LayoutDbError::Encode`] if serialization fails and
/// [`LayoutDbError::Io`] if the gzip stream cannot be finished.
pub fn encode(design: &CompactDesign, output: &OutputConfig) -> Result<Vec<u8>, LayoutDbError> {
    let bytes = if output.compress() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        write_json(&mut encoder, design, output.pretty())?;
        encoder.finish()?
    } else {
        let mut bytes = Vec::new();
        write_json(&mut bytes, design, output.pretty())?;
        bytes
    };

    debug!(
        bytes = bytes.len(),
        compress = output.compress(),
        pretty = output.pretty();
        "Design encoded"
    );
    Ok(bytes)
}

fn write_json<W: Write>(
    writer: &mut W,
    design: &CompactDesign,
    pretty: bool,
) -> Result<(), LayoutDbError> {
    let result = if pretty {
        serde_json::to_writer_pretty(&mut *writer, design)
    } else {
        serde_json::to_writer(&mut *writer, design)
    };
    result.map_err(LayoutDbError::Encode)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Decodes a raw design from JSON bytes, gunzipping first if needed.
///
/// # Errors
///
/// Returns [`LayoutDbError::Io`] for a broken gzip stream and
/// [`LayoutDbError::Input`] if the JSON does not describe a raw design.
pub fn decode_raw(bytes: &[u8]) -> Result<RawDesign, LayoutDbError> {
    if bytes.starts_with(&GZIP_MAGIC) {
        trace!(bytes = bytes.len(); "Decompressing gzip input");
        let mut json = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut json)?;
        return serde_json::from_slice(&json).map_err(LayoutDbError::Input);
    }
    serde_json::from_slice(bytes).map_err(LayoutDbError::Input)
}

/// Writes `bytes` to `path` through a temporary file in the same directory,
/// so readers never observe a partly written file.
///
/// # Errors
///
/// Returns [`LayoutDbError::Io`] if the temporary file cannot be created,
/// written or moved into place.
pub fn write_atomic(path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), LayoutDbError> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(path).map_err(io::Error::from)?;

    debug!(path = path.display().to_string(), bytes = bytes.len(); "Output written");
    Ok(())
}
