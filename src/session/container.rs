//! `mozLz40` container framing.
//!
//! Firefox keeps its session store backups as a fixed 8 byte magic, a
//! little-endian `u32` holding the uncompressed size, and a single raw LZ4
//! block (no frame header, no checksum).
//!
//! ```text
//! +----------+------------+---------------------+
//! | mozLz40\0| size (u32) | LZ4 block ...       |
//! +----------+------------+---------------------+
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use super::error::{FormatError, HeaderBytes, Result};

/// Magic bytes opening every container.
pub const MAGIC: &[u8; 8] = b"mozLz40\0";

/// Magic plus size hint.
pub const HEADER_LEN: usize = MAGIC.len() + 4;

/// Read and decompress a container file.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading session container");
    let raw = fs::read(path)?;
    decode(&raw)
}

/// Decompress an in-memory container.
///
/// Fails with [`FormatError`] when the magic is wrong, the header is cut
/// short, or the block yields a different size than the header promised.
pub fn decode(raw: &[u8]) -> Result<Vec<u8>> {
    if raw.len() < HEADER_LEN {
        // Still report a foreign file as such, even when it is tiny.
        if !MAGIC.starts_with(raw) {
            return Err(bad_magic(raw).into());
        }
        return Err(FormatError::Truncated {
            length: raw.len(),
            minimum: HEADER_LEN,
        }
        .into());
    }

    let (magic, rest) = raw.split_at(MAGIC.len());
    if magic != MAGIC {
        return Err(bad_magic(raw).into());
    }

    let (size, block) = rest.split_at(4);
    let expected = u32::from_le_bytes([size[0], size[1], size[2], size[3]]) as usize;
    debug!(expected, compressed = block.len(), "decompressing session block");

    let plain = lz4_flex::block::decompress(block, expected)?;
    if plain.len() != expected {
        return Err(FormatError::SizeMismatch {
            expected,
            actual: plain.len(),
        }
        .into());
    }

    Ok(plain)
}

/// Compress bytes into a container.
pub fn encode(plain: &[u8]) -> Vec<u8> {
    let block = lz4_flex::block::compress(plain);
    let mut out = Vec::with_capacity(HEADER_LEN + block.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&(plain.len() as u32).to_le_bytes());
    out.extend_from_slice(&block);
    out
}

/// Compress bytes and write them as a container file.
pub fn write<P: AsRef<Path>>(path: P, plain: &[u8]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), size = plain.len(), "writing session container");
    fs::write(path, encode(plain))?;
    Ok(())
}

fn bad_magic(raw: &[u8]) -> FormatError {
    FormatError::BadMagic {
        found: HeaderBytes(raw.iter().take(MAGIC.len()).copied().collect()),
    }
}
