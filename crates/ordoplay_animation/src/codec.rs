// SPDX-License-Identifier: MIT OR Apache-2.0
//! Binary persistence of the controller's track list.
//!
//! Layout: a variable-length count followed by fixed 21-byte little-endian
//! records `{ u32 hash, u8 group, f32 speed, f32 target, f32 fade, f32 autofade }`.
//! The count uses 7 bits per byte with the high bit as continuation; the fourth
//! byte carries 8 bits, so at most 29 bits are representable.

use crate::track::AnimationTrack;
use bincode::Options;
use thiserror::Error;

/// Size of one encoded track record in bytes
pub const TRACK_RECORD_SIZE: usize = 4 + 1 + 4 * 4;

/// Largest count the variable-length prefix can hold
pub const MAX_VLE_VALUE: usize = 0x1FFF_FFFF;

/// Track codec errors
#[derive(Debug, Error)]
pub enum TrackCodecError {
    /// Buffer ended before all records were read
    #[error("Track buffer truncated: expected {expected} bytes, found {found}")]
    Truncated {
        /// Bytes required
        expected: usize,
        /// Bytes available
        found: usize,
    },

    /// Count does not fit in the variable-length prefix
    #[error("Track count {0} exceeds the variable-length limit")]
    VleOverflow(usize),

    /// Record (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, TrackCodecError>;

fn record_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
}

fn write_vle(buf: &mut Vec<u8>, value: usize) -> Result<()> {
    if value > MAX_VLE_VALUE {
        return Err(TrackCodecError::VleOverflow(value));
    }

    let value = value as u32;
    if value < 0x80 {
        buf.push(value as u8);
    } else if value < 0x4000 {
        buf.extend_from_slice(&[(value | 0x80) as u8, (value >> 7) as u8]);
    } else if value < 0x20_0000 {
        buf.extend_from_slice(&[
            (value | 0x80) as u8,
            ((value >> 7) | 0x80) as u8,
            (value >> 14) as u8,
        ]);
    } else {
        buf.extend_from_slice(&[
            (value | 0x80) as u8,
            ((value >> 7) | 0x80) as u8,
            ((value >> 14) | 0x80) as u8,
            (value >> 21) as u8,
        ]);
    }
    Ok(())
}

/// Returns the decoded value and the number of bytes consumed
fn read_vle(bytes: &[u8]) -> Result<(usize, usize)> {
    let mut value = 0usize;
    for (i, &byte) in bytes.iter().take(4).enumerate() {
        if i == 3 {
            value |= usize::from(byte) << 21;
            return Ok((value, 4));
        }
        value |= usize::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(TrackCodecError::Truncated {
        expected: bytes.len() + 1,
        found: bytes.len(),
    })
}

/// Encode a track list
pub fn encode_tracks(tracks: &[AnimationTrack]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(tracks.len().saturating_mul(TRACK_RECORD_SIZE).saturating_add(4));
    write_vle(&mut buf, tracks.len())?;

    for track in tracks {
        record_options().serialize_into(&mut buf, track)?;
    }
    Ok(buf)
}

/// Decode a track list. Trailing bytes after the last record are ignored.
pub fn decode_tracks(bytes: &[u8]) -> Result<Vec<AnimationTrack>> {
    let (count, header) = read_vle(bytes)?;
    let mut reader = &bytes[header..];

    let expected = count
        .checked_mul(TRACK_RECORD_SIZE)
        .and_then(|size| size.checked_add(header));
    match expected {
        Some(expected) if expected <= bytes.len() => {}
        _ => {
            return Err(TrackCodecError::Truncated {
                expected: expected.unwrap_or(usize::MAX),
                found: bytes.len(),
            });
        }
    }

    let mut tracks = Vec::with_capacity(count);
    for _ in 0..count {
        tracks.push(record_options().deserialize_from(&mut reader)?);
    }
    Ok(tracks)
}
