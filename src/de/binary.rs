use std::io::Read;

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, warn};

use super::inflate::inflate;
use crate::header::PcdHeader;
use crate::layout::{xyz_indices, RecordLayout};
use crate::{PcdError, PointCloud};

/// Decode a `binary` or `binary_compressed` payload into points.
///
/// The declared point count is reconciled against the bytes actually
/// present: a payload holding fewer whole records than declared decodes to
/// the truncated count, so partially-written capture files still render.
pub(crate) fn decode<R: Read>(
    mut reader: R,
    header: &PcdHeader,
    compressed: bool,
) -> Result<PointCloud, PcdError> {
    let layout = RecordLayout::resolve(header)?;
    let stride = layout.stride;

    // The declared uncompressed size is advisory: it may seed the point
    // count below, but record truncation is always measured against the
    // bytes we actually decompressed.
    let mut advisory_len = None;
    let raw = if compressed {
        let mut rest = Vec::new();
        reader.read_to_end(&mut rest)?;
        if rest.len() < 8 {
            return Err(PcdError::TruncatedPayload {
                expected: 8,
                available: rest.len(),
            });
        }
        let compressed_size = LittleEndian::read_u32(&rest[0..4]) as usize;
        let uncompressed_size = LittleEndian::read_u32(&rest[4..8]) as usize;
        if compressed_size > rest.len() - 8 {
            return Err(PcdError::TruncatedPayload {
                expected: compressed_size,
                available: rest.len() - 8,
            });
        }
        let out =
            inflate(&rest[8..8 + compressed_size]).ok_or(PcdError::DecompressionFailed)?;
        if uncompressed_size != 0 {
            if out.len() != uncompressed_size {
                warn!(
                    "decompressed {} bytes but header declared {uncompressed_size}",
                    out.len()
                );
            }
            advisory_len = Some(uncompressed_size);
        }
        out
    } else {
        // With a declared count, stop reading at the last whole record
        // instead of buffering trailing bytes the decode would discard.
        let mut rest = Vec::new();
        match header.point_count() {
            Some(n) => {
                let limit = n.saturating_mul(stride as u64);
                reader.take(limit).read_to_end(&mut rest)?;
            }
            None => {
                reader.read_to_end(&mut rest)?;
            }
        }
        rest
    };

    let available = raw.len() / stride;
    let mut count = match header.point_count() {
        Some(n) => n as usize,
        None => advisory_len.unwrap_or(raw.len()) / stride,
    };
    if count > available {
        if available == 0 {
            return Err(PcdError::NoBinaryData);
        }
        warn!("payload holds {available} whole records, expected {count}; decoding what is there");
        count = available;
    }
    if count == 0 {
        return Err(PcdError::NoBinaryData);
    }

    let names: Vec<String> = layout.columns.iter().map(|c| c.name.clone()).collect();
    let [xi, yi, zi] = xyz_indices(&names);
    let column = |i: usize| {
        layout
            .columns
            .get(i)
            .ok_or_else(|| PcdError::IncompleteLayout(format!("coordinate column {i} out of range")))
    };
    let (cx, cy, cz) = (column(xi)?, column(yi)?, column(zi)?);
    for col in [cx, cy, cz] {
        if col.count > 1 {
            // Only the first of the field's elements is the coordinate.
            debug!(
                "field '{}' carries {} elements, reading the first",
                col.name, col.count
            );
        }
    }

    let mut points = Vec::with_capacity(count);
    for record in raw[..count * stride].chunks_exact(stride) {
        let x = cx.scalar.read_f64(&record[cx.offset..]);
        let y = cy.scalar.read_f64(&record[cy.offset..]);
        let z = cz.scalar.read_f64(&record[cz.offset..]);
        if x.is_finite() && y.is_finite() && z.is_finite() {
            points.push([x, y, z]);
        }
    }

    if points.is_empty() {
        return Err(PcdError::EmptyPointCloud);
    }
    Ok(PointCloud { points })
}
