use std::io::Read;

use log::debug;

use crate::header::PcdHeader;
use crate::layout::xyz_indices;
use crate::{PcdError, PointCloud};

/// Decode an ASCII payload: one whitespace-delimited row per line.
///
/// Recovery policy: empty lines, `#` comments, short rows and rows whose
/// coordinates fail to parse are skipped, never fatal. Only a payload with
/// zero usable rows is an error.
pub(crate) fn decode<R: Read>(mut reader: R, header: &PcdHeader) -> Result<PointCloud, PcdError> {
    let mut rest = Vec::new();
    reader.read_to_end(&mut rest)?;
    let text = String::from_utf8_lossy(&rest);

    let [xi, yi, zi] = match header.fields() {
        Some(fields) => xyz_indices(fields),
        None => [0, 1, 2],
    };
    let needed = xi.max(yi).max(zi);

    let mut points = Vec::new();
    let mut skipped = 0usize;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() <= needed {
            skipped += 1;
            continue;
        }
        let (Ok(x), Ok(y), Ok(z)) = (
            tokens[xi].parse::<f64>(),
            tokens[yi].parse::<f64>(),
            tokens[zi].parse::<f64>(),
        ) else {
            skipped += 1;
            continue;
        };
        if x.is_finite() && y.is_finite() && z.is_finite() {
            points.push([x, y, z]);
        }
    }

    if skipped > 0 {
        debug!("skipped {skipped} malformed ascii rows");
    }
    if points.is_empty() {
        return Err(PcdError::EmptyPointCloud);
    }
    Ok(PointCloud { points })
}
