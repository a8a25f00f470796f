//! A resilient decoder for PCD (Point Cloud Data) scan files.
//!
//! PCD files carry a self-describing ASCII header that declares field
//! names, per-field byte widths, element types and repeat counts, followed
//! by a payload in one of three encodings: plain text, raw binary, or a
//! compressed binary block. This crate parses the header first and uses it
//! to reconstruct a flat array of 3D points, tolerating the kinds of damage
//! real capture files show: truncated payloads, missing directives,
//! non-canonical field names and rows with non-finite coordinates.
//!
//! # Example
//!
//! ```rust
//! let data = "\
//! FIELDS x y z
//! SIZE 4 4 4
//! TYPE F F F
//! COUNT 1 1 1
//! WIDTH 2
//! HEIGHT 1
//! POINTS 2
//! DATA ascii
//! 1.0 2.0 3.0
//! 4.0 5.0 6.0
//! ";
//!
//! let cloud = pcd_decode::from_slice(data.as_bytes()).unwrap();
//! assert_eq!(cloud.len(), 2);
//! assert_eq!(cloud.points[0], [1.0, 2.0, 3.0]);
//! ```
//!
//! The decoder is a pure, synchronous transformation from a byte source to
//! a point collection. It holds no state between calls, so independent
//! files may be decoded concurrently from any threads the host chooses.

mod de;
mod error;
mod header;
mod layout;

pub use error::PcdError;
pub use header::{DataMode, FieldKind, PcdHeader, ScalarType};

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Decoded point collection, in on-disk row order minus any rows dropped
/// for non-finite coordinates. Returned by value; holds no references into
/// the decoder's buffers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    pub points: Vec<[f64; 3]>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, [f64; 3]> {
        self.points.iter()
    }
}

impl IntoIterator for PointCloud {
    type Item = [f64; 3];
    type IntoIter = std::vec::IntoIter<[f64; 3]>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

/// Decode a PCD byte stream into a [`PointCloud`].
pub fn read_pcd<R: Read>(reader: R) -> Result<PointCloud, PcdError> {
    de::decode(BufReader::new(reader))
}

/// Decode a PCD file given its path.
pub fn read_pcd_file<P: AsRef<Path>>(path: P) -> Result<PointCloud, PcdError> {
    let file = File::open(path)?;
    de::decode(BufReader::new(file))
}

/// Decode a PCD document already held in memory.
pub fn from_slice(bytes: &[u8]) -> Result<PointCloud, PcdError> {
    de::decode(Cursor::new(bytes))
}
