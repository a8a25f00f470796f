mod ascii;
mod binary;
mod inflate;

use std::io::BufRead;

use log::debug;

use crate::header::{DataMode, PcdHeader};
use crate::{PcdError, PointCloud};

/// Run the whole pipeline: header, layout, payload, point extraction.
/// Control flows strictly forward; every stage either feeds the next or
/// fails the decode.
pub(crate) fn decode<R: BufRead>(mut reader: R) -> Result<PointCloud, PcdError> {
    let header = PcdHeader::parse(&mut reader)?;
    debug!(
        "pcd header: mode {}, declared points {:?}",
        header.data_mode(),
        header.point_count()
    );

    match header.data_mode() {
        DataMode::Ascii => ascii::decode(reader, &header),
        DataMode::Binary => binary::decode(reader, &header, false),
        DataMode::BinaryCompressed => binary::decode(reader, &header, true),
    }
}
