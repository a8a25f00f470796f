use std::io::Read;

use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use log::debug;
use lz4_flex::frame::FrameDecoder;

/// Decompress `data` through the fallback chain: zlib, then gzip, then an
/// lz4 frame, then raw deflate. First codec that accepts the buffer wins;
/// `None` means every codec rejected it.
///
/// Raw deflate goes last: it carries no header or checksum, so it is the
/// codec most likely to misread a foreign buffer.
pub(crate) fn inflate(data: &[u8]) -> Option<Vec<u8>> {
    if let Some(out) = read_all(ZlibDecoder::new(data)) {
        debug!("payload inflated as zlib");
        return Some(out);
    }
    if let Some(out) = read_all(GzDecoder::new(data)) {
        debug!("payload inflated as gzip");
        return Some(out);
    }
    if let Some(out) = read_all(FrameDecoder::new(data)) {
        debug!("payload inflated as lz4 frame");
        return Some(out);
    }
    if let Some(out) = read_all(DeflateDecoder::new(data)) {
        debug!("payload inflated as raw deflate");
        return Some(out);
    }
    None
}

fn read_all(mut decoder: impl Read) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).ok()?;
    Some(out)
}
