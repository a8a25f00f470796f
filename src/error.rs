use thiserror::Error;

/// Errors that can occur while decoding a PCD file.
///
/// Every variant is terminal for the current decode call; nothing is
/// retried internally. Malformed individual rows are skipped locally and
/// only surface as [`PcdError::EmptyPointCloud`] when no valid point
/// remains.
#[derive(Error, Debug)]
pub enum PcdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stream ended before a DATA line")]
    TruncatedHeader,

    #[error("incomplete header for binary parsing: {0}")]
    IncompleteLayout(String),

    #[error("unsupported field type: {kind} with size {size}")]
    UnsupportedFieldType { kind: char, size: u32 },

    #[error("compressed block declares {expected} bytes but only {available} are available")]
    TruncatedPayload { expected: usize, available: usize },

    #[error("payload rejected by every decompression codec")]
    DecompressionFailed,

    #[error("no binary point data available")]
    NoBinaryData,

    #[error("no points left after decoding")]
    EmptyPointCloud,
}
