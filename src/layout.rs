use log::debug;

use crate::header::{FieldKind, PcdHeader, ScalarType};
use crate::PcdError;

/// One field of a fixed-stride binary record.
#[derive(Debug, Clone)]
pub(crate) struct Column {
    pub name: String,
    pub offset: usize,
    pub scalar: ScalarType,
    pub count: usize,
}

/// Byte layout of one binary point record, derived from the parallel
/// `FIELDS`/`SIZE`/`TYPE`/`COUNT` directives. Only the binary modes need
/// this; ASCII decoding works from field names alone.
#[derive(Debug, Clone)]
pub(crate) struct RecordLayout {
    pub stride: usize,
    pub columns: Vec<Column>,
}

impl RecordLayout {
    pub fn resolve(header: &PcdHeader) -> Result<Self, PcdError> {
        let fields = header
            .fields()
            .ok_or_else(|| PcdError::IncompleteLayout("missing FIELDS".into()))?;
        let sizes = header
            .sizes()
            .ok_or_else(|| PcdError::IncompleteLayout("missing or invalid SIZE".into()))?;
        let types = header
            .types()
            .ok_or_else(|| PcdError::IncompleteLayout("missing TYPE".into()))?;

        if sizes.len() != fields.len() {
            return Err(PcdError::IncompleteLayout(format!(
                "SIZE lists {} entries for {} fields",
                sizes.len(),
                fields.len()
            )));
        }
        if types.len() != fields.len() {
            return Err(PcdError::IncompleteLayout(format!(
                "TYPE lists {} entries for {} fields",
                types.len(),
                fields.len()
            )));
        }
        let counts = match header.counts() {
            Some(counts) if counts.len() != fields.len() => {
                return Err(PcdError::IncompleteLayout(format!(
                    "COUNT lists {} entries for {} fields",
                    counts.len(),
                    fields.len()
                )));
            }
            Some(counts) => counts.to_vec(),
            None => vec![1; fields.len()],
        };

        let mut columns = Vec::with_capacity(fields.len());
        let mut offset = 0usize;
        for (i, name) in fields.iter().enumerate() {
            let scalar = FieldKind::parse(&types[i])
                .and_then(|kind| ScalarType::resolve(kind, sizes[i]))
                .ok_or(PcdError::UnsupportedFieldType {
                    kind: types[i]
                        .chars()
                        .next()
                        .unwrap_or('?')
                        .to_ascii_uppercase(),
                    size: sizes[i],
                })?;
            columns.push(Column {
                name: name.clone(),
                offset,
                scalar,
                count: counts[i] as usize,
            });
            offset = scalar
                .size_bytes()
                .checked_mul(counts[i] as usize)
                .and_then(|span| offset.checked_add(span))
                .ok_or_else(|| {
                    PcdError::IncompleteLayout(format!(
                        "field '{name}' overflows the record stride"
                    ))
                })?;
        }

        if offset == 0 {
            return Err(PcdError::IncompleteLayout("zero-length record".into()));
        }

        Ok(RecordLayout {
            stride: offset,
            columns,
        })
    }
}

/// Column indices holding x, y and z, by case-insensitive name match.
/// A name that is missing falls back to its positional column (0, 1, 2):
/// some producers omit the canonical names, and rendering a best-effort
/// cloud beats rejecting the file.
pub(crate) fn xyz_indices(fields: &[String]) -> [usize; 3] {
    let find = |name: &str, fallback: usize| {
        fields
            .iter()
            .position(|f| f.eq_ignore_ascii_case(name))
            .unwrap_or_else(|| {
                debug!("no '{name}' field declared, using column {fallback}");
                fallback
            })
    };
    [find("x", 0), find("y", 1), find("z", 2)]
}
