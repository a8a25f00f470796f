//! Header grammar and layout resolution tests with real PCD documents.

use std::io::Cursor;

use pcd_decode::{DataMode, PcdError, PcdHeader};

#[test]
fn test_full_header() {
    let header_text = "\
FIELDS x y z rgb
SIZE 4 4 4 4
TYPE F F F U
COUNT 1 1 1 1
WIDTH 213
HEIGHT 1
POINTS 213
DATA ascii
";

    let mut cursor = Cursor::new(header_text);
    let header = PcdHeader::parse(&mut cursor).unwrap();

    assert_eq!(header.data_mode(), DataMode::Ascii);
    assert_eq!(header.fields().unwrap(), ["x", "y", "z", "rgb"]);
    assert_eq!(header.sizes().unwrap(), [4, 4, 4, 4]);
    assert_eq!(header.types().unwrap(), ["F", "F", "F", "U"]);
    assert_eq!(header.counts().unwrap(), [1, 1, 1, 1]);
    assert_eq!(header.width(), Some(213));
    assert_eq!(header.height(), Some(1));
    assert_eq!(header.point_count(), Some(213));
}

#[test]
fn test_directive_order_is_irrelevant() {
    let scrambled = "\
TYPE F F F
POINTS 1
SIZE 4 4 4
DATA ascii
1.0 2.0 3.0
";
    let canonical = "\
SIZE 4 4 4
TYPE F F F
POINTS 1
DATA ascii
1.0 2.0 3.0
";

    let a = pcd_decode::from_slice(scrambled.as_bytes()).unwrap();
    let b = pcd_decode::from_slice(canonical.as_bytes()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.points, vec![[1.0, 2.0, 3.0]]);
}

#[test]
fn test_field_singular_alias() {
    let mut cursor = Cursor::new("FIELD x y z\nDATA ascii\n");
    let header = PcdHeader::parse(&mut cursor).unwrap();
    assert_eq!(header.fields().unwrap(), ["x", "y", "z"]);
}

#[test]
fn test_header_without_data_line() {
    let result = pcd_decode::from_slice(b"FIELDS x y z\nSIZE 4 4 4\nTYPE F F F\n");
    assert!(matches!(result, Err(PcdError::TruncatedHeader)));
}

#[test]
fn test_empty_input() {
    let result = pcd_decode::from_slice(b"");
    assert!(matches!(result, Err(PcdError::TruncatedHeader)));
}

#[test]
fn test_unrecognized_mode_defaults_to_binary() {
    let mut doc = b"FIELDS x y z\nSIZE 4 4 4\nTYPE F F F\nPOINTS 1\nDATA quantum\n".to_vec();
    for v in [1.0f32, 2.0, 3.0] {
        doc.extend_from_slice(&v.to_le_bytes());
    }

    let cloud = pcd_decode::from_slice(&doc).unwrap();
    assert_eq!(cloud.points, vec![[1.0, 2.0, 3.0]]);
}

#[test]
fn test_latin1_comment_does_not_poison_header() {
    let mut doc = Vec::new();
    doc.extend_from_slice(b"# aufl\xf6sung hoch\n");
    doc.extend_from_slice(b"FIELDS x y z\nDATA ascii\n0.5 0.5 0.5\n");

    let cloud = pcd_decode::from_slice(&doc).unwrap();
    assert_eq!(cloud.points, vec![[0.5, 0.5, 0.5]]);
}

#[test]
fn test_binary_missing_type_directive() {
    let doc = b"FIELDS x y z\nSIZE 4 4 4\nPOINTS 1\nDATA binary\n\0\0\0\0\0\0\0\0\0\0\0\0";
    let result = pcd_decode::from_slice(doc);
    assert!(matches!(result, Err(PcdError::IncompleteLayout(_))));
}

#[test]
fn test_binary_mismatched_directive_lengths() {
    let doc = b"FIELDS x y z\nSIZE 4 4\nTYPE F F F\nPOINTS 1\nDATA binary\n\0\0\0\0\0\0\0\0\0\0\0\0";
    let result = pcd_decode::from_slice(doc);
    assert!(matches!(result, Err(PcdError::IncompleteLayout(_))));
}

#[test]
fn test_unsupported_type_size_combination() {
    let doc = b"FIELDS x y z\nSIZE 2 2 2\nTYPE F F F\nPOINTS 1\nDATA binary\n\0\0\0\0\0\0";
    let result = pcd_decode::from_slice(doc);
    assert!(matches!(
        result,
        Err(PcdError::UnsupportedFieldType { kind: 'F', size: 2 })
    ));
}

#[test]
fn test_ascii_mode_needs_no_layout() {
    // No SIZE/TYPE at all: ascii decoding works from field names alone.
    let doc = "FIELDS x y z\nDATA ascii\n1 2 3\n";
    let cloud = pcd_decode::from_slice(doc.as_bytes()).unwrap();
    assert_eq!(cloud.points, vec![[1.0, 2.0, 3.0]]);
}

#[test]
fn test_unparsable_points_falls_back_to_width_height() {
    let doc = "\
FIELDS x y z
SIZE 4 4 4
TYPE F F F
POINTS lots
WIDTH 1
HEIGHT 1
DATA ascii
7.0 8.0 9.0
";
    let cloud = pcd_decode::from_slice(doc.as_bytes()).unwrap();
    assert_eq!(cloud.len(), 1);

    let mut cursor = Cursor::new(doc);
    let header = PcdHeader::parse(&mut cursor).unwrap();
    assert_eq!(header.point_count(), Some(1));
}
