// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError display messages and From conversions
// ═══════════════════════════════════════════════════════════════════

use battery_roi_core::errors::CoreError;

#[test]
fn display_invalid_input() {
    let err = CoreError::InvalidInput("capacity must be positive".to_string());
    assert_eq!(err.to_string(), "Invalid input: capacity must be positive");
}

#[test]
fn display_malformed_result() {
    let err = CoreError::MalformedResult("missing field `yearly`".to_string());
    assert_eq!(
        err.to_string(),
        "Malformed analysis result: missing field `yearly`"
    );
}

#[test]
fn display_missing_column() {
    let err = CoreError::MissingColumn("EUR per kWh".to_string());
    assert_eq!(err.to_string(), "Required column not found: EUR per kWh");
}

#[test]
fn display_no_data_mentions_upload() {
    assert!(CoreError::NoData.to_string().contains("upload"));
}

#[test]
fn display_empty_series() {
    assert_eq!(
        CoreError::EmptySeries.to_string(),
        "Price file contains no usable rows"
    );
}

#[test]
fn from_io_error() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: CoreError = io.into();
    assert!(matches!(err, CoreError::FileIO(_)));
    assert!(err.to_string().contains("gone"));
}

#[test]
fn from_serde_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err: CoreError = json_err.into();
    assert!(matches!(err, CoreError::Deserialization(_)));
}

#[test]
fn errors_are_debug_printable() {
    let err = CoreError::InvalidFileFormat("bad zip".to_string());
    let debug = format!("{err:?}");
    assert!(debug.contains("InvalidFileFormat"));
}
