use sales_forecast::{ForecastError, Month};
use std::io;

#[test]
fn test_error_conversion() {
    // IO error conversion
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    // JSON error conversion
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(
        ForecastError::from(json_error),
        ForecastError::JsonError(_)
    ));

    // Date parse errors surface through month parsing
    let parse_error = "2021-13".parse::<Month>().unwrap_err();
    assert!(matches!(parse_error, ForecastError::ParseError(_)));
}

#[test]
fn test_error_display() {
    let error = ForecastError::MissingFeatureColumn("last_year_max".to_string());
    assert_eq!(error.to_string(), "Missing feature column: last_year_max");

    let error = ForecastError::InsufficientHistory {
        target: "2021-07".to_string(),
        required: 6,
        available: 2,
    };
    let message = error.to_string();
    assert!(message.contains("2021-07"));
    assert!(message.contains("6 lag months required"));
    assert!(message.contains("2 observed"));

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let message = ForecastError::from(io_error).to_string();
    assert!(message.contains("IO error"));
    assert!(message.contains("permission denied"));
}

#[test]
fn test_result_mapping() {
    let result: Result<(), &str> = Err("bad artifact");
    let mapped = result.map_err(|e| ForecastError::ModelError(e.to_string()));

    if let Err(ForecastError::ModelError(msg)) = mapped {
        assert_eq!(msg, "bad artifact");
    } else {
        panic!("Wrong error variant");
    }
}
