use std::path::Path;

use tracing::{debug, instrument};

use retention_core::CustomerRecord;

use crate::error::DatasetError;

/// Lines read from the input, header included.
pub const MAX_LINES: usize = 300;

/// Normalize a header cell: trimmed, lower-cased, with the two known
/// camel-case column names mapped to their snake-case field names.
pub fn normalize_header(raw: &str) -> String {
    let clean = raw.trim().to_lowercase();
    match clean.as_str() {
        "monthlycharges" => "monthly_charges".to_owned(),
        "customerid" => "customer_id".to_owned(),
        _ => clean,
    }
}

/// Parse comma-separated text into customer records.
///
/// The first line is the header. At most [`MAX_LINES`] lines are read and
/// rows with fewer cells than the header are skipped. Cells are split on
/// every comma; quoted fields are not supported.
pub fn parse_csv(text: &str) -> Result<Vec<CustomerRecord>, DatasetError> {
    let mut lines = text.trim().lines();
    let headers: Vec<String> = match lines.next() {
        Some(header) if !header.trim().is_empty() => {
            header.split(',').map(normalize_header).collect()
        }
        _ => return Err(DatasetError::MissingHeader),
    };

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for line in lines.take(MAX_LINES - 1) {
        let cells: Vec<&str> = line.split(',').collect();
        if cells.len() < headers.len() {
            skipped += 1;
            continue;
        }
        records.push(record_from_row(&headers, &cells));
    }

    debug!(rows = records.len(), skipped, columns = headers.len(), "parsed csv");
    if records.is_empty() {
        return Err(DatasetError::EmptyInput);
    }
    Ok(records)
}

/// Read and parse a CSV file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_csv(path: &Path) -> Result<Vec<CustomerRecord>, DatasetError> {
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv(&text)
}

fn record_from_row(headers: &[String], cells: &[&str]) -> CustomerRecord {
    let mut record = CustomerRecord::default();
    for (header, cell) in headers.iter().zip(cells) {
        let cell = cell.trim();
        match header.as_str() {
            "customer_id" => record.customer_id = text_cell(cell),
            "segment" => record.segment = cell.parse().ok(),
            "contract" => record.contract = text_cell(cell),
            "monthly_charges" => record.monthly_charges = number_cell(cell),
            "tenure" => record.tenure = number_cell(cell),
            "churn_score" => record.churn_score = number_cell(cell),
            _ => {
                record.extra.insert(header.clone(), cell.to_owned());
            }
        }
    }
    record
}

fn text_cell(cell: &str) -> Option<String> {
    (!cell.is_empty()).then(|| cell.to_owned())
}

fn number_cell(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use retention_core::Segment;

    use super::*;

    #[test]
    fn header_normalization() {
        assert_eq!(normalize_header(" MonthlyCharges "), "monthly_charges");
        assert_eq!(normalize_header("customerID"), "customer_id");
        assert_eq!(normalize_header("Contract"), "contract");
        assert_eq!(normalize_header("PaymentMethod"), "paymentmethod");
    }

    #[test]
    fn parses_typed_and_extra_columns() {
        let text = "customerID,MonthlyCharges,tenure,Contract,gender\n\
                    7590-VHVEG, 29.85 ,1,Month-to-month,Female\n";
        let records = parse_csv(text).unwrap();
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.customer_id.as_deref(), Some("7590-VHVEG"));
        assert_eq!(r.monthly_charges, Some(29.85));
        assert_eq!(r.tenure, Some(1.0));
        assert_eq!(r.contract.as_deref(), Some("Month-to-month"));
        assert_eq!(r.extra.get("gender").map(String::as_str), Some("Female"));
        assert!(r.churn_score.is_none());
    }

    #[test]
    fn empty_and_non_numeric_cells_are_null() {
        let records = parse_csv("tenure,monthly_charges,contract\n,abc,\n").unwrap();
        assert!(records[0].tenure.is_none());
        assert!(records[0].monthly_charges.is_none());
        assert!(records[0].contract.is_none());
    }

    #[test]
    fn segment_column_is_parsed_when_valid() {
        let records = parse_csv("segment\nVIP\nvip\n").unwrap();
        assert_eq!(records[0].segment, Some(Segment::Vip));
        assert_eq!(records[1].segment, None);
    }

    #[test]
    fn short_rows_are_skipped_and_long_rows_truncated() {
        let text = "a,b,c\n1,2\n1,2,3\n1,2,3,4\n";
        let records = parse_csv(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].extra.len(), 3);
        assert!(!records[1].extra.values().any(|v| v == "4"));
    }

    #[test]
    fn row_cap_is_applied() {
        let mut text = String::from("customer_id,tenure\n");
        for i in 0..500 {
            writeln!(text, "c-{i},{i}").unwrap();
        }
        let records = parse_csv(&text).unwrap();
        assert_eq!(records.len(), MAX_LINES - 1);
        assert_eq!(records.last().unwrap().customer_id.as_deref(), Some("c-298"));
    }

    #[test]
    fn crlf_line_endings() {
        let records = parse_csv("customer_id,tenure\r\nc-1,4\r\n").unwrap();
        assert_eq!(records[0].tenure, Some(4.0));
    }

    #[test]
    fn blank_input_has_no_header() {
        assert!(matches!(parse_csv("  \n \n"), Err(DatasetError::MissingHeader)));
    }

    #[test]
    fn header_only_is_empty_input() {
        assert!(matches!(
            parse_csv("customer_id,tenure\n"),
            Err(DatasetError::EmptyInput)
        ));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_csv(Path::new("/nonexistent/telco.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
