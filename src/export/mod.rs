//! Export records for spreadsheet tools
//!
//! Flattens scan results to one `(barcode, signed)` row per symbol and writes
//! them as `Barcode,Signature` CSV with the signature as `1` or `0`.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scan::ScanResult;

/// Default export name when no file was scanned
pub const DEFAULT_EXPORT_NAME: &str = "scan_results.csv";

/// One exported barcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub decoded_text: String,
    /// 1 when signed, 0 otherwise
    pub has_signature: u8,
}

/// One record per symbol, files in batch order and symbols in reading order
pub fn export_records(results: &[ScanResult]) -> Vec<ExportRecord> {
    results
        .iter()
        .flat_map(|result| result.symbols.iter())
        .map(|symbol| ExportRecord {
            decoded_text: symbol.text.clone(),
            has_signature: u8::from(symbol.is_signed()),
        })
        .collect()
}

/// Write records as CSV with a `Barcode,Signature` header
pub fn write_csv<W: Write>(records: &[ExportRecord], mut out: W) -> std::io::Result<()> {
    writeln!(out, "Barcode,Signature")?;
    for record in records {
        writeln!(out, "{},{}", quote(&record.decoded_text), quote(&record.has_signature.to_string()))?;
    }
    out.flush()
}

/// Render records to a CSV string
pub fn to_csv_string(records: &[ExportRecord]) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_csv(records, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

/// `<first file stem>_results.csv`, or [`DEFAULT_EXPORT_NAME`]
pub fn export_file_name(results: &[ScanResult]) -> String {
    results
        .first()
        .and_then(|first| Path::new(&first.file_name).file_stem())
        .map(|stem| format!("{}_results.csv", stem.to_string_lossy()))
        .unwrap_or_else(|| DEFAULT_EXPORT_NAME.to_string())
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{BarcodeSymbol, EngineDetection, FileKind};

    fn result(name: &str, symbols: &[(&str, Option<bool>)]) -> ScanResult {
        let mut result = ScanResult::new(name, FileKind::Image);
        result.symbols = symbols
            .iter()
            .map(|&(text, signed)| {
                let mut symbol = BarcodeSymbol::from_detection(EngineDetection::new(text, "CODE_39"), None);
                symbol.has_signature = signed;
                symbol
            })
            .collect();
        result
    }

    #[test]
    fn test_records_across_files() {
        let results = vec![
            result("a.png", &[("A1", Some(true)), ("A2", Some(false))]),
            result("broken.pdf", &[]),
            result("b.png", &[("B1", None)]),
        ];

        let records = export_records(&results);
        let flat: Vec<(&str, u8)> = records.iter().map(|r| (r.decoded_text.as_str(), r.has_signature)).collect();
        assert_eq!(flat, vec![("A1", 1), ("A2", 0), ("B1", 0)]);
    }

    #[test]
    fn test_csv_layout() {
        let records = vec![
            ExportRecord {
                decoded_text: "INV-1".into(),
                has_signature: 1,
            },
            ExportRecord {
                decoded_text: "say \"hi\"".into(),
                has_signature: 0,
            },
        ];

        assert_eq!(
            to_csv_string(&records),
            "Barcode,Signature\n\"INV-1\",\"1\"\n\"say \"\"hi\"\"\",\"0\"\n"
        );
    }

    #[test]
    fn test_record_json_shape() {
        let record = ExportRecord {
            decoded_text: "INV-7".into(),
            has_signature: 1,
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"decodedText":"INV-7","hasSignature":1}"#
        );
    }

    #[test]
    fn test_export_file_name() {
        let results = vec![result("march.batch.pdf", &[]), result("other.png", &[])];
        assert_eq!(export_file_name(&results), "march.batch_results.csv");
        assert_eq!(export_file_name(&[]), DEFAULT_EXPORT_NAME);
    }
}
