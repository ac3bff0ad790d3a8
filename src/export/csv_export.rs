// ==========================================
// Parking occupancy - CSV export
// ==========================================
// UTF-8 with BOM (spreadsheet-friendly), header row taken from the
// record's serde field names, fields quoted only when needed,
// '\n' between records.
// ==========================================

use crate::domain::parking_log::format_date;
use crate::export::error::ExportError;
use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
pub const VEHICLE_LIST_FILENAME: &str = "lista_de_veiculos.csv";

/// `relatorio_filtrado_<start>_a_<end>.csv`
pub fn log_report_filename(start: NaiveDate, end: NaiveDate) -> String {
    format!("relatorio_filtrado_{}_a_{}.csv", format_date(start), format_date(end))
}

/// Write `records` as CSV into `writer`.
///
/// # Returns
/// - `Ok(n)`: number of data rows written
/// - `Err(ExportError::NoData)`: `records` is empty, nothing written
pub fn write_csv<W: Write, T: Serialize>(
    mut writer: W,
    records: &[T],
) -> Result<usize, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoData);
    }

    writer.write_all(UTF8_BOM)?;

    let mut csv_writer = WriterBuilder::new()
        .has_headers(true)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer
        .flush()
        .map_err(|e| ExportError::FlushError(e.to_string()))?;

    Ok(records.len())
}

/// CSV document in memory
pub fn to_csv_bytes<T: Serialize>(records: &[T]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records)?;
    Ok(buf)
}

/// Write a CSV file, creating or truncating `path`
pub fn export_to_file<T: Serialize>(path: &Path, records: &[T]) -> Result<usize, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoData);
    }
    let file = File::create(path)?;
    let rows = write_csv(BufWriter::new(file), records)?;
    tracing::info!(path = %path.display(), rows, "csv exported");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Row {
        #[serde(rename = "Placa/ID")]
        plate: String,
        #[serde(rename = "Proprietário")]
        owner: String,
    }

    fn row(plate: &str, owner: &str) -> Row {
        Row {
            plate: plate.to_string(),
            owner: owner.to_string(),
        }
    }

    #[test]
    fn test_bom_header_and_rows() {
        let bytes = to_csv_bytes(&[row("ABC1D23", "Ana"), row("BICI-1", "Bruno")]).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text, "Placa/ID,Proprietário\nABC1D23,Ana\nBICI-1,Bruno\n");
    }

    #[test]
    fn test_comma_and_quote_are_escaped() {
        let bytes = to_csv_bytes(&[row("ABC1D23", "Souza, Ana \"Aninha\"")]).unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text.contains("\"Souza, Ana \"\"Aninha\"\"\""));
    }

    #[test]
    fn test_empty_data_is_refused() {
        let rows: Vec<Row> = vec![];
        assert!(matches!(to_csv_bytes(&rows), Err(ExportError::NoData)));
    }

    #[test]
    fn test_filenames() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            log_report_filename(start, end),
            "relatorio_filtrado_2024-01-01_a_2024-01-31.csv"
        );
        assert_eq!(VEHICLE_LIST_FILENAME, "lista_de_veiculos.csv");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(VEHICLE_LIST_FILENAME);
        let rows = export_to_file(&path, &[row("ABC1D23", "Ana")]).unwrap();
        assert_eq!(rows, 1);
        assert!(std::fs::read(&path).unwrap().starts_with(UTF8_BOM));
    }
}
