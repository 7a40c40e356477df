//! CSV output. Files start with a UTF-8 byte-order mark so spreadsheet
//! applications pick the right encoding.

use crate::table::{Cell, Table};
use crate::ExportError;

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn to_csv(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(Cell::to_string))?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::QUICK_COLUMNS;

    #[test]
    fn test_empty_table_is_bom_and_header() {
        let bytes = to_csv(&Table::new(&QUICK_COLUMNS)).unwrap();
        assert_eq!(bytes, b"\xEF\xBB\xBFad_id,name,full_transcription\n".to_vec());
    }

    #[test]
    fn test_fields_with_commas_and_newlines_are_quoted() {
        let mut table = Table::new(&QUICK_COLUMNS);
        table.push_row(vec!["a1".into(), "Hello, world".into(), "one\ntwo".into()]);
        let text = String::from_utf8(to_csv(&table).unwrap()).unwrap();
        assert!(text.ends_with("a1,\"Hello, world\",\"one\ntwo\"\n"));
    }
}
