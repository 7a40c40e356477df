//! # XLSX Workbook
//!
//! Two sheets: the flat table under "Full Transcripts" and the segment table
//! under "Timestamped Segments", each with a bold white header on a coloured fill.

use crate::table::{flat_table, segment_table, Cell, Table};
use crate::ExportError;
use boardscribe::AdRecord;
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

pub const FULL_SHEET: &str = "Full Transcripts";
pub const SEGMENT_SHEET: &str = "Timestamped Segments";
const FULL_HEADER_FILL: u32 = 0x1F77B4;
const SEGMENT_HEADER_FILL: u32 = 0x28A745;

/// Excel rejects longer strings in a single cell.
const MAX_CELL_CHARS: usize = 32_767;

pub fn to_xlsx(records: &[AdRecord]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(FULL_SHEET)?;
    write_table(sheet, &flat_table(records), &header_format(FULL_HEADER_FILL))?;

    let sheet = workbook.add_worksheet();
    sheet.set_name(SEGMENT_SHEET)?;
    write_table(
        sheet,
        &segment_table(records),
        &header_format(SEGMENT_HEADER_FILL),
    )?;

    Ok(workbook.save_to_buffer()?)
}

fn header_format(fill: u32) -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(fill))
}

fn write_table(sheet: &mut Worksheet, table: &Table, header: &Format) -> Result<(), ExportError> {
    for (col, name) in (0u16..).zip(&table.headers) {
        sheet.write_string_with_format(0, col, *name, header)?;
    }
    for (row, cells) in (1u32..).zip(&table.rows) {
        for (col, cell) in (0u16..).zip(cells) {
            match cell {
                Cell::Text(text) => {
                    sheet.write_string(row, col, clip(text))?;
                }
                Cell::Number(n) => {
                    sheet.write_number(row, col, *n)?;
                }
                Cell::Bool(b) => {
                    sheet.write_boolean(row, col, *b)?;
                }
            }
        }
    }
    Ok(())
}

fn clip(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
