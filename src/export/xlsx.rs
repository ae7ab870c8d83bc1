use super::{ExportError, Fill, ScheduleSheet};
use rust_xlsxwriter::{Color, Format, Workbook};

const SHEET_NAME: &str = "Schedule";
const FONT_NAME: &str = "Times New Roman";
const FONT_SIZE: f64 = 13.0;

/// Encode a [`ScheduleSheet`] to an in-memory `.xlsx` byte buffer.
///
/// Generation is fully in-memory; the caller decides the sink, so a failure
/// here never touches whatever workbook was stored previously.
pub fn write_workbook(sheet: &ScheduleSheet) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new()
        .set_font_name(FONT_NAME)
        .set_font_size(FONT_SIZE)
        .set_bold()
        .set_background_color(Color::RGB(Fill::HeaderBlue.rgb()));
    for (col, label) in sheet.header.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, label, &header_format)?;
    }

    for (idx, row) in sheet.rows.iter().enumerate() {
        let row_num = (idx + 1) as u32;
        worksheet.write_string_with_format(row_num, 0, &row.section, &section_format(row.fill))?;
        match row.fill {
            Some(fill) => {
                // the fill covers the whole row, empty day cells included
                let day_format = Format::new().set_background_color(Color::RGB(fill.rgb()));
                for (col, cell) in row.cells.iter().enumerate() {
                    worksheet.write_string_with_format(
                        row_num,
                        (col + 1) as u16,
                        cell,
                        &day_format,
                    )?;
                }
            }
            None => {
                for (col, cell) in row.cells.iter().enumerate() {
                    worksheet.write_string(row_num, (col + 1) as u16, cell)?;
                }
            }
        }
    }

    for (col, width) in sheet.column_widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    let bytes = workbook.save_to_buffer()?;
    Ok(bytes)
}

fn section_format(fill: Option<Fill>) -> Format {
    let format = Format::new().set_bold().set_font_size(FONT_SIZE);
    match fill {
        Some(fill) => format.set_background_color(Color::RGB(fill.rgb())),
        None => format,
    }
}
