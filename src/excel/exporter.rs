//! Excel exporter implementation - Sheet → .xlsx/.csv

use crate::error::{MapperError, MapperResult};
use crate::excel::SheetFormat;
use crate::types::{CellStyle, Sheet};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use std::path::Path;
use tracing::info;

/// Persists an encoded [`Sheet`]
pub struct ExcelExporter<'a> {
    sheet: &'a Sheet,
}

impl<'a> ExcelExporter<'a> {
    pub fn new(sheet: &'a Sheet) -> Self {
        Self { sheet }
    }

    /// Write to `output_path`, picking the format from its extension
    pub fn export(&self, output_path: &Path) -> MapperResult<()> {
        match SheetFormat::from_path(output_path)? {
            SheetFormat::Xlsx => self
                .build_workbook()?
                .save(output_path)
                .map_err(MapperError::file_stream)?,
            SheetFormat::Csv => self.write_csv(output_path)?,
            SheetFormat::Xls => {
                return Err(MapperError::UnsupportedFormat(
                    "xls cannot be written, use xlsx".to_string(),
                ))
            }
        }

        info!(
            path = %output_path.display(),
            rows = self.sheet.rows.len(),
            "exported sheet"
        );
        Ok(())
    }

    /// Serialize as .xlsx bytes, for streaming a download without touching disk
    pub fn to_buffer(&self) -> MapperResult<Vec<u8>> {
        self.build_workbook()?
            .save_to_buffer()
            .map_err(MapperError::file_stream)
    }

    fn build_workbook(&self) -> MapperResult<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.sheet.name)
            .map_err(MapperError::file_stream)?;

        let required_header = header_format().set_font_color(Color::Red);
        let normal_header = header_format();

        for (row_idx, row) in self.sheet.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let (row_num, col_num) = (row_idx as u32, col_idx as u16);
                let written = match cell.style {
                    CellStyle::RequiredHeader => worksheet.write_string_with_format(
                        row_num,
                        col_num,
                        &cell.value,
                        &required_header,
                    ),
                    CellStyle::NormalHeader => worksheet.write_string_with_format(
                        row_num,
                        col_num,
                        &cell.value,
                        &normal_header,
                    ),
                    CellStyle::Body if cell.value.is_empty() => continue,
                    CellStyle::Body => worksheet.write_string(row_num, col_num, &cell.value),
                };
                written.map_err(MapperError::file_stream)?;
            }
        }

        Ok(workbook)
    }

    fn write_csv(&self, output_path: &Path) -> MapperResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(output_path)
            .map_err(MapperError::file_stream)?;

        for row in &self.sheet.rows {
            writer
                .write_record(row.iter().map(|cell| cell.value.as_str()))
                .map_err(MapperError::file_stream)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Bold, centred 14pt header with a thin border
fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_size(14)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
}
