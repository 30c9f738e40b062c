//! Excel importer implementation - .xls/.xlsx/.csv → Grid

use crate::error::{MapperError, MapperResult};
use crate::excel::SheetFormat;
use crate::types::{format_time, Grid};
use calamine::{
    open_workbook_auto, open_workbook_auto_from_rs, Data, DataType, Range, Reader, Sheets,
};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use tracing::info;

/// Reads the first worksheet (or the CSV body) of a file as text cells
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn format(&self) -> MapperResult<SheetFormat> {
        SheetFormat::from_path(&self.path)
    }

    /// Read the file into a grid; row 0 is whatever the file's first row is
    pub fn read_grid(&self) -> MapperResult<Grid> {
        let grid = match self.format()? {
            SheetFormat::Csv => self.read_csv()?,
            SheetFormat::Xls | SheetFormat::Xlsx => self.read_workbook()?,
        };
        info!(path = %self.path.display(), rows = grid.len(), "read grid");
        Ok(grid)
    }

    /// Read an uploaded stream, e.g. a request body held in a `Cursor`.
    ///
    /// The format comes from the caller since there is no file name; for
    /// xls/xlsx calamine still checks the content itself.
    pub fn read_grid_from_reader<RS>(format: SheetFormat, reader: RS) -> MapperResult<Grid>
    where
        RS: Read + Seek + Clone,
    {
        let grid = match format {
            SheetFormat::Csv => csv_grid(reader)?,
            SheetFormat::Xls | SheetFormat::Xlsx => {
                first_sheet(open_workbook_auto_from_rs(reader).map_err(MapperError::file_stream)?)?
            }
        };
        info!(format = format.extension(), rows = grid.len(), "read grid from stream");
        Ok(grid)
    }

    fn read_workbook(&self) -> MapperResult<Grid> {
        first_sheet(open_workbook_auto(&self.path).map_err(MapperError::file_stream)?)
    }

    fn read_csv(&self) -> MapperResult<Grid> {
        csv_grid(File::open(&self.path).map_err(MapperError::file_stream)?)
    }
}

fn first_sheet<RS: Read + Seek>(mut workbook: Sheets<RS>) -> MapperResult<Grid> {
    match workbook.worksheet_range_at(0) {
        Some(range) => Ok(range_to_grid(&range.map_err(MapperError::file_stream)?)),
        None => Ok(Vec::new()),
    }
}

fn csv_grid<R: Read>(input: R) -> MapperResult<Grid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record.map_err(MapperError::file_stream)?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

/// Convert a calamine range to a grid anchored at A1.
///
/// calamine trims leading empty rows and columns; they are padded back so
/// that header and data cells keep their sheet positions.
fn range_to_grid(range: &Range<Data>) -> Grid {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut grid: Grid = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_text));
        grid.push(cells);
    }
    grid
}

fn cell_text(cell: &Data) -> String {
    if cell.is_datetime() || cell.is_datetime_iso() {
        if let Some(value) = cell.as_datetime() {
            return format_time(&value);
        }
    }
    cell.to_string()
}
