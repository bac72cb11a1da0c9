//! Export Service
//!
//! Renders a year's assignments as an xlsx workbook with one `SCHEDULE`
//! sheet: a row per resident, a column per week, cells tinted by rotation.

use rota_core::domain::assignment::{AssignmentGrid, WEEKS_PER_YEAR, to_grid};
use rota_core::domain::year::Year;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, XlsxError};
use sqlx::SqlitePool;

use crate::repository::{assignment_repository, year_repository};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_NAME: &str = "SCHEDULE";

/// Fill colors cycled through by rotation code
const ROTATION_COLORS: [u32; 8] = [
    0xDDEBF7, 0xE2EFDA, 0xFFF2CC, 0xFCE4D6, 0xEDE1F5, 0xD9F2F2, 0xF8D7DA, 0xE7E6E6,
];

/// Service error type
#[derive(Debug)]
pub enum ExportError {
    YearNotFound(i64),
    Workbook(XlsxError),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for ExportError {
    fn from(err: sqlx::Error) -> Self {
        ExportError::DatabaseError(err)
    }
}

impl From<XlsxError> for ExportError {
    fn from(err: XlsxError) -> Self {
        ExportError::Workbook(err)
    }
}

/// A rendered workbook ready to be served as a download
#[derive(Debug)]
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Export a year's schedule as xlsx
pub async fn export_year(pool: &SqlitePool, year_id: i64) -> Result<ExportFile, ExportError> {
    let year = year_repository::find_by_id(pool, year_id)
        .await?
        .ok_or(ExportError::YearNotFound(year_id))?;

    let assignments = assignment_repository::find_scope(pool, year_id, None).await?;
    let grid = to_grid(&assignments);

    let bytes = render(&year, &grid)?;

    tracing::info!(
        "Exported schedule for year {} ({} resident(s), {} bytes)",
        year.name,
        grid.len(),
        bytes.len()
    );

    Ok(ExportFile {
        filename: format!("schedule_{}.xlsx", year.id),
        bytes,
    })
}

/// Build the workbook bytes for a grid
pub fn render(year: &Year, grid: &AssignmentGrid) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold().set_align(FormatAlign::Center);

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    sheet.write_string_with_format(0, 0, &year.name, &header)?;
    sheet.set_column_width(0, 16)?;
    for week in 1..=WEEKS_PER_YEAR {
        let col = week as u16;
        sheet.write_string_with_format(0, col, format!("W{}", week), &header)?;
        sheet.set_column_width(col, 9)?;
    }
    sheet.set_freeze_panes(1, 1)?;

    for (index, (resident_id, weeks)) in grid.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string(row, 0, format!("Resident {}", resident_id))?;

        for (week, code) in weeks {
            if !(1..=WEEKS_PER_YEAR).contains(week) || code.is_empty() {
                continue;
            }
            let fill = Format::new()
                .set_align(FormatAlign::Center)
                .set_background_color(Color::RGB(rotation_color(code)));
            sheet.write_string_with_format(row, *week as u16, code, &fill)?;
        }
    }

    workbook.save_to_buffer()
}

/// Stable fill color for a rotation code
fn rotation_color(code: &str) -> u32 {
    let sum: usize = code.bytes().map(usize::from).sum();
    ROTATION_COLORS[sum % ROTATION_COLORS.len()]
}
