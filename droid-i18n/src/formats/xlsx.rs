//! Spreadsheet reading (`.xls`, `.xlsx`) with calamine and `.xlsx` writing with rust_xlsxwriter.

use std::{
    collections::HashSet,
    io::{Cursor, Read, Write},
    path::Path,
};

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use rust_xlsxwriter::{Format as CellFormat, Workbook as XlsxWorkbook};
use tracing::debug;

use crate::{
    error::Error,
    formats::sheet::{Sheet, Workbook},
};

/// Maximum length of a worksheet name in Excel.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Reads every sheet of a workbook, in tab order.
///
/// Cells are placed at their absolute position: a used range starting at
/// `C3` still yields rows 0 and 1 and columns 0 and 1 as absent cells.
pub fn read_workbook<R: Read>(mut reader: R) -> Result<Workbook, Error> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let (row_offset, col_offset) = range
            .start()
            .map(|(row, col)| (row as usize, col as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<Option<String>>> = vec![Vec::new(); row_offset];
        for cells in range.rows() {
            let mut row: Vec<Option<String>> = vec![None; col_offset];
            row.extend(cells.iter().map(cell_text));
            rows.push(row);
        }
        debug!("Read sheet `{}` with {} rows", name, rows.len());
        sheets.push(Sheet::new(name, rows));
    }
    Ok(Workbook::new(sheets))
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Writes the workbook as `.xlsx` to any writer.
///
/// The header row is bold; absent and empty cells are left blank.
pub fn write_workbook<W: Write>(workbook: &Workbook, mut writer: W) -> Result<(), Error> {
    let buffer = to_xlsx(workbook)?.save_to_buffer()?;
    writer.write_all(&buffer)?;
    Ok(())
}

/// Writes the workbook as `.xlsx` to a file path.
pub fn write_workbook_to<P: AsRef<Path>>(workbook: &Workbook, path: P) -> Result<(), Error> {
    to_xlsx(workbook)?.save(path.as_ref())?;
    Ok(())
}

fn to_xlsx(workbook: &Workbook) -> Result<XlsxWorkbook, Error> {
    let mut xlsx = XlsxWorkbook::new();
    let header_format = CellFormat::new().set_bold();

    let names = unique_sheet_names(workbook.sheets.iter().map(|s| s.name.as_str()));
    for (sheet, name) in workbook.sheets.iter().zip(names) {
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(name)?;
        for (row_index, row) in sheet.rows.iter().enumerate() {
            for (col_index, cell) in row.iter().enumerate() {
                let Some(text) = cell.as_deref().filter(|t| !t.is_empty()) else {
                    continue;
                };
                let (row_num, col_num) = (row_index as u32, col_index as u16);
                if row_index == 0 {
                    worksheet.write_string_with_format(row_num, col_num, text, &header_format)?;
                } else {
                    worksheet.write_string(row_num, col_num, text)?;
                }
            }
        }
    }
    Ok(xlsx)
}

/// Truncates a sheet name to what Excel accepts.
pub fn sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME_LEN).collect()
}

/// Truncated sheet names, made unique by replacing the tail of a clashing
/// name with `~2`, `~3`, ... Excel compares sheet names case-insensitively.
pub fn unique_sheet_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let mut candidate = sheet_name(name);
            let mut counter = 1;
            while !taken.insert(candidate.to_lowercase()) {
                counter += 1;
                let suffix = format!("~{}", counter);
                let base: String = name
                    .chars()
                    .take(MAX_SHEET_NAME_LEN - suffix.len())
                    .collect();
                candidate = format!("{}{}", base, suffix);
            }
            if candidate != name {
                debug!("Sheet `{}` is written as `{}`", name, candidate);
            }
            candidate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_workbook() -> Workbook {
        Workbook::new(vec![
            Sheet::from_text_rows(
                "app",
                [
                    ["key", "en", "fr"],
                    ["name1", "Value 1", "Valeur 1"],
                    ["plurals1:one", "%s singular 1", "%s singulier 1"],
                ],
            ),
            Sheet::new(
                "features.feature-one",
                vec![
                    vec![Some("key".to_string()), Some("en".to_string())],
                    vec![Some("title".to_string()), Some(String::new())],
                ],
            ),
        ])
    }

    #[test]
    fn test_write_then_read_workbook() {
        let mut buffer = Vec::new();
        write_workbook(&sample_workbook(), &mut buffer).unwrap();

        let workbook = read_workbook(Cursor::new(buffer)).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["app", "features.feature-one"]);

        let app = workbook.sheet("app").unwrap();
        assert_eq!(app.cell(0, 0), Some("key"));
        assert_eq!(app.cell(1, 2), Some("Valeur 1"));
        assert_eq!(app.cell(2, 0), Some("plurals1:one"));

        let feature = workbook.sheet("features.feature-one").unwrap();
        assert_eq!(feature.cell(1, 0), Some("title"));
        assert_eq!(feature.cell(1, 1), None);
    }

    #[test]
    fn test_read_offset_range_keeps_positions() {
        let mut xlsx = XlsxWorkbook::new();
        let worksheet = xlsx.add_worksheet();
        worksheet.write_string(2, 1, "key").unwrap();
        worksheet.write_string(2, 2, "en").unwrap();
        worksheet.write_number(3, 2, 42).unwrap();
        let buffer = xlsx.save_to_buffer().unwrap();

        let workbook = read_workbook(Cursor::new(buffer)).unwrap();
        let sheet = &workbook.sheets[0];
        assert_eq!(sheet.cell(0, 0), None);
        assert_eq!(sheet.cell(2, 1), Some("key"));
        assert_eq!(sheet.cell(2, 2), Some("en"));
        assert_eq!(sheet.cell(3, 2), Some("42"));
    }

    #[test]
    fn test_read_garbage_fails() {
        let result = read_workbook(Cursor::new(b"definitely not a workbook".to_vec()));
        assert!(result.is_err());
    }

    #[test]
    fn test_unique_sheet_names() {
        let names = unique_sheet_names([
            "features.notifications-settings-one",
            "features.notifications-settings-two",
            "APP",
            "app",
            "features.notifications-settings-three",
        ]);
        assert_eq!(
            names,
            vec![
                "features.notifications-settings",
                "features.notifications-settin~2",
                "APP",
                "app~2",
                "features.notifications-settin~3",
            ]
        );
        assert!(names.iter().all(|n| n.chars().count() <= MAX_SHEET_NAME_LEN));
    }

    #[test]
    fn test_write_long_clashing_names() {
        let workbook = Workbook::new(vec![
            Sheet::from_text_rows("features.notifications-settings-one", [["key", "en"]]),
            Sheet::from_text_rows("features.notifications-settings-two", [["key", "en"]]),
        ]);
        let mut buffer = Vec::new();
        write_workbook(&workbook, &mut buffer).unwrap();

        let read = read_workbook(Cursor::new(buffer)).unwrap();
        assert_eq!(
            read.sheet_names(),
            vec!["features.notifications-settings", "features.notifications-settin~2"]
        );
    }

    #[test]
    fn test_sheet_name_truncation() {
        let long = "libraries.a-very-long-module-name-indeed";
        assert_eq!(sheet_name(long).chars().count(), MAX_SHEET_NAME_LEN);
        assert_eq!(sheet_name("app"), "app");
    }
}
