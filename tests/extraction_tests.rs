//! End-to-end extraction tests over real .xlsx files
//!
//! Fixture workbooks are generated with rust_xlsxwriter into a temp dir and
//! read back through calamine.

use pretty_assertions::assert_eq;
use royalbit_harvest::config::ConfigLoader;
use royalbit_harvest::core::ExtractionEngine;
use royalbit_harvest::excel::{TableExporter, WorkbookImporter};
use royalbit_harvest::writer::write_table;
use royalbit_harvest::{CellValue, HarvestError};
use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Three order sheets laid out like a form: labels in A, values in B
fn write_orders_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("orders.xlsx");
    let mut workbook = Workbook::new();

    let orders = [
        ("Order-001", "ACME Corp", 12.0, true),
        ("Order-002", "Globex", 7.5, false),
        ("Order-003", "Initech", 100.0, true),
    ];
    for (sheet_name, customer, amount, paid) in orders {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name).unwrap();
        sheet.write_string(0, 0, "Customer").unwrap();
        sheet.write_string(0, 1, customer).unwrap();
        sheet.write_string(1, 0, "Amount").unwrap();
        sheet.write_number(1, 1, amount).unwrap();
        sheet.write_string(2, 0, "Paid").unwrap();
        sheet.write_boolean(2, 1, paid).unwrap();
    }

    workbook.save(&path).unwrap();
    path
}

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("mapping.csv");
    std::fs::write(&path, content).unwrap();
    path
}

/// Two sheets, each with a pre-1900-03-01 date in A1, a time-only cell in B1
/// and a modern date in C1
fn write_dates_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("dates.xlsx");
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let time_format = Format::new().set_num_format("hh:mm:ss");

    for (sheet_name, day) in [("Week-1", 6), ("Week-2", 13)] {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name).unwrap();
        sheet
            .write_datetime_with_format(0, 0, ExcelDateTime::from_ymd(1900, 1, 15).unwrap(), &date_format)
            .unwrap();
        sheet
            .write_datetime_with_format(0, 1, ExcelDateTime::from_hms(12, 0, 0).unwrap(), &time_format)
            .unwrap();
        sheet
            .write_datetime_with_format(0, 2, ExcelDateTime::from_ymd(2024, 5, day).unwrap(), &date_format)
            .unwrap();
    }

    workbook.save(&path).unwrap();
    path
}

fn datetime(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

const DATES_MAPPING: &str = "name,row,column\nFounded,1,A\nOpens,1,B\nShipped,1,C\n";

const MAPPING: &str = "输出列名,行,列\nCustomer,1,B\nAmount,2,b\nPaid,3,B\n";

#[test]
fn test_import_keeps_sheet_order() {
    let dir = TempDir::new().unwrap();
    let path = write_orders_workbook(dir.path());

    let importer = WorkbookImporter::new(&path);
    assert_eq!(
        importer.sheet_names().unwrap(),
        vec!["Order-001", "Order-002", "Order-003"]
    );

    let workbook = importer.import().unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Order-001", "Order-002", "Order-003"]);
    assert_eq!(workbook.sheets[0].height(), 3);
    assert_eq!(workbook.sheets[0].width(), 2);
}

#[test]
fn test_extract_one_row_per_sheet() {
    let dir = TempDir::new().unwrap();
    let workbook = WorkbookImporter::new(write_orders_workbook(dir.path()))
        .import()
        .unwrap();
    let config = ConfigLoader::new()
        .load_path(&write_config(dir.path(), MAPPING))
        .unwrap();

    let table = ExtractionEngine::new(&config).run(&workbook).unwrap();

    assert_eq!(table.headers, vec!["Customer", "Amount", "Paid"]);
    assert_eq!(table.row_count(), 3);

    let customers: Vec<_> = table.rows.iter().map(|r| r.get("Customer").cloned()).collect();
    assert_eq!(
        customers,
        vec![
            Some(CellValue::from("ACME Corp")),
            Some(CellValue::from("Globex")),
            Some(CellValue::from("Initech")),
        ]
    );
    assert_eq!(table.rows[1].get("Amount"), Some(&CellValue::Number(7.5)));
    assert_eq!(table.rows[1].get("Paid"), Some(&CellValue::Bool(false)));
}

#[test]
fn test_cells_addressed_from_a1_when_sheet_starts_later() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("offset.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    // First used cell is C4
    sheet.write_string(3, 2, "c4").unwrap();
    sheet.write_string(4, 3, "d5").unwrap();
    workbook.save(&path).unwrap();

    let workbook = WorkbookImporter::new(&path).import().unwrap();
    let config = ConfigLoader::new()
        .has_headers(false)
        .load_str("first,4,C\nsecond,5,D\nblank,1,A\n")
        .unwrap();

    let table = ExtractionEngine::new(&config).run(&workbook).unwrap();

    assert_eq!(table.rows[0].get("first"), Some(&CellValue::from("c4")));
    assert_eq!(table.rows[0].get("second"), Some(&CellValue::from("d5")));
    assert_eq!(table.rows[0].get("blank"), Some(&CellValue::Empty));
}

#[test]
fn test_out_of_range_names_sheet_and_entry() {
    let dir = TempDir::new().unwrap();
    let workbook = WorkbookImporter::new(write_orders_workbook(dir.path()))
        .import()
        .unwrap();
    let config = ConfigLoader::new()
        .has_headers(false)
        .load_str("Customer,1,B\nMissing,1,Z\n")
        .unwrap();

    let err = ExtractionEngine::new(&config).run(&workbook).unwrap_err();

    match &err {
        HarvestError::Extraction { sheet, header, .. } => {
            assert_eq!(sheet, "Order-001");
            assert_eq!(header, "Missing");
        }
        other => panic!("Expected Extraction error, got {:?}", other),
    }
    assert!(matches!(err.root_cause(), HarvestError::CellOutOfRange { .. }));
}

#[test]
fn test_malformed_config_fails_before_extraction() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(dir.path(), "h,r,c\nCustomer,1\n");

    let err = ConfigLoader::new().load_path(&config_path).unwrap_err();
    assert!(matches!(err, HarvestError::MalformedConfig { line: 2, .. }));
}

#[test]
fn test_xlsx_output_round_trip() {
    let dir = TempDir::new().unwrap();
    let workbook = WorkbookImporter::new(write_orders_workbook(dir.path()))
        .import()
        .unwrap();
    let config = ConfigLoader::new().load_str(MAPPING).unwrap();
    let table = ExtractionEngine::new(&config).run(&workbook).unwrap();

    let output = dir.path().join("summary.xlsx");
    TableExporter::new(&table, "Summary").export(&output).unwrap();

    let written = WorkbookImporter::new(&output).import().unwrap();
    assert_eq!(written.sheet_names(), vec!["Summary"]);
    let sheet = &written.sheets[0];
    // Header row plus one row per source sheet
    assert_eq!(sheet.height(), 4);
    assert_eq!(sheet.get(0, 0), Some(&CellValue::from("Customer")));
    assert_eq!(sheet.get(0, 2), Some(&CellValue::from("Paid")));
    assert_eq!(sheet.get(3, 0), Some(&CellValue::from("Initech")));
    assert_eq!(sheet.get(3, 1), Some(&CellValue::Number(100.0)));
    assert_eq!(sheet.get(2, 2), Some(&CellValue::Bool(false)));
}

#[test]
fn test_write_table_by_extension() {
    let dir = TempDir::new().unwrap();
    let workbook = WorkbookImporter::new(write_orders_workbook(dir.path()))
        .import()
        .unwrap();
    let config = ConfigLoader::new().load_str(MAPPING).unwrap();
    let table = ExtractionEngine::new(&config).run(&workbook).unwrap();

    let csv_path = dir.path().join("summary.csv");
    write_table(&table, &csv_path, "Summary").unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(
        csv,
        "Customer,Amount,Paid\nACME Corp,12,TRUE\nGlobex,7.5,FALSE\nInitech,100,TRUE\n"
    );

    let json_path = dir.path().join("summary.json");
    write_table(&table, &json_path, "Summary").unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["rows"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["rows"][0][0], "ACME Corp");

    let bad = write_table(&table, &dir.path().join("summary.txt"), "Summary");
    assert!(matches!(bad, Err(HarvestError::Validation(_))));
}

#[test]
fn test_repeated_runs_identical() {
    let dir = TempDir::new().unwrap();
    let workbook = WorkbookImporter::new(write_orders_workbook(dir.path()))
        .import()
        .unwrap();
    let config = ConfigLoader::new().load_str(MAPPING).unwrap();
    let engine = ExtractionEngine::new(&config);

    assert_eq!(engine.run(&workbook).unwrap(), engine.run(&workbook).unwrap());
}

#[test]
fn test_far_away_cell_is_addressable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stray.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(200_000, 5_000, "stray").unwrap();
    workbook.save(&path).unwrap();

    let workbook = WorkbookImporter::new(&path).import().unwrap();
    assert_eq!(workbook.sheets[0].height(), 200_001);
    assert_eq!(workbook.sheets[0].width(), 5_001);

    // Column 5001 is GJI
    let config = ConfigLoader::new()
        .has_headers(false)
        .load_str("stray,200001,GJI\norigin,1,A\n")
        .unwrap();
    let table = ExtractionEngine::new(&config).run(&workbook).unwrap();

    assert_eq!(table.rows[0].get("stray"), Some(&CellValue::from("stray")));
    assert_eq!(table.rows[0].get("origin"), Some(&CellValue::Empty));
}

#[test]
fn test_dates_extracted_as_datetimes() {
    let dir = TempDir::new().unwrap();
    let workbook = WorkbookImporter::new(write_dates_workbook(dir.path()))
        .import()
        .unwrap();
    let config = ConfigLoader::new().load_str(DATES_MAPPING).unwrap();

    let table = ExtractionEngine::new(&config).run(&workbook).unwrap();

    let first: Vec<_> = table.rows[0].values().cloned().collect();
    assert_eq!(
        first,
        vec![
            CellValue::DateTime(datetime(1900, 1, 15, 0)),
            CellValue::DateTime(datetime(1899, 12, 31, 12)),
            CellValue::DateTime(datetime(2024, 5, 6, 0)),
        ]
    );
    assert_eq!(
        table.rows[1].get("Shipped"),
        Some(&CellValue::DateTime(datetime(2024, 5, 13, 0)))
    );
}

#[test]
fn test_dates_survive_every_output_format() {
    let dir = TempDir::new().unwrap();
    let workbook = WorkbookImporter::new(write_dates_workbook(dir.path()))
        .import()
        .unwrap();
    let config = ConfigLoader::new().load_str(DATES_MAPPING).unwrap();
    let table = ExtractionEngine::new(&config).run(&workbook).unwrap();

    let xlsx_path = dir.path().join("dates-out.xlsx");
    write_table(&table, &xlsx_path, "Dates").unwrap();
    let written = WorkbookImporter::new(&xlsx_path).import().unwrap();
    let sheet = &written.sheets[0];
    for (row_idx, row) in table.rows.iter().enumerate() {
        let read_back: Vec<_> = (0..3)
            .map(|col| sheet.get(row_idx + 1, col).cloned().unwrap())
            .collect();
        let extracted: Vec<_> = row.values().cloned().collect();
        assert_eq!(read_back, extracted);
    }

    let json_path = dir.path().join("dates-out.json");
    write_table(&table, &json_path, "Dates").unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["rows"][0][0], "1900-01-15T00:00:00");
    assert_eq!(json["rows"][0][1], "1899-12-31T12:00:00");
    assert_eq!(json["rows"][1][2], "2024-05-13T00:00:00");

    let csv_path = dir.path().join("dates-out.csv");
    write_table(&table, &csv_path, "Dates").unwrap();
    assert_eq!(
        std::fs::read_to_string(&csv_path).unwrap(),
        "Founded,Opens,Shipped\n\
         1900-01-15 00:00:00,1899-12-31 12:00:00,2024-05-06 00:00:00\n\
         1900-01-15 00:00:00,1899-12-31 12:00:00,2024-05-13 00:00:00\n"
    );
}
