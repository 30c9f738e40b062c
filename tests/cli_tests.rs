//! CLI tests: command handlers and the excel-mapper binary

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use excel_mapper::cli::commands;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TEMPLATE: &str = r#"
name: employee
fields:
  - key: id
    tag: "*ID"
    type: integer
  - key: name
    tag: "*Name"
    type: text
  - key: salary
    tag: Salary
    type: float
  - key: hired
    tag: Hired
    type: time
"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

// ═══════════════════════════════════════════════════════════════════════════
// COMMAND HANDLERS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_columns_command() {
    let temp_dir = TempDir::new().unwrap();
    let template = write(temp_dir.path(), "employee.yaml", TEMPLATE);
    assert!(commands::columns(template.clone(), vec![]).is_ok());
    assert!(commands::columns(template, vec!["Salary".into()]).is_ok());
}

#[test]
fn test_columns_bad_template() {
    let temp_dir = TempDir::new().unwrap();
    let template = write(temp_dir.path(), "list.yaml", "- id\n- name\n");
    let err = commands::columns(template, vec![]).unwrap_err();
    assert!(err.to_string().contains("target type not supported"));
}

#[test]
fn test_unknown_exclude_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let template = write(temp_dir.path(), "employee.yaml", TEMPLATE);
    let err = commands::columns(template, vec!["Salry".into()]).unwrap_err();
    assert!(matches!(err, excel_mapper::MapperError::ColumnNotMatched(ref name) if name == "Salry"));
}

#[test]
fn test_export_then_import() {
    let temp_dir = TempDir::new().unwrap();
    let template = write(temp_dir.path(), "employee.yaml", TEMPLATE);
    let records = write(
        temp_dir.path(),
        "staff.json",
        r#"[{"id": 1, "name": "Ada", "salary": 1500.5, "hired": "2022-07-30 14:48:00"},
            {"id": 2, "name": "Bob"}]"#,
    );
    let xlsx = temp_dir.path().join("staff.xlsx");
    let json_out = temp_dir.path().join("staff-back.json");

    commands::export(
        template.clone(),
        records,
        xlsx.clone(),
        "Staff".into(),
        vec![],
        true,
    )
    .unwrap();
    assert!(xlsx.exists());

    commands::import(template, xlsx, Some(json_out.clone()), vec![], true).unwrap();
    let back: serde_json::Value = serde_json::from_str(&fs::read_to_string(json_out).unwrap()).unwrap();
    assert_eq!(back[0]["id"], 1);
    assert_eq!(back[0]["salary"], 1500.5);
    assert_eq!(back[0]["hired"], "2022-07-30 14:48:00");
    assert_eq!(back[1]["name"], "Bob");
    assert!(back[1]["hired"].is_null());
}

#[test]
fn test_import_missing_required_column() {
    let temp_dir = TempDir::new().unwrap();
    let template = write(temp_dir.path(), "employee.yaml", TEMPLATE);
    let csv = write(temp_dir.path(), "staff.csv", "ID,Salary\n1,10\n");
    let err = commands::import(template, csv, None, vec![], false).unwrap_err();
    assert!(err.to_string().contains("missing required column [Name]"));
}

#[test]
fn test_export_string_source() {
    let temp_dir = TempDir::new().unwrap();
    let template = write(temp_dir.path(), "employee.yaml", TEMPLATE);
    let records = write(temp_dir.path(), "text.json", r#""just a string""#);
    let err = commands::export(
        template,
        records,
        temp_dir.path().join("out.xlsx"),
        "Sheet1".into(),
        vec![],
        false,
    )
    .unwrap_err();
    assert!(err.to_string().contains("source type not supported"));
}

// ═══════════════════════════════════════════════════════════════════════════
// BINARY
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_binary_help() {
    Command::cargo_bin("excel-mapper")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn test_binary_import_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let template = write(temp_dir.path(), "employee.yaml", TEMPLATE);
    let csv = write(
        temp_dir.path(),
        "staff.csv",
        "Name,ID,Unknown\nAda,1,x\nGrace,2,y\n",
    );

    Command::cargo_bin("excel-mapper")
        .unwrap()
        .args(["import"])
        .arg(&template)
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Grace\""))
        .stdout(predicate::str::contains("\"id\": 2"));
}

#[test]
fn test_binary_import_reports_bad_cell() {
    let temp_dir = TempDir::new().unwrap();
    let template = write(temp_dir.path(), "employee.yaml", TEMPLATE);
    let csv = write(temp_dir.path(), "staff.csv", "ID,Name\nabc,Ada\n");

    Command::cargo_bin("excel-mapper")
        .unwrap()
        .arg("import")
        .arg(&template)
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected integer, at [2,1]"));
}

#[test]
fn test_binary_export_csv_with_sheet_env() {
    let temp_dir = TempDir::new().unwrap();
    let template = write(temp_dir.path(), "employee.yaml", TEMPLATE);
    let records = write(temp_dir.path(), "one.json", r#"{"id": 9, "name": "Cy"}"#);
    let out = temp_dir.path().join("one.csv");

    Command::cargo_bin("excel-mapper")
        .unwrap()
        .env("EXCEL_MAPPER_SHEET", "People")
        .arg("export")
        .arg(&template)
        .arg(&records)
        .arg(&out)
        .args(["--exclude", "Hired"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sheet 'People'"));

    let content = fs::read_to_string(&out).unwrap();
    assert_eq!(content, "ID,Name,Salary\n9,Cy,\n");
}
