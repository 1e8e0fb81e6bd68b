// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reportwerk demo — renders a sample report exercising every table feature.
//
// Usage: reportwerk-demo [OUTPUT.pdf] [CONFIG.json]

use std::path::PathBuf;
use std::process::ExitCode;

use reportwerk_core::{ReportConfig, Result, TextStyle};
use reportwerk_document::table::{TableCell, TableRow};
use reportwerk_document::{CellValue, FormTable, Report, RowRecord, TableLayout};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Reportwerk demo starting");

    let mut args = std::env::args().skip(1);
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("demo.pdf"));
    let config = args.next().map(PathBuf::from);

    match run(output, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "Demo report failed");
            ExitCode::FAILURE
        }
    }
}

fn run(output: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config = match config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig {
            title: "Reportwerk demo".into(),
            cover_title: "Reportwerk Demo Report".into(),
            cover_lines: vec!["Generated by reportwerk-demo".into()],
            page_header: Some("Reportwerk".into()),
            watermark: Some("SAMPLE".into()),
            ..ReportConfig::default()
        },
    };

    let mut report = Report::new(config)?;
    headings(&mut report)?;
    basic_table(&mut report)?;
    form_tables(&mut report)?;
    list_tables(&mut report)?;

    report.write_pdf_to_file(&output)?;
    tracing::info!(path = %output.display(), "Demo report written");
    Ok(())
}

fn headings(report: &mut Report) -> Result<()> {
    for chapter in ["Chapter one", "Chapter two"] {
        let node = report.add_chapter(chapter)?;
        report.paragraph(&node, format!("{chapter} description."))?;
        for section in ["First section", "Second section"] {
            let node = report.add_section(section)?;
            report.paragraph(&node, format!("{section} of {}.", chapter.to_lowercase()))?;
        }
    }
    Ok(())
}

/// A hand-built grid: header row plus two body rows, one in header style.
fn basic_table(report: &mut Report) -> Result<()> {
    let chapter = report.add_chapter("Basic tables")?;
    report.paragraph(&chapter, "A plain three-column grid.")?;

    let row = |texts: [&str; 3], style| TableRow {
        cells: texts
            .iter()
            .enumerate()
            .map(|(column, text)| TableCell::new(column, *text, style))
            .collect(),
    };
    let table = TableLayout {
        widths: vec![1.0; 3],
        header: Some(row(["Column 1", "Column 2", "Column 3"], TextStyle::TableHeader)),
        rows: vec![
            row(["Value 1", "Value 2", "Value 3"], TextStyle::TableBody),
            row(["Value 4", "Value 5", "Value 6"], TextStyle::PageHeader),
        ],
    };
    report.append(&chapter, table)
}

fn form_tables(report: &mut Report) -> Result<()> {
    let chapter = report.add_chapter("Form tables")?;
    report.paragraph(&chapter, "Label and value pairs laid out across six columns.")?;

    let person = [
        ("Name", "Zhang San"),
        ("Sex", "Male"),
        ("Ethnicity", "Han"),
        ("Age", "18"),
        ("Nationality", "China"),
        ("Phone", "18888888888"),
    ];

    let section = report.add_section("Basic usage")?;
    report.paragraph(&section, "Every field takes one label and two value columns.")?;
    let mut form = FormTable::new(6);
    for (label, value) in person {
        form.push_field(label, value);
    }
    report.append(&section, form.build()?)?;

    let section = report.add_section("Custom column widths")?;
    report.paragraph(&section, "Column widths are relative weights.")?;
    let mut form = FormTable::new(6).widths(vec![4.0, 2.0, 2.5, 4.0, 2.0, 2.5]);
    for (label, value) in person {
        form.push_field(label, value);
    }
    report.append(&section, form.build()?)?;

    let section = report.add_section("Custom spans")?;
    report.paragraph(&section, "Spans use label-value notation such as 1-3.")?;
    let form = FormTable::new(6)
        .widths(vec![4.0, 2.0, 2.5, 4.0, 2.0, 2.5])
        .field("Name", "Zhao Liu", "1-3".parse()?)
        .field("Sex", "Female", "1-1".parse()?)
        .field("Ethnicity", "Han", Default::default())
        .field("Age", "18", Default::default())
        .field("Nationality", "China", Default::default())
        .field("Phone", "18999999999", Default::default());
    report.append(&section, form.build()?)
}

fn person(name: &str, age: &str, sex: impl Into<CellValue>) -> RowRecord {
    RowRecord::new()
        .with("name", name)
        .with("age", age)
        .with("sex", sex)
}

fn list_tables(report: &mut Report) -> Result<()> {
    let chapter = report.add_chapter("List tables")?;
    report.paragraph(&chapter, "Records rendered one per row with a generated index.")?;

    let header = [("Name", "name"), ("Age", "age"), ("Sex", "sex")];
    let people = vec![
        person("Zhang San", "18", "Male"),
        person("Li Si", "18", "Female"),
        person("Wang Wu", "18", "Female"),
    ];

    let section = report.add_section("Basic usage")?;
    report.paragraph(&section, "Equal column widths, header shown.")?;
    let table = report.list_table(header).rows(people.clone()).build()?;
    report.append(&section, table)?;

    let section = report.add_section("Custom widths")?;
    report.paragraph(&section, "The index column keeps a fixed share of the width.")?;
    let table = report
        .list_table(header)
        .widths(vec![2.0, 0.8, 1.0])
        .rows(people.clone())
        .build()?;
    report.append(&section, table)?;

    let section = report.add_section("Automatic row merge")?;
    report.paragraph(&section, "Runs of equal values merge into one cell.")?;
    let table = report
        .list_table(header)
        .merge_rows(true)
        .rows(people.clone())
        .build()?;
    report.append(&section, table)?;

    let section = report.add_section("Merge selected columns")?;
    report.paragraph(&section, "Only the sex column merges.")?;
    let table = report
        .list_table(header)
        .widths(vec![2.0, 0.8, 1.0])
        .merge_columns(["sex"])
        .rows(people.clone())
        .build()?;
    report.append(&section, table)?;

    let section = report.add_section("Hidden header")?;
    report.paragraph(&section, "The header row can be left out.")?;
    let table = report
        .list_table(header)
        .show_header(false)
        .rows(people)
        .build()?;
    report.append(&section, table)?;

    let section = report.add_section("Grouped merge")?;
    report.paragraph(&section, "Equal values merge only inside the same group.")?;
    let table = report
        .list_table(header)
        .widths(vec![2.0, 0.8, 1.0])
        .merge_columns(["sex"])
        .rows([
            person("Zhang San", "18", CellValue::grouped("Male", "group1")),
            person("Zhang San", "18", CellValue::grouped("Male", "group1")),
            person("Li Si", "18", CellValue::grouped("Male", "group2")),
            person("Li Si", "18", CellValue::grouped("Male", "group2")),
        ])
        .build()?;
    report.append(&section, table)?;

    let section = report.add_section("Custom index")?;
    report.paragraph(&section, "Rows may supply their own index text.")?;
    let table = report
        .list_table(header)
        .rows([
            person("Zhang San", "18", CellValue::grouped("Male", "group1")).with_index("1"),
            person("Zhang San", "18", CellValue::grouped("Male", "group1")).with_index("1.1"),
            person("Li Si", "18", "Male").with_index("2"),
            person("Li Si", "18", "Female").with_index("2.1"),
        ])
        .build()?;
    report.append(&section, table)
}
