// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for list-table resolution in the reportwerk-document
// crate: row merging over long runs of repeated values.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use reportwerk_document::{CellValue, ListTable, RowRecord};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// `count` rows whose department repeats in runs of 25 and whose grade
/// carries a group tag per department, so equal grades across departments
/// stay separate.
fn staff_rows(count: usize) -> Vec<RowRecord> {
    (0..count)
        .map(|i| {
            let department = i / 25;
            RowRecord::new()
                .with("dept", format!("Department {department}"))
                .with("grade", CellValue::grouped(format!("G{}", (i / 5) % 3), department))
                .with("name", format!("Employee {i}"))
        })
        .collect()
}

fn staff_table(rows: Vec<RowRecord>) -> ListTable {
    ListTable::new([("Department", "dept"), ("Grade", "grade"), ("Name", "name")])
        .widths(vec![2.0, 1.0, 3.0])
        .rows(rows)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Resolve a 1000-row table with and without row merging.
fn bench_list_table(c: &mut Criterion) {
    let rows = staff_rows(1000);

    c.bench_function("list_table plain (1000 rows)", |b| {
        b.iter(|| {
            let table = staff_table(black_box(rows.clone()));
            black_box(table.build())
        });
    });

    c.bench_function("list_table merged (1000 rows)", |b| {
        b.iter(|| {
            let table = staff_table(black_box(rows.clone())).merge_columns(["dept", "grade"]);
            black_box(table.build())
        });
    });
}

criterion_group!(benches, bench_list_table);
criterion_main!(benches);
