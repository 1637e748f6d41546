//! This bench builds a large structured report tree and round-trips it
//! through the attribute container form.

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use srtree::{
    domain::{NumericMeasurement, ReadOptions},
    AddMode, CodedEntry, Dataset, DocumentTree, DocumentType, RelationshipType, ValueType,
};

fn concept(value: usize) -> Option<CodedEntry> {
    Some(CodedEntry::new(format!("C{value}"), "99BENCH", format!("Concept {value}")))
}

/// Builds a report with `sections` containers of ten measurements each.
fn build(sections: usize) -> DocumentTree {
    let mut tree = DocumentTree::new(DocumentType::ComprehensiveSR);
    tree.add_content_item(
        RelationshipType::IsRoot,
        ValueType::Container,
        concept(0),
        AddMode::AfterCurrent,
    )
    .unwrap();
    for section in 1..=sections {
        let mode = if section == 1 { AddMode::BelowCurrent } else { AddMode::AfterCurrent };
        tree.add_content_item(
            RelationshipType::Contains,
            ValueType::Container,
            concept(section),
            mode,
        )
        .unwrap();
        for measurement in 0..10 {
            let mode = if measurement == 0 { AddMode::BelowCurrent } else { AddMode::AfterCurrent };
            tree.add_content_item(
                RelationshipType::Contains,
                ValueType::Num,
                concept(measurement),
                mode,
            )
            .unwrap();
            tree.current_content_item()
                .unwrap()
                .set_numeric_value(
                    NumericMeasurement::new(
                        measurement.to_string(),
                        CodedEntry::new("mm", "UCUM", "millimeter"),
                    ),
                    false,
                )
                .unwrap();
        }
        tree.go_up();
    }
    tree
}

fn build_tree(c: &mut Criterion) {
    c.bench_function("build 1000 content items", |b| b.iter(|| build(100)));
}

fn round_trip(c: &mut Criterion) {
    c.bench_function("write and read 1000 content items", |b| {
        b.iter_batched(
            || build(100),
            |mut tree| {
                let mut dataset = Dataset::new();
                tree.write(&mut dataset, None).unwrap();
                let mut read = DocumentTree::default();
                read.read(&dataset, DocumentType::ComprehensiveSR, &ReadOptions::default())
                    .unwrap();
                read
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, build_tree, round_trip);
criterion_main!(benches);
