//! Event rendering benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use aligned_log::pretty::PrettyPrinter;
use aligned_log::{AlignedHandler, Attr, HandlerOptions, Level, Record, Value, WidthMode};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn handler(width: usize) -> AlignedHandler {
    AlignedHandler::new(
        Vec::<u8>::new(),
        HandlerOptions::default()
            .level(Level::Debug)
            .width(WidthMode::Fixed(width))
            .module_root("/app"),
    )
    .unwrap()
}

fn sample_record() -> Record {
    Record::new(Level::Info, "request served")
        .with_location("/app/src/server/http.rs", 214)
        .attr("method", "GET")
        .attr("path", "/api/v1/users")
        .attr("status", 200)
        .attr("elapsed", std::time::Duration::from_micros(1830))
}

fn header_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_header");
    for width in [0usize, 80, 200] {
        let h = handler(width);
        let record =
            Record::new(Level::Warn, "disk almost full").with_location("/app/src/disk.rs", 9);
        group.bench_with_input(BenchmarkId::from_parameter(width), &record, |b, record| {
            b.iter(|| h.render(black_box(record)).unwrap());
        });
    }
    group.finish();
}

fn with_attrs(c: &mut Criterion) {
    let h = handler(120)
        .with_group("http")
        .with_attrs([Attr::new("service", "users"), Attr::new("region", "eu-west-1")]);
    let record = sample_record();

    c.bench_function("render_with_attrs", |b| {
        b.iter(|| h.render(black_box(&record)).unwrap());
    });
}

fn map_values(c: &mut Criterion) {
    let map = Value::map((0..20).map(|i| (format!("key_{i:02}"), Value::from(i * 31))));
    let h = handler(120);
    let record = Record::new(Level::Debug, "config").attr("settings", map.clone());

    c.bench_function("render_map_value", |b| {
        b.iter(|| h.render(black_box(&record)).unwrap());
    });

    let json = serde_json::to_string(&map).unwrap();
    c.bench_function("pretty_print_20_keys", |b| {
        let printer = PrettyPrinter::default();
        b.iter(|| printer.format_str(black_box(&json)).unwrap());
    });
}

fn derivation(c: &mut Criterion) {
    let h = handler(80).with_attrs((0..8).map(|i| Attr::new(format!("k{i}"), i)));

    c.bench_function("derive_group_and_attrs", |b| {
        b.iter(|| {
            black_box(&h)
                .with_group("child")
                .with_attrs([Attr::new("extra", true)])
        });
    });
}

criterion_group!(benches, header_only, with_attrs, map_values, derivation);
criterion_main!(benches);
