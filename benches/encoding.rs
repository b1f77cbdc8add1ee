//! Benchmarks for the line protocol encoder and the CSV response decoder.
//!
//! These run without a server: `cargo bench`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use influxql_client::{CsvResponseDecoder, DataPoint, LineProtocolEncoder, Tag};
use rand::Rng;

const MEASUREMENTS: [&str; 4] = ["temperature", "humidity", "pressure", "co2"];

/// Generate `count` points with random values
fn generate_points(count: usize) -> Vec<DataPoint> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            DataPoint::new(
                MEASUREMENTS[i % MEASUREMENTS.len()],
                rng.gen_range(-40.0..120.0),
            )
        })
        .collect()
}

/// Generate a query response with `columns` columns
fn generate_response(columns: usize) -> String {
    let mut rng = rand::thread_rng();
    let header: Vec<String> = (0..columns).map(|i| format!("col{}", i)).collect();
    let row: Vec<String> = (0..columns)
        .map(|_| format!("{:.3}", rng.gen_range(0.0..1000.0)))
        .collect();
    format!("{}\n{}", header.join(","), row.join(","))
}

fn bench_encode_points(c: &mut Criterion) {
    let tag = Tag::new("room", "keller");
    let mut group = c.benchmark_group("encode_points");

    for count in [1, 100, 10_000] {
        let points = generate_points(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &points, |b, points| {
            b.iter(|| LineProtocolEncoder::encode_points(black_box(points), &tag))
        });
    }

    group.finish();
}

fn bench_encode_fields(c: &mut Criterion) {
    let tag = Tag::new("room", "keller");
    let fields = generate_points(16);

    c.bench_function("encode_fields_16", |b| {
        b.iter(|| LineProtocolEncoder::encode_fields("climate", &tag, black_box(&fields)))
    });
}

fn bench_decode_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_last_field");

    for columns in [5, 50, 500] {
        let response = generate_response(columns);
        group.bench_with_input(
            BenchmarkId::from_parameter(columns),
            &response,
            |b, response| {
                b.iter(|| {
                    CsvResponseDecoder::new(black_box(response))
                        .float(columns)
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_encode_points,
    bench_encode_fields,
    bench_decode_field
);
criterion_main!(benches);
