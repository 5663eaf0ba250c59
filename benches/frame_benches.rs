//! Frame codec benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slmp::{
    build_read_word, build_write_word, extract_word, DeviceAddress, ResponseFrame,
};

fn bench_parse_address(c: &mut Criterion) {
    c.bench_function("parse_address", |b| {
        b.iter(|| DeviceAddress::parse(black_box("D12345")).unwrap())
    });
}

fn bench_build(c: &mut Criterion) {
    let address = DeviceAddress::parse("D100").unwrap();

    let mut group = c.benchmark_group("build");
    group.bench_function("read_word", |b| {
        b.iter(|| build_read_word(black_box(&address)))
    });
    group.bench_function("write_word", |b| {
        b.iter(|| build_write_word(black_box(&address), black_box(0x1234)))
    });
    group.finish();
}

fn bench_parse_response(c: &mut Criterion) {
    let raw = [
        0xD0, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00, 0x04, 0x00, 0x00, 0x00, 0x2A, 0x00,
    ];

    c.bench_function("parse_and_extract_word", |b| {
        b.iter(|| {
            let response = ResponseFrame::from_bytes(black_box(&raw)).unwrap();
            extract_word(&response).unwrap()
        })
    });
}

criterion_group!(benches, bench_parse_address, bench_build, bench_parse_response);
criterion_main!(benches);
