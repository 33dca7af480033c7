use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;
use streamzip::{ArchiveWriter, EntryOptions};
use tokio::runtime::Runtime;

fn generate_compressible_data(size: usize) -> Vec<u8> {
    let pattern = b"The quick brown fox jumps over the lazy dog. ";
    let mut data = Vec::with_capacity(size);
    while data.len() < size {
        data.extend_from_slice(pattern);
    }
    data.truncate(size);
    data
}

fn generate_random_data(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = 0x12345678u32;
    for _ in 0..size {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((state >> 16) as u8);
    }
    data
}

async fn write_single_entry(data: &[u8], store: bool) -> Vec<u8> {
    let archive = ArchiveWriter::new(Vec::new());
    let mut options = EntryOptions::new("test.bin");
    if store {
        options = options.stored();
    }
    archive.add_entry(options, Cursor::new(data.to_vec())).await.unwrap();
    archive.finalize(None).await.unwrap();
    Vec::new()
}

fn bench_compression_methods(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let sizes = vec![
        1024,
        10 * 1024,
        100 * 1024,
        1024 * 1024,
        10 * 1024 * 1024,
    ];

    for size in sizes {
        let mut group = c.benchmark_group(format!("write_compressible_{}", format_size(size)));
        group.throughput(Throughput::Bytes(size as u64));

        let data = generate_compressible_data(size);

        group.bench_with_input(BenchmarkId::new("deflate", size), &data, |b, data| {
            b.iter(|| rt.block_on(write_single_entry(black_box(data), false)));
        });

        group.bench_with_input(BenchmarkId::new("store", size), &data, |b, data| {
            b.iter(|| rt.block_on(write_single_entry(black_box(data), true)));
        });

        group.finish();
    }
}

fn bench_random_data_compression(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let sizes = vec![100 * 1024, 1024 * 1024];

    for size in sizes {
        let mut group = c.benchmark_group(format!("write_random_{}", format_size(size)));
        group.throughput(Throughput::Bytes(size as u64));

        let data = generate_random_data(size);

        group.bench_with_input(BenchmarkId::new("deflate", size), &data, |b, data| {
            b.iter(|| rt.block_on(write_single_entry(black_box(data), false)));
        });

        group.finish();
    }
}

fn bench_multiple_entries(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("write_multiple_entries");

    let entry_count = 100;
    let entry_size = 10 * 1024;
    group.throughput(Throughput::Bytes((entry_count * entry_size) as u64));

    let data = generate_compressible_data(entry_size);

    group.bench_function("deflate_100_entries", |b| {
        b.iter(|| {
            rt.block_on(async {
                let archive = ArchiveWriter::new(Vec::new());
                for i in 0..entry_count {
                    archive
                        .add_entry(
                            EntryOptions::new(format!("file_{}.txt", i)),
                            Cursor::new(black_box(data.clone())),
                        )
                        .await
                        .unwrap();
                }
                archive.finalize(None).await.unwrap();
            });
        });
    });

    group.finish();
}

fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{}B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{}KB", bytes / 1024)
    } else {
        format!("{}MB", bytes / (1024 * 1024))
    }
}

criterion_group!(
    benches,
    bench_compression_methods,
    bench_random_data_compression,
    bench_multiple_entries
);
criterion_main!(benches);
