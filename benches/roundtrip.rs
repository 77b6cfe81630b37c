use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use ruhuff::decoding::decompress;
use ruhuff::encoding::FrameCompressor;

/// Random bytes with a geometric-ish distribution, so codes have varying lengths
fn skewed_data(len: usize) -> Vec<u8> {
    let mut rng = rand::rngs::SmallRng::seed_from_u64(0xDEADBEEF);
    (0..len)
        .map(|_| {
            let mut symbol = 0u8;
            while symbol < 255 && rng.gen_bool(0.7) {
                symbol += 1;
            }
            symbol
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    const DATA_SIZE: usize = 1024 * 1024;
    let data = skewed_data(DATA_SIZE);
    let compressor = FrameCompressor::new().with_checksum(false);
    let frame = compressor.compress(&data).unwrap();

    let mut group = c.benchmark_group("huffman");
    group.throughput(Throughput::Bytes(DATA_SIZE as u64));
    group.bench_function("compress", |b| {
        b.iter(|| compressor.compress(black_box(&data)).unwrap())
    });
    group.bench_function("decompress", |b| {
        b.iter(|| decompress(black_box(&frame)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
