// benches/roundtrip.rs
//! Round-trip (encrypt → decrypt) benchmarks for the AES-256-CBC adapters.

use cipherpipe::aliases::{Aes256Key32, Iv16};
use cipherpipe::{
    Buffer, CbcDecryptor, CbcEncryptor, CipherSink, CipherSource, Padding, Sink, Source,
};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

// --- Size constants ---
const KB: usize = 1024;
const MB: usize = 1024 * 1024;

fn format_size(bytes: usize) -> String {
    if bytes >= MB {
        format!("{} MiB", bytes / MB)
    } else if bytes >= KB {
        format!("{} KiB", bytes / KB)
    } else {
        format!("{bytes} B")
    }
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("roundtrip");

    let key = Aes256Key32::new([0x42u8; 32]);
    let iv = Iv16::new([0x24u8; 16]);

    let sizes = [KB, 64 * KB, MB, 10 * MB];

    for &size in &sizes {
        let input = vec![0x41u8; size]; // repeating 'A'

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::new("size", format_size(size)),
            &size,
            |b, _| {
                b.iter(|| {
                    // ----- encrypt -------------------------------------------------
                    let mut encrypted = Buffer::new();
                    {
                        let encryptor = CbcEncryptor::aes256(&key, &iv);
                        let mut sink =
                            CipherSink::new(encryptor, &mut encrypted, Padding::Pkcs7).unwrap();

                        let mut staging = Buffer::new();
                        staging.write_slice(black_box(&input));
                        sink.write(&mut staging, size).unwrap();
                        sink.close().unwrap();
                    }

                    // ----- decrypt -------------------------------------------------
                    let decryptor = CbcDecryptor::aes256(&key, &iv);
                    let mut source =
                        CipherSource::new(decryptor, encrypted, Padding::Pkcs7).unwrap();

                    let mut decrypted = Buffer::new();
                    while source
                        .read(&mut decrypted, 64 * KB)
                        .unwrap()
                        .is_some()
                    {}

                    black_box(decrypted.size());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_roundtrip);
criterion_main!(benches);
