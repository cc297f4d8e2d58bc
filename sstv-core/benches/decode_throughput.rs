use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sstv_core::{DecoderOptions, Mode, NoopObserver};

const SAMPLE_RATE: f64 = 48_000.0;

fn synth_silence(seconds: f64) -> Vec<f32> {
    vec![0.0f32; (seconds * SAMPLE_RATE) as usize]
}

fn benchmark_push_samples_block(c: &mut Criterion) {
    let samples = synth_silence(1.0);

    let mut group = c.benchmark_group("push_samples_block");
    for block_size in [256usize, 1024, 4096].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(block_size), block_size, |b, &block_size| {
            let mut decoder =
                sstv_core::Decoder::new(SAMPLE_RATE, Mode::Robot36, DecoderOptions::default(), NoopObserver).unwrap();
            decoder.start();
            b.iter(|| {
                for block in samples.chunks(block_size) {
                    decoder.push_samples(black_box(block));
                }
            })
        });
    }
    group.finish();
}

fn benchmark_push_samples_by_mode(c: &mut Criterion) {
    let samples = synth_silence(1.0);
    let modes = [Mode::Robot36, Mode::Robot72, Mode::ScottieS1, Mode::Pd120, Mode::Pd160, Mode::Pd180];

    let mut group = c.benchmark_group("push_samples_by_mode");
    for mode in modes {
        group.bench_function(format!("{:?}", mode), |b| {
            let mut decoder =
                sstv_core::Decoder::new(SAMPLE_RATE, mode, DecoderOptions::default(), NoopObserver).unwrap();
            decoder.start();
            b.iter(|| {
                for block in samples.chunks(4096) {
                    decoder.push_samples(black_box(block));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_push_samples_block, benchmark_push_samples_by_mode);
criterion_main!(benches);
