use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use plookup::{pcs::Srs, prove_lookup_vector, verify_lookup_vector, F};
use rand::{rngs::StdRng, Rng, SeedableRng};

const LOG_SIZES: [u32; 3] = [8, 10, 12];

fn instance(rng: &mut StdRng, n: usize) -> (Vec<F>, Vec<F>) {
    let t: Vec<F> = (0..n as u64).map(F::from).collect();
    let f: Vec<F> = (0..n - 1).map(|_| t[rng.gen_range(0..n)]).collect();
    (f, t)
}

fn lookup_bench(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1234);
    let max_log = LOG_SIZES[LOG_SIZES.len() - 1];
    let srs = Srs::setup(&mut rng, 2 << max_log);
    let vk = srs.verifier_key().unwrap();

    let mut group = c.benchmark_group("plookup");
    group.sample_size(10);

    for log_n in LOG_SIZES {
        let (f, t) = instance(&mut rng, 1 << log_n);
        group.bench_with_input(BenchmarkId::new("prove", log_n), &log_n, |b, _| {
            b.iter(|| prove_lookup_vector(&srs, &f, &t).unwrap());
        });

        let proof = prove_lookup_vector(&srs, &f, &t).unwrap();
        group.bench_with_input(BenchmarkId::new("verify", log_n), &log_n, |b, _| {
            b.iter(|| verify_lookup_vector(&vk, &proof).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, lookup_bench);
criterion_main!(benches);
