use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use service::records::{repo::file::JsonFileRecordRepository, repository::RecordRepository, domain::FormRecord};

fn record(i: usize) -> FormRecord {
    FormRecord {
        name: format!("bench {i}"),
        email: "bench@example.com".into(),
        message: "x".repeat(200),
        submitted_at: "2026-10-15T10:00:00.000Z".into(),
        submitted_by: None,
    }
}

/// Every append rewrites the full file, so cost grows with store size.
fn bench_append(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("records_append");

    for prefill in [10usize, 1_000, 10_000] {
        let path = std::env::temp_dir().join(format!("bench_records_{}.json", uuid::Uuid::new_v4()));
        let repo = rt.block_on(JsonFileRecordRepository::new(&path)).unwrap();
        let seed: Vec<FormRecord> = (0..prefill).map(record).collect();
        rt.block_on(service::storage::write_array(&path, &seed)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(prefill), &prefill, |b, _| {
            b.to_async(&rt).iter(|| async { repo.append(record(0)).await.unwrap() });
        });
        let _ = std::fs::remove_file(&path);
    }
    group.finish();
}

criterion_group!(benches, bench_append);
criterion_main!(benches);
