use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use fraudscore::domain::{FeatureMode, TransactionRequest};
use fraudscore::model::ModelLoader;
use fraudscore::scoring::{decide_for, FeatureDeriver, ModelScorer, Scorer, ScoringPipeline};

fn sample_scorer() -> ModelScorer {
    let loader = ModelLoader::new(
        concat!(env!("CARGO_MANIFEST_DIR"), "/artifacts/fraud_model.json"),
        FeatureMode::Engineered,
    );
    ModelScorer::new(loader.load().expect("sample artifact loads"))
}

fn bench_feature_derivation(c: &mut Criterion) {
    let request = TransactionRequest::new(150_000.0, 2).with_auxiliary([0.1, 0.2, 0.3, 0.4, 0.5]);

    let engineered = FeatureDeriver::new(FeatureMode::Engineered);
    c.bench_function("derive_engineered", |b| {
        b.iter(|| engineered.derive(black_box(&request)))
    });

    let passthrough = FeatureDeriver::new(FeatureMode::Passthrough);
    c.bench_function("derive_passthrough", |b| {
        b.iter(|| passthrough.derive(black_box(&request)))
    });
}

fn bench_forest_scoring(c: &mut Criterion) {
    let scorer = sample_scorer();
    let features = FeatureDeriver::new(FeatureMode::Engineered)
        .derive(&TransactionRequest::new(60_000.0, 12));

    c.bench_function("random_forest_score", |b| {
        b.iter(|| scorer.score(black_box(&features)))
    });
}

fn bench_decision_mapping(c: &mut Criterion) {
    let request = TransactionRequest::new(150_000.0, 2);

    c.bench_function("decide_with_reasons", |b| {
        b.iter(|| decide_for(black_box(0.4733), black_box(&request)))
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let pipeline = ScoringPipeline::new(
        FeatureDeriver::new(FeatureMode::Engineered),
        Arc::new(sample_scorer()),
    );
    let requests = [
        TransactionRequest::new(200.0, 14),
        TransactionRequest::new(150_000.0, 2),
        TransactionRequest::new(400_000.0, 23),
    ];

    c.bench_function("full_scoring_pipeline", |b| {
        b.iter(|| {
            for request in &requests {
                let _ = pipeline.score_transaction(black_box(request));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_feature_derivation,
    bench_forest_scoring,
    bench_decision_mapping,
    bench_full_pipeline,
);

criterion_main!(benches);
