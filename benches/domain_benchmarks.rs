use criterion::{Criterion, black_box, criterion_group, criterion_main};
use doctor_directory::domain::{CreateDoctorRequest, Doctor};
use doctor_directory::infra::search::{parse_search_hits, specialty_match_query};
use validator::Validate;

fn bench_validation(c: &mut Criterion) {
    let request = CreateDoctorRequest::new("Asha Rao", "Interventional Cardiology", "Mumbai");

    c.bench_function("validate_create_doctor_request", |b| {
        b.iter(|| {
            let _ = black_box(&request).validate();
        })
    });
}

fn bench_query_building(c: &mut Criterion) {
    c.bench_function("specialty_match_query", |b| {
        b.iter(|| specialty_match_query(black_box(Some("Cardiology"))))
    });
}

fn bench_hit_parsing(c: &mut Criterion) {
    let hits: Vec<serde_json::Value> = (1..=100)
        .map(|id| {
            let doctor = Doctor::new(id, format!("Doctor {id}"), "Cardiology", "Mumbai");
            serde_json::json!({
                "_index": "doctors",
                "_id": doctor.document_id(),
                "_score": 1.0,
                "_source": doctor,
            })
        })
        .collect();
    let body = serde_json::json!({
        "took": 3,
        "timed_out": false,
        "hits": { "total": { "value": 100, "relation": "eq" }, "hits": hits }
    });

    c.bench_function("parse_100_search_hits", |b| {
        b.iter(|| parse_search_hits(black_box(body.clone())))
    });
}

criterion_group!(
    benches,
    bench_validation,
    bench_query_building,
    bench_hit_parsing
);
criterion_main!(benches);
