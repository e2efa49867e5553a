// Postgres-backed flows. They start a PostgreSQL container, so they only run
// with `cargo test -- --ignored` on a machine with Docker.

use crate::e2e::helpers;

use futures::future::join_all;
use helpers::fixtures::cover_item;
use helpers::PgTestContext;
use hyper::StatusCode;
use learnflow_backend::domain::jobs::JobKind;
use learnflow_backend::infrastructure::repositories::{JobRepository, PgJobRepository};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use test_context::test_context;
use uuid::Uuid;

#[test_context(PgTestContext)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires Docker"]
async fn it_should_never_hand_the_same_job_to_two_claimers(ctx: &PgTestContext) {
    let items: Vec<_> = (0..20).map(|i| cover_item(&format!("slug-{i}"))).collect();
    let response = ctx
        .client
        .post("/api/agents/enqueue", &json!({ "kind": "cover", "items": items }))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body()["count"], 20);

    let repo = Arc::new(PgJobRepository::new(Arc::new(ctx.pool.clone())));
    let claims = (0..6).map(|_| {
        let repo = repo.clone();
        tokio::spawn(async move { repo.take_jobs(JobKind::Cover, 5).await.unwrap() })
    });

    let mut seen = HashSet::new();
    let mut total = 0;
    for batch in join_all(claims).await {
        for job in batch.unwrap() {
            total += 1;
            assert!(seen.insert(job.id), "job {} claimed twice", job.id);
        }
    }
    assert_eq!(total, 20);
    assert!(repo.take_jobs(JobKind::Cover, 5).await.unwrap().is_empty());
}

#[test_context(PgTestContext)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn it_should_run_the_cover_flow_against_postgres(ctx: &PgTestContext) {
    sqlx::query("INSERT INTO stories (slug, title_en, body_en) VALUES ('s1', 'T', 'Body.')")
        .execute(&ctx.pool)
        .await
        .unwrap();

    let response = ctx
        .client
        .post(
            "/api/agents/enqueue",
            &json!({ "kind": "cover", "items": [cover_item("s1")] }),
        )
        .await
        .unwrap();
    let job_id: Uuid = response.body()["job_ids"][0].as_str().unwrap().parse().unwrap();

    let duplicate = ctx
        .client
        .post(
            "/api/agents/enqueue",
            &json!({ "kind": "cover", "items": [cover_item("s1")] }),
        )
        .await
        .unwrap();
    assert_eq!(duplicate.body()["count"], 0);
    assert_eq!(duplicate.body()["duplicates"], json!(["cover:s1"]));

    assert_eq!(ctx.runner.tick(JobKind::Cover).await.unwrap(), 1);

    let (status, slug): (String, Option<String>) =
        sqlx::query_as("SELECT status, output->>'slug' FROM agent_runs WHERE id = $1")
            .bind(job_id)
            .fetch_one(&ctx.pool)
            .await
            .unwrap();
    assert_eq!(status, "succeeded");
    assert_eq!(slug.as_deref(), Some("s1"));

    let seed: Option<i64> =
        sqlx::query_scalar("SELECT (cover_spec->>'seed')::BIGINT FROM stories WHERE slug = 's1'")
            .fetch_one(&ctx.pool)
            .await
            .unwrap();
    assert_eq!(seed, Some(7));

    let ready = ctx.client.get("/health/ready").await.unwrap();
    ready.assert_status(StatusCode::OK);
    assert_eq!(ready.body()["database"], "connected");
}
