use crate::e2e::helpers;

use helpers::assertions::assert_job_response;
use helpers::fixtures::{cover_item, story_item, story_record};
use helpers::TestContext;
use hyper::StatusCode;
use learnflow_backend::domain::jobs::JobKind;
use learnflow_backend::infrastructure::repositories::StoryRepository;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_run_a_cover_job_from_enqueue_to_success(ctx: &TestContext) {
    ctx.stories.insert_record(story_record("s1", "Body."));

    let response = ctx
        .client
        .post(
            "/api/agents/enqueue",
            &json!({ "kind": "cover", "items": [cover_item("s1")] }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    let body = response.body();
    assert_eq!(body["ok"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["duplicates"], json!([]));
    let job_id = body["job_ids"][0].as_str().unwrap().to_string();

    let job = ctx
        .client
        .get(&format!("/api/agents/jobs/{job_id}"))
        .await
        .unwrap();
    job.assert_status(StatusCode::OK);
    assert_job_response(job.body(), "cover", "queued");
    assert_eq!(job.body()["job_key"], "cover:s1");

    assert_eq!(ctx.runner.tick(JobKind::Cover).await.unwrap(), 1);

    let job = ctx
        .client
        .get(&format!("/api/agents/jobs/{job_id}"))
        .await
        .unwrap();
    assert_job_response(job.body(), "cover", "succeeded");
    assert_eq!(job.body()["output"]["slug"], "s1");
    assert_eq!(job.body()["output"]["provider"], "openai");
    assert!(job.body()["started_at"].is_string());

    let cover = ctx.stories.cover_for("s1").expect("cover attached");
    assert_eq!(cover.seed, 7);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_store_generated_stories(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/agents/enqueue",
            &json!({ "kind": "story", "items": [story_item("Harbour boats")] }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    let job_id = response.body()["job_ids"][0].as_str().unwrap().to_string();

    ctx.runner.tick(JobKind::Story).await.unwrap();

    let job = ctx
        .client
        .get(&format!("/api/agents/jobs/{job_id}"))
        .await
        .unwrap();
    assert_job_response(job.body(), "story", "succeeded");
    assert_eq!(job.body()["job_key"], "story:harbour-boats");
    assert_eq!(job.body()["output"]["slug"], "harbour-list");

    let stored = ctx
        .stories
        .find_for_audio("harbour-list")
        .await
        .unwrap()
        .expect("story stored");
    assert_eq!(stored.title_en, "The Harbour List");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fail_cover_jobs_for_unknown_stories(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/agents/enqueue",
            &json!({ "kind": "cover", "items": [cover_item("ghost")] }),
        )
        .await
        .unwrap();
    let job_id = response.body()["job_ids"][0].as_str().unwrap().to_string();

    ctx.runner.tick(JobKind::Cover).await.unwrap();

    let job = ctx
        .client
        .get(&format!("/api/agents/jobs/{job_id}"))
        .await
        .unwrap();
    assert_job_response(job.body(), "cover", "failed");
    assert_eq!(job.body()["error"], "story 'ghost' not found");
    assert!(job.body()["output"].is_null());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_duplicate_keys_instead_of_queueing_twice(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/agents/enqueue",
            &json!({ "kind": "cover", "items": [cover_item("s1"), cover_item(" S1 ")] }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body()["count"], 1);
    assert_eq!(response.body()["duplicates"], json!(["cover:s1"]));
    assert_eq!(ctx.jobs.len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_the_whole_batch_when_one_item_is_invalid(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/agents/enqueue",
            &json!({
                "kind": "cover",
                "items": [
                    cover_item("s1"),
                    { "slug": "s2", "title_en": "T", "genre": "G", "hook": "short" }
                ]
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("1 item(s) failed validation");
    let details = &response.body()["details"];
    assert_eq!(details[0]["index"], 1);
    assert_eq!(details[0]["errors"][0]["field"], "hook");
    assert!(ctx.jobs.is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_enqueue_requests(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/agents/enqueue", &json!({ "kind": "cover", "items": [] }))
        .await
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("at least one entry");

    let response = ctx
        .client
        .post(
            "/api/agents/enqueue",
            &json!({ "kind": "audio", "items": [cover_item("s1")] }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = ctx
        .client
        .post_raw("/api/agents/enqueue", "{ not json")
        .await
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("Invalid JSON body");

    assert!(ctx.jobs.is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_404_for_unknown_jobs(ctx: &TestContext) {
    let response = ctx
        .client
        .get(&format!("/api/agents/jobs/{}", uuid::Uuid::new_v4()))
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_error_message("not found");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_log_enqueue_events_with_the_client_session(ctx: &TestContext) {
    ctx.client
        .post_with_headers(
            "/api/agents/enqueue",
            &json!({ "kind": "story", "items": [story_item("Night trains")] }),
            &[("x-session-id", "session-123")],
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let mut events = ctx.events.events();
    for _ in 0..20 {
        if !events.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        events = ctx.events.events();
    }

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "enqueue_jobs");
    assert_eq!(events[0].client_session_id, "session-123");
    assert_eq!(events[0].summary_slug, None);
}
