use serde_json::Value;

pub fn assert_job_response(job: &Value, expected_kind: &str, expected_status: &str) {
    assert!(job.get("id").and_then(|v| v.as_str()).is_some());
    assert_eq!(job.get("kind").and_then(|v| v.as_str()), Some(expected_kind));
    assert_eq!(
        job.get("status").and_then(|v| v.as_str()),
        Some(expected_status)
    );
    assert!(job.get("input").map(|v| v.is_object()).unwrap_or(false));
    assert!(job.get("created_at").is_some());

    match expected_status {
        "succeeded" => {
            assert!(job.get("output").map(|v| v.is_object()).unwrap_or(false));
            assert!(job.get("finished_at").map(|v| !v.is_null()).unwrap_or(false));
        }
        "failed" => {
            assert!(job.get("error").and_then(|v| v.as_str()).is_some());
            assert!(job.get("finished_at").map(|v| !v.is_null()).unwrap_or(false));
        }
        _ => {}
    }
}

pub fn assert_audio_response(body: &Value, expected_slug: &str, expected_split: &str) {
    assert_eq!(body.get("slug").and_then(|v| v.as_str()), Some(expected_slug));
    assert_eq!(
        body.get("split").and_then(|v| v.as_str()),
        Some(expected_split)
    );
    assert!(body.get("provider").and_then(|v| v.as_str()).is_some());
    assert!(body.get("skipped").and_then(|v| v.as_bool()).is_some());
}
