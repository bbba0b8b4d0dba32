use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

use carecall_auth::jwt::TokenVerifier;
use carecall_bedrock::assessment::AssessmentSettings;
use carecall_bedrock::classifier::MoodClassifier;
use carecall_bedrock::error::BedrockError;
use carecall_bedrock::prompt::EMPTY_TRANSCRIPT;
use carecall_core::models::mood::{MoodJudgment, MoodScore};
use carecall_core::models::profile::{PatientProfile, ProfileForm, ProfileUpdate};
use carecall_core::models::report::NewCallReport;
use carecall_lambda::state::AppState;
use carecall_storage::Database;

const SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";

/// Deterministic stand-in for the model.
enum Behavior {
    Respond(Value),
    Fail,
    Hang,
}

struct StubClassifier {
    behavior: Behavior,
    prompts: Mutex<Vec<String>>,
}

impl StubClassifier {
    fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl MoodClassifier for StubClassifier {
    async fn classify(&self, prompt: &str) -> Result<Value, BedrockError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.behavior {
            Behavior::Respond(value) => Ok(value.clone()),
            Behavior::Fail => Err(BedrockError::Invocation("service unavailable".to_string())),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(BedrockError::Invocation("unreachable".to_string()))
            }
        }
    }
}

fn anxious() -> Value {
    json!({
        "mood": 2,
        "mood_description": "Anxious about work pressure",
        "emotions": ["anxiety", "stress"]
    })
}

fn app_with(classifier: Arc<StubClassifier>) -> (Router, Database) {
    let db = Database::open_in_memory().unwrap();
    let state = AppState {
        db: db.clone(),
        classifier,
        tokens: Arc::new(TokenVerifier::new(SECRET, Some("authenticated"))),
        assessment: AssessmentSettings {
            timeout: Duration::from_millis(200),
        },
        default_page_size: 10,
    };
    (carecall_lambda::router(state), db)
}

fn token_for(sub: &str) -> String {
    let exp = jiff::Timestamp::now().as_second() + 3600;
    encode(
        &Header::default(),
        &json!({"sub": sub, "aud": "authenticated", "role": "authenticated", "exp": exp}),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap()
}

fn call_event(conversation_id: &str, subject: Option<&str>) -> Value {
    json!({
        "type": "post_call_transcription",
        "event_timestamp": 1739537297,
        "data": {
            "agent_id": "agent-7",
            "conversation_id": conversation_id,
            "status": "done",
            "user_id": subject,
            "transcript": [
                {"role": "agent", "message": "How are you feeling?", "time_in_call_secs": 0},
                {"role": "user", "message": "Anxious about work", "time_in_call_secs": 4}
            ],
            "metadata": {
                "start_time_unix_secs": 1739537297,
                "call_duration_secs": 22,
                "cost": 296,
                "termination_reason": "client disconnected",
                "feedback": {"overall_score": null}
            },
            "analysis": {"call_successful": "success", "transcript_summary": "Patient is anxious."}
        }
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed(method: &str, uri: &str, sub: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token_for(sub)))
        .header("content-type", "application/json")
        .body(body)
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn seed_reports(db: &Database, user_id: &str, phone: &str, count: usize) -> Vec<String> {
    db.upsert_profile(
        user_id,
        ProfileUpdate {
            phone_number: Some(phone.to_string()),
            age: Some("41".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let outcome = db
            .insert_report(NewCallReport {
                user_id: user_id.to_string(),
                conversation_id: Some(format!("{user_id}-conv-{i}")),
                judgment: MoodJudgment {
                    mood: MoodScore::new((i % 5) as i64 + 1).unwrap(),
                    mood_description: format!("call {i}"),
                    emotions: vec![],
                },
            })
            .await
            .unwrap();
        ids.push(outcome.report.id.to_string());
    }
    ids
}

fn ids_of(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_is_public() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Fail));
    let req = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn anonymous_call_is_analysed_and_saved() {
    let classifier = StubClassifier::new(Behavior::Respond(anxious()));
    let (app, _) = app_with(classifier.clone());

    let (status, body) = send(
        &app,
        post_json("/save-phone-call-report", &call_event("conv-1", None)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "Phone call report saved successfully with AI mood analysis"
    );
    assert_eq!(body["data"]["user_id"], "anonymous-user");
    assert_eq!(body["data"]["mood"], 2);
    assert_eq!(body["data"]["emotions"], json!(["anxiety", "stress"]));
    assert_eq!(body["mood_analysis"], anxious());

    let prompt = classifier.last_prompt();
    assert!(prompt.contains("agent: How are you feeling?\nuser: Anxious about work"));
    assert!(prompt.contains("No patient information available"));
}

#[tokio::test]
async fn classifier_failure_still_records_default_judgment() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Fail));

    let (status, body) = send(
        &app,
        post_json("/save-phone-call-report", &call_event("conv-2", None)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let fallback = json!({"mood": 3, "mood_description": "Unable to analyze mood", "emotions": []});
    assert_eq!(body["mood_analysis"], fallback);
    assert_eq!(body["data"]["mood"], 3);
    assert_eq!(body["data"]["mood_description"], "Unable to analyze mood");
}

#[tokio::test]
async fn nonconforming_model_output_records_default_judgment() {
    let classifier = StubClassifier::new(Behavior::Respond(json!("mood is probably 4")));
    let (app, _) = app_with(classifier);

    let (status, body) = send(
        &app,
        post_json("/save-phone-call-report", &call_event("conv-3", None)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["mood"], 3);
    assert_eq!(body["data"]["emotions"], json!([]));
}

#[tokio::test]
async fn slow_classifier_is_cut_off() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Hang));

    let (status, body) = send(
        &app,
        post_json("/save-phone-call-report", &call_event("conv-4", None)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["mood_analysis"]["mood_description"], "Unable to analyze mood");
}

#[tokio::test]
async fn missing_transcript_is_not_an_error() {
    let classifier = StubClassifier::new(Behavior::Respond(anxious()));
    let (app, _) = app_with(classifier.clone());

    let event = json!({
        "type": "post_call_transcription",
        "event_timestamp": 1739537297.5,
        "data": {"conversation_id": "conv-5"}
    });
    let (status, _) = send(&app, post_json("/save-phone-call-report", &event)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(classifier.last_prompt().contains(EMPTY_TRANSCRIPT));
}

#[tokio::test]
async fn known_profile_owns_every_call() {
    let (app, db) = app_with(StubClassifier::new(Behavior::Respond(anxious())));
    db.upsert_profile(
        "patient-1",
        ProfileUpdate {
            occupation: Some("nurse".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let (status, body) = send(
        &app,
        post_json(
            "/save-phone-call-report",
            &call_event("conv-6", Some("platform-user-42")),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user_id"], "patient-1");
}

#[tokio::test]
async fn subject_id_used_without_profile() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Respond(anxious())));

    let (_, body) = send(
        &app,
        post_json(
            "/save-phone-call-report",
            &call_event("conv-7", Some("platform-user-42")),
        ),
    )
    .await;

    assert_eq!(body["data"]["user_id"], "platform-user-42");
}

#[tokio::test]
async fn replayed_delivery_returns_the_stored_report() {
    let classifier = StubClassifier::new(Behavior::Respond(anxious()));
    let (app, db) = app_with(classifier.clone());
    let event = call_event("conv-replay", None);

    let (first_status, first) = send(&app, post_json("/save-phone-call-report", &event)).await;
    let (second_status, second) = send(&app, post_json("/save-phone-call-report", &event)).await;

    assert_eq!(first_status, StatusCode::CREATED);
    assert_eq!(second_status, StatusCode::CREATED);
    assert_eq!(second["message"], "Phone call report already recorded");
    assert_eq!(first["data"]["id"], second["data"]["id"]);
    assert_eq!(second["mood_analysis"], anxious());
    assert_eq!(classifier.calls(), 1);

    let conn = db.connection().unwrap();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM phone_call_reports", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn envelope_errors_are_rejected_before_analysis() {
    let classifier = StubClassifier::new(Behavior::Respond(anxious()));
    let (app, _) = app_with(classifier.clone());

    let cases = [
        (
            json!({"event_timestamp": 1, "data": {}}),
            "Type field is required and must be a string",
        ),
        (
            json!({"type": "", "event_timestamp": 1, "data": {}}),
            "Type field is required and must be a string",
        ),
        (
            json!({"type": "post_call_transcription", "event_timestamp": "yesterday", "data": {}}),
            "Event timestamp field is required and must be a number",
        ),
        (
            json!({"type": "post_call_transcription", "event_timestamp": 1, "data": []}),
            "Data field is required and must be an object",
        ),
        (
            json!({"type": "t", "event_timestamp": 1, "data": {"user_id": 7}}),
            "User ID field must be a string, null, or undefined",
        ),
        (
            json!({"type": "t", "event_timestamp": 1, "data": {"conversation_id": 7}}),
            "Conversation ID field must be a string if provided",
        ),
        (
            json!({"type": "t", "event_timestamp": 1, "data": {"transcript": "hello"}}),
            "Transcript field must be an array if provided",
        ),
        (
            json!({"type": "t", "event_timestamp": 1, "data": {"analysis": "ok"}}),
            "Analysis field must be an object if provided",
        ),
    ];

    for (event, message) in cases {
        let (status, body) = send(&app, post_json("/save-phone-call-report", &event)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{event}");
        assert_eq!(body, json!({"error": message}));
    }
    assert_eq!(classifier.calls(), 0);
}

#[tokio::test]
async fn mistyped_auxiliary_fields_are_still_recorded() {
    let classifier = StubClassifier::new(Behavior::Respond(anxious()));
    let (app, _) = app_with(classifier.clone());

    let mut event = call_event("conv-aux", None);
    event["data"]["agent_id"] = json!(12);
    event["data"]["transcript"][0]["time_in_call_secs"] = json!("3");
    event["data"]["metadata"]["start_time_unix_secs"] = json!(1739537297.5);
    event["data"]["analysis"]["call_successful"] = json!(true);

    let (status, body) = send(&app, post_json("/save-phone-call-report", &event)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["mood"], 2);
    assert_eq!(classifier.calls(), 1);
    assert!(
        classifier
            .last_prompt()
            .contains("agent: How are you feeling?\nuser: Anxious about work")
    );
}

#[tokio::test]
async fn non_json_body_is_rejected() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Fail));
    let req = Request::post("/save-phone-call-report")
        .body(Body::from("not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Request body must be valid JSON");
}

#[tokio::test]
async fn store_failure_is_a_500() {
    let (app, db) = app_with(StubClassifier::new(Behavior::Respond(anxious())));
    {
        let conn = db.connection().unwrap();
        conn.execute_batch("DROP TABLE phone_call_reports").unwrap();
    }

    let (status, body) = send(
        &app,
        post_json("/save-phone-call-report", &call_event("conv-8", None)),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to save phone call report"}));
}

#[tokio::test]
async fn ingestion_method_guard() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Fail));

    let req = Request::get("/save-phone-call-report").body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        body["error"],
        "Method not allowed. Only POST requests are supported."
    );

    let req = Request::put("/save-phone-call-report")
        .body(Body::from("{}"))
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let req = Request::options("/save-phone-call-report")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn cors_preflight_allows_dashboard_headers() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Fail));

    let req = Request::options("/get-phone-call-reports")
        .header("origin", "https://dashboard.example.com")
        .header("access-control-request-method", "GET")
        .header("access-control-request-headers", "authorization, x-client-info")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    let allowed = headers["access-control-allow-headers"].to_str().unwrap();
    for header in ["authorization", "x-client-info", "apikey", "content-type"] {
        assert!(allowed.contains(header), "{allowed}");
    }
}

// ---------------------------------------------------------------------------
// Report query
// ---------------------------------------------------------------------------

#[tokio::test]
async fn query_requires_a_valid_token() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Fail));

    let req = Request::get("/get-phone-call-reports?phone_number=%2B15550001111")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Unauthorized"}));

    let req = Request::get("/get-phone-call-reports")
        .header("authorization", "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn third_page_of_twenty_five() {
    let (app, db) = app_with(StubClassifier::new(Behavior::Fail));
    let ids = seed_reports(&db, "patient-1", "+15550001111", 25).await;

    let uri = "/get-phone-call-reports?phone_number=%2B15550001111&limit=10&page=3&sort=asc";
    let (status, body) = send(&app, authed("GET", uri, "clinician-1", Body::empty())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Phone call reports retrieved successfully");
    assert_eq!(
        body["pagination"],
        json!({
            "page": 3,
            "limit": 10,
            "totalCount": 25,
            "totalPages": 3,
            "hasNextPage": false,
            "hasPrevPage": true
        })
    );
    assert_eq!(ids_of(&body), ids[20..].to_vec());
}

#[tokio::test]
async fn pages_partition_all_reports_newest_first() {
    let (app, db) = app_with(StubClassifier::new(Behavior::Fail));
    let mut ids = seed_reports(&db, "patient-1", "+15550001111", 23).await;
    ids.reverse();

    let mut seen = Vec::new();
    for page in 1..=5 {
        let uri = format!("/get-phone-call-reports?phone_number=%2B15550001111&limit=5&page={page}");
        let (status, body) = send(&app, authed("GET", &uri, "clinician-1", Body::empty())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["totalPages"], 5);
        assert_eq!(body["pagination"]["hasNextPage"], page < 5);
        assert_eq!(body["pagination"]["hasPrevPage"], page > 1);
        seen.extend(ids_of(&body));
    }
    assert_eq!(seen, ids);
}

#[tokio::test]
async fn reports_are_filtered_by_phone_number() {
    let (app, db) = app_with(StubClassifier::new(Behavior::Fail));
    seed_reports(&db, "patient-1", "+15550001111", 3).await;
    let other = seed_reports(&db, "patient-2", "+15559998888", 2).await;

    let uri = "/get-phone-call-reports?phone_number=%2B15559998888&sort=asc";
    let (_, body) = send(&app, authed("GET", uri, "clinician-1", Body::empty())).await;

    assert_eq!(ids_of(&body), other);
    assert_eq!(body["pagination"]["totalCount"], 2);
    assert_eq!(body["pagination"]["limit"], 10);
}

#[tokio::test]
async fn absent_phone_number_uses_the_test_number() {
    let (app, db) = app_with(StubClassifier::new(Behavior::Fail));
    let ids = seed_reports(&db, "demo", "+1234567890", 2).await;

    let (_, body) = send(
        &app,
        authed("GET", "/get-phone-call-reports?sort=asc", "clinician-1", Body::empty()),
    )
    .await;

    assert_eq!(ids_of(&body), ids);
}

#[tokio::test]
async fn empty_result_and_page_past_the_end() {
    let (app, db) = app_with(StubClassifier::new(Behavior::Fail));

    let (_, body) = send(
        &app,
        authed("GET", "/get-phone-call-reports?phone_number=%2B15550001111", "c", Body::empty()),
    )
    .await;
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["totalPages"], 0);
    assert_eq!(body["pagination"]["hasNextPage"], false);
    assert_eq!(body["pagination"]["hasPrevPage"], false);

    seed_reports(&db, "patient-1", "+15550001111", 4).await;
    let (status, body) = send(
        &app,
        authed(
            "GET",
            "/get-phone-call-reports?phone_number=%2B15550001111&page=9",
            "c",
            Body::empty(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["page"], 9);
    assert_eq!(body["pagination"]["totalPages"], 1);
    assert_eq!(body["pagination"]["hasNextPage"], false);
    assert_eq!(body["pagination"]["hasPrevPage"], true);
}

#[tokio::test]
async fn invalid_pagination_is_a_400() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Fail));

    let cases = [
        ("page=0", "Page must be greater than 0"),
        ("page=two", "Page must be greater than 0"),
        ("limit=0", "Limit must be between 1 and 100"),
        ("limit=101", "Limit must be between 1 and 100"),
        ("sort=newest", "Sort must be either \"asc\" or \"desc\""),
    ];
    for (query, message) in cases {
        let uri = format!("/get-phone-call-reports?{query}");
        let (status, body) = send(&app, authed("GET", &uri, "c", Body::empty())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
        assert_eq!(body, json!({"error": message}));
    }
}

#[tokio::test]
async fn malformed_query_string_is_a_json_400() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Fail));

    let req = authed(
        "GET",
        "/get-phone-call-reports?page=1&page=2",
        "c",
        Body::empty(),
    );
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("page"), "{message}");
}

#[tokio::test]
async fn query_store_failure_is_a_500() {
    let (app, db) = app_with(StubClassifier::new(Behavior::Fail));
    {
        let conn = db.connection().unwrap();
        conn.execute_batch("DROP TABLE user_information").unwrap();
    }

    let (status, body) = send(
        &app,
        authed("GET", "/get-phone-call-reports", "c", Body::empty()),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to retrieve phone call reports"}));
}

#[tokio::test]
async fn query_method_guard() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Fail));
    let req = Request::delete("/get-phone-call-reports").body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed. Only GET requests are supported.");
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[tokio::test]
async fn whitespace_fields_round_trip_through_the_form() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Fail));

    let body = json!({
        "phone_number": " +15550001111 ",
        "age": "   ",
        "gender": "",
        "occupation": "\t",
        "mental_health_diagnosis": "  mild depression  "
    });
    let (status, saved) = send(
        &app,
        authed("POST", "/user-info", "patient-1", Body::from(body.to_string())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["message"], "User information saved successfully");
    assert_eq!(saved["data"]["phone_number"], "+15550001111");
    assert_eq!(saved["data"]["age"], Value::Null);
    assert_eq!(saved["data"]["occupation"], Value::Null);
    assert_eq!(saved["data"]["mental_health_diagnosis"], "mild depression");

    let (status, loaded) = send(
        &app,
        authed("GET", "/user-info", "patient-1", Body::empty()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let profile: PatientProfile = serde_json::from_value(loaded["data"].clone()).unwrap();
    let form = ProfileForm::from(&profile);
    assert_eq!(form.age, "");
    assert_eq!(form.gender, "");
    assert_eq!(form.occupation, "");
    assert_eq!(form.phone_number, "+15550001111");
}

#[tokio::test]
async fn information_is_summarised_when_absent() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Fail));

    let body = json!({"age": "29", "occupation": "teacher"});
    let (_, saved) = send(
        &app,
        authed("POST", "/user-info", "patient-2", Body::from(body.to_string())),
    )
    .await;

    let information = saved["data"]["information"].as_str().unwrap();
    assert!(information.contains("Age: 29"));
    assert!(information.contains("Occupation: teacher"));
}

#[tokio::test]
async fn profile_validation_errors() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Fail));

    let cases = [
        (
            json!({"age": "  "}),
            "Either information field or structured data is required",
        ),
        (
            json!({"age": "30", "phone_number": 5550001111u64}),
            "Phone number must be a string",
        ),
        (
            json!({"age": "30", "phone_number": "555-0101"}),
            "Phone number must be at least 10 characters long",
        ),
    ];
    for (body, message) in cases {
        let (status, response) = send(
            &app,
            authed("POST", "/user-info", "patient-3", Body::from(body.to_string())),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response, json!({"error": message}));
    }
}

#[tokio::test]
async fn missing_profile_loads_as_null() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Fail));
    let (status, body) = send(&app, authed("GET", "/user-info", "nobody", Body::empty())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": null}));
}

#[tokio::test]
async fn profile_routes_require_auth_and_known_methods() {
    let (app, _) = app_with(StubClassifier::new(Behavior::Fail));

    let req = post_json("/user-info", &json!({"age": "30"}));
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::put("/user-info").body(Body::empty()).unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
