use axum::http::StatusCode;
use axum_test::TestServer;
use formbridge::database::migrations::Migrator;
use formbridge::server::app::create_app;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

/// Create a test server backed by a temp-file SQLite database. The temp file
/// must outlive the server, so it is returned alongside it.
async fn setup_test_server() -> (TestServer, NamedTempFile) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp database");
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url)
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let app = create_app(db, None).await.expect("Failed to build app");
    let server = TestServer::new(app).expect("Failed to start test server");

    (server, temp_file)
}

fn form_body(form_name: &str) -> Value {
    json!({
        "data": {
            "formKey": format!("{}-key", form_name),
            "formName": form_name,
            "endpointUrl": "https://crm.example.com/lead",
            "oid": "00D000000000001",
            "fieldConfigs": [
                {"name": "email", "label": "Email", "dataFormat": "email", "required": true},
                {"name": "industry", "label": "Industry", "dataFormat": "choice",
                 "required": false, "options": ["A", "B"]}
            ]
        }
    })
}

#[tokio::test]
async fn test_create_and_fetch_form() {
    let (server, _db_file) = setup_test_server().await;

    let response = server
        .post("/admin/salesforce-forms")
        .json(&form_body("contact-us"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["formName"], "contact-us");
    assert_eq!(body["data"]["locale"], "en");

    let fetched: Value = server
        .get(&format!("/admin/salesforce-forms/{}", id))
        .await
        .json();
    assert_eq!(fetched["data"]["fieldConfigs"][1]["options"], json!(["A", "B"]));
}

#[tokio::test]
async fn test_duplicate_form_name_returns_400() {
    let (server, _db_file) = setup_test_server().await;

    let first = server
        .post("/admin/salesforce-forms")
        .json(&form_body("contact-us"))
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);

    let second = server
        .post("/admin/salesforce-forms")
        .json(&form_body("contact-us"))
        .await;
    assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = second.json();
    assert_eq!(body["error"]["name"], "ValidationError");

    // Same name in a different locale is a separate record
    let german = server
        .post("/admin/salesforce-forms")
        .add_query_param("locale", "de")
        .json(&form_body("contact-us"))
        .await;
    assert_eq!(german.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_field_configs_return_400() {
    let (server, _db_file) = setup_test_server().await;

    let response = server
        .post("/admin/salesforce-forms")
        .json(&json!({
            "data": {
                "formKey": "k",
                "formName": "broken",
                "endpointUrl": "https://crm.example.com/lead",
                "oid": "o",
                "fieldConfigs": [{"name": "x", "dataFormat": "blob"}]
            }
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_active_and_by_name_lookups() {
    let (server, _db_file) = setup_test_server().await;

    server
        .post("/admin/salesforce-forms")
        .json(&form_body("contact-us"))
        .await;

    let active: Value = server.get("/api/salesforce-forms/active").await.json();
    assert_eq!(active["meta"]["total"], 1);

    let by_name = server.get("/api/salesforce-forms/name/contact-us").await;
    assert_eq!(by_name.status_code(), StatusCode::OK);
    let body: Value = by_name.json();
    assert_eq!(body["data"]["formName"], "contact-us");

    let missing = server.get("/api/salesforce-forms/name/no-such-form").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_form_returns_404() {
    let (server, _db_file) = setup_test_server().await;

    let response = server.delete("/admin/salesforce-forms/999").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"]["status"], 404);
    assert_eq!(body["error"]["name"], "NotFoundError");
}

#[tokio::test]
async fn test_submission_lifecycle_by_code() {
    let (server, _db_file) = setup_test_server().await;

    let form: Value = server
        .post("/admin/salesforce-forms")
        .json(&form_body("contact-us"))
        .await
        .json();
    let form_id = form["data"]["id"].as_i64().unwrap();

    let created = server
        .post("/api/form-submissions")
        .json(&json!({
            "data": {
                "form": form_id,
                "payload": {"email": "jane@example.com", "industry": "A"}
            }
        }))
        .await;
    assert_eq!(created.status_code(), StatusCode::OK);

    let body: Value = created.json();
    let code = body["data"]["code"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["salesforceStatus"], "pending");

    // Lookup by code
    let fetched: Value = server
        .get(&format!("/api/form-submissions/code/{}", code))
        .await
        .json();
    assert_eq!(fetched["data"]["code"], code.as_str());

    // Patch by code; a smuggled code must not stick
    let patched: Value = server
        .put(&format!("/api/form-submissions/code/{}", code))
        .json(&json!({
            "data": {
                "code": "attacker-chosen",
                "salesforceStatus": "success",
                "salesforceResponse": {"result": "ok"}
            }
        }))
        .await
        .json();
    assert_eq!(patched["data"]["code"], code.as_str());
    assert_eq!(patched["data"]["salesforceStatus"], "success");

    let missing = server.get("/api/form-submissions/code/no-such-code").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submission_list_meta_total() {
    let (server, _db_file) = setup_test_server().await;

    let form: Value = server
        .post("/admin/salesforce-forms")
        .json(&form_body("contact-us"))
        .await
        .json();
    let form_id = form["data"]["id"].as_i64().unwrap();

    for _ in 0..2 {
        server
            .post("/api/form-submissions")
            .json(&json!({"data": {"form": form_id, "payload": {}}}))
            .await;
    }

    let list: Value = server.get("/admin/form-submissions").await.json();
    assert_eq!(list["meta"]["total"], 2);
    assert_eq!(list["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_export_endpoint_returns_xlsx() {
    let (server, _db_file) = setup_test_server().await;

    let response = server.get("/admin/form-submissions/export").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let content_type = response.header("content-type");
    assert!(content_type
        .to_str()
        .unwrap()
        .contains("spreadsheetml.sheet"));

    let bytes = response.into_bytes();
    assert!(!bytes.is_empty());
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn test_health_check() {
    let (server, _db_file) = setup_test_server().await;

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}
