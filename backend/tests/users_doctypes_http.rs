//! HTTP-level coverage for the user and document type surfaces.

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, Error, test, web};
use serde_json::{Value, json};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::inbound::http;
use backend::test_support::MemoryDb;

async fn test_app(
    db: &MemoryDb,
) -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(HttpState::new(
                db.users(),
                db.doctypes(),
                db.documents(),
            )))
            .app_data(web::Data::new(HealthState::new()))
            .configure(http::configure),
    )
    .await
}

async fn request_json(
    app: &impl Service<Request, Response = ServiceResponse, Error = Error>,
    request: test::TestRequest,
) -> (u16, Value) {
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status().as_u16();
    (status, test::read_body_json(response).await)
}

fn alice() -> Value {
    json!({
        "username": "alice",
        "email": "alice@example.com",
        "password_hash": "x",
        "role": "citizen"
    })
}

#[actix_rt::test]
async fn user_responses_never_carry_the_password_credential() {
    let db = MemoryDb::new();
    let app = test_app(&db).await;

    let (status, body) = request_json(
        &app,
        test::TestRequest::post().uri("/api/users").set_json(alice()),
    )
    .await;
    assert_eq!(status, 201);
    assert!(body["data"].get("password_hash").is_none());

    let (_, body) = request_json(&app, test::TestRequest::get().uri("/api/users")).await;
    assert_eq!(body["count"], json!(1));
    assert!(body["data"][0].get("password_hash").is_none());
    assert_eq!(body["data"][0]["username"], json!("alice"));
}

#[actix_rt::test]
async fn duplicate_user_identities_conflict() {
    let db = MemoryDb::new();
    let app = test_app(&db).await;

    let (status, _) = request_json(
        &app,
        test::TestRequest::post().uri("/api/users").set_json(alice()),
    )
    .await;
    assert_eq!(status, 201);

    let (status, body) = request_json(
        &app,
        test::TestRequest::post().uri("/api/users").set_json(json!({
            "username": "bob",
            "email": "alice@example.com",
            "password_hash": "x",
            "role": "citizen"
        })),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(
        body["message"],
        json!("User with this email or username already exists")
    );
}

#[actix_rt::test]
async fn creating_a_user_validates_fields_in_order() {
    let db = MemoryDb::new();
    let app = test_app(&db).await;

    let (status, body) = request_json(
        &app,
        test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({ "email": "alice@example.com" })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], json!("username is required"));

    let (status, body) = request_json(
        &app,
        test::TestRequest::post().uri("/api/users").set_json(json!({
            "username": "alice",
            "email": "not-an-email",
            "password_hash": "x",
            "role": "citizen"
        })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(
        body["message"],
        json!("'not-an-email' is not a valid email address")
    );

    let (status, body) = request_json(
        &app,
        test::TestRequest::post().uri("/api/users").set_json(json!({
            "username": "alice",
            "email": "alice@example.com",
            "password_hash": "x",
            "role": "mayor"
        })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(
        body["message"],
        json!("Invalid role. Must be one of: citizen, admin, employee")
    );
}

#[actix_rt::test]
async fn updating_a_user_merges_supplied_fields() {
    let db = MemoryDb::new();
    let app = test_app(&db).await;

    let (_, body) = request_json(
        &app,
        test::TestRequest::post().uri("/api/users").set_json(alice()),
    )
    .await;
    let id = body["data"]["user_id"].as_i64().expect("generated id");

    let (status, body) = request_json(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/users/{id}"))
            .set_json(json!({ "role": "employee" })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], json!("User updated successfully"));
    assert_eq!(body["data"]["role"], json!("employee"));
    assert_eq!(body["data"]["username"], json!("alice"));
}

#[actix_rt::test]
async fn users_with_documents_cannot_be_deleted_until_unreferenced() {
    let db = MemoryDb::new();
    let user_id = db.add_user("alice", "alice@example.com");
    let doctype_id = db.add_doctype("Birth Certificate", None);
    let document_id = db.add_document(
        user_id,
        doctype_id,
        backend::domain::DocumentStatus::Pending,
        None,
    );
    let app = test_app(&db).await;

    let (status, body) = request_json(
        &app,
        test::TestRequest::delete().uri(&format!("/api/users/{user_id}")),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(
        body["message"],
        json!("Cannot delete user with existing documents. Please delete documents first.")
    );

    let (status, _) = request_json(
        &app,
        test::TestRequest::delete().uri(&format!("/api/documents/{document_id}")),
    )
    .await;
    assert_eq!(status, 200);

    let (status, body) = request_json(
        &app,
        test::TestRequest::delete().uri(&format!("/api/users/{user_id}")),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], json!("User deleted successfully"));
}

#[actix_rt::test]
async fn doctype_crud_round_trip() {
    let db = MemoryDb::new();
    let app = test_app(&db).await;

    let (status, body) = request_json(
        &app,
        test::TestRequest::post()
            .uri("/api/doctypes")
            .set_json(json!({ "name": "Residence Permit", "description": "Proof of residence" })),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(body["message"], json!("Document type created successfully"));
    let id = body["data"]["doctype_id"].as_i64().expect("generated id");

    let (status, body) = request_json(
        &app,
        test::TestRequest::post()
            .uri("/api/doctypes")
            .set_json(json!({ "name": "Residence Permit" })),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(
        body["message"],
        json!("Document type with this name already exists")
    );

    let (status, body) = request_json(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/doctypes/{id}"))
            .set_json(json!({ "description": "Official proof of residence" })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["name"], json!("Residence Permit"));
    assert_eq!(
        body["data"]["description"],
        json!("Official proof of residence")
    );

    let (status, body) = request_json(
        &app,
        test::TestRequest::delete().uri(&format!("/api/doctypes/{id}")),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], json!("Document type deleted successfully"));

    let (status, _) = request_json(
        &app,
        test::TestRequest::get().uri(&format!("/api/doctypes/{id}")),
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn doctypes_missing_a_name_are_rejected() {
    let db = MemoryDb::new();
    let app = test_app(&db).await;

    let (status, body) = request_json(
        &app,
        test::TestRequest::post()
            .uri("/api/doctypes")
            .set_json(json!({})),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], json!("name is required"));
}

#[actix_rt::test]
async fn health_summary_and_probes_respond() {
    let db = MemoryDb::new();
    let app = test_app(&db).await;

    let (status, body) = request_json(&app, test::TestRequest::get().uri("/health")).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("eMunicipality API is running"));
    assert!(body["version"].as_str().is_some());

    let live = test::call_service(
        &app,
        test::TestRequest::get().uri("/health/live").to_request(),
    )
    .await;
    assert_eq!(live.status().as_u16(), 200);

    // The test app never flips readiness, so the probe reports 503.
    let ready = test::call_service(
        &app,
        test::TestRequest::get().uri("/health/ready").to_request(),
    )
    .await;
    assert_eq!(ready.status().as_u16(), 503);
}
