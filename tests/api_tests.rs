//! HTTP-level tests for the API client and domain modules.
//!
//! These use wiremock to stand in for the chat service and validate the
//! request shapes the client produces: bearer-token attachment, form-encoded
//! login, multipart upload, and the error-mapping contract.

use ragdesk::api::{self, ApiClient};
use ragdesk::auth::TokenStore;
use ragdesk::chat::{ChatSession, HttpBackend};
use ragdesk::types::{AppError, LoginCredentials, MessageRole, RegisterRequest};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> (ApiClient, Arc<TokenStore>) {
    let store = Arc::new(TokenStore::ephemeral());
    (ApiClient::new(server.uri(), store.clone()), store)
}

fn sample_document(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": "",
        "file_name": format!("{}.pdf", title.to_lowercase()),
        "file_type": "application/pdf",
        "file_size": 2048,
        "status": "processing",
        "created_at": "2026-01-10T12:00:00Z",
        "updated_at": "2026-01-10T12:00:00Z"
    })
}

// ============= Auth =============

#[tokio::test]
async fn test_login_is_form_encoded_and_stores_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-123",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server);
    assert!(!store.is_authenticated());

    let credentials = LoginCredentials {
        username: "alice".to_string(),
        password: "secret".to_string(),
    };
    let response = api::auth::login(&client, &credentials).await.unwrap();

    assert_eq!(response.access_token, "tok-123");
    assert!(store.is_authenticated());
    assert_eq!(store.get(), Some("tok-123".to_string()));

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(body.contains("username=alice"));
    assert!(body.contains("password=secret"));
}

#[tokio::test]
async fn test_login_failure_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let (client, store) = client_for(&server);
    let err = api::auth::login(
        &client,
        &LoginCredentials {
            username: "alice".to_string(),
            password: "wrong".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_register_stores_returned_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-new",
            "token_type": "bearer",
            "user": {"id": 7, "username": "bob", "email": "bob@example.com"}
        })))
        .mount(&server)
        .await;

    let (client, store) = client_for(&server);
    let response = api::auth::register(
        &client,
        &RegisterRequest {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "hunter22".to_string(),
            full_name: "Bob".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(response.user.unwrap().username, "bob");
    assert_eq!(store.get(), Some("tok-new".to_string()));
}

#[tokio::test]
async fn test_bearer_header_attached_when_token_present() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer tok-xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "username": "alice",
            "email": "alice@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server);
    store.set("tok-xyz").unwrap();

    let user = api::auth::me(&client).await.unwrap();
    assert_eq!(user.username, "alice");
}

#[tokio::test]
async fn test_no_bearer_header_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server);
    api::documents::list(&client).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_logout_clears_token_even_when_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (client, store) = client_for(&server);
    store.set("tok-old").unwrap();

    api::auth::logout(&client).await.unwrap();
    assert!(!store.is_authenticated());
}

// ============= Error mapping =============

#[tokio::test]
async fn test_non_json_error_body_falls_back_to_status_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents/9"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server);
    let err = api::documents::get(&client, 9).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "request failed with status 500");
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    // Port 9 is discard; nothing listens there.
    let store = Arc::new(TokenStore::ephemeral());
    let client = ApiClient::new("http://127.0.0.1:9", store);

    let err = api::documents::list(&client).await.unwrap_err();
    assert!(matches!(err, AppError::Network(_)));
}

// ============= Documents =============

#[tokio::test]
async fn test_list_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            sample_document(1, "Invoice"),
            sample_document(2, "Report"),
        ])))
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server);
    let docs = api::documents::list(&client).await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].title, "Invoice");
}

#[tokio::test]
async fn test_delete_document_accepts_204() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/documents/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server);
    api::documents::delete(&client, 3).await.unwrap();
}

#[tokio::test]
async fn test_upload_sends_multipart_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_document(5, "Notes")))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "meeting notes").unwrap();

    let (client, _store) = client_for(&server);
    let upload = api::documents::DocumentUpload {
        title: "Notes".to_string(),
        description: Some("weekly sync".to_string()),
        collection_id: None,
        files: vec![file.path().to_path_buf()],
    };
    let doc = api::documents::upload(&client, &upload).await.unwrap();
    assert_eq!(doc.id, 5);

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(body.contains("meeting notes"));
    assert!(body.contains("weekly sync"));
}

#[tokio::test]
async fn test_upload_with_no_files_makes_no_request() {
    let server = MockServer::start().await;
    // No mock mounted: any request would 404 and the assertions below would
    // still catch it via received_requests.

    let (client, _store) = client_for(&server);
    let upload = api::documents::DocumentUpload {
        title: "Empty".to_string(),
        description: None,
        collection_id: None,
        files: vec![],
    };
    let err = api::documents::upload(&client, &upload).await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_document_sends_partial_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/documents/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_document(4, "Renamed")))
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server);
    let update = ragdesk::types::DocumentUpdate {
        title: Some("Renamed".to_string()),
        ..Default::default()
    };
    let doc = api::documents::update(&client, 4, &update).await.unwrap();
    assert_eq!(doc.title, "Renamed");

    // Unset fields are omitted, not sent as null.
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"title": "Renamed"}));
}

#[tokio::test]
async fn test_create_collection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 11,
            "name": "contracts",
            "description": "legal documents",
            "created_at": "2026-02-01T09:00:00Z",
            "updated_at": "2026-02-01T09:00:00Z"
        })))
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server);
    let collection = api::documents::create_collection(
        &client,
        &ragdesk::types::CollectionCreate {
            name: "contracts".to_string(),
            description: Some("legal documents".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(collection.id, 11);
    assert_eq!(collection.name, "contracts");
}

// ============= Users & Roles =============

#[tokio::test]
async fn test_list_users_and_roles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "username": "alice", "email": "alice@example.com", "is_active": true}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "admin", "description": "full access"}
        ])))
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server);
    let users = api::users::list(&client).await.unwrap();
    assert_eq!(users[0].username, "alice");
    let roles = api::users::list_roles(&client).await.unwrap();
    assert_eq!(roles[0].name, "admin");
}

// ============= Chat over HTTP =============

#[tokio::test]
async fn test_http_backend_round_trip_through_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": 42,
            "message": {"role": "assistant", "content": "Grounded answer."},
            "chunks": [
                {"id": "doc-7", "title": "Q1 Report", "content": "...", "score": 0.88}
            ]
        })))
        .mount(&server)
        .await;

    let (client, store) = client_for(&server);
    store.set("tok").unwrap();

    let backend = Arc::new(HttpBackend::new(client));
    let mut session = ChatSession::new(backend.clone());

    session.send("summarize q1").await.unwrap();
    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, MessageRole::Assistant);
    assert_eq!(messages[1].content, "Grounded answer.");
    assert_eq!(messages[1].references[0].title, "Q1 Report");
    assert_eq!(backend.conversation_id(), Some(42));

    // The second turn threads the server-assigned conversation id.
    session.send("and q2?").await.unwrap();
    let requests = server.received_requests().await.unwrap();
    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(second["conversation_id"], 42);
}

#[tokio::test]
async fn test_http_backend_failure_appends_no_assistant_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "model unavailable"})),
        )
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server);
    let mut session = ChatSession::new(Arc::new(HttpBackend::new(client)));

    let err = session.send("hello").await.unwrap_err();
    assert_eq!(err.to_string(), "model unavailable");
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.last_error(), Some("model unavailable"));
}
