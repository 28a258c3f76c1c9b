use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use certvault_core::api::{Credentials, FileQuery};
use certvault_core::flows::{listing, login, FlowError};
use certvault_core::models::{CertificateCategory, FileBlob, UploadRequest};
use certvault_core::{ApiClient, ApiError, CertificateApi, SessionStore};

const TOKEN: &str = "tok-abc";

/// Requests observed by the test server, in arrival order
#[derive(Clone, Default)]
struct Seen(Arc<Mutex<Vec<String>>>);

impl Seen {
    fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

async fn login_handler(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match (body["username"].as_str(), body["password"].as_str()) {
        (Some("notoken"), _) => (StatusCode::OK, Json(json!({"message": "Login successful"}))),
        (Some(_), Some("secret")) => (
            StatusCode::OK,
            Json(json!({"message": "Login successful", "token": TOKEN})),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid credentials"})),
        ),
    }
}

async fn upload_handler(State(seen): State<Seen>, mut multipart: Multipart) -> Json<Value> {
    let mut fields = HashMap::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap();

        match file_name {
            Some(file_name) => seen.push(format!(
                "{}: file={} type={} len={}",
                name,
                file_name,
                content_type.unwrap_or_default(),
                data.len()
            )),
            None => {
                let value = String::from_utf8_lossy(&data).into_owned();
                seen.push(format!("{}={}", name, value));
                fields.insert(name, value);
            }
        }
    }

    let key = format!(
        "{}/{}/{}/degree.pdf",
        fields["name"], fields["certificate_type"], fields["document_name"]
    );
    Json(json!({"message": "File uploaded successfully", "file_key": key}))
}

async fn list_handler(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, json!({"error": "Unauthorized"}).to_string());
    }

    let document = params.get("document_name").cloned().unwrap_or_default();
    match document.as_str() {
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "<h1>Server Error</h1>".to_string()),
        "empty" => (StatusCode::OK, json!({"message": "No files found."}).to_string()),
        _ => {
            let prefix = format!(
                "{}/{}/{}",
                params["name"], params["certificate_type"], document
            );
            let files = json!({"files": [
                {"file_name": "a.pdf", "file_key": format!("{}/a.pdf", prefix), "size": 2048, "last_modified": "2024-03-05T14:07:09+00:00"},
                {"file_name": "b.pdf", "file_key": format!("{}/b.pdf", prefix), "size": 512, "last_modified": "2024-03-06T09:00:00+00:00"}
            ]});
            (StatusCode::OK, files.to_string())
        }
    }
}

async fn spawn_server(seen: Seen) -> String {
    let router = Router::new()
        .route("/login/", post(login_handler))
        .route("/upload-certificate/", post(upload_handler))
        .route("/list_uploaded_files_view", get(list_handler))
        .with_state(seen);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn query(document: &str) -> FileQuery {
    FileQuery {
        owner_name: "alice".to_string(),
        category: CertificateCategory::Professional,
        document_name: document.to_string(),
    }
}

#[tokio::test]
async fn test_login_returns_token() {
    let base = spawn_server(Seen::default()).await;
    let client = ApiClient::new(&base).unwrap();

    let reply = client
        .login(&Credentials {
            username: "alice".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(reply.token.as_deref(), Some(TOKEN));
    assert_eq!(reply.message.as_deref(), Some("Login successful"));
}

#[tokio::test]
async fn test_login_rejection_carries_server_error() {
    let base = spawn_server(Seen::default()).await;
    let client = ApiClient::new(&base).unwrap();

    let err = client
        .login(&Credentials {
            username: "alice".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    match err {
        ApiError::Rejected { status, ref message } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(message.as_deref(), Some("Invalid credentials"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_login_without_token_is_accepted() {
    let base = spawn_server(Seen::default()).await;
    let client = ApiClient::new(&base).unwrap();

    let reply = client
        .login(&Credentials {
            username: "notoken".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(reply.message.as_deref(), Some("Login successful"));
    assert!(reply.token.is_none());
}

#[tokio::test]
async fn test_tokenless_login_flow_persists_username() {
    let base = spawn_server(Seen::default()).await;
    let client = ApiClient::new(&base).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut session = SessionStore::new(dir.path().to_path_buf());

    let form = login::LoginForm {
        username: "notoken".to_string(),
        password: "whatever".to_string(),
    };
    let success = login::login(&client, &mut session, &form).await.unwrap();

    assert_eq!(success.message, "Login successful");
    assert!(session.is_valid());
    assert_eq!(session.username(), Some("notoken"));
    assert!(session.token().is_none());

    let raw = std::fs::read_to_string(dir.path().join("session.json")).unwrap();
    let json: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["username"], "notoken");
    assert_eq!(json["authToken"], "");
}

#[tokio::test]
async fn test_login_flow_end_to_end() {
    let base = spawn_server(Seen::default()).await;
    let client = ApiClient::new(&base).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut session = SessionStore::new(dir.path().to_path_buf());

    let form = login::LoginForm {
        username: "alice".to_string(),
        password: "secret".to_string(),
    };
    let success = login::login(&client, &mut session, &form).await.unwrap();

    assert_eq!(success.message, "Login successful");
    assert_eq!(session.token(), Some(TOKEN));
    assert_eq!(session.username(), Some("alice"));
}

#[tokio::test]
async fn test_upload_sends_multipart_fields() {
    let seen = Seen::default();
    let base = spawn_server(seen.clone()).await;
    let client = ApiClient::new(&base).unwrap();

    let request = UploadRequest {
        owner_name: "alice".to_string(),
        category: CertificateCategory::Education,
        document_name: "degree".to_string(),
        file: FileBlob {
            file_name: "degree.pdf".to_string(),
            bytes: b"%PDF-1.4 hello".to_vec(),
        },
    };
    let reply = client.upload_certificate(&request).await.unwrap();

    assert_eq!(reply.message.as_deref(), Some("File uploaded successfully"));
    assert_eq!(reply.file_key.as_deref(), Some("alice/education/degree/degree.pdf"));
    assert_eq!(
        seen.entries(),
        vec![
            "name=alice".to_string(),
            "certificate_type=education".to_string(),
            "pdf_file: file=degree.pdf type=application/pdf len=14".to_string(),
            "document_name=degree".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_list_sends_bearer_and_query() {
    let base = spawn_server(Seen::default()).await;
    let client = ApiClient::new(&base).unwrap().with_token(TOKEN.to_string());

    let files = client.list_files(&query("cv")).await.unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].file_key, "alice/professional/cv/a.pdf");
    assert_eq!(files[1].size, 512);
}

#[tokio::test]
async fn test_list_without_token_is_rejected() {
    let base = spawn_server(Seen::default()).await;
    let client = ApiClient::new(&base).unwrap();

    let err = client.list_files(&query("cv")).await.unwrap_err();
    assert_eq!(err.server_message(), Some("Unauthorized"));
}

#[tokio::test]
async fn test_list_message_only_reply_is_empty() {
    let base = spawn_server(Seen::default()).await;
    let client = ApiClient::new(&base).unwrap().with_token(TOKEN.to_string());

    let files = client.list_files(&query("empty")).await.unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_list_flow_fallback_on_non_json_error() {
    let base = spawn_server(Seen::default()).await;
    let client = ApiClient::new(&base).unwrap().with_token(TOKEN.to_string());

    let err = listing::fetch(&client, &query("boom")).await.unwrap_err();
    assert_eq!(err, FlowError::Server(listing::LIST_FALLBACK_ERROR.to_string()));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Bind then drop to get a port nothing is listening on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&format!("http://{}", addr))
        .unwrap()
        .with_token(TOKEN.to_string());

    let err = client.list_files(&query("cv")).await.unwrap_err();
    assert!(matches!(err, ApiError::NetworkError(_)));

    let err = listing::fetch(&client, &query("cv")).await.unwrap_err();
    assert_eq!(err, FlowError::Transport(listing::LIST_TRANSPORT_ERROR.to_string()));
}
