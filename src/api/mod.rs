use crate::models::{
    CreateFolderRequest, Folder, LoginRequest, LoginResponse, Note, NoteUpload, RegisterRequest,
};
use crate::session::Session;
use crate::storage::CredentialStore;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("request failed ({status}): {body}")]
    Http { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Parse(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self::Parse(e.to_string())
    }

    fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden,
            _ => Self::Http {
                status: status.as_u16(),
                body,
            },
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EnvConfig {
    pub api_url: String,
    /// Clear the session when the backend answers 401. Off unless configured.
    #[serde(default)]
    pub logout_on_unauthorized: bool,
}

impl EnvConfig {
    /// Read `window.ENV` (`API_URL`, legacy `api_url`, `LOGOUT_ON_UNAUTHORIZED`).
    pub fn new() -> Self {
        let mut config = Self::with_api_url(DEFAULT_API_URL);

        let Some(env) = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object())
        else {
            return config;
        };

        let read = |key: &str| js_sys::Reflect::get(&env, &key.into()).ok();

        if let Some(url) = read("API_URL")
            .and_then(|v| v.as_string())
            .or_else(|| read("api_url").and_then(|v| v.as_string()))
        {
            config.api_url = normalize_base_url(&url);
        }

        if let Some(flag) = read("LOGOUT_ON_UNAUTHORIZED") {
            config.logout_on_unauthorized = flag
                .as_bool()
                .or_else(|| flag.as_string().map(|s| parse_flag(&s)))
                .unwrap_or(false);
        }

        config
    }

    pub fn with_api_url(api_url: &str) -> Self {
        Self {
            api_url: normalize_base_url(api_url),
            logout_on_unauthorized: false,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_flag(s: &str) -> bool {
    matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

/// Where the dispatcher reads the bearer token from, once per request.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

impl TokenSource for Session {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }
}

impl TokenSource for CredentialStore {
    fn bearer_token(&self) -> Option<String> {
        self.read().token().map(str::to_string)
    }
}

/// Request dispatcher for the StudyHub backend.
///
/// Attaches `Authorization: Bearer <token>` when a token is available and
/// otherwise sends the request as-is. It classifies failed responses into
/// [`ApiError`] but never acts on them; session policy lives with the caller.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: impl TokenSource + 'static) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            tokens: Arc::new(tokens),
        }
    }

    fn with_auth_header(req: RequestBuilder, token: Option<String>) -> RequestBuilder {
        match token {
            Some(token) => req.header(AUTHORIZATION, format!("Bearer {token}")),
            None => req,
        }
    }

    pub(crate) fn prepare(&self, method: Method, path: &str) -> RequestBuilder {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        Self::with_auth_header(client.request(method, url), self.tokens.bearer_token())
    }

    async fn send(req: RequestBuilder) -> ApiResult<Response> {
        let res = req.send().await.map_err(ApiError::network)?;
        let status = res.status();
        if status.is_success() {
            Ok(res)
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, body))
        }
    }

    async fn send_json<T: serde::de::DeserializeOwned>(req: RequestBuilder) -> ApiResult<T> {
        Self::send(req).await?.json().await.map_err(ApiError::parse)
    }

    /// For endpoints whose success body the client does not use.
    async fn send_unit(req: RequestBuilder) -> ApiResult<()> {
        Self::send(req).await.map(|_| ())
    }

    pub async fn login(&self, req: &LoginRequest) -> ApiResult<LoginResponse> {
        Self::send_json(self.prepare(Method::POST, "/auth/login").json(req)).await
    }

    pub async fn register(&self, req: &RegisterRequest) -> ApiResult<()> {
        Self::send_unit(self.prepare(Method::POST, "/auth/register").json(req)).await
    }

    pub async fn list_folders(&self) -> ApiResult<Vec<Folder>> {
        Self::send_json(self.prepare(Method::GET, "/folders")).await
    }

    pub async fn create_folder(&self, req: &CreateFolderRequest) -> ApiResult<()> {
        Self::send_unit(self.prepare(Method::POST, "/folders").json(req)).await
    }

    pub async fn delete_folder(&self, folder_id: &str) -> ApiResult<()> {
        Self::send_unit(self.prepare(Method::DELETE, &folder_path(folder_id))).await
    }

    pub async fn list_notes(&self, folder_id: &str) -> ApiResult<Vec<Note>> {
        Self::send_json(self.prepare(Method::GET, &folder_notes_path(folder_id))).await
    }

    pub async fn upload_note(&self, upload: NoteUpload) -> ApiResult<()> {
        Self::send_unit(self.upload_request(upload)?).await
    }

    pub async fn delete_note(&self, note_id: &str) -> ApiResult<()> {
        Self::send_unit(self.prepare(Method::DELETE, &note_path(note_id))).await
    }

    fn upload_request(&self, upload: NoteUpload) -> ApiResult<RequestBuilder> {
        use reqwest::multipart::{Form, Part};

        let mut file = Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(mime) = upload.mime_type.as_deref().filter(|m| !m.is_empty()) {
            file = file
                .mime_str(mime)
                .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        }

        let form = Form::new()
            .part("file", file)
            .text("title", upload.title)
            .text("folderId", upload.folder_id);

        Ok(self.prepare(Method::POST, "/notes").multipart(form))
    }
}

fn folder_path(folder_id: &str) -> String {
    format!("/folders/{}", urlencoding::encode(folder_id))
}

fn folder_notes_path(folder_id: &str) -> String {
    format!("/notes/folder/{}", urlencoding::encode(folder_id))
}

fn note_path(note_id: &str) -> String {
    format!("/notes/{}", urlencoding::encode(note_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    struct Fixed(Option<&'static str>);

    impl TokenSource for Fixed {
        fn bearer_token(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn auth_header(client: &ApiClient, method: Method, path: &str) -> Option<String> {
        let req = client.prepare(method, path).build().expect("request should build");
        req.headers()
            .get(AUTHORIZATION)
            .map(|v| v.to_str().expect("ascii header").to_string())
    }

    #[test]
    fn test_request_with_token_carries_exact_bearer_header() {
        let client = ApiClient::new("http://localhost:8080", Fixed(Some("my-jwt-token")));
        assert_eq!(
            auth_header(&client, Method::GET, "/folders").as_deref(),
            Some("Bearer my-jwt-token")
        );
    }

    #[test]
    fn test_request_without_token_has_no_authorization_header() {
        let client = ApiClient::new("http://localhost:8080", Fixed(None));
        assert!(auth_header(&client, Method::GET, "/folders").is_none());
        assert!(auth_header(&client, Method::POST, "/auth/login").is_none());
    }

    #[test]
    fn test_token_is_read_per_request_from_session() {
        let session = Session::new(CredentialStore::new(MemoryStore::new()));
        let client = ApiClient::new("http://localhost:8080", session.clone());

        assert!(auth_header(&client, Method::GET, "/folders").is_none());

        session.login("abc123", "ADMIN").unwrap();
        assert_eq!(
            auth_header(&client, Method::DELETE, "/folders/1").as_deref(),
            Some("Bearer abc123")
        );

        session.logout();
        assert!(auth_header(&client, Method::GET, "/folders").is_none());
    }

    #[test]
    fn test_token_can_be_read_from_credential_store_directly() {
        let store = CredentialStore::new(MemoryStore::new());
        let client = ApiClient::new("http://localhost:8080", store.clone());
        store.save("stored", "USER").unwrap();

        assert_eq!(
            auth_header(&client, Method::GET, "/folders").as_deref(),
            Some("Bearer stored")
        );
    }

    #[test]
    fn test_prepare_joins_base_url_and_path() {
        let client = ApiClient::new("http://api.local:9000/", Fixed(None));

        let req = client
            .prepare(Method::GET, &folder_notes_path("42"))
            .build()
            .expect("request should build");
        assert_eq!(req.url().as_str(), "http://api.local:9000/notes/folder/42");
        assert_eq!(req.method(), &Method::GET);
    }

    #[test]
    fn test_path_segments_are_encoded() {
        assert_eq!(folder_path("a b/c"), "/folders/a%20b%2Fc");
        assert_eq!(note_path("7"), "/notes/7");
    }

    #[test]
    fn test_upload_request_is_authenticated_multipart_post() {
        let client = ApiClient::new("http://localhost:8080", Fixed(Some("t")));
        let req = client
            .upload_request(NoteUpload {
                title: "Week 1".to_string(),
                folder_id: "3".to_string(),
                file_name: "week1.pdf".to_string(),
                mime_type: Some("application/pdf".to_string()),
                bytes: b"%PDF-1.4".to_vec(),
            })
            .expect("upload request")
            .build()
            .expect("request should build");

        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.url().path(), "/notes");
        assert_eq!(
            req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer t")
        );
        let content_type = req
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data"));
    }

    #[test]
    fn test_upload_rejects_malformed_mime() {
        let client = ApiClient::new("http://localhost:8080", Fixed(None));
        let err = client
            .upload_request(NoteUpload {
                title: "t".to_string(),
                folder_id: "1".to_string(),
                file_name: "f".to_string(),
                mime_type: Some("not a mime".to_string()),
                bytes: vec![],
            })
            .err()
            .expect("malformed mime should be rejected");
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            ApiError::Unauthorized
        );
        assert_eq!(
            ApiError::from_status(StatusCode::FORBIDDEN, String::new()),
            ApiError::Forbidden
        );
        assert_eq!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
            ApiError::Http {
                status: 500,
                body: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_env_config_normalizes_url() {
        let c = EnvConfig::with_api_url(" http://localhost:8080// ");
        assert_eq!(c.api_url, "http://localhost:8080");
        assert!(!c.logout_on_unauthorized);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("YES"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
