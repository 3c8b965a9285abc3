use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Duration, Utc};
use ::common::storage::filesystem::FilesystemObjectStore;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use tempfile::TempDir;

use server::config::{
    AdminBootstrapConfig, AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig,
    StorageConfig,
};
use server::report::PdfReportRenderer;
use server::state::AppState;

pub const ADMIN_USERNAME: &str = "root";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const PASSWORD: &str = "securepass";

pub mod routes {
    pub const REGISTER_STUDENT: &str = "/api/v1/auth/register/student";
    pub const REGISTER_ORGANIZER: &str = "/api/v1/auth/register/organizer";
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const ADMIN_LOGIN: &str = "/api/v1/auth/admin/login";
    pub const ME: &str = "/api/v1/auth/me";

    pub const HACKATHONS: &str = "/api/v1/hackathons";

    pub fn hackathon(id: &str) -> String {
        format!("/api/v1/hackathons/{id}")
    }

    pub fn hackathon_report(id: &str) -> String {
        format!("/api/v1/hackathons/{id}/report")
    }

    pub fn organizer_hackathons(organizer_id: &str, kind: &str) -> String {
        format!("/api/v1/hackathons/organizer/{organizer_id}?type={kind}")
    }

    pub const REGISTER: &str = "/api/v1/registeredhackathon/register";

    pub fn hackathon_registrations(hackathon_id: &str) -> String {
        format!("/api/v1/registeredhackathon/hackathon/{hackathon_id}")
    }

    pub fn student_registrations(student_id: &str, kind: &str) -> String {
        format!("/api/v1/registeredhackathon/registeredhackathons/{student_id}?type={kind}")
    }

    pub fn check(hackathon_id: &str) -> String {
        format!("/api/v1/registeredhackathon/check/{hackathon_id}")
    }

    pub const PROPOSALS: &str = "/api/v1/proposals";

    pub fn proposals_for(organizer_id: &str) -> String {
        format!("/api/v1/proposals?organizerId={organizer_id}")
    }

    pub fn approve(id: &str) -> String {
        format!("/api/v1/proposals/{id}/approve")
    }

    pub fn reject(id: &str) -> String {
        format!("/api/v1/proposals/{id}/reject")
    }

    pub const USER_COUNTS: &str = "/api/v1/admin/user-counts";
    pub const EVENT_COUNTS: &str = "/api/v1/admin/event-counts";
    pub const ADMIN_HACKATHONS: &str = "/api/v1/admin/hackathons";
    pub const ADMIN_STUDENTS: &str = "/api/v1/admin/students";
    pub const ADMIN_ORGANIZERS: &str = "/api/v1/admin/organizers";
}

/// A running test server backed by a throwaway SQLite file and upload directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub upload_root: PathBuf,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub bytes_len: usize,
    pub starts_with_pdf_magic: bool,
}

/// A signed-in account.
pub struct Account {
    pub id: String,
    pub token: String,
}

/// Date `days` from today, as `YYYY-MM-DD`.
pub fn days_from_now(days: i64) -> String {
    (Utc::now() + Duration::days(days))
        .date_naive()
        .format("%Y-%m-%d")
        .to_string()
}

pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n%%EOF\n".to_vec()
}

/// Solo registration fields for `hackathon_id`/`student_id`.
pub fn solo_fields(hackathon_id: &str, student_id: &str, name: &str) -> Vec<(&'static str, String)> {
    vec![
        ("hackathonId", hackathon_id.to_string()),
        ("studentId", student_id.to_string()),
        ("isTeam", "false".into()),
        ("name", name.to_string()),
        ("email", "ann@x.com".into()),
        ("dob", "2001-05-04".into()),
        ("phone", "555-0100".into()),
        ("education", "BSc Computer Science".into()),
        ("hasParticipated", "no".into()),
    ]
}

/// Team registration fields with one extra member.
pub fn team_fields(hackathon_id: &str, student_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("hackathonId", hackathon_id.to_string()),
        ("studentId", student_id.to_string()),
        ("isTeam", "true".into()),
        ("leaderName", "Lee".into()),
        ("leaderEmail", "lee@x.com".into()),
        ("teamName", "Rocket".into()),
        (
            "members",
            json!([{"name": "Bo", "email": "bo@x.com", "dob": "2002-01-02"}]).to_string(),
        ),
        ("dob", "2001-05-04".into()),
        ("phone", "555-0100".into()),
        ("education", "BSc Computer Science".into()),
        ("hasParticipated", "yes".into()),
    ]
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let upload_root = dir.path().join("uploads");

        let mut opts = ConnectOptions::new(&db_url);
        opts.max_connections(5).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts)
            .await
            .expect("Failed to connect to test database");
        server::database::sync_schema(&db)
            .await
            .expect("Failed to create schema");
        server::seed::ensure_indexes(&db)
            .await
            .expect("Failed to create indexes");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig { url: db_url },
            auth: AuthConfig {
                jwt_secret: "test-secret-for-integration-tests".to_string(),
                token_ttl_hours: 1,
                admin: AdminBootstrapConfig {
                    username: Some(ADMIN_USERNAME.to_string()),
                    password: Some(ADMIN_PASSWORD.to_string()),
                },
            },
            storage: StorageConfig {
                root: upload_root.clone(),
                public_base_url: "http://files.test/uploads".to_string(),
                max_upload_size: 1024 * 1024,
                ..Default::default()
            },
        };

        server::seed::seed_admin(&db, &app_config.auth.admin)
            .await
            .expect("Failed to seed admin");

        let store = FilesystemObjectStore::new(
            upload_root.clone(),
            app_config.storage.public_base_url.clone(),
            app_config.storage.max_upload_size,
        )
        .await
        .expect("Failed to create object store");

        let state = AppState {
            db: db.clone(),
            config: app_config,
            object_store: Arc::new(store),
            reports: Arc::new(PdfReportRenderer),
        };

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            upload_root,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn put_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    /// Submit the multipart registration form, optionally with a proposal file.
    pub async fn register_with_token(
        &self,
        fields: Vec<(&'static str, String)>,
        file: Option<(&str, &str, Vec<u8>)>,
        token: &str,
    ) -> TestResponse {
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name, value);
        }
        if let Some((file_name, mime, bytes)) = file {
            let part = Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_str(mime)
                .expect("Failed to set MIME type");
            form = form.part("file", part);
        }

        let res = self
            .client
            .post(self.url(routes::REGISTER))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart registration request");

        TestResponse::from_response(res).await
    }

    /// Sign up a student and return its id and token.
    pub async fn create_student(&self, username: &str) -> Account {
        let res = self
            .post_without_token(
                routes::REGISTER_STUDENT,
                &json!({
                    "name": format!("Student {username}"),
                    "email": format!("{username}@students.test"),
                    "username": username,
                    "password": PASSWORD,
                }),
            )
            .await;
        assert_eq!(res.status, 201, "Student sign-up failed: {}", res.text);
        Account::from_auth(&res)
    }

    /// Sign up an organizer and return its id and token.
    pub async fn create_organizer(&self, username: &str) -> Account {
        let res = self
            .post_without_token(
                routes::REGISTER_ORGANIZER,
                &json!({
                    "name": format!("Club {username}"),
                    "email": format!("{username}@clubs.test"),
                    "username": username,
                    "password": PASSWORD,
                    "address": "1 Campus Road",
                }),
            )
            .await;
        assert_eq!(res.status, 201, "Organizer sign-up failed: {}", res.text);
        Account::from_auth(&res)
    }

    /// Log in as the bootstrap admin and return its token.
    pub async fn admin_token(&self) -> String {
        let res = self
            .post_without_token(
                routes::ADMIN_LOGIN,
                &json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}),
            )
            .await;
        assert_eq!(res.status, 200, "Admin login failed: {}", res.text);
        Account::from_auth(&res).token
    }

    /// Create a hackathon `days` from today and return its id.
    pub async fn create_hackathon(&self, token: &str, name: &str, days: i64, is_team: bool) -> String {
        let res = self
            .post_with_token(
                routes::HACKATHONS,
                &json!({
                    "type": if is_team { "team-offline" } else { "virtual-solo-online" },
                    "name": name,
                    "venue": "Main Hall",
                    "date": days_from_now(days),
                    "regstart": days_from_now(days - 20),
                    "regend": days_from_now(days - 1),
                    "details": "Build something great.",
                    "duration": "24 hours",
                    "prize": "$1000",
                    "isTeamHackathon": is_team,
                }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_hackathon failed: {}", res.text);
        res.id()
    }

    /// Register `student` solo for `hackathon_id` and return the registration id.
    pub async fn register_solo(&self, hackathon_id: &str, student: &Account) -> String {
        let res = self
            .register_with_token(
                solo_fields(hackathon_id, &student.id, "Ann"),
                None,
                &student.token,
            )
            .await;
        assert_eq!(res.status, 201, "register_solo failed: {}", res.text);
        res.id()
    }

    /// Number of files currently stored under the proposals folder.
    pub fn stored_proposals(&self) -> usize {
        std::fs::read_dir(self.upload_root.join("hackathon_proposals"))
            .map(|d| d.count())
            .unwrap_or(0)
    }
}

impl Account {
    fn from_auth(res: &TestResponse) -> Self {
        Self {
            id: res.body["user"]["id"]
                .as_str()
                .expect("Auth response should contain user.id")
                .to_string(),
            token: res.body["token"]
                .as_str()
                .expect("Auth response should contain a token")
                .to_string(),
        }
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let header = |name: reqwest::header::HeaderName| {
            res.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(reqwest::header::CONTENT_TYPE);
        let content_disposition = header(reqwest::header::CONTENT_DISPOSITION);
        let bytes = res.bytes().await.unwrap_or_default();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            body,
            content_type,
            content_disposition,
            bytes_len: bytes.len(),
            starts_with_pdf_magic: bytes.starts_with(b"%PDF-"),
            text,
        }
    }

    pub fn id(&self) -> String {
        self.body["id"]
            .as_str()
            .expect("response body should contain 'id'")
            .to_string()
    }
}
