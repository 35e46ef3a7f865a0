//! 集成测试公共设施：临时数据库、迁移、会话与请求辅助函数

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use unduhan_lib::config::SiteConfig;
use unduhan_lib::database::db;
use unduhan_lib::database::repository::users_repository::UsersRepository;
use unduhan_lib::entity::sea_orm_active_enums::UserRole;
use unduhan_lib::entity::users;
use unduhan_lib::{AppState, build_router};

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub admin_token: String,
    pub admin_id: String,
    pub user_token: String,
    pub user_id: String,
    _dir: TempDir,
}

/// 原始响应：状态码、Location 头与响应体
pub struct RawResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

pub async fn setup() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let conn = db::connect_file(&dir.path().join("unduhan.db")).await.unwrap();
    migration::Migrator::up(&conn, None).await.unwrap();

    let admin = UsersRepository::upsert_admin(&conn, "Admin", "admin", "admin@unduhan.test")
        .await
        .unwrap();
    let admin_session = UsersRepository::create_session(&conn, &admin.id).await.unwrap();

    let user = users::ActiveModel {
        id: Set("user-1".into()),
        name: Set("Budi".into()),
        username: Set("budi".into()),
        email: Set("budi@unduhan.test".into()),
        image: Set(None),
        phone_number: Set(None),
        about: Set(None),
        role: Set(UserRole::User),
        created_at: Set(0),
        updated_at: Set(0),
    }
    .insert(&conn)
    .await
    .unwrap();
    let user_session = UsersRepository::create_session(&conn, &user.id).await.unwrap();

    let state = AppState::new(conn.clone(), SiteConfig::default());
    TestApp {
        router: build_router(state),
        db: conn,
        admin_token: admin_session.id,
        admin_id: admin.id,
        user_token: user_session.id,
        user_id: user.id,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> RawResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        RawResponse {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// 调用 RPC 过程
    pub async fn rpc(&self, procedure: &str, token: Option<&str>, input: Value) -> (StatusCode, Value) {
        let response = self
            .request(Method::POST, &format!("/api/{procedure}"), token, Some(input))
            .await;
        let body = response.json();
        (response.status, body)
    }

    /// 以管理员身份调用，期望成功
    pub async fn admin(&self, procedure: &str, input: Value) -> Value {
        let (status, body) = self.rpc(procedure, Some(&self.admin_token), input).await;
        assert_eq!(status, StatusCode::OK, "{procedure} failed: {body}");
        body
    }

    pub async fn get(&self, uri: &str) -> RawResponse {
        self.request(Method::GET, uri, None, None).await
    }

    // ==================== 数据准备 ====================

    pub async fn media(&self, name: &str) -> String {
        let media = self
            .admin(
                "media.create",
                json!({ "name": name, "url": format!("https://cdn.unduhan.test/{name}.png") }),
            )
            .await;
        id_of(&media)
    }

    pub async fn topic(&self, title: &str, language: &str) -> String {
        let topic = self
            .admin(
                "topic.create",
                json!({
                    "language": language,
                    "title": title,
                    "type": "download",
                    "status": "published",
                }),
            )
            .await;
        id_of(&topic)
    }

    pub async fn download_file(&self, version: &str) -> Value {
        self.admin(
            "downloadFile.create",
            json!({
                "title": format!("Installer {version}"),
                "version": version,
                "downloadLink": "https://files.unduhan.test/setup.exe",
                "fileSize": "90 MB",
            }),
        )
        .await
    }
}

/// 下载的输入字段（已发布、Windows 应用）
pub fn download_input(title: &str, image_id: &str, topic_id: &str) -> Value {
    json!({
        "title": title,
        "content": format!("<p>{title} adalah aplikasi populer.</p>"),
        "developer": "Unduhan Labs",
        "operatingSystem": "Windows",
        "license": "Freeware",
        "officialWebsite": "https://unduhan.test",
        "schemaType": "DeveloperApp",
        "type": "app",
        "currency": "USD",
        "price": "0",
        "status": "published",
        "featuredImageId": image_id,
        "topics": [topic_id],
    })
}

/// 在 JSON 对象上追加字段
pub fn with(mut value: Value, key: &str, extra: Value) -> Value {
    if let Some(object) = value.as_object_mut() {
        object.insert(key.to_string(), extra);
    }
    value
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}
