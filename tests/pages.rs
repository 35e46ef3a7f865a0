mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{TestApp, download_input, id_of, setup, with};

/// 创建印尼语下载及其英语翻译，返回 (印尼语 slug, 英语 slug)
async fn bilingual_download(app: &TestApp) -> (String, String) {
    let image = app.media("vscode").await;
    let topic = app.topic("Editor", "id").await;

    let created = app
        .admin("download.create", download_input("Visual Studio Code", &image, &topic))
        .await;
    let english = app
        .admin(
            "download.translate",
            with(
                with(download_input("VS Code", &image, &topic), "language", json!("en")),
                "downloadTranslationId",
                created["downloadTranslationId"].clone(),
            ),
        )
        .await;

    (
        created["slug"].as_str().unwrap().to_string(),
        english["slug"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn root_redirects_to_default_locale() {
    let app = setup().await;

    let response = app.get("/").await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location.as_deref(), Some("/id"));

    let response = app.get("/xx").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let home = app.get("/en").await;
    assert_eq!(home.status, StatusCode::OK);
    let page = home.json();
    assert_eq!(page["metadata"]["canonical"], json!("http://localhost:3000/en"));
    assert_eq!(page["jsonLd"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn download_detail_renders_metadata() {
    let app = setup().await;
    let (id_slug, _) = bilingual_download(&app).await;

    let response = app.get(&format!("/id/download/app/{id_slug}")).await;
    assert_eq!(response.status, StatusCode::OK);
    let page = response.json();
    assert_eq!(
        page["metadata"]["title"],
        json!("Download Visual Studio Code untuk Windows Versi Terbaru")
    );
    assert_eq!(
        page["metadata"]["canonical"],
        json!(format!("http://localhost:3000/id/download/app/{id_slug}"))
    );
    assert_eq!(page["data"]["download"]["slug"], json!(id_slug));
    assert_eq!(page["jsonLd"].as_array().unwrap().len(), 3);

    // 类型不匹配
    let response = app.get(&format!("/id/download/game/{id_slug}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn other_language_slug_redirects_to_translation() {
    let app = setup().await;
    let (id_slug, en_slug) = bilingual_download(&app).await;

    let response = app.get(&format!("/en/download/app/{id_slug}")).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.location,
        Some(format!("/en/download/app/{en_slug}"))
    );

    let response = app.get(&format!("/id/download/app/{en_slug}")).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.location,
        Some(format!("/id/download/app/{id_slug}"))
    );
}

#[tokio::test]
async fn missing_translation_and_drafts_are_not_found() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Tools", "id").await;

    let only_id = app
        .admin("download.create", download_input("WinRAR", &image, &topic))
        .await;
    let response = app
        .get(&format!("/en/download/app/{}", only_id["slug"].as_str().unwrap()))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let draft = app
        .admin(
            "download.create",
            with(download_input("Secret Tool", &image, &topic), "status", json!("draft")),
        )
        .await;
    let response = app
        .get(&format!("/id/download/app/{}", draft["slug"].as_str().unwrap()))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn downloading_page_counts_views() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Tools", "id").await;
    let file = app.download_file("1.2.3").await;
    let version_slug = file["versionSlug"].as_str().unwrap().to_string();

    let download = app
        .admin(
            "download.create",
            with(
                download_input("Audacity", &image, &topic),
                "downloadFiles",
                json!([id_of(&file)]),
            ),
        )
        .await;
    let slug = download["slug"].as_str().unwrap();

    let response = app
        .get(&format!("/id/download/app/{slug}/{version_slug}"))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json()["metadata"]["title"],
        json!("Download Audacity 1.2.3 untuk Windows")
    );

    let response = app
        .get(&format!("/id/download/app/{slug}/{version_slug}/downloading"))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["data"]["downloadFile"]["views"], json!(1));

    let response = app
        .get(&format!("/id/download/app/{slug}/no-such-version"))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_page_with_empty_query_lists_nothing() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Tools", "id").await;
    app.admin("download.create", download_input("Blender", &image, &topic))
        .await;

    let response = app.get("/id/download/search").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json()["data"]["downloads"].as_array().unwrap().is_empty());

    let response = app.get("/id/download/search?q=blend").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json()["data"]["downloads"].as_array().unwrap().len(),
        1
    );
}

#[tokio::test]
async fn dashboard_translate_redirects_when_language_exists() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Tools", "id").await;
    let created = app
        .admin("download.create", download_input("GIMP", &image, &topic))
        .await;
    let group = created["downloadTranslationId"].as_str().unwrap();

    let uri = format!("/id/dashboard/download/translate/id/{group}");
    let response = app.get(&uri).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request(Method::GET, &uri, Some(&app.admin_token), None)
        .await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.location,
        Some(format!("/id/dashboard/download/edit/{}", id_of(&created)))
    );

    let uri = format!("/id/dashboard/download/translate/en/{group}");
    let response = app
        .request(Method::GET, &uri, Some(&app.admin_token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let form = response.json();
    assert_eq!(form["data"]["language"], json!("en"));
    assert_eq!(form["data"]["initial"]["title"], json!("GIMP"));
}

#[tokio::test]
async fn sitemaps_list_published_content() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Tools", "id").await;
    let created = app
        .admin("download.create", download_input("Inkscape", &image, &topic))
        .await;
    let slug = created["slug"].as_str().unwrap();

    let index = app.get("/sitemap.xml").await;
    assert_eq!(index.status, StatusCode::OK);
    assert!(index.body.contains("<loc>http://localhost:3000/sitemap/download/1</loc>"));
    assert!(!index.body.contains("/sitemap/download/en/1"));
    assert!(index.body.contains("<loc>http://localhost:3000/en/article</loc>"));

    let downloads = app.get("/sitemap/download/1").await;
    assert_eq!(downloads.status, StatusCode::OK);
    assert!(downloads.body.contains(&format!(
        "<loc>http://localhost:3000/id/download/app/{slug}</loc>"
    )));

    let empty = app.get("/sitemap/download/en/1").await;
    assert_eq!(empty.status, StatusCode::OK);
    assert!(!empty.body.contains("<url>"));

    assert_eq!(app.get("/sitemap/download/0").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn version_page_redirects_only_to_matching_sibling_file() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Tools", "id").await;

    let shared = app.download_file("2.0").await;
    let only_id = app.download_file("3.0").await;
    let shared_en = app
        .admin(
            "downloadFile.create",
            json!({
                "title": "Installer 2.0 English",
                "version": "2.0",
                "downloadLink": "https://files.unduhan.test/setup-en.exe",
                "fileSize": "91 MB",
            }),
        )
        .await;
    let version_slug = shared["versionSlug"].as_str().unwrap().to_string();
    assert_eq!(shared_en["versionSlug"], json!(version_slug));

    let created = app
        .admin(
            "download.create",
            with(
                download_input("HandBrake", &image, &topic),
                "downloadFiles",
                json!([id_of(&shared), id_of(&only_id)]),
            ),
        )
        .await;
    let english = app
        .admin(
            "download.translate",
            with(
                with(
                    with(download_input("HandBrake EN", &image, &topic), "language", json!("en")),
                    "downloadTranslationId",
                    created["downloadTranslationId"].clone(),
                ),
                "downloadFiles",
                json!([id_of(&shared_en)]),
            ),
        )
        .await;
    let id_slug = created["slug"].as_str().unwrap();
    let en_slug = english["slug"].as_str().unwrap();

    let response = app
        .get(&format!("/en/download/app/{id_slug}/{version_slug}"))
        .await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.location,
        Some(format!("/en/download/app/{en_slug}/{version_slug}"))
    );

    let response = app
        .get(&format!("/en/download/app/{id_slug}/{version_slug}/downloading"))
        .await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.location,
        Some(format!("/en/download/app/{en_slug}/{version_slug}/downloading"))
    );

    // 英语版本没有 3.0
    let response = app
        .get(&format!(
            "/en/download/app/{id_slug}/{}",
            only_id["versionSlug"].as_str().unwrap()
        ))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
