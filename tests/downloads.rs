mod common;

use std::collections::HashSet;

use axum::http::StatusCode;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{Value, json};

use common::{download_input, id_of, setup, with};
use unduhan_lib::entity::prelude::*;
use unduhan_lib::entity::{article_topics, download_comments, download_topics, downloads};

#[tokio::test]
async fn translate_rejects_taken_language_and_unknown_group() {
    let app = setup().await;
    let image = app.media("vscode").await;
    let topic = app.topic("Editor", "id").await;

    let created = app
        .admin(
            "download.create",
            with(download_input("Visual Studio Code", &image, &topic), "language", json!("id")),
        )
        .await;
    let group = created["downloadTranslationId"].as_str().unwrap().to_string();

    let english = with(
        with(download_input("Visual Studio Code EN", &image, &topic), "language", json!("en")),
        "downloadTranslationId",
        json!(group),
    );
    let translated = app.admin("download.translate", english.clone()).await;
    assert_eq!(translated["downloadTranslationId"], json!(group));
    assert_eq!(translated["language"], json!("en"));

    let (status, body) = app
        .rpc("download.translate", Some(&app.admin_token), english)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], json!("CONFLICT"));

    let orphan = with(
        with(download_input("Orphan", &image, &topic), "language", json!("en")),
        "downloadTranslationId",
        json!("missing-group"),
    );
    let (status, _) = app.rpc("download.translate", Some(&app.admin_token), orphan).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let group_view = app.admin("download.translationById", json!(group)).await;
    assert_eq!(group_view["downloads"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn cursor_pages_visit_every_row_once() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Tools", "id").await;

    let mut ids = Vec::new();
    for i in 0..7 {
        let created = app
            .admin(
                "download.create",
                download_input(&format!("Tool {i}"), &image, &topic),
            )
            .await;
        ids.push(id_of(&created));
    }

    // 更新时间严格递增
    for (i, id) in ids.iter().enumerate() {
        Downloads::update_many()
            .col_expr(downloads::Column::UpdatedAt, Expr::value(1_000 + i as i64))
            .filter(downloads::Column::Id.eq(id.as_str()))
            .exec(&app.db)
            .await
            .unwrap();
    }

    let mut seen = Vec::new();
    let mut cursor: Option<i64> = None;
    let mut pages = 0;
    loop {
        let mut input = json!({ "language": "id", "limit": 3 });
        if let Some(cursor) = cursor {
            input = with(input, "cursor", json!(cursor));
        }
        let (status, page) = app.rpc("download.byLanguageInfinite", None, input).await;
        assert_eq!(status, StatusCode::OK);
        pages += 1;

        for item in page["items"].as_array().unwrap() {
            seen.push(id_of(item));
        }
        match page["nextCursor"].as_i64() {
            Some(next) => cursor = Some(next),
            None => break,
        }
        assert!(pages < 10, "pagination did not terminate");
    }

    assert_eq!(pages, 3);
    assert_eq!(seen.len(), 7);
    let unique: HashSet<&String> = seen.iter().collect();
    assert_eq!(unique.len(), 7);
    // 按更新时间倒序
    let expected: Vec<String> = ids.iter().rev().cloned().collect();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn delete_removes_links_comments_and_empty_group() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Browser", "id").await;

    let created = app
        .admin("download.create", download_input("Firefox", &image, &topic))
        .await;
    let id = id_of(&created);
    let group = created["downloadTranslationId"].as_str().unwrap().to_string();

    let (status, _) = app
        .rpc(
            "downloadComment.create",
            Some(&app.user_token),
            json!({ "content": "Mantap", "downloadId": id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.admin("download.delete", json!(id)).await, json!(true));

    let links = DownloadTopics::find()
        .filter(download_topics::Column::DownloadId.eq(id.as_str()))
        .count(&app.db)
        .await
        .unwrap();
    let comments = DownloadComments::find()
        .filter(download_comments::Column::DownloadId.eq(id.as_str()))
        .count(&app.db)
        .await
        .unwrap();
    let group_row = DownloadTranslations::find_by_id(group.as_str())
        .one(&app.db)
        .await
        .unwrap();
    assert_eq!(links, 0);
    assert_eq!(comments, 0);
    assert!(group_row.is_none());

    let (status, _) = app
        .rpc("download.delete", Some(&app.admin_token), json!(id))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_keeps_group_with_remaining_translation() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Browser", "id").await;

    let created = app
        .admin("download.create", download_input("Chrome", &image, &topic))
        .await;
    let group = created["downloadTranslationId"].as_str().unwrap().to_string();
    let english = with(
        with(download_input("Chrome EN", &image, &topic), "language", json!("en")),
        "downloadTranslationId",
        json!(group),
    );
    app.admin("download.translate", english).await;

    app.admin("download.delete", json!(id_of(&created))).await;

    let group_view = app.admin("download.translationById", json!(group)).await;
    let remaining = group_view["downloads"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["language"], json!("en"));
}

#[tokio::test]
async fn search_matches_title_and_slug_case_insensitively() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Editor", "id").await;

    app.admin("download.create", download_input("Visual Studio Code", &image, &topic))
        .await;
    app.admin("download.create", download_input("Sublime Text", &image, &topic))
        .await;
    app.admin(
        "download.create",
        with(download_input("Notepad Draft", &image, &topic), "status", json!("draft")),
    )
    .await;

    let search = |query: &str| {
        json!({ "language": "id", "searchQuery": query })
    };
    let titles = |rows: &Value| -> Vec<String> {
        rows.as_array()
            .unwrap()
            .iter()
            .map(|row| row["title"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, rows) = app.rpc("download.search", None, search("VISUAL")).await;
    assert_eq!(titles(&rows), vec!["Visual Studio Code"]);

    let (_, rows) = app.rpc("download.search", None, search("sublime-text")).await;
    assert_eq!(titles(&rows), vec!["Sublime Text"]);

    // 正文不参与搜索
    let (_, rows) = app.rpc("download.search", None, search("aplikasi")).await;
    assert!(rows.as_array().unwrap().is_empty());

    // 公开搜索只返回已发布内容
    let (_, rows) = app.rpc("download.search", None, search("notepad")).await;
    assert!(rows.as_array().unwrap().is_empty());
    let (_, rows) = app
        .rpc("download.searchDashboard", Some(&app.admin_token), search("notepad"))
        .await;
    assert_eq!(titles(&rows), vec!["Notepad Draft"]);
}

#[tokio::test]
async fn search_folds_case_of_accented_letters() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Grafis", "id").await;

    app.admin("download.create", download_input("Éditeur Photo", &image, &topic))
        .await;
    app.admin("download.create", download_input("Paint", &image, &topic))
        .await;

    for query in ["éditeur", "Éditeur", "ÉDITEUR", "photo"] {
        let (status, rows) = app
            .rpc(
                "download.search",
                None,
                json!({ "language": "id", "searchQuery": query }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 1, "query {query}");
        assert_eq!(rows[0]["title"], json!("Éditeur Photo"));
    }

    // 通配符按字面匹配
    let (_, rows) = app
        .rpc("download.search", None, json!({ "language": "id", "searchQuery": "*" }))
        .await;
    assert!(rows.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn by_slug_pages_files_without_overflow() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Tools", "id").await;
    let file = app.download_file("4.0").await;
    let created = app
        .admin(
            "download.create",
            with(
                download_input("Krita", &image, &topic),
                "downloadFiles",
                json!([id_of(&file)]),
            ),
        )
        .await;
    let slug = created["slug"].as_str().unwrap();

    let (status, detail) = app
        .rpc(
            "download.bySlug",
            None,
            json!({ "slug": slug, "downloadFilePage": 1, "downloadFilePerPage": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["downloadFiles"].as_array().unwrap().len(), 1);

    let (status, detail) = app
        .rpc(
            "download.bySlug",
            None,
            json!({ "slug": slug, "downloadFilePage": 4294967297u64, "downloadFilePerPage": 1000 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(detail["downloadFiles"].as_array().unwrap().is_empty());

    let (status, body) = app
        .rpc(
            "download.bySlug",
            None,
            json!({
                "slug": slug,
                "downloadFilePage": 4294967297u64,
                "downloadFilePerPage": 4294967296u64,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["fieldErrors"]["downloadFilePerPage"].is_array());
}

#[tokio::test]
async fn public_lookups_hide_drafts() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Tools", "id").await;

    let published = app
        .admin("download.create", download_input("OBS Studio", &image, &topic))
        .await;
    let group = published["downloadTranslationId"].as_str().unwrap().to_string();
    let draft = app
        .admin(
            "download.translate",
            with(
                with(
                    with(download_input("OBS Studio EN", &image, &topic), "language", json!("en")),
                    "downloadTranslationId",
                    json!(group),
                ),
                "status",
                json!("draft"),
            ),
        )
        .await;

    let (status, _) = app
        .rpc("download.bySlug", None, json!({ "slug": draft["slug"] }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .rpc("download.bySlug", None, json!({ "slug": published["slug"] }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, view) = app.rpc("download.translationById", None, json!(group)).await;
    assert_eq!(status, StatusCode::OK);
    let members = view["downloads"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["language"], json!("id"));

    // 管理员仍可看到草稿
    let detail = app.admin("download.byId", json!(id_of(&draft))).await;
    assert_eq!(detail["status"], json!("draft"));

    let only_draft = app
        .admin(
            "download.create",
            with(download_input("Hidden Tool", &image, &topic), "status", json!("draft")),
        )
        .await;
    let (status, _) = app
        .rpc(
            "download.translationById",
            None,
            only_draft["downloadTranslationId"].clone(),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_replaces_topic_links() {
    let app = setup().await;
    let image = app.media("cover").await;
    let old_topic = app.topic("Browser", "id").await;
    let new_topic = app.topic("Internet", "id").await;

    let created = app
        .admin("download.create", download_input("Opera", &image, &old_topic))
        .await;
    let id = id_of(&created);

    let input = with(
        with(download_input("Opera GX", &image, &new_topic), "id", json!(id)),
        "slug",
        json!("opera-gx"),
    );
    let updated = app.admin("download.update", input).await;
    assert_eq!(updated["title"], json!("Opera GX"));
    assert_eq!(updated["slug"], json!("opera-gx"));

    let links = DownloadTopics::find()
        .filter(download_topics::Column::DownloadId.eq(id.as_str()))
        .all(&app.db)
        .await
        .unwrap();
    let linked: Vec<&str> = links.iter().map(|link| link.topic_id.as_str()).collect();
    assert_eq!(linked, vec![new_topic.as_str()]);

    let (status, _) = app
        .rpc(
            "download.update",
            Some(&app.admin_token),
            with(
                with(download_input("Ghost", &image, &new_topic), "id", json!("missing")),
                "slug",
                json!("ghost"),
            ),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn topic_translate_and_delete_keep_links_consistent() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app
        .admin(
            "topic.create",
            json!({ "language": "id", "title": "Permainan", "type": "all", "status": "published" }),
        )
        .await;
    let topic_id = id_of(&topic);
    let group = topic["topicTranslationId"].as_str().unwrap().to_string();

    let english = json!({
        "language": "en",
        "topicTranslationId": group,
        "title": "Games",
        "type": "all",
        "status": "published",
    });
    let translated = app.admin("topic.translate", english.clone()).await;
    assert_eq!(translated["topicTranslationId"], json!(group));
    let (status, body) = app.rpc("topic.translate", Some(&app.admin_token), english).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], json!("CONFLICT"));

    let download = app
        .admin("download.create", download_input("Steam", &image, &topic_id))
        .await;
    app.admin(
        "article.create",
        json!({
            "title": "Game Terbaik 2026",
            "content": "<p>Daftar game terbaik.</p>",
            "status": "published",
            "featuredImageId": image,
            "topics": [topic_id],
        }),
    )
    .await;

    assert_eq!(app.admin("topic.delete", json!(topic_id)).await, json!(true));

    let download_links = DownloadTopics::find()
        .filter(download_topics::Column::TopicId.eq(topic_id.as_str()))
        .count(&app.db)
        .await
        .unwrap();
    let article_links = ArticleTopics::find()
        .filter(article_topics::Column::TopicId.eq(topic_id.as_str()))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(download_links, 0);
    assert_eq!(article_links, 0);

    // 下载本身保留
    let detail = app.admin("download.byId", json!(id_of(&download))).await;
    assert!(detail["topics"].as_array().unwrap().is_empty());

    // 分组还有英语版本
    let group_row = TopicTranslations::find_by_id(group.as_str())
        .one(&app.db)
        .await
        .unwrap();
    assert!(group_row.is_some());
}
