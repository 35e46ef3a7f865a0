mod common;

use axum::http::StatusCode;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{Value, json};

use common::{TestApp, id_of, setup, with};
use unduhan_lib::entity::prelude::*;
use unduhan_lib::entity::{article_comments, article_topics};

fn article_input(title: &str, image_id: &str, topic_id: &str) -> Value {
    json!({
        "title": title,
        "content": format!("<p>{title} untuk pemula.</p>"),
        "status": "published",
        "featuredImageId": image_id,
        "topics": [topic_id],
    })
}

/// 创建印尼语文章及其英语翻译
async fn bilingual_article(app: &TestApp) -> (Value, Value) {
    let image = app.media("cover").await;
    let topic = app.topic("Tutorial", "id").await;

    let created = app
        .admin("article.create", article_input("Cara Instal Linux", &image, &topic))
        .await;
    let english = app
        .admin(
            "article.translate",
            with(
                with(article_input("How to Install Linux", &image, &topic), "language", json!("en")),
                "articleTranslationId",
                created["articleTranslationId"].clone(),
            ),
        )
        .await;
    (created, english)
}

#[tokio::test]
async fn translate_rejects_taken_language() {
    let app = setup().await;
    let (created, english) = bilingual_article(&app).await;
    let group = created["articleTranslationId"].clone();
    assert_eq!(english["articleTranslationId"], group);
    assert_eq!(english["language"], json!("en"));

    let image = created["featuredImageId"].as_str().unwrap();
    let topic = app.topic("Linux", "id").await;
    let again = with(
        with(article_input("Install Linux Again", image, &topic), "language", json!("en")),
        "articleTranslationId",
        group.clone(),
    );
    let (status, body) = app.rpc("article.translate", Some(&app.admin_token), again).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], json!("CONFLICT"));

    let (status, _) = app
        .rpc(
            "article.translate",
            Some(&app.admin_token),
            with(
                with(article_input("Orphan", image, &topic), "language", json!("en")),
                "articleTranslationId",
                json!("missing-group"),
            ),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let view = app.admin("article.translationById", group).await;
    assert_eq!(view["articles"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn delete_removes_links_comments_and_empty_group() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Tutorial", "id").await;

    let created = app
        .admin("article.create", article_input("Tips Windows", &image, &topic))
        .await;
    let id = id_of(&created);
    let group = created["articleTranslationId"].as_str().unwrap().to_string();

    let (status, comment) = app
        .rpc(
            "articleComment.create",
            Some(&app.user_token),
            json!({ "content": "Bermanfaat", "articleId": id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    app.admin(
        "articleComment.create",
        json!({ "content": "Terima kasih", "articleId": id, "replyToId": id_of(&comment) }),
    )
    .await;

    assert_eq!(app.admin("article.delete", json!(id)).await, json!(true));

    let links = ArticleTopics::find()
        .filter(article_topics::Column::ArticleId.eq(id.as_str()))
        .count(&app.db)
        .await
        .unwrap();
    let comments = ArticleComments::find()
        .filter(article_comments::Column::ArticleId.eq(id.as_str()))
        .count(&app.db)
        .await
        .unwrap();
    let group_row = ArticleTranslations::find_by_id(group.as_str())
        .one(&app.db)
        .await
        .unwrap();
    assert_eq!(links, 0);
    assert_eq!(comments, 0);
    assert!(group_row.is_none());

    // 话题本身保留
    assert!(Topics::find_by_id(topic.as_str()).one(&app.db).await.unwrap().is_some());

    let (status, _) = app.rpc("article.delete", Some(&app.admin_token), json!(id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn other_language_slug_redirects_to_translation() {
    let app = setup().await;
    let (created, english) = bilingual_article(&app).await;
    let id_slug = created["slug"].as_str().unwrap();
    let en_slug = english["slug"].as_str().unwrap();

    let response = app.get(&format!("/en/article/{id_slug}")).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location, Some(format!("/en/article/{en_slug}")));

    let response = app.get(&format!("/id/article/{id_slug}")).await;
    assert_eq!(response.status, StatusCode::OK);
    let page = response.json();
    assert_eq!(page["data"]["article"]["slug"], json!(id_slug));
    assert_eq!(
        page["metadata"]["canonical"],
        json!(format!("http://localhost:3000/id/article/{id_slug}"))
    );
}

#[tokio::test]
async fn article_without_published_sibling_is_not_found() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Tutorial", "id").await;

    let only_id = app
        .admin("article.create", article_input("Resep Nasi Goreng", &image, &topic))
        .await;
    let slug = only_id["slug"].as_str().unwrap();
    assert_eq!(app.get(&format!("/en/article/{slug}")).await.status, StatusCode::NOT_FOUND);

    // 草稿翻译不作为重定向目标
    app.admin(
        "article.translate",
        with(
            with(
                with(article_input("Fried Rice Recipe", &image, &topic), "language", json!("en")),
                "articleTranslationId",
                only_id["articleTranslationId"].clone(),
            ),
            "status",
            json!("draft"),
        ),
    )
    .await;
    assert_eq!(app.get(&format!("/en/article/{slug}")).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&format!("/id/article/{slug}")).await.status, StatusCode::OK);
}
