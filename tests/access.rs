mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{download_input, id_of, setup};

#[tokio::test]
async fn procedures_enforce_access_level() {
    let app = setup().await;
    let input = json!({ "name": "logo", "url": "https://cdn.unduhan.test/logo.png" });

    let (status, body) = app.rpc("media.create", None, input.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], json!("UNAUTHORIZED"));

    let (status, _) = app
        .rpc("media.create", Some("not-a-session"), input.clone())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .rpc("media.create", Some(&app.user_token), input.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], json!("FORBIDDEN"));

    let (status, _) = app.rpc("media.create", Some(&app.admin_token), input).await;
    assert_eq!(status, StatusCode::OK);

    let (status, me) = app.rpc("user.me", Some(&app.user_token), json!(null)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], json!("budi"));
}

#[tokio::test]
async fn invalid_input_reports_field_errors() {
    let app = setup().await;

    let (status, body) = app
        .rpc(
            "media.create",
            Some(&app.admin_token),
            json!({ "name": "", "url": "not a url" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("BAD_REQUEST"));
    assert!(body["error"]["fieldErrors"]["url"].is_array());
}

#[tokio::test]
async fn comments_belong_to_their_author() {
    let app = setup().await;
    let image = app.media("cover").await;
    let topic = app.topic("Game", "id").await;
    let download = app
        .admin("download.create", download_input("Minecraft", &image, &topic))
        .await;
    let download_id = id_of(&download);

    let (status, comment) = app
        .rpc(
            "downloadComment.create",
            Some(&app.user_token),
            json!({ "content": "Keren", "downloadId": download_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let comment_id = id_of(&comment);

    // 管理员不是作者，只能走管理员专用过程
    let (status, _) = app
        .rpc(
            "downloadComment.update",
            Some(&app.admin_token),
            json!({ "id": comment_id, "content": "Diubah" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, updated) = app
        .rpc(
            "downloadComment.update",
            Some(&app.user_token),
            json!({ "id": comment_id, "content": "Keren sekali" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"], json!("Keren sekali"));

    let (status, reply) = app
        .rpc(
            "downloadComment.create",
            Some(&app.admin_token),
            json!({ "content": "Terima kasih", "downloadId": download_id, "replyToId": comment_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["replyToId"], json!(comment_id));

    let (status, _) = app
        .rpc(
            "downloadComment.create",
            Some(&app.user_token),
            json!({ "content": "Balasan", "downloadId": download_id, "replyToId": id_of(&reply) }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 删除顶层评论时回复一并删除
    let (status, _) = app
        .rpc("downloadComment.delete", Some(&app.user_token), json!(comment_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .rpc("downloadComment.byId", Some(&app.admin_token), json!(id_of(&reply)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn media_in_use_cannot_be_deleted() {
    let app = setup().await;
    let used = app.media("used").await;
    let unused = app.media("unused").await;
    let topic = app.topic("Tools", "id").await;
    app.admin("download.create", download_input("7-Zip", &used, &topic))
        .await;

    let (status, body) = app
        .rpc("media.delete", Some(&app.admin_token), json!(used))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], json!("CONFLICT"));

    let (status, body) = app
        .rpc("media.delete", Some(&app.admin_token), json!(unused))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(true));

    let (status, _) = app
        .rpc("media.delete", Some(&app.admin_token), json!(unused))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
