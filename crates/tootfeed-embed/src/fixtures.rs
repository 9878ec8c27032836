//! Shared test data and a local JSON server standing in for an instance.

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use tootfeed_core::Post;

/// A minimal status object.
pub fn post_value(id: &str, content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "created_at": "2024-03-05T14:07:00.000Z",
        "url": format!("https://example.social/@alice/{id}"),
        "uri": format!("https://example.social/users/alice/statuses/{id}"),
        "content": content,
        "account": {
            "id": "1",
            "username": "alice",
            "acct": "alice",
            "display_name": "Alice :wave:",
            "url": "https://example.social/@alice",
            "avatar": "https://example.social/avatars/alice.png",
            "emojis": [{"shortcode": "wave", "url": "https://example.social/emoji/wave.png"}]
        }
    })
}

/// [`post_value`] decoded.
pub fn post(id: &str, content: &str) -> Post {
    serde_json::from_value(post_value(id, content)).expect("fixture post should decode")
}

/// Serve `body` with `status` on every path of a fresh local listener.
///
/// Returns `http://127.0.0.1:<port>/api/v1/accounts/1/statuses`.
pub async fn serve_json(status: StatusCode, body: serde_json::Value) -> String {
    let app = Router::new().fallback(move || async move { (status, Json(body)) });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/api/v1/accounts/1/statuses")
}
