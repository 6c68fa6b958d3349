use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::App;

use super::{
    comment::{create::handle_add_comment, delete::handle_delete_comment},
    like::toggle::handle_toggle_like,
    reply::{create::handle_add_reply, delete::handle_delete_reply},
    thread::{create::handle_add_thread, get::handle_get_thread},
};

pub fn route() -> Router<App> {
    Router::<App>::new()
        .route("/", post(handle_add_thread))
        .route("/{thread_id}", get(handle_get_thread))
        .route("/{thread_id}/comments", post(handle_add_comment))
        .route(
            "/{thread_id}/comments/{comment_id}",
            delete(handle_delete_comment),
        )
        .route(
            "/{thread_id}/comments/{comment_id}/replies",
            post(handle_add_reply),
        )
        .route(
            "/{thread_id}/comments/{comment_id}/replies/{reply_id}",
            delete(handle_delete_reply),
        )
        .route(
            "/{thread_id}/comments/{comment_id}/likes",
            put(handle_toggle_like),
        )
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::{
        App,
        config::parse_dev_sessions,
        forum::{
            masking::ContentStatus,
            repository::{memory::MemoryRepository, uuid_id_generator},
        },
        router,
    };

    async fn app() -> (axum::Router, Arc<MemoryRepository>) {
        let store = Arc::new(MemoryRepository::new(Arc::new(|| "123".to_string())));
        store.add_user("user-1", "dicoding").await;
        store.add_user("user-2", "johndoe").await;
        store.add_session("token-1", "user-1").await;
        store.add_session("token-2", "user-2").await;
        store
            .seed_thread(
                "thread-123",
                "user-1",
                "A Thread",
                "A Body",
                "2021-08-08T07:19:09.775Z",
            )
            .await;
        store
            .seed_comment(
                "comment-123",
                "thread-123",
                "user-1",
                "A comment",
                "2021-08-08T07:22:33.555Z",
                ContentStatus::Active,
            )
            .await;

        let app = App {
            repos: store.repositories(),
        };

        (router(app), store)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_get_thread_detail() {
        let (router, _) = app().await;

        let response = router
            .oneshot(request("GET", "/threads/thread-123", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "status": "success",
                "data": {
                    "thread": {
                        "id": "thread-123",
                        "title": "A Thread",
                        "body": "A Body",
                        "date": "2021-08-08T07:19:09.775Z",
                        "username": "dicoding",
                        "comments": [{
                            "id": "comment-123",
                            "username": "dicoding",
                            "date": "2021-08-08T07:22:33.555Z",
                            "content": "A comment",
                            "replies": [],
                            "likeCount": 0,
                        }],
                    },
                },
            })
        );
    }

    #[tokio::test]
    async fn test_missing_thread_is_404() {
        let (router, _) = app().await;

        let response = router
            .oneshot(request("GET", "/threads/thread-404", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_writes_require_a_session() {
        let (router, _) = app().await;

        let response = router
            .clone()
            .oneshot(request(
                "POST",
                "/threads/thread-123/comments",
                None,
                Some(json!({ "content": "hi" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = router
            .oneshot(request(
                "POST",
                "/threads/thread-123/comments",
                Some("token-unknown"),
                Some(json!({ "content": "hi" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_add_comment_returns_201() {
        let (router, _) = app().await;

        let response = router
            .oneshot(request(
                "POST",
                "/threads/thread-123/comments",
                Some("token-2"),
                Some(json!({ "content": "Another comment" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await["data"]["addedComment"],
            json!({
                "id": "comment-123",
                "content": "Another comment",
                "owner": "user-2",
            })
        );
    }

    #[tokio::test]
    async fn test_bad_payloads_are_400() {
        let (router, _) = app().await;

        let response = router
            .clone()
            .oneshot(request(
                "POST",
                "/threads/thread-123/comments",
                Some("token-2"),
                Some(json!({ "text": "wrong field" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let malformed = Request::builder()
            .method("POST")
            .uri("/threads/thread-123/comments")
            .header(header::AUTHORIZATION, "Bearer token-2")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let response = router.oneshot(malformed).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERR");
    }

    #[tokio::test]
    async fn test_deleting_someone_elses_comment_is_403() {
        let (router, store) = app().await;

        let response = router
            .oneshot(request(
                "DELETE",
                "/threads/thread-123/comments/comment-123",
                Some("token-2"),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            store.comment_status("comment-123").await,
            Some(ContentStatus::Active)
        );
    }

    #[tokio::test]
    async fn test_delete_comment_masks_it_in_the_detail() {
        let (router, _) = app().await;

        let response = router
            .clone()
            .oneshot(request(
                "DELETE",
                "/threads/thread-123/comments/comment-123",
                Some("token-1"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "status": "success" }));

        let response = router
            .oneshot(request("GET", "/threads/thread-123", None, None))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(
            body["data"]["thread"]["comments"][0]["content"],
            crate::forum::masking::DELETED_COMMENT_PLACEHOLDER
        );
        assert_eq!(body["data"]["thread"]["comments"][0]["id"], "comment-123");
    }

    #[tokio::test]
    async fn test_like_toggle_shows_up_in_like_count() {
        let (router, _) = app().await;

        let response = router
            .clone()
            .oneshot(request(
                "PUT",
                "/threads/thread-123/comments/comment-123/likes",
                Some("token-2"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(request("GET", "/threads/thread-123", None, None))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["thread"]["comments"][0]["likeCount"], 1);
    }

    #[tokio::test]
    async fn test_reply_lifecycle() {
        let (router, _) = app().await;

        let response = router
            .clone()
            .oneshot(request(
                "POST",
                "/threads/thread-123/comments/comment-123/replies",
                Some("token-2"),
                Some(json!({ "content": "A reply" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let reply_id = body_json(response).await["data"]["addedReply"]["id"]
            .as_str()
            .unwrap()
            .to_string();
        assert_eq!(reply_id, "reply-123");

        let response = router
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/threads/thread-123/comments/comment-123/replies/{reply_id}"),
                Some("token-2"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(request("GET", "/threads/thread-123", None, None))
            .await
            .unwrap();
        let body = body_json(response).await;
        let reply = &body["data"]["thread"]["comments"][0]["replies"][0];
        assert_eq!(reply["content"], crate::forum::masking::DELETED_REPLY_PLACEHOLDER);
        assert_eq!(reply["username"], "johndoe");
    }

    #[tokio::test]
    async fn test_add_thread() {
        let (router, _) = app().await;

        let response = router
            .oneshot(request(
                "POST",
                "/threads",
                Some("token-1"),
                Some(json!({ "title": "New", "body": "Thread" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await["data"]["addedThread"]["id"],
            "thread-123"
        );
    }

    #[tokio::test]
    async fn test_memory_mode_accepts_writes_from_dev_sessions() {
        let store = Arc::new(MemoryRepository::new(uuid_id_generator()));
        let sessions = parse_dev_sessions("dev-token:user-1:dicoding").unwrap();
        store.seed_dev_sessions(&sessions).await;
        let router = router(App {
            repos: store.repositories(),
        });

        let response = router
            .clone()
            .oneshot(request(
                "POST",
                "/threads",
                Some("dev-token"),
                Some(json!({ "title": "New", "body": "Thread" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let thread_id = body_json(response).await["data"]["addedThread"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = router
            .oneshot(request("GET", &format!("/threads/{thread_id}"), None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["data"]["thread"]["username"],
            "dicoding"
        );
    }
}
