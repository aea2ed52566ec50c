use super::*;
use crate::request::{MockHttpClient, RequestBody};
use lifeease_shared::Role;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

const BASE: &str = "http://localhost:5000";

fn api(client: &MockHttpClient, tracker: &RequestTracker) -> LifeEaseApi<MockHttpClient> {
    LifeEaseApi::new(client.clone(), &ClientConfig::default(), tracker.clone())
}

fn image(name: &str) -> UploadFile {
    UploadFile {
        file_name: name.to_string(),
        content_type: Some("image/png".to_string()),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    }
}

#[tokio::test]
async fn test_bearer_token_is_attached_when_present() {
    let client = MockHttpClient::new();
    let tracker = RequestTracker::new();
    client.mock_response(
        HttpMethod::Get,
        &format!("{BASE}/api/users/profile"),
        200,
        json!({ "user": { "_id": "u1", "name": "Aiko", "email": "aiko@example.jp", "role": "user" } }),
    );
    client.mock_response(
        HttpMethod::Get,
        &format!("{BASE}/api/users/profile"),
        401,
        json!({ "message": "Not authorized" }),
    );

    let authed = api(&client, &tracker).with_token(Some("t1".to_string()));
    let user = authed.get_profile().await.unwrap();
    assert_eq!(user.name, "Aiko");
    assert_eq!(
        client.last_request().headers.get("Authorization").map(String::as_str),
        Some("Bearer t1")
    );

    let anonymous = authed.with_token(Some("   ".to_string()));
    assert!(!anonymous.is_authenticated());
    let err = anonymous.get_profile().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(!client.last_request().headers.contains_key("Authorization"));
}

#[tokio::test]
async fn test_query_parameters_are_percent_encoded() {
    let client = MockHttpClient::new();
    let tracker = RequestTracker::new();
    let url = format!("{BASE}/api/services?q=tea%20ceremony&category=Home%20%26%20Living&page=2&limit=12");
    client.mock_response(
        HttpMethod::Get,
        &url,
        200,
        json!({
            "items": [{ "_id": "s1", "title": "Tea", "price": 3000 }],
            "pagination": { "page": 2, "pages": 3, "total": 25, "limit": 12 }
        }),
    );

    let page = api(&client, &tracker)
        .list_services(&ListServicesRequest {
            q: Some("tea ceremony".to_string()),
            category: Some("Home & Living".to_string()),
            page: 2,
            limit: 12,
        })
        .await
        .unwrap();

    assert_eq!(client.last_request().url, url);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].currency, "JPY");
    assert_eq!(page.total_pages(), 3);
}

#[tokio::test]
async fn test_tracker_counts_during_request_and_settles() {
    let tracker = RequestTracker::new();
    let client = MockHttpClient::new().watching(&tracker);
    client.mock_response(HttpMethod::Get, &format!("{BASE}/api/users/admin/stats"), 200, json!({ "totalUsers": 4 }));

    let stats = api(&client, &tracker).admin_stats().await.unwrap();

    assert_eq!(stats.total_users, 4);
    assert_eq!(client.in_flight_seen(), vec![1]);
    assert_eq!(tracker.get_count(), 0);
}

#[tokio::test]
async fn test_failures_still_release_the_tracker() {
    let tracker = RequestTracker::new();
    let client = MockHttpClient::new().watching(&tracker);
    let url = format!("{BASE}/api/services/s1");
    client.mock_network_error(HttpMethod::Get, &url);
    client.mock_response(HttpMethod::Get, &url, 500, json!({ "message": "boom" }));
    client.mock_raw(HttpMethod::Get, &url, 200, "<html>");
    let api = api(&client, &tracker);

    assert!(matches!(api.get_service("s1").await, Err(ApiError::Network(_))));
    assert_eq!(
        api.get_service("s1").await.unwrap_err().backend_message(),
        Some("boom")
    );
    assert!(matches!(api.get_service("s1").await, Err(ApiError::Decode(_))));

    assert_eq!(client.in_flight_seen(), vec![1, 1, 1]);
    assert_eq!(tracker.get_count(), 0);
}

#[tokio::test]
async fn test_review_provider_sends_put_without_body() {
    let tracker = RequestTracker::new();
    let client = MockHttpClient::new();
    client.mock_response(
        HttpMethod::Put,
        &format!("{BASE}/api/users/admin/providers/u%2F7/approve"),
        200,
        json!({ "message": "Provider approved" }),
    );

    let resp = api(&client, &tracker).approve_provider("u/7").await.unwrap();

    assert_eq!(resp.message.as_deref(), Some("Provider approved"));
    assert_eq!(client.last_request().body, None);
}

#[tokio::test]
async fn test_list_providers_accepts_any_envelope() {
    let tracker = RequestTracker::new();
    let client = MockHttpClient::new();
    let pending = format!("{BASE}/api/users/admin/providers?status=pending");
    let all = format!("{BASE}/api/users/admin/providers");
    let provider = json!({ "_id": "p1", "name": "Kenji", "email": "k@example.jp", "role": "service_provider" });
    client.mock_response(HttpMethod::Get, &pending, 200, json!({ "providers": [provider.clone()] }));
    client.mock_response(HttpMethod::Get, &all, 200, json!([provider]));
    let api = api(&client, &tracker);

    let queued = api.list_providers(Some(ApprovalStatus::Pending)).await.unwrap();
    let everyone = api.list_providers(None).await.unwrap();

    assert_eq!(queued.len(), 1);
    assert_eq!(queued, everyone);
    assert_eq!(everyone[0].role, Role::ServiceProvider);
}

#[tokio::test]
async fn test_update_service_sends_partial_body() {
    let tracker = RequestTracker::new();
    let client = MockHttpClient::new();
    client.mock_response(
        HttpMethod::Put,
        &format!("{BASE}/api/services/s9"),
        200,
        json!({ "service": { "_id": "s9", "title": "Repairs", "isActive": false } }),
    );

    let service = api(&client, &tracker)
        .update_service("s9", ServiceUpdate::active(false))
        .await
        .unwrap();

    assert!(!service.is_active);
    assert_eq!(
        client.last_request().body,
        Some(RequestBody::Json(r#"{"isActive":false}"#.to_string()))
    );
}

#[tokio::test]
async fn test_avatar_upload_is_multipart_put() {
    let tracker = RequestTracker::new();
    let client = MockHttpClient::new();
    client.mock_response(
        HttpMethod::Put,
        &format!("{BASE}/api/users/avatar"),
        200,
        json!({ "avatar": "/uploads/avatars/new.png" }),
    );

    let path = api(&client, &tracker)
        .with_token(Some("t1".to_string()))
        .upload_avatar(image("me.png"))
        .await
        .unwrap();

    assert_eq!(path, "/uploads/avatars/new.png");
    let req = client.last_request();
    assert!(!req.headers.contains_key("Content-Type"));
    assert_eq!(
        req.body,
        Some(RequestBody::Multipart {
            field: "avatar".to_string(),
            files: vec![image("me.png")],
        })
    );
}

#[tokio::test]
async fn test_service_images_upload_skips_empty_batch() {
    let tracker = RequestTracker::new();
    let client = MockHttpClient::new().watching(&tracker);
    client.mock_response(
        HttpMethod::Post,
        &format!("{BASE}/api/services/upload"),
        200,
        json!({ "paths": ["/uploads/services/a.png", "/uploads/services/b.png"] }),
    );
    let api = api(&client, &tracker);

    assert_eq!(api.upload_service_images(Vec::new()).await.unwrap(), Vec::<String>::new());
    assert!(client.requests().is_empty());

    let paths = api
        .upload_service_images(vec![image("a.png"), image("b.png")])
        .await
        .unwrap();
    assert_eq!(paths.len(), 2);
    assert_eq!(client.in_flight_seen(), vec![1]);
}

// =========================================================
// 并发请求：由测试控制每个请求何时完成
// =========================================================

#[derive(Clone, Default)]
struct GatedClient {
    gates: Rc<RefCell<VecDeque<oneshot::Receiver<HttpResponse>>>>,
}

#[async_trait::async_trait(?Send)]
impl HttpClient for GatedClient {
    async fn send(&self, _req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let gate = self.gates.borrow_mut().pop_front();
        match gate {
            Some(rx) => rx
                .await
                .map_err(|_| ApiError::Network("gate dropped".to_string())),
            None => Err(ApiError::Network("no gate".to_string())),
        }
    }
}

fn ok_response() -> HttpResponse {
    HttpResponse {
        status: 200,
        body: "{}".to_string(),
    }
}

async fn wait_for(tracker: &RequestTracker, count: usize) {
    while tracker.get_count() != count {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_overlapping_requests_settle_in_reverse_order() {
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    let client = GatedClient::default();
    client.gates.borrow_mut().extend([first_rx, second_rx]);

    let tracker = RequestTracker::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _sub = tracker.subscribe(move |n| sink.lock().unwrap().push(n));

    let api = LifeEaseApi::new(client, &ClientConfig::default(), tracker.clone());
    let driver_tracker = tracker.clone();
    let driver = async move {
        wait_for(&driver_tracker, 2).await;
        second_tx.send(ok_response()).unwrap();
        wait_for(&driver_tracker, 1).await;
        first_tx.send(ok_response()).unwrap();
    };

    let (first, second, ()) = tokio::join!(api.admin_stats(), api.admin_stats(), driver);

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 1, 0]);
    assert!(!tracker.is_busy());
}

#[tokio::test]
async fn test_dropped_request_future_releases_the_tracker() {
    let (_tx, rx) = oneshot::channel();
    let client = GatedClient::default();
    client.gates.borrow_mut().push_back(rx);
    let tracker = RequestTracker::new();
    let api = LifeEaseApi::new(client, &ClientConfig::default(), tracker.clone());

    {
        let pending = api.admin_stats();
        tokio::pin!(pending);
        let polled = poll_once(pending.as_mut()).await;
        assert!(polled);
        assert_eq!(tracker.get_count(), 1);
    }

    assert_eq!(tracker.get_count(), 0);
}

/// 轮询一次，返回 future 是否仍在等待
async fn poll_once<F: std::future::Future>(fut: std::pin::Pin<&mut F>) -> bool {
    tokio::select! {
        biased;
        _ = fut => false,
        _ = std::future::ready(()) => true,
    }
}
