//! 服务商的服务管理流程
//!
//! 保存服务时先校验表单，再上传新图片，最后创建或更新。校验失败不会发出任何请求。

use crate::api::LifeEaseApi;
use crate::error::AppResult;
use crate::media::merge_images;
use crate::request::{HttpClient, UploadFile};
use crate::validation::{self, ServiceInput};
use lifeease_shared::{Service, ServiceUpdate};
use std::collections::BTreeSet;

/// 编辑时对已有图片的处理
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageEdits {
    /// 服务当前的图片
    pub existing: Vec<String>,
    /// 要移除的下标
    pub removed: BTreeSet<usize>,
    /// 新选择、待上传的文件
    pub uploads: Vec<UploadFile>,
}

impl ImageEdits {
    pub fn new(uploads: Vec<UploadFile>) -> Self {
        Self {
            uploads,
            ..Default::default()
        }
    }
}

pub async fn create_service<C: HttpClient>(
    api: &LifeEaseApi<C>,
    input: &ServiceInput,
    uploads: Vec<UploadFile>,
) -> AppResult<Service> {
    let mut draft = validation::validate_service(input)?;
    draft.images = api.upload_service_images(uploads).await?;

    let service = api.create_service(&draft).await?;
    tracing::info!(service_id = %service.id, images = draft.images.len(), "service created");
    Ok(service)
}

pub async fn update_service<C: HttpClient>(
    api: &LifeEaseApi<C>,
    id: &str,
    input: &ServiceInput,
    images: ImageEdits,
    is_active: bool,
) -> AppResult<Service> {
    let mut draft = validation::validate_service(input)?;
    let uploaded = api.upload_service_images(images.uploads).await?;
    draft.images = merge_images(&images.existing, &images.removed, uploaded);

    let service = api
        .update_service(id, ServiceUpdate::from_draft(draft, is_active))
        .await?;
    tracing::info!(service_id = %id, "service updated");
    Ok(service)
}

pub async fn set_active<C: HttpClient>(api: &LifeEaseApi<C>, id: &str, is_active: bool) -> AppResult<Service> {
    Ok(api.update_service(id, ServiceUpdate::active(is_active)).await?)
}

pub async fn delete_service<C: HttpClient>(api: &LifeEaseApi<C>, id: &str) -> AppResult<()> {
    api.delete_service(id).await?;
    tracing::info!(service_id = %id, "service deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::{AppError, ValidationError};
    use crate::request::{HttpMethod, MockHttpClient, RequestBody};
    use crate::tracker::RequestTracker;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    const BASE: &str = "http://localhost:5000";

    fn api(client: &MockHttpClient) -> LifeEaseApi<MockHttpClient> {
        LifeEaseApi::new(client.clone(), &ClientConfig::default(), RequestTracker::new())
            .with_token(Some("t1".to_string()))
    }

    fn input(price: &str) -> ServiceInput {
        ServiceInput {
            title: "Apartment hunting".to_string(),
            category: "Housing".to_string(),
            description: "Help finding a flat".to_string(),
            price: price.to_string(),
            currency: String::new(),
            location: "Tokyo".to_string(),
        }
    }

    fn photo(name: &str) -> UploadFile {
        UploadFile {
            file_name: name.to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: vec![1, 2, 3],
        }
    }

    fn json_body(req: &crate::request::HttpRequest) -> Value {
        match &req.body {
            Some(RequestBody::Json(text)) => serde_json::from_str(text).unwrap(),
            other => panic!("expected json body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_price_sends_nothing() {
        let client = MockHttpClient::new();

        let err = create_service(&api(&client), &input("-5"), vec![photo("a.jpg")])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ValidationError::InvalidPrice)));
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_uploads_then_posts_with_paths() {
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Post,
            &format!("{BASE}/api/services/upload"),
            200,
            json!({ "paths": ["/uploads/services/a.jpg"] }),
        );
        client.mock_response(
            HttpMethod::Post,
            &format!("{BASE}/api/services"),
            201,
            json!({ "service": { "_id": "s1", "title": "Apartment hunting", "price": 5000 } }),
        );

        let service = create_service(&api(&client), &input("5000"), vec![photo("a.jpg")])
            .await
            .unwrap();

        assert_eq!(service.id, "s1");
        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url, format!("{BASE}/api/services/upload"));
        let body = json_body(&requests[1]);
        assert_eq!(body["images"], json!(["/uploads/services/a.jpg"]));
        assert_eq!(body["currency"], json!("JPY"));
    }

    #[tokio::test]
    async fn test_update_keeps_remaining_images_and_appends_uploads() {
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Post,
            &format!("{BASE}/api/services/upload"),
            200,
            json!({ "paths": ["/uploads/new.jpg"] }),
        );
        client.mock_response(
            HttpMethod::Put,
            &format!("{BASE}/api/services/s1"),
            200,
            json!({ "_id": "s1", "title": "Apartment hunting" }),
        );
        let edits = ImageEdits {
            existing: vec!["/a.jpg".to_string(), "/b.jpg".to_string(), "/c.jpg".to_string()],
            removed: BTreeSet::from([1]),
            uploads: vec![photo("new.jpg")],
        };

        update_service(&api(&client), "s1", &input("100"), edits, false)
            .await
            .unwrap();

        let body = json_body(&client.last_request());
        assert_eq!(body["images"], json!(["/a.jpg", "/c.jpg", "/uploads/new.jpg"]));
        assert_eq!(body["isActive"], json!(false));
    }

    #[tokio::test]
    async fn test_update_without_new_images_skips_upload() {
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Put,
            &format!("{BASE}/api/services/s1"),
            200,
            json!({ "_id": "s1" }),
        );
        let edits = ImageEdits {
            existing: vec!["/a.jpg".to_string()],
            ..Default::default()
        };

        update_service(&api(&client), "s1", &input("0"), edits, true)
            .await
            .unwrap();

        assert_eq!(client.requests().len(), 1);
        assert_eq!(json_body(&client.last_request())["images"], json!(["/a.jpg"]));
    }

    #[tokio::test]
    async fn test_failed_upload_does_not_create() {
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Post,
            &format!("{BASE}/api/services/upload"),
            413,
            json!({ "message": "File too large" }),
        );

        let err = create_service(&api(&client), &input("10"), vec![photo("big.jpg")])
            .await
            .unwrap_err();

        assert_eq!(err.user_message("Save failed"), "File too large");
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_and_delete() {
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Put,
            &format!("{BASE}/api/services/s1"),
            200,
            json!({ "_id": "s1", "isActive": false }),
        );
        client.mock_response(
            HttpMethod::Delete,
            &format!("{BASE}/api/services/s1"),
            200,
            json!({ "message": "deleted" }),
        );
        let api = api(&client);

        let service = set_active(&api, "s1", false).await.unwrap();
        assert!(!service.is_active);
        assert_eq!(json_body(&client.last_request()), json!({ "isActive": false }));

        delete_service(&api, "s1").await.unwrap();
        assert_eq!(client.last_request().method, HttpMethod::Delete);
    }
}
