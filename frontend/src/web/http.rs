//! HTTP 传输层
//!
//! 用 `gloo-net` 实现核心 crate 的 [`HttpClient`]，JSON 与 multipart 请求都从这里发出。

use gloo_net::http::{Method, RequestBuilder};
use lifeease::{ApiError, HttpClient, HttpMethod, HttpRequest, HttpResponse, RequestBody, UploadFile};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

/// 浏览器 fetch 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHttpClient;

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn js_error(e: JsValue) -> ApiError {
    ApiError::Encode(format!("{:?}", e))
}

/// 构建 multipart 表单，所有文件使用同一字段名
fn form_data(field: &str, files: &[UploadFile]) -> Result<FormData, ApiError> {
    let form = FormData::new().map_err(js_error)?;
    for file in files {
        let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let options = BlobPropertyBag::new();
        if let Some(content_type) = &file.content_type {
            options.set_type(content_type);
        }
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;
        form.append_with_blob_and_filename(field, &blob, &file.file_name)
            .map_err(js_error)?;
    }
    Ok(form)
}

#[async_trait::async_trait(?Send)]
impl HttpClient for BrowserHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = RequestBuilder::new(&req.url).method(to_method(req.method));
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        // multipart 不设置 Content-Type，由浏览器补上 boundary
        let request = match req.body {
            None => builder.build(),
            Some(RequestBody::Json(text)) => builder.body(text),
            Some(RequestBody::Multipart { field, files }) => builder.body(form_data(&field, &files)?),
        }
        .map_err(|e| ApiError::Encode(e.to_string()))?;

        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
