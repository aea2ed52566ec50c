//! 文件选择与读取

use lifeease::{ApiError, UploadFile};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlInputElement, Url};

/// 已选中的图片：内容已读入内存，附带本地预览地址
#[derive(Debug, Clone, PartialEq)]
pub struct PickedImage {
    pub upload: UploadFile,
    pub preview: String,
}

impl PickedImage {
    /// 释放预览用的 blob URL
    pub fn release(&self) {
        let _ = Url::revoke_object_url(&self.preview);
    }
}

/// 取出 `<input type="file">` 上选中的文件，并清空输入框以便重复选择同一文件
pub fn take_selected_files(ev: &web_sys::Event) -> Vec<File> {
    let Some(input) = ev
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
    else {
        return Vec::new();
    };

    let files = input
        .files()
        .map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
        .unwrap_or_default();
    input.set_value("");
    files
}

pub async fn read_file(file: &File) -> Result<UploadFile, ApiError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ApiError::Encode(format!("{:?}", e)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    let content_type = file.type_();

    Ok(UploadFile {
        file_name: file.name(),
        content_type: (!content_type.is_empty()).then_some(content_type),
        bytes,
    })
}

/// 读取文件并生成预览地址
pub async fn pick_image(file: &File) -> Result<PickedImage, ApiError> {
    let upload = read_file(file).await?;
    let preview = Url::create_object_url_with_blob(file)
        .map_err(|e| ApiError::Encode(format!("{:?}", e)))?;
    Ok(PickedImage { upload, preview })
}
