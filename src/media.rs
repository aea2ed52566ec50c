//! 图片地址处理

use crate::config::DEFAULT_SERVICE_IMAGE;
use std::collections::BTreeSet;

/// 将后端返回的相对路径解析为完整地址；绝对地址原样返回
pub fn resolve_asset(api_base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", api_base, path)
    } else {
        format!("{}/{}", api_base, path)
    }
}

/// 服务封面图：第一张图片，没有图片时使用占位图
pub fn service_cover(api_base: &str, images: &[String]) -> String {
    images
        .first()
        .filter(|p| !p.is_empty())
        .map(|p| resolve_asset(api_base, p))
        .unwrap_or_else(|| DEFAULT_SERVICE_IMAGE.to_string())
}

/// 编辑服务时的最终图片列表：保留未被移除的旧图片，再追加新上传的图片
pub fn merge_images(existing: &[String], removed: &BTreeSet<usize>, uploaded: Vec<String>) -> Vec<String> {
    existing
        .iter()
        .enumerate()
        .filter(|(i, _)| !removed.contains(i))
        .map(|(_, path)| path.clone())
        .chain(uploaded)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "http://localhost:5000";

    #[test]
    fn test_resolve_relative_and_absolute() {
        assert_eq!(
            resolve_asset(BASE, "/uploads/services/a.jpg"),
            "http://localhost:5000/uploads/services/a.jpg"
        );
        assert_eq!(
            resolve_asset(BASE, "uploads/a.jpg"),
            "http://localhost:5000/uploads/a.jpg"
        );
        assert_eq!(
            resolve_asset(BASE, "https://cdn.example.jp/a.jpg"),
            "https://cdn.example.jp/a.jpg"
        );
    }

    #[test]
    fn test_cover_falls_back_to_placeholder() {
        assert_eq!(service_cover(BASE, &[]), DEFAULT_SERVICE_IMAGE);
        assert_eq!(
            service_cover(BASE, &["/u/1.jpg".to_string(), "/u/2.jpg".to_string()]),
            "http://localhost:5000/u/1.jpg"
        );
    }

    #[test]
    fn test_merge_keeps_order_drops_removed_appends_uploaded() {
        let existing = vec!["/a".to_string(), "/b".to_string(), "/c".to_string()];
        let removed = BTreeSet::from([1, 7]);

        let merged = merge_images(&existing, &removed, vec!["/d".to_string()]);

        assert_eq!(merged, vec!["/a", "/c", "/d"]);
    }
}
