// =========================================================
// 客户端配置 (Client Configuration)
// =========================================================

/// 默认后端地址；构建时可通过 `LIFEEASE_API_BASE` 覆盖
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// 服务列表每页数量
pub const SERVICES_PAGE_SIZE: u32 = 12;
/// “我的服务”一次拉取的数量
pub const MY_SERVICES_LIMIT: u32 = 100;
/// 管理端用户列表每页数量
pub const ADMIN_USERS_PAGE_SIZE: u32 = 10;
/// 提示消息自动消失的时间（毫秒）
pub const NOTICE_DURATION_MS: u32 = 3_000;
/// 服务没有图片时使用的占位图
pub const DEFAULT_SERVICE_IMAGE: &str = "/default-service.jpg";
/// 用户未上传头像时的占位图
pub const DEFAULT_AVATAR_IMAGE: &str = "/default-avatar.png";
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// 后端根地址，不带结尾的 `/`
    pub api_base: String,
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim().trim_end_matches('/').to_string();
        Self { api_base }
    }

    /// 读取构建时注入的 `LIFEEASE_API_BASE`，没有则使用默认值
    pub fn from_build_env() -> Self {
        Self::resolve(option_env!("LIFEEASE_API_BASE"))
    }

    fn resolve(value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(base) => Self::new(base),
            None => Self::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        assert_eq!(ClientConfig::new("https://api.lifeease.jp/").api_base, "https://api.lifeease.jp");
    }

    #[test]
    fn test_blank_override_falls_back_to_default() {
        assert_eq!(ClientConfig::resolve(Some("  ")), ClientConfig::default());
        assert_eq!(ClientConfig::resolve(None).api_base, DEFAULT_API_BASE);
        assert_eq!(
            ClientConfig::resolve(Some("https://staging.lifeease.jp")).api_base,
            "https://staging.lifeease.jp"
        );
    }
}
