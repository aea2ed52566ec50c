//! 表单校验
//!
//! 所有校验都在发请求之前完成，校验通过后直接产出请求体。

use crate::config::MIN_PASSWORD_LEN;
use crate::error::ValidationError;
use lifeease_shared::protocol::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use lifeease_shared::{DEFAULT_CURRENCY, ProviderSubmission, ServiceDraft};

fn trimmed_opt(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn require(value: &str, field: &'static str) -> Result<String, ValidationError> {
    trimmed_opt(value).ok_or(ValidationError::Required(field))
}

/// 邮箱格式：`\S+@\S+\.\S+`（非锚定匹配）
pub fn is_valid_email(email: &str) -> bool {
    email.char_indices().any(|(at, c)| {
        if c != '@' {
            return false;
        }
        let before_ok = email[..at]
            .chars()
            .next_back()
            .is_some_and(|ch| !ch.is_whitespace());
        let domain = email[at + 1..]
            .split(char::is_whitespace)
            .next()
            .unwrap_or_default();
        let dot_ok = domain
            .char_indices()
            .any(|(i, ch)| ch == '.' && i > 0 && i + 1 < domain.len());
        before_ok && dot_ok
    })
}

fn check_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Required("Email"));
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.to_string())
}

fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    Ok(())
}

// =========================================================
// 登录 / 注册
// =========================================================

pub fn validate_login(email: &str, password: &str) -> Result<LoginRequest, ValidationError> {
    let email = check_email(email)?;
    check_password(password)?;
    Ok(LoginRequest {
        email,
        password: password.to_string(),
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub is_service_provider: bool,
}

pub fn validate_register(input: &RegisterInput) -> Result<RegisterRequest, ValidationError> {
    let email = check_email(&input.email)?;
    check_password(&input.password)?;
    let name = require(&input.name, "Name")?;
    if input.password != input.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(RegisterRequest {
        name,
        email,
        password: input.password.clone(),
        is_service_provider: input.is_service_provider,
    })
}

pub fn validate_profile(name: &str, email: &str) -> Result<UpdateProfileRequest, ValidationError> {
    Ok(UpdateProfileRequest {
        name: require(name, "Name")?,
        email: check_email(email)?,
    })
}

// =========================================================
// 服务表单
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceInput {
    pub title: String,
    pub category: String,
    pub description: String,
    /// 原始输入文本
    pub price: String,
    pub currency: String,
    pub location: String,
}

/// 校验服务表单，产出的草稿 `images` 为空，由调用方在上传后填入
pub fn validate_service(input: &ServiceInput) -> Result<ServiceDraft, ValidationError> {
    let title = require(&input.title, "Title")?;
    let description = require(&input.description, "Description")?;
    let price = input
        .price
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or(ValidationError::InvalidPrice)?;

    Ok(ServiceDraft {
        title,
        category: trimmed_opt(&input.category),
        description,
        price,
        currency: trimmed_opt(&input.currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        images: Vec::new(),
        location: trimmed_opt(&input.location),
        coordinates: None,
    })
}

// =========================================================
// 服务商审核表单
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderInput {
    pub company_name: String,
    pub business_type: String,
    pub business_license_number: String,
    pub phone_number: String,
    pub website: String,
    pub address: String,
    pub description: String,
    pub services: Vec<String>,
    /// 原始输入文本，可为空
    pub experience_years: String,
}

pub fn validate_provider(input: &ProviderInput) -> Result<ProviderSubmission, ValidationError> {
    let company_name = require(&input.company_name, "Company name")?;
    let business_license_number = require(&input.business_license_number, "Business license number")?;

    let experience_years = match trimmed_opt(&input.experience_years) {
        None => None,
        Some(raw) => Some(
            raw.parse::<u32>()
                .map_err(|_| ValidationError::InvalidExperienceYears)?,
        ),
    };

    let website = trimmed_opt(&input.website);
    if let Some(site) = &website {
        let lower = site.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(ValidationError::InvalidWebsite);
        }
    }

    Ok(ProviderSubmission {
        company_name,
        business_type: trimmed_opt(&input.business_type),
        business_license_number,
        phone_number: trimmed_opt(&input.phone_number),
        website,
        address: trimmed_opt(&input.address),
        description: trimmed_opt(&input.description),
        services: input.services.clone(),
        experience_years,
    })
}

/// 合并逗号分隔的服务标签：去空白、去重并保持原有顺序
pub fn merge_service_tags(existing: &[String], raw: &str) -> Vec<String> {
    let mut tags = existing.to_vec();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("aiko@example.jp", true)]
    #[case("a@b.c", true)]
    #[case("  x y@host.co  ", true)]
    #[case("aiko@example", false)]
    #[case("@example.jp", false)]
    #[case("aiko@.jp", false)]
    #[case("aiko@example.", false)]
    #[case("aiko example.jp", false)]
    fn test_email_pattern(#[case] email: &str, #[case] valid: bool) {
        assert_eq!(is_valid_email(email), valid);
    }

    #[rstest]
    #[case("", "secret1", ValidationError::Required("Email"))]
    #[case("nope", "secret1", ValidationError::InvalidEmail)]
    #[case("a@b.c", "12345", ValidationError::PasswordTooShort(6))]
    fn test_login_rejections(#[case] email: &str, #[case] password: &str, #[case] expected: ValidationError) {
        assert_eq!(validate_login(email, password).unwrap_err(), expected);
    }

    #[test]
    fn test_login_trims_email() {
        let req = validate_login(" aiko@example.jp ", "secret1").unwrap();
        assert_eq!(req.email, "aiko@example.jp");
    }

    #[test]
    fn test_register_requires_name_and_matching_confirmation() {
        let mut input = RegisterInput {
            name: "  ".to_string(),
            email: "aiko@example.jp".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            is_service_provider: true,
        };
        assert_eq!(validate_register(&input).unwrap_err(), ValidationError::Required("Name"));

        input.name = "Aiko".to_string();
        input.confirm_password = "secret2".to_string();
        assert_eq!(validate_register(&input).unwrap_err(), ValidationError::PasswordMismatch);

        input.confirm_password = "secret1".to_string();
        let req = validate_register(&input).unwrap();
        assert!(req.is_service_provider);
        assert_eq!(req.name, "Aiko");
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("-1")]
    #[case("NaN")]
    fn test_service_rejects_bad_price(#[case] price: &str) {
        let input = ServiceInput {
            title: "Cleaning".to_string(),
            description: "Two rooms".to_string(),
            price: price.to_string(),
            ..Default::default()
        };
        assert_eq!(validate_service(&input).unwrap_err(), ValidationError::InvalidPrice);
    }

    #[test]
    fn test_service_draft_defaults() {
        let input = ServiceInput {
            title: " Moving help ".to_string(),
            description: "Van included".to_string(),
            price: "0".to_string(),
            ..Default::default()
        };

        let draft = validate_service(&input).unwrap();

        assert_eq!(draft.title, "Moving help");
        assert_eq!(draft.price, 0.0);
        assert_eq!(draft.currency, "JPY");
        assert_eq!(draft.category, None);
        assert_eq!(draft.location, None);
    }

    #[test]
    fn test_service_requires_title_before_description() {
        let err = validate_service(&ServiceInput::default()).unwrap_err();
        assert_eq!(err, ValidationError::Required("Title"));
    }

    #[rstest]
    #[case::missing_company(ProviderInput { business_license_number: "L-1".into(), ..Default::default() }, ValidationError::Required("Company name"))]
    #[case::missing_license(ProviderInput { company_name: "Kyoto Fix".into(), ..Default::default() }, ValidationError::Required("Business license number"))]
    #[case::negative_years(ProviderInput { company_name: "K".into(), business_license_number: "L".into(), experience_years: "-2".into(), ..Default::default() }, ValidationError::InvalidExperienceYears)]
    #[case::bad_website(ProviderInput { company_name: "K".into(), business_license_number: "L".into(), website: "kyoto.example".into(), ..Default::default() }, ValidationError::InvalidWebsite)]
    fn test_provider_rejections(#[case] input: ProviderInput, #[case] expected: ValidationError) {
        assert_eq!(validate_provider(&input).unwrap_err(), expected);
    }

    #[test]
    fn test_provider_submission_drops_blank_optionals() {
        let input = ProviderInput {
            company_name: " Kyoto Fix ".to_string(),
            business_license_number: "L-123".to_string(),
            website: "HTTPS://kyoto.example".to_string(),
            phone_number: "   ".to_string(),
            experience_years: "4".to_string(),
            services: vec!["Repairs".to_string()],
            ..Default::default()
        };

        let submission = validate_provider(&input).unwrap();

        assert_eq!(submission.company_name, "Kyoto Fix");
        assert_eq!(submission.phone_number, None);
        assert_eq!(submission.experience_years, Some(4));
        assert_eq!(submission.website.as_deref(), Some("HTTPS://kyoto.example"));
    }

    #[test]
    fn test_merge_service_tags() {
        let existing = vec!["Moving".to_string()];
        let merged = merge_service_tags(&existing, " Cleaning, ,Moving,Repairs ,Cleaning");
        assert_eq!(merged, vec!["Moving", "Cleaning", "Repairs"]);
    }

    #[test]
    fn test_profile_validation() {
        assert_eq!(
            validate_profile("", "a@b.c").unwrap_err(),
            ValidationError::Required("Name")
        );
        let req = validate_profile("Aiko", "aiko@example.jp").unwrap();
        assert_eq!(req.name, "Aiko");
    }
}
