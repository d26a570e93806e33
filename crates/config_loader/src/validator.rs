//! 配置校验模块
//!
//! 校验规则：
//! - api_url 必填
//! - api_url 为合法 URL (validator derive)
//!
//! batch_size 不做校验：非法值统一归一化为 1。

use ::validator::Validate;

use contracts::{TargetConfig, TargetError};

/// Keys the target cannot run without
pub const REQUIRED_CONFIG_KEYS: &[&str] = &["api_url"];

/// 校验 TargetConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &TargetConfig) -> Result<(), TargetError> {
    validate_required_keys(config)?;
    validate_fields(config)?;
    Ok(())
}

/// 校验必填项
fn validate_required_keys(config: &TargetConfig) -> Result<(), TargetError> {
    for key in REQUIRED_CONFIG_KEYS {
        let present = match *key {
            "api_url" => !config.api_url.trim().is_empty(),
            _ => true,
        };
        if !present {
            return Err(TargetError::config(
                *key,
                format!("config is missing required key '{key}'"),
            ));
        }
    }
    Ok(())
}

/// 校验字段格式
fn validate_fields(config: &TargetConfig) -> Result<(), TargetError> {
    config.validate().map_err(|errors| {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.iter().collect();
        fields.sort_by_key(|(field, _)| field.to_string());

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                TargetError::config(field.to_string(), message)
            }
            None => TargetError::config("config", errors.to_string()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_passes() {
        let config = TargetConfig::new("http://localhost:5000/test");
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_missing_api_url() {
        let config = TargetConfig::default();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("api_url"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_blank_api_url_counts_as_missing() {
        let config = TargetConfig::new("   ");
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_malformed_api_url() {
        let config = TargetConfig::new("localhost without scheme");
        let err = validate(&config).unwrap_err();
        match err {
            TargetError::Config { field, message } => {
                assert_eq!(field, "api_url");
                assert!(message.contains("absolute URL"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
