use crate::utils::error::{Result, SyncError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> SyncError {
    SyncError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(field_name, url_str, format!("Invalid URL format: {}", e))),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// Like [`validate_non_empty_string`] but never echoes the value back.
pub fn validate_secret(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SyncError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Image sizes are path segments of the form `800x800`.
pub fn validate_image_size(field_name: &str, size: &str) -> Result<()> {
    let valid = size
        .split_once('x')
        .map(|(w, h)| {
            !w.is_empty()
                && !h.is_empty()
                && w.chars().all(|c| c.is_ascii_digit())
                && h.chars().all(|c| c.is_ascii_digit())
        })
        .unwrap_or(false);

    if !valid {
        return Err(invalid(
            field_name,
            size,
            "Image size must look like <width>x<height>",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("odoo_url", "https://example.com").is_ok());
        assert!(validate_url("odoo_url", "http://localhost:8069").is_ok());
        assert!(validate_url("odoo_url", "").is_err());
        assert!(validate_url("odoo_url", "invalid-url").is_err());
        assert!(validate_url("odoo_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("page_limit", 1u32, 1, 100).is_ok());
        assert!(validate_range("page_limit", 0u32, 1, 100).is_err());
        assert!(validate_range("page_limit", 101u32, 1, 100).is_err());
    }

    #[test]
    fn test_validate_secret_does_not_leak_value() {
        let err = validate_secret("ODOO_PASSWORD", "   ").unwrap_err();
        assert!(matches!(err, SyncError::MissingConfigError { .. }));
        assert!(validate_secret("ODOO_PASSWORD", "hunter2").is_ok());
    }

    #[test]
    fn test_validate_image_size() {
        assert!(validate_image_size("image_size", "800x800").is_ok());
        assert!(validate_image_size("image_size", "1920x1080").is_ok());
        assert!(validate_image_size("image_size", "800").is_err());
        assert!(validate_image_size("image_size", "x800").is_err());
        assert!(validate_image_size("image_size", "axb").is_err());
    }
}
