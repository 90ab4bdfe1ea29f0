use thiserror::Error;

/// 验证错误类型
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Title is too long (max 500 characters)")]
    TitleTooLong,

    #[error("Invalid year: {0} (must be between 1888 and 2100)")]
    InvalidYear(i32),

    #[error("Invalid box office: {0} (must be a finite, non-negative amount)")]
    InvalidBoxOffice(f64),

    #[error("Name is too long (max 200 characters)")]
    NameTooLong,
}

/// 验证器trait
pub trait Validator {
    type Error;

    fn validate(&self) -> Result<(), Self::Error>;
}

/// 字符串验证工具
pub struct StringValidator;

impl StringValidator {
    pub fn validate_title(title: &str) -> Result<(), ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        if title.len() > 500 {
            return Err(ValidationError::TitleTooLong);
        }

        Ok(())
    }

    /// 导演、国家等可选的名称字段
    pub fn validate_optional_name(value: &Option<String>) -> Result<(), ValidationError> {
        if let Some(name) = value {
            if name.len() > 200 {
                return Err(ValidationError::NameTooLong);
            }
        }

        Ok(())
    }
}

/// 数值验证工具
pub struct NumberValidator;

impl NumberValidator {
    /// 1888 年是最早的电影年份
    pub fn validate_year(year: i32) -> Result<(), ValidationError> {
        if !(1888..=2100).contains(&year) {
            return Err(ValidationError::InvalidYear(year));
        }

        Ok(())
    }

    pub fn validate_box_office(amount: f64) -> Result<(), ValidationError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ValidationError::InvalidBoxOffice(amount));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title() {
        assert!(StringValidator::validate_title("Avatar").is_ok());
        assert!(matches!(
            StringValidator::validate_title("   "),
            Err(ValidationError::EmptyTitle)
        ));
        assert!(matches!(
            StringValidator::validate_title(&"x".repeat(501)),
            Err(ValidationError::TitleTooLong)
        ));
    }

    #[test]
    fn test_validate_year_bounds() {
        assert!(NumberValidator::validate_year(1888).is_ok());
        assert!(NumberValidator::validate_year(2100).is_ok());
        assert!(matches!(
            NumberValidator::validate_year(0),
            Err(ValidationError::InvalidYear(0))
        ));
        assert!(matches!(
            NumberValidator::validate_year(2101),
            Err(ValidationError::InvalidYear(2101))
        ));
    }

    #[test]
    fn test_validate_box_office() {
        assert!(NumberValidator::validate_box_office(0.0).is_ok());
        assert!(NumberValidator::validate_box_office(2_923_706_026.0).is_ok());
        assert!(NumberValidator::validate_box_office(-1.0).is_err());
        assert!(NumberValidator::validate_box_office(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_optional_name() {
        assert!(StringValidator::validate_optional_name(&None).is_ok());
        assert!(StringValidator::validate_optional_name(&Some("James Cameron".to_string())).is_ok());
        assert!(StringValidator::validate_optional_name(&Some("y".repeat(201))).is_err());
    }
}
