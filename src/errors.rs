//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// 字段级错误集合（字段名 -> 错误信息）
///
/// 同一字段只保留第一条信息。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录字段错误，字段已有错误时保持原信息
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, field: K, message: V) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义（含固定的 `ValidationFailed` 聚合变体）
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_grading_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum GradingError {
            $($variant(String),)*
            ValidationFailed(FieldErrors),
        }

        impl GradingError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(GradingError::$variant(_) => $code,)*
                    GradingError::ValidationFailed(_) => "G000",
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(GradingError::$variant(_) => $type_name,)*
                    GradingError::ValidationFailed(_) => "Validation Failed",
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> Cow<'_, str> {
                match self {
                    $(GradingError::$variant(msg) => Cow::Borrowed(msg.as_str()),)*
                    GradingError::ValidationFailed(fields) => Cow::Owned(fields.to_string()),
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl GradingError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        GradingError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_grading_errors! {
    InvalidArgument("G001", "Invalid Argument"),
    OperationNotPermitted("G002", "Operation Not Permitted"),
    SectionLookup("G003", "Section Lookup Error"),
    VersionLookup("G004", "Version Lookup Error"),
    FileOperation("G005", "File Operation Error"),
    Serialization("G006", "Serialization Error"),
    DateParse("G007", "Date Parse Error"),
    Config("G008", "Configuration Error"),
}

impl GradingError {
    /// 由字段错误集合构造聚合校验错误
    pub fn validation_failed(fields: FieldErrors) -> Self {
        GradingError::ValidationFailed(fields)
    }

    /// 聚合校验错误中的字段集合
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            GradingError::ValidationFailed(fields) => Some(fields),
            _ => None,
        }
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GradingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GradingError {}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for GradingError {
    fn from(err: std::io::Error) -> Self {
        GradingError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GradingError {
    fn from(err: serde_json::Error) -> Self {
        GradingError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for GradingError {
    fn from(err: chrono::ParseError) -> Self {
        GradingError::DateParse(err.to_string())
    }
}

impl From<config::ConfigError> for GradingError {
    fn from(err: config::ConfigError) -> Self {
        GradingError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GradingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GradingError::invalid_argument("test").code(), "G001");
        assert_eq!(GradingError::operation_not_permitted("test").code(), "G002");
        assert_eq!(GradingError::version_lookup("test").code(), "G004");
        assert_eq!(
            GradingError::validation_failed(FieldErrors::new()).code(),
            "G000"
        );
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            GradingError::section_lookup("test").error_type(),
            "Section Lookup Error"
        );
        assert_eq!(
            GradingError::invalid_argument("test").error_type(),
            "Invalid Argument"
        );
    }

    #[test]
    fn test_field_errors_keep_first_message() {
        let mut fields = FieldErrors::new();
        fields.insert("late_days", "first");
        fields.insert("late_days", "second");
        fields.insert("grade_released_date", "Invalid date");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("late_days"), Some("first"));
        assert_eq!(
            fields.fields().collect::<Vec<_>>(),
            vec!["grade_released_date", "late_days"]
        );
    }

    #[test]
    fn test_validation_message_lists_every_field() {
        let mut fields = FieldErrors::new();
        fields.insert("ta_view_start_date", "Invalid date");
        fields.insert("late_days", "Late day count must be non-negative");
        let err = GradingError::validation_failed(fields);
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Failed"));
        assert!(formatted.contains("ta_view_start_date: Invalid date"));
        assert!(formatted.contains("late_days: "));
        assert!(err.field_errors().is_some());
    }
}
