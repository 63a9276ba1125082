use serde::Serialize;
use serde_json::{Map, Value};

use crate::utils::sanitize::sanitize_rich_text;

/// 自动评测配置
///
/// 识别的字段会做类型转换，其余字段原样保留在 `extra` 中。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AutogradingConfig {
    pub max_submission_size: Option<f64>,
    pub max_submissions: Option<i64>,
    pub assignment_message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AutogradingConfig {
    pub const MAX_SUBMISSION_SIZE: &'static str = "max_submission_size";
    pub const MAX_SUBMISSIONS: &'static str = "max_submissions";
    pub const ASSIGNMENT_MESSAGE: &'static str = "assignment_message";

    /// 从 JSON 文档构造，顶层必须是对象
    pub fn from_document(document: Value) -> Option<Self> {
        let Value::Object(mut fields) = document else {
            return None;
        };

        let max_submission_size = fields
            .remove(Self::MAX_SUBMISSION_SIZE)
            .and_then(|value| as_float(&value));
        let max_submissions = fields
            .remove(Self::MAX_SUBMISSIONS)
            .and_then(|value| as_integer(&value));
        let assignment_message = fields
            .remove(Self::ASSIGNMENT_MESSAGE)
            .and_then(|value| as_text(&value))
            .map(|message| sanitize_rich_text(&message));

        Some(Self {
            max_submission_size,
            max_submissions,
            assignment_message,
            extra: fields,
        })
    }

    /// 未识别字段
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        Value::Bool(flag) => Some(f64::from(u8::from(*flag))),
        _ => None,
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f.trunc() as i64)),
        Value::String(text) => {
            let text = text.trim();
            text.parse()
                .ok()
                .or_else(|| text.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        Value::Bool(flag) => Some(i64::from(*flag)),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
