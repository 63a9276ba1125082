use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::gradeables::entities::{DateRole, GradeableDates, GradeableType};

/// 日期输入值：结构化时间、待解析字符串，或其他无法识别的值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    At(DateTime<FixedOffset>),
    Text(String),
    Other(serde_json::Value),
}

impl From<DateTime<FixedOffset>> for DateInput {
    fn from(value: DateTime<FixedOffset>) -> Self {
        DateInput::At(value)
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Text(value)
    }
}

/// 整数输入值，兼容数字、布尔值与数字字符串
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntegerInput {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Other(serde_json::Value),
}

impl Default for IntegerInput {
    fn default() -> Self {
        IntegerInput::Int(0)
    }
}

impl IntegerInput {
    /// 宽松转换：取数值的整数部分，字符串取前导整数，无法识别时为 0
    ///
    /// 超出范围的值饱和到 `i64` 边界，由后续校验报告。
    pub fn coerce_lenient(&self) -> i64 {
        match self {
            IntegerInput::Int(value) => *value,
            IntegerInput::Float(value) if value.is_finite() => value.trunc() as i64,
            IntegerInput::Float(_) => 0,
            IntegerInput::Bool(value) => i64::from(*value),
            IntegerInput::Text(text) => leading_integer(text.trim()).unwrap_or(0),
            IntegerInput::Other(_) => 0,
        }
    }

    /// 严格转换：只接受整数或完整的整数字符串
    pub fn parse_strict(&self) -> Option<i64> {
        match self {
            IntegerInput::Int(value) => Some(*value),
            IntegerInput::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                Some(*value as i64)
            }
            IntegerInput::Float(_) => None,
            IntegerInput::Text(text) => text.trim().parse().ok(),
            IntegerInput::Bool(_) | IntegerInput::Other(_) => None,
        }
    }
}

fn leading_integer(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let number = &digits[..end];
    if number.is_empty() {
        return None;
    }

    // 只含数字时解析失败只可能是溢出
    let value = match number.parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    };
    Some(value)
}

impl From<i64> for IntegerInput {
    fn from(value: i64) -> Self {
        IntegerInput::Int(value)
    }
}

impl From<f64> for IntegerInput {
    fn from(value: f64) -> Self {
        IntegerInput::Float(value)
    }
}

impl From<&str> for IntegerInput {
    fn from(value: &str) -> Self {
        IntegerInput::Text(value.to_string())
    }
}

impl From<String> for IntegerInput {
    fn from(value: String) -> Self {
        IntegerInput::Text(value)
    }
}

/// 设置作业日期请求
///
/// 缺失与 null 等价，均视为无效日期。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeableDatesRequest {
    #[serde(default)]
    pub ta_view_start_date: Option<DateInput>,
    #[serde(default)]
    pub submission_open_date: Option<DateInput>,
    #[serde(default)]
    pub submission_due_date: Option<DateInput>,
    #[serde(default)]
    pub grade_start_date: Option<DateInput>,
    #[serde(default)]
    pub grade_released_date: Option<DateInput>,
    #[serde(default)]
    pub grade_locked_date: Option<DateInput>,
    #[serde(default)]
    pub team_lock_date: Option<DateInput>,
    #[serde(default)]
    pub late_days: Option<IntegerInput>,
}

impl GradeableDatesRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以现有日期为基础构造请求，便于只修改其中几项后整体提交
    pub fn from_dates(dates: &GradeableDates) -> Self {
        let mut request = Self::new().with_late_days(dates.late_days);
        for role in DateRole::ALL {
            if let Some(value) = dates.get(role) {
                request = request.with(role, value);
            }
        }
        request
    }

    pub fn get(&self, role: DateRole) -> Option<&DateInput> {
        self.slot(role).as_ref()
    }

    pub fn set(&mut self, role: DateRole, value: Option<DateInput>) {
        *self.slot_mut(role) = value;
    }

    pub fn with<V: Into<DateInput>>(mut self, role: DateRole, value: V) -> Self {
        self.set(role, Some(value.into()));
        self
    }

    pub fn without(mut self, role: DateRole) -> Self {
        self.set(role, None);
        self
    }

    pub fn with_late_days<V: Into<IntegerInput>>(mut self, late_days: V) -> Self {
        self.late_days = Some(late_days.into());
        self
    }

    fn slot(&self, role: DateRole) -> &Option<DateInput> {
        match role {
            DateRole::TaViewStart => &self.ta_view_start_date,
            DateRole::SubmissionOpen => &self.submission_open_date,
            DateRole::SubmissionDue => &self.submission_due_date,
            DateRole::GradeStart => &self.grade_start_date,
            DateRole::GradeReleased => &self.grade_released_date,
            DateRole::GradeLocked => &self.grade_locked_date,
            DateRole::TeamLock => &self.team_lock_date,
        }
    }

    fn slot_mut(&mut self, role: DateRole) -> &mut Option<DateInput> {
        match role {
            DateRole::TaViewStart => &mut self.ta_view_start_date,
            DateRole::SubmissionOpen => &mut self.submission_open_date,
            DateRole::SubmissionDue => &mut self.submission_due_date,
            DateRole::GradeStart => &mut self.grade_start_date,
            DateRole::GradeReleased => &mut self.grade_released_date,
            DateRole::GradeLocked => &mut self.grade_locked_date,
            DateRole::TeamLock => &mut self.team_lock_date,
        }
    }
}

fn default_min_grading_group() -> i64 {
    1
}

fn default_true() -> bool {
    true
}

/// 创建作业请求（即存储的作业表单配置）
#[derive(Debug, Clone, Deserialize)]
pub struct NewGradeable {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub instructions_url: String,
    #[serde(rename = "type")]
    pub gradeable_type: GradeableType,
    #[serde(default)]
    pub grade_by_registration: bool,
    #[serde(default)]
    pub team_assignment: bool,
    #[serde(default = "default_true")]
    pub ta_grading: bool,
    #[serde(default)]
    pub peer_grading: bool,
    #[serde(default = "default_true")]
    pub student_view: bool,
    #[serde(default = "default_true")]
    pub student_submit: bool,
    #[serde(default)]
    pub student_download: bool,
    #[serde(default = "default_true")]
    pub late_submission_allowed: bool,
    #[serde(default = "default_min_grading_group")]
    pub min_grading_group: i64,
    #[serde(default)]
    pub team_size_max: IntegerInput,
    #[serde(default)]
    pub peer_grade_set: IntegerInput,
    #[serde(default)]
    pub precision: f64,
    /// 存在时经由日期校验整体提交
    #[serde(default)]
    pub dates: Option<GradeableDatesRequest>,
}

impl NewGradeable {
    pub fn new<I: Into<String>, T: Into<String>>(
        id: I,
        title: T,
        gradeable_type: GradeableType,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            instructions_url: String::new(),
            gradeable_type,
            grade_by_registration: false,
            team_assignment: false,
            ta_grading: true,
            peer_grading: false,
            student_view: true,
            student_submit: true,
            student_download: false,
            late_submission_allowed: true,
            min_grading_group: default_min_grading_group(),
            team_size_max: IntegerInput::default(),
            peer_grade_set: IntegerInput::default(),
            precision: 0.0,
            dates: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_integer_coercion() {
        assert_eq!(IntegerInput::from(3i64).coerce_lenient(), 3);
        assert_eq!(IntegerInput::from(2.9f64).coerce_lenient(), 2);
        assert_eq!(IntegerInput::from(" 4 ").coerce_lenient(), 4);
        assert_eq!(IntegerInput::from("-1").coerce_lenient(), -1);
        assert_eq!(IntegerInput::from("12abc").coerce_lenient(), 12);
        assert_eq!(IntegerInput::from("abc").coerce_lenient(), 0);
    }

    #[test]
    fn test_lenient_coercion_of_unusual_values() {
        let late_days: IntegerInput = serde_json::from_value(serde_json::json!(true)).unwrap();
        assert_eq!(late_days, IntegerInput::Bool(true));
        assert_eq!(late_days.coerce_lenient(), 1);
        assert_eq!(late_days.parse_strict(), None);

        let late_days: IntegerInput =
            serde_json::from_value(serde_json::json!({"days": 2})).unwrap();
        assert_eq!(late_days.coerce_lenient(), 0);
        assert_eq!(late_days.parse_strict(), None);

        assert_eq!(
            IntegerInput::from("99999999999999999999").coerce_lenient(),
            i64::MAX
        );
        assert_eq!(
            IntegerInput::from("-99999999999999999999 days").coerce_lenient(),
            i64::MIN
        );
        assert_eq!(IntegerInput::from("-").coerce_lenient(), 0);
    }

    #[test]
    fn test_dates_request_accepts_boolean_late_days() {
        let request: GradeableDatesRequest = serde_json::from_value(serde_json::json!({
            "late_days": false
        }))
        .unwrap();
        assert_eq!(request.late_days, Some(IntegerInput::Bool(false)));
    }

    #[test]
    fn test_strict_integer_parsing() {
        assert_eq!(IntegerInput::from("5").parse_strict(), Some(5));
        assert_eq!(IntegerInput::from(5.0f64).parse_strict(), Some(5));
        assert_eq!(IntegerInput::from(5.5f64).parse_strict(), None);
        assert_eq!(IntegerInput::from("five").parse_strict(), None);
    }

    #[test]
    fn test_dates_request_from_json() {
        let request: GradeableDatesRequest = serde_json::from_value(serde_json::json!({
            "ta_view_start_date": "2026-09-01 00:00:00",
            "submission_open_date": "2026-09-02T00:00:00+08:00",
            "submission_due_date": null,
            "grade_start_date": 17,
            "late_days": "2"
        }))
        .unwrap();

        assert!(matches!(
            request.get(DateRole::TaViewStart),
            Some(DateInput::Text(_))
        ));
        assert!(matches!(
            request.get(DateRole::SubmissionOpen),
            Some(DateInput::At(_))
        ));
        assert_eq!(request.get(DateRole::SubmissionDue), None);
        assert!(matches!(
            request.get(DateRole::GradeStart),
            Some(DateInput::Other(_))
        ));
        assert_eq!(request.get(DateRole::TeamLock), None);
        assert_eq!(request.late_days, Some(IntegerInput::from("2")));
    }

    #[test]
    fn test_new_gradeable_defaults_from_json() {
        let gradeable: NewGradeable = serde_json::from_value(serde_json::json!({
            "id": "hw-01",
            "title": "Homework 1",
            "type": "electronic_file",
            "team_size_max": "3"
        }))
        .unwrap();

        assert_eq!(gradeable.gradeable_type, GradeableType::ElectronicFile);
        assert_eq!(gradeable.min_grading_group, 1);
        assert!(gradeable.ta_grading);
        assert_eq!(gradeable.team_size_max.parse_strict(), Some(3));
        assert!(gradeable.dates.is_none());
    }

    #[test]
    fn test_unknown_gradeable_type_rejected() {
        let result: Result<NewGradeable, _> = serde_json::from_value(serde_json::json!({
            "id": "hw-01",
            "title": "Homework 1",
            "type": "essay"
        }));
        assert!(result.is_err());
    }
}
