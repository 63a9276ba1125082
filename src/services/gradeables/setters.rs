use std::sync::Arc;

use crate::errors::{GradingError, Result};
use crate::models::{Component, Gradeable, GradeableType, IntegerInput};
use crate::utils::validate::{validate_min_grading_group, validate_precision, validate_title};

impl Gradeable {
    /// 作业 ID 只能在创建时设置
    pub fn set_id<S: Into<String>>(&mut self, _id: S) -> Result<()> {
        Err(GradingError::operation_not_permitted(
            "Gradeable id cannot be changed after creation",
        ))
    }

    /// 作业类型只能在创建时设置
    pub fn set_type(&mut self, _gradeable_type: GradeableType) -> Result<()> {
        Err(GradingError::operation_not_permitted(
            "Gradeable type cannot be changed after creation",
        ))
    }

    /// 是否组队只能在创建时设置
    pub fn set_team_assignment(&mut self, _team_assignment: bool) -> Result<()> {
        Err(GradingError::operation_not_permitted(
            "Team assignment cannot be changed after creation",
        ))
    }

    pub fn set_title<S: Into<String>>(&mut self, title: S) -> Result<()> {
        let title = title.into();
        validate_title(&title).map_err(GradingError::invalid_argument)?;
        self.title = title;
        Ok(())
    }

    pub fn set_instructions_url<S: Into<String>>(&mut self, url: S) {
        self.instructions_url = url.into();
    }

    pub fn set_min_grading_group(&mut self, group: i64) -> Result<()> {
        validate_min_grading_group(group).map_err(GradingError::invalid_argument)?;
        self.min_grading_group = group;
        Ok(())
    }

    pub fn set_team_size_max<V: Into<IntegerInput>>(&mut self, value: V) -> Result<()> {
        self.team_size_max = non_negative_integer(value.into(), "Max team size")?;
        Ok(())
    }

    pub fn set_peer_grade_set<V: Into<IntegerInput>>(&mut self, value: V) -> Result<()> {
        self.peer_grade_set = non_negative_integer(value.into(), "Peer grade set")?;
        Ok(())
    }

    pub fn set_precision(&mut self, precision: f64) -> Result<()> {
        validate_precision(precision).map_err(GradingError::invalid_argument)?;
        self.precision = precision;
        Ok(())
    }

    pub fn set_grade_by_registration(&mut self, grade_by_registration: bool) {
        self.grade_by_registration = grade_by_registration;
    }

    pub fn set_ta_grading(&mut self, ta_grading: bool) {
        self.ta_grading = ta_grading;
    }

    pub fn set_peer_grading(&mut self, peer_grading: bool) {
        self.peer_grading = peer_grading;
    }

    pub fn set_student_view(&mut self, student_view: bool) {
        self.student_view = student_view;
    }

    pub fn set_student_submit(&mut self, student_submit: bool) {
        self.student_submit = student_submit;
    }

    pub fn set_student_download(&mut self, student_download: bool) {
        self.student_download = student_download;
    }

    pub fn set_late_submission_allowed(&mut self, allowed: bool) {
        self.late_submission_allowed = allowed;
    }

    /// 整体替换评分项
    ///
    /// 任一评分项校验失败则整个调用失败，原有评分项保持不变。
    pub fn set_components(&mut self, components: Vec<Arc<dyn Component>>) -> Result<()> {
        for component in &components {
            component.validate().map_err(|reason| {
                GradingError::invalid_argument(format!(
                    "Invalid component for gradeable {}: {reason}",
                    self.id
                ))
            })?;
        }
        self.components = components;
        Ok(())
    }
}

fn non_negative_integer(value: IntegerInput, field: &str) -> Result<i64> {
    match value.parse_strict() {
        Some(parsed) if parsed >= 0 => Ok(parsed),
        _ => Err(GradingError::invalid_argument(format!(
            "{field} must be a non-negative integer"
        ))),
    }
}
