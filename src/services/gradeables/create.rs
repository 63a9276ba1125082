use tracing::debug;

use super::autograding::load_autograding_config;
use crate::errors::{GradingError, Result};
use crate::models::{Gradeable, GradeableDates, GradeableType, NewGradeable};
use crate::storage::{CoursePathProvider, FileReader};
use crate::utils::validate::validate_gradeable_id;

impl Gradeable {
    /// 根据存储的表单配置创建作业
    ///
    /// 各字段经由对应 setter 校验；日期块存在时走 `set_dates` 整体提交。
    /// 电子提交作业会在此时加载一次自动评测配置。
    pub fn create(
        request: NewGradeable,
        course: &dyn CoursePathProvider,
        files: &dyn FileReader,
    ) -> Result<Self> {
        validate_gradeable_id(&request.id).map_err(GradingError::invalid_argument)?;

        let mut gradeable = Gradeable {
            id: request.id,
            title: String::new(),
            instructions_url: request.instructions_url,
            gradeable_type: request.gradeable_type,
            grade_by_registration: request.grade_by_registration,
            team_assignment: request.team_assignment,
            ta_grading: request.ta_grading,
            peer_grading: request.peer_grading,
            student_view: request.student_view,
            student_submit: request.student_submit,
            student_download: request.student_download,
            late_submission_allowed: request.late_submission_allowed,
            min_grading_group: 1,
            team_size_max: 0,
            peer_grade_set: 0,
            precision: 0.0,
            dates: GradeableDates::default(),
            components: Vec::new(),
            autograding_config: None,
            timezone: course.timezone(),
        };

        gradeable.set_title(request.title)?;
        gradeable.set_min_grading_group(request.min_grading_group)?;
        gradeable.set_team_size_max(request.team_size_max)?;
        gradeable.set_peer_grade_set(request.peer_grade_set)?;
        gradeable.set_precision(request.precision)?;

        if let Some(dates) = &request.dates {
            gradeable.set_dates(dates)?;
        }

        if gradeable.gradeable_type == GradeableType::ElectronicFile {
            gradeable.autograding_config = load_autograding_config(course, files, &gradeable.id);
        }

        debug!(
            "Gradeable {} created (type: {}, team: {}, autograding config: {})",
            gradeable.id,
            gradeable.gradeable_type,
            gradeable.team_assignment,
            gradeable.autograding_config.is_some()
        );

        Ok(gradeable)
    }
}
