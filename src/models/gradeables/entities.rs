use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::components::entities::Component;
use crate::models::gradeables::autograding::AutogradingConfig;
use crate::models::grading::entities::SectionKey;
use crate::utils::date::CourseTimezone;

// 作业类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GradeableType {
    ElectronicFile, // 电子提交
    Checkpoint,     // 检查点（线下）
    Numeric,        // 数值/文本录入（线下）
}

impl GradeableType {
    pub const ELECTRONIC_FILE: &'static str = "electronic_file";
    pub const CHECKPOINT: &'static str = "checkpoint";
    pub const NUMERIC: &'static str = "numeric";

    pub fn is_electronic(&self) -> bool {
        matches!(self, GradeableType::ElectronicFile)
    }
}

impl<'de> Deserialize<'de> for GradeableType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的作业类型: '{s}'. 支持的类型: electronic_file, checkpoint, numeric"
            ))
        })
    }
}

impl std::fmt::Display for GradeableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeableType::ElectronicFile => write!(f, "{}", Self::ELECTRONIC_FILE),
            GradeableType::Checkpoint => write!(f, "{}", Self::CHECKPOINT),
            GradeableType::Numeric => write!(f, "{}", Self::NUMERIC),
        }
    }
}

impl std::str::FromStr for GradeableType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::ELECTRONIC_FILE => Ok(GradeableType::ElectronicFile),
            Self::CHECKPOINT => Ok(GradeableType::Checkpoint),
            Self::NUMERIC => Ok(GradeableType::Numeric),
            _ => Err(format!("Invalid gradeable type: {s}")),
        }
    }
}

/// 作业日期角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DateRole {
    TaViewStart,
    SubmissionOpen,
    SubmissionDue,
    GradeStart,
    GradeReleased,
    GradeLocked,
    TeamLock,
}

impl DateRole {
    pub const ALL: [DateRole; 7] = [
        DateRole::TaViewStart,
        DateRole::SubmissionOpen,
        DateRole::SubmissionDue,
        DateRole::GradeStart,
        DateRole::GradeReleased,
        DateRole::GradeLocked,
        DateRole::TeamLock,
    ];

    /// 字段名，同时作为校验错误的键
    pub fn field_name(&self) -> &'static str {
        match self {
            DateRole::TaViewStart => "ta_view_start_date",
            DateRole::SubmissionOpen => "submission_open_date",
            DateRole::SubmissionDue => "submission_due_date",
            DateRole::GradeStart => "grade_start_date",
            DateRole::GradeReleased => "grade_released_date",
            DateRole::GradeLocked => "grade_locked_date",
            DateRole::TeamLock => "team_lock_date",
        }
    }
}

impl std::fmt::Display for DateRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

/// 作业生命周期日期（整体提交，见 `Gradeable::set_dates`）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeableDates {
    // 助教预览开始
    pub ta_view_start_date: Option<DateTime<FixedOffset>>,
    // 提交开放
    pub submission_open_date: Option<DateTime<FixedOffset>>,
    // 提交截止
    pub submission_due_date: Option<DateTime<FixedOffset>>,
    // 人工评分开始
    pub grade_start_date: Option<DateTime<FixedOffset>>,
    // 成绩发布
    pub grade_released_date: Option<DateTime<FixedOffset>>,
    // 成绩锁定
    pub grade_locked_date: Option<DateTime<FixedOffset>>,
    // 队伍锁定
    pub team_lock_date: Option<DateTime<FixedOffset>>,
    // 允许的迟交天数
    pub late_days: i64,
}

impl GradeableDates {
    pub fn get(&self, role: DateRole) -> Option<DateTime<FixedOffset>> {
        match role {
            DateRole::TaViewStart => self.ta_view_start_date,
            DateRole::SubmissionOpen => self.submission_open_date,
            DateRole::SubmissionDue => self.submission_due_date,
            DateRole::GradeStart => self.grade_start_date,
            DateRole::GradeReleased => self.grade_released_date,
            DateRole::GradeLocked => self.grade_locked_date,
            DateRole::TeamLock => self.team_lock_date,
        }
    }
}

/// 作业配置
///
/// 标识、类型与组队标志在构造后不可变；日期与迟交天数只能通过
/// `set_dates` 整体校验后提交。
#[derive(Debug, Clone)]
pub struct Gradeable {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) instructions_url: String,
    pub(crate) gradeable_type: GradeableType,
    pub(crate) grade_by_registration: bool,
    pub(crate) team_assignment: bool,
    pub(crate) ta_grading: bool,
    pub(crate) peer_grading: bool,
    pub(crate) student_view: bool,
    pub(crate) student_submit: bool,
    pub(crate) student_download: bool,
    pub(crate) late_submission_allowed: bool,
    pub(crate) min_grading_group: i64,
    pub(crate) team_size_max: i64,
    pub(crate) peer_grade_set: i64,
    pub(crate) precision: f64,
    pub(crate) dates: GradeableDates,
    pub(crate) components: Vec<Arc<dyn Component>>,
    pub(crate) autograding_config: Option<AutogradingConfig>,
    pub(crate) timezone: CourseTimezone,
}

impl Gradeable {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn instructions_url(&self) -> &str {
        &self.instructions_url
    }

    pub fn gradeable_type(&self) -> GradeableType {
        self.gradeable_type
    }

    pub fn is_electronic(&self) -> bool {
        self.gradeable_type.is_electronic()
    }

    pub fn is_grade_by_registration(&self) -> bool {
        self.grade_by_registration
    }

    /// 决定评分分组的提交者属性
    pub fn section_key(&self) -> SectionKey {
        if self.grade_by_registration {
            SectionKey::Registration
        } else {
            SectionKey::Rotating
        }
    }

    pub fn is_team_assignment(&self) -> bool {
        self.team_assignment
    }

    pub fn is_ta_grading(&self) -> bool {
        self.ta_grading
    }

    pub fn is_peer_grading(&self) -> bool {
        self.peer_grading
    }

    pub fn is_student_view(&self) -> bool {
        self.student_view
    }

    pub fn is_student_submit(&self) -> bool {
        self.student_submit
    }

    pub fn is_student_download(&self) -> bool {
        self.student_download
    }

    pub fn is_late_submission_allowed(&self) -> bool {
        self.late_submission_allowed
    }

    pub fn min_grading_group(&self) -> i64 {
        self.min_grading_group
    }

    pub fn team_size_max(&self) -> i64 {
        self.team_size_max
    }

    pub fn peer_grade_set(&self) -> i64 {
        self.peer_grade_set
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    pub fn dates(&self) -> &GradeableDates {
        &self.dates
    }

    pub fn date(&self, role: DateRole) -> Option<DateTime<FixedOffset>> {
        self.dates.get(role)
    }

    pub fn late_days(&self) -> i64 {
        self.dates.late_days
    }

    pub fn components(&self) -> &[Arc<dyn Component>] {
        &self.components
    }

    /// 按 ID 查找评分项
    pub fn component(&self, component_id: i64) -> Option<&Arc<dyn Component>> {
        self.components.iter().find(|c| c.id() == component_id)
    }

    pub fn autograding_config(&self) -> Option<&AutogradingConfig> {
        self.autograding_config.as_ref()
    }

    pub fn has_autograding_config(&self) -> bool {
        self.autograding_config.is_some()
    }

    /// 课程时区
    pub fn timezone(&self) -> CourseTimezone {
        self.timezone
    }
}
