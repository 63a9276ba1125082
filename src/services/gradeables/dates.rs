//! 作业日期的整体校验与提交
//!
//! 校验分三步：逐项解析、收集全部违规、全部通过后一次性写入。
//! 顺序比较只在两端都有值时进行，缺失值只由各自的存在性检查报告。

use chrono::{DateTime, FixedOffset, TimeDelta};
use tracing::{debug, warn};

use crate::errors::{FieldErrors, GradingError, Result};
use crate::models::{DateInput, DateRole, Gradeable, GradeableDates, GradeableDatesRequest};
use crate::utils::date::{CourseTimezone, parse_course_date};

const LATE_DAYS_FIELD: &str = "late_days";
const INVALID_DATE: &str = "Invalid date";

impl Gradeable {
    /// 整体设置作业日期与迟交天数
    ///
    /// 所有违规一并返回；任一违规时不修改任何字段。
    pub fn set_dates(&mut self, request: &GradeableDatesRequest) -> Result<()> {
        let parsed = parse_dates(request, self.timezone);

        let errors = self.validate_dates(&parsed);
        if !errors.is_empty() {
            warn!("Date validation failed for {}: {}", self.id, errors);
            return Err(GradingError::validation_failed(errors));
        }

        self.commit_dates(parsed);
        debug!("Dates committed for {}", self.id);
        Ok(())
    }

    /// 单独设置某个日期已禁用，请使用 `set_dates`
    pub fn set_date(&mut self, role: DateRole, _value: DateInput) -> Result<()> {
        Err(GradingError::operation_not_permitted(format!(
            "{role} cannot be set individually, use set_dates instead"
        )))
    }

    /// 单独设置迟交天数已禁用，请使用 `set_dates`
    pub fn set_late_days(&mut self, _late_days: i64) -> Result<()> {
        Err(GradingError::operation_not_permitted(
            "late_days cannot be set individually, use set_dates instead",
        ))
    }

    /// 最晚可提交时间：截止时间加迟交天数
    pub fn max_due_date(&self) -> Option<DateTime<FixedOffset>> {
        max_due(self.dates.submission_due_date, self.dates.late_days)
    }

    fn validate_dates(&self, parsed: &GradeableDates) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let late_days_valid = parsed.late_days >= 0;
        if !late_days_valid {
            errors.insert(
                LATE_DAYS_FIELD,
                "Late day count must be a non-negative integer",
            );
        }

        let max_due_date = if late_days_valid {
            match (
                parsed.submission_due_date,
                max_due(parsed.submission_due_date, parsed.late_days),
            ) {
                (Some(_), None) => {
                    errors.insert(LATE_DAYS_FIELD, "Late day count is too large");
                    parsed.submission_due_date
                }
                (_, max_due_date) => max_due_date,
            }
        } else {
            parsed.submission_due_date
        };

        require(&mut errors, parsed, DateRole::TaViewStart);
        require(&mut errors, parsed, DateRole::GradeReleased);

        if self.is_electronic() {
            require(&mut errors, parsed, DateRole::SubmissionOpen);
            require(&mut errors, parsed, DateRole::SubmissionDue);

            ensure_order(
                &mut errors,
                parsed.ta_view_start_date,
                parsed.submission_open_date,
                DateRole::TaViewStart,
                "TA view start date must not be later than the submission open date",
            );
            ensure_order(
                &mut errors,
                parsed.submission_open_date,
                parsed.submission_due_date,
                DateRole::SubmissionOpen,
                "Submission open date must not be later than the submission due date",
            );

            if self.ta_grading {
                require(&mut errors, parsed, DateRole::GradeStart);
                ensure_order(
                    &mut errors,
                    parsed.submission_due_date,
                    parsed.grade_start_date,
                    DateRole::GradeStart,
                    "Manual grading open date must be no earlier than the submission due date",
                );
                ensure_order(
                    &mut errors,
                    parsed.grade_start_date,
                    parsed.grade_released_date,
                    DateRole::GradeReleased,
                    "Grades released date must be no earlier than the manual grading open date",
                );
            } else {
                ensure_order(
                    &mut errors,
                    max_due_date,
                    parsed.grade_released_date,
                    DateRole::GradeReleased,
                    "Grades released date must be no earlier than the due date plus late days",
                );
            }

            if self.team_assignment {
                require(&mut errors, parsed, DateRole::TeamLock);
            }
        } else {
            ensure_order(
                &mut errors,
                parsed.ta_view_start_date,
                parsed.grade_released_date,
                DateRole::GradeReleased,
                "Grades released date must be no earlier than the TA view start date",
            );
        }

        errors
    }

    fn commit_dates(&mut self, parsed: GradeableDates) {
        self.dates.ta_view_start_date = parsed.ta_view_start_date;
        self.dates.grade_start_date = parsed.grade_start_date;
        self.dates.grade_released_date = parsed.grade_released_date;
        self.dates.grade_locked_date = parsed.grade_locked_date;

        if !self.is_electronic() {
            return;
        }

        // 未开启人工评分时仍保留一个一致的评分开始时间
        if !self.ta_grading {
            self.dates.grade_start_date = parsed.grade_released_date;
        }
        if self.team_assignment {
            self.dates.team_lock_date = parsed.team_lock_date;
        }
        self.dates.submission_open_date = parsed.submission_open_date;
        self.dates.submission_due_date = parsed.submission_due_date;
        self.dates.late_days = parsed.late_days;
    }
}

fn parse_dates(request: &GradeableDatesRequest, timezone: CourseTimezone) -> GradeableDates {
    let resolve = |role: DateRole| resolve_date(role, request.get(role), timezone);

    GradeableDates {
        ta_view_start_date: resolve(DateRole::TaViewStart),
        submission_open_date: resolve(DateRole::SubmissionOpen),
        submission_due_date: resolve(DateRole::SubmissionDue),
        grade_start_date: resolve(DateRole::GradeStart),
        grade_released_date: resolve(DateRole::GradeReleased),
        grade_locked_date: resolve(DateRole::GradeLocked),
        team_lock_date: resolve(DateRole::TeamLock),
        late_days: request
            .late_days
            .as_ref()
            .map_or(0, |late_days| late_days.coerce_lenient()),
    }
}

fn resolve_date(
    role: DateRole,
    input: Option<&DateInput>,
    timezone: CourseTimezone,
) -> Option<DateTime<FixedOffset>> {
    match input? {
        DateInput::At(value) => Some(*value),
        DateInput::Text(text) => match parse_course_date(text, timezone) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Unable to parse {}: {}", role, e);
                None
            }
        },
        DateInput::Other(value) => {
            debug!("Unsupported value for {}: {}", role, value);
            None
        }
    }
}

fn max_due(
    due: Option<DateTime<FixedOffset>>,
    late_days: i64,
) -> Option<DateTime<FixedOffset>> {
    let due = due?;
    TimeDelta::try_days(late_days).and_then(|delta| due.checked_add_signed(delta))
}

fn require(errors: &mut FieldErrors, parsed: &GradeableDates, role: DateRole) {
    if parsed.get(role).is_none() {
        errors.insert(role.field_name(), INVALID_DATE);
    }
}

/// `earlier <= later`，任一端缺失时跳过
fn ensure_order(
    errors: &mut FieldErrors,
    earlier: Option<DateTime<FixedOffset>>,
    later: Option<DateTime<FixedOffset>>,
    field: DateRole,
    message: &str,
) {
    if let (Some(earlier), Some(later)) = (earlier, later) {
        if earlier > later {
            errors.insert(field.field_name(), message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{at, build, electronic};
    use crate::errors::GradingError;
    use crate::models::{DateRole, GradeableDatesRequest, GradeableType, NewGradeable};

    fn electronic_dates() -> GradeableDatesRequest {
        GradeableDatesRequest::new()
            .with(DateRole::TaViewStart, "2026-09-01 00:00:00")
            .with(DateRole::SubmissionOpen, "2026-09-02 00:00:00")
            .with(DateRole::SubmissionDue, "2026-09-09 23:59:59")
            .with(DateRole::GradeStart, "2026-09-12 00:00:00")
            .with(DateRole::GradeReleased, "2026-09-20 00:00:00")
            .with(DateRole::GradeLocked, "2026-12-20 00:00:00")
            .with(DateRole::TeamLock, "2026-09-05 00:00:00")
            .with_late_days(2i64)
    }

    fn field_errors(result: crate::errors::Result<()>) -> Vec<String> {
        match result {
            Err(GradingError::ValidationFailed(fields)) => {
                fields.fields().map(str::to_string).collect()
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_electronic_dates_committed() {
        let mut gradeable = build(electronic("hw1"));
        gradeable.set_dates(&electronic_dates()).unwrap();

        let dates = gradeable.dates();
        assert_eq!(
            dates.submission_due_date,
            Some(at("2026-09-09T23:59:59+00:00"))
        );
        assert_eq!(dates.grade_start_date, Some(at("2026-09-12T00:00:00+00:00")));
        assert_eq!(
            dates.grade_locked_date,
            Some(at("2026-12-20T00:00:00+00:00"))
        );
        assert_eq!(gradeable.late_days(), 2);
        assert_eq!(
            gradeable.max_due_date(),
            Some(at("2026-09-11T23:59:59+00:00"))
        );
        // 非组队作业不提交队伍锁定时间
        assert_eq!(dates.team_lock_date, None);
    }

    #[test]
    fn test_ta_view_after_due_reports_ordering_field() {
        let mut gradeable = build(electronic("hw1"));
        let request = electronic_dates().with(DateRole::TaViewStart, "2026-09-10 00:00:00");

        let fields = field_errors(gradeable.set_dates(&request));
        assert!(
            fields.contains(&"ta_view_start_date".to_string())
                || fields.contains(&"submission_open_date".to_string())
        );
        assert!(gradeable.dates().ta_view_start_date.is_none());
    }

    #[test]
    fn test_negative_late_days_leaves_state_unchanged() {
        let mut gradeable = build(electronic("hw1"));
        gradeable.set_dates(&electronic_dates()).unwrap();
        let before = gradeable.dates().clone();

        let request = GradeableDatesRequest::new()
            .with(DateRole::TaViewStart, "2027-01-01 00:00:00")
            .with(DateRole::SubmissionOpen, "2027-01-02 00:00:00")
            .with(DateRole::SubmissionDue, "2027-01-09 00:00:00")
            .with(DateRole::GradeStart, "2027-01-10 00:00:00")
            .with(DateRole::GradeReleased, "2027-01-20 00:00:00")
            .with_late_days(-1i64);

        let fields = field_errors(gradeable.set_dates(&request));
        assert_eq!(fields, vec!["late_days".to_string()]);
        assert_eq!(gradeable.dates(), &before);
    }

    #[test]
    fn test_overflowing_late_days_reported() {
        let mut gradeable = build(electronic("hw1"));
        let request = electronic_dates().with_late_days("99999999999999999999");

        match gradeable.set_dates(&request) {
            Err(GradingError::ValidationFailed(fields)) => {
                assert_eq!(fields.get("late_days"), Some("Late day count is too large"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(gradeable.late_days(), 0);
    }

    #[test]
    fn test_boolean_late_days_coerced() {
        let mut gradeable = build(electronic("hw1"));
        let request: GradeableDatesRequest = serde_json::from_value(serde_json::json!({
            "ta_view_start_date": "2026-09-01 00:00:00",
            "submission_open_date": "2026-09-02 00:00:00",
            "submission_due_date": "2026-09-09 23:59:59",
            "grade_start_date": "2026-09-12 00:00:00",
            "grade_released_date": "2026-09-20 00:00:00",
            "late_days": true
        }))
        .unwrap();

        gradeable.set_dates(&request).unwrap();
        assert_eq!(gradeable.late_days(), 1);
    }

    #[test]
    fn test_all_violations_collected() {
        let mut gradeable = build(electronic("hw1"));
        let request = GradeableDatesRequest::new()
            .with(DateRole::SubmissionOpen, "not a date")
            .with(DateRole::SubmissionDue, "2026-09-09 00:00:00")
            .with(DateRole::GradeStart, "2026-09-01 00:00:00")
            .with_late_days("-3");

        let fields = field_errors(gradeable.set_dates(&request));
        assert_eq!(
            fields,
            vec![
                "grade_released_date",
                "grade_start_date",
                "late_days",
                "submission_open_date",
                "ta_view_start_date",
            ]
        );
    }

    #[test]
    fn test_missing_operand_reported_only_by_presence_check() {
        let mut gradeable = build(electronic("hw1"));
        let request = electronic_dates().without(DateRole::SubmissionOpen);

        match gradeable.set_dates(&request) {
            Err(GradingError::ValidationFailed(fields)) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields.get("submission_open_date"), Some("Invalid date"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_grade_start_before_due_with_ta_grading() {
        let mut gradeable = build(electronic("hw1"));
        let request = electronic_dates().with(DateRole::GradeStart, "2026-09-05 00:00:00");
        assert_eq!(
            field_errors(gradeable.set_dates(&request)),
            vec!["grade_start_date"]
        );
    }

    #[test]
    fn test_release_must_cover_late_days_without_ta_grading() {
        let mut request = electronic("hw1");
        request.ta_grading = false;
        let mut gradeable = build(request);

        // 截止 9/9 + 2 天迟交 > 9/10 发布
        let dates = electronic_dates()
            .without(DateRole::GradeStart)
            .with(DateRole::GradeReleased, "2026-09-10 00:00:00");
        assert_eq!(
            field_errors(gradeable.set_dates(&dates)),
            vec!["grade_released_date"]
        );

        let dates = dates.with_late_days(0i64);
        gradeable.set_dates(&dates).unwrap();
        // 评分开始时间与发布时间保持一致
        assert_eq!(
            gradeable.dates().grade_start_date,
            gradeable.dates().grade_released_date
        );
    }

    #[test]
    fn test_team_lock_required_for_team_assignment() {
        let mut request = electronic("team-hw");
        request.team_assignment = true;
        let mut gradeable = build(request);

        let dates = electronic_dates().without(DateRole::TeamLock);
        assert_eq!(
            field_errors(gradeable.set_dates(&dates)),
            vec!["team_lock_date"]
        );

        gradeable.set_dates(&electronic_dates()).unwrap();
        assert_eq!(
            gradeable.dates().team_lock_date,
            Some(at("2026-09-05T00:00:00+00:00"))
        );
    }

    #[test]
    fn test_non_electronic_only_checks_release_order() {
        let request = NewGradeable::new("lab1", "Lab 1", GradeableType::Checkpoint);
        let mut gradeable = build(request);

        // 提交日期与队伍锁定时间的错误值都不参与校验
        let dates = GradeableDatesRequest::new()
            .with(DateRole::TaViewStart, "2026-09-01 00:00:00")
            .with(DateRole::SubmissionOpen, "garbage")
            .with(DateRole::SubmissionDue, "2020-01-01 00:00:00")
            .with(DateRole::GradeReleased, "2026-09-03 00:00:00")
            .with(DateRole::TeamLock, "2020-01-01 00:00:00")
            .with_late_days(5i64);
        gradeable.set_dates(&dates).unwrap();

        let committed = gradeable.dates();
        assert_eq!(
            committed.ta_view_start_date,
            Some(at("2026-09-01T00:00:00+00:00"))
        );
        assert_eq!(committed.submission_open_date, None);
        assert_eq!(committed.submission_due_date, None);
        assert_eq!(committed.team_lock_date, None);
        assert_eq!(committed.late_days, 0);

        let dates = dates.with(DateRole::GradeReleased, "2026-08-01 00:00:00");
        assert_eq!(
            field_errors(gradeable.set_dates(&dates)),
            vec!["grade_released_date"]
        );
    }

    #[test]
    fn test_individual_setters_disabled() {
        let mut gradeable = build(electronic("hw1"));
        assert!(matches!(
            gradeable.set_date(DateRole::SubmissionDue, "2026-09-09 00:00:00".into()),
            Err(GradingError::OperationNotPermitted(_))
        ));
        assert!(matches!(
            gradeable.set_late_days(3),
            Err(GradingError::OperationNotPermitted(_))
        ));
    }

    #[test]
    fn test_structured_dates_and_course_timezone() {
        let course = crate::storage::MemoryCourse::default()
            .with_timezone(chrono::FixedOffset::east_opt(8 * 3600).unwrap());
        let mut gradeable =
            crate::models::Gradeable::create(electronic("hw1"), &course, &course).unwrap();

        let request = electronic_dates()
            .with(DateRole::SubmissionDue, at("2026-09-09T23:59:59+08:00"))
            .with_late_days(0i64);
        gradeable.set_dates(&request).unwrap();

        assert_eq!(
            gradeable.dates().ta_view_start_date,
            Some(at("2026-09-01T00:00:00+08:00"))
        );
        assert_eq!(
            gradeable.dates().submission_due_date,
            Some(at("2026-09-09T23:59:59+08:00"))
        );
    }

    #[test]
    fn test_named_course_timezone_across_daylight_saving() {
        let course = crate::storage::MemoryCourse::default()
            .with_timezone(chrono_tz::Tz::America__New_York);
        let mut gradeable =
            crate::models::Gradeable::create(electronic("hw1"), &course, &course).unwrap();

        let request = GradeableDatesRequest::new()
            .with(DateRole::TaViewStart, "2026-10-20 00:00:00")
            .with(DateRole::SubmissionOpen, "2026-10-25 00:00:00")
            .with(DateRole::SubmissionDue, "2026-11-05 23:59:59")
            .with(DateRole::GradeStart, "2026-11-06 00:00:00")
            .with(DateRole::GradeReleased, "2026-11-20 00:00:00");
        gradeable.set_dates(&request).unwrap();

        assert_eq!(
            gradeable.dates().submission_open_date,
            Some(at("2026-10-25T00:00:00-04:00"))
        );
        assert_eq!(
            gradeable.dates().submission_due_date,
            Some(at("2026-11-05T23:59:59-05:00"))
        );
    }

    #[test]
    fn test_resubmitting_existing_dates() {
        let mut gradeable = build(electronic("hw1"));
        gradeable.set_dates(&electronic_dates()).unwrap();

        let request = GradeableDatesRequest::from_dates(gradeable.dates())
            .with(DateRole::GradeReleased, "2026-09-25 00:00:00");
        gradeable.set_dates(&request).unwrap();
        assert_eq!(
            gradeable.dates().grade_released_date,
            Some(at("2026-09-25T00:00:00+00:00"))
        );
        assert_eq!(gradeable.late_days(), 2);
    }
}
