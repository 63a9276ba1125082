use chrono::{DateTime, FixedOffset};

use crate::models::{DateRole, Gradeable};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

impl Gradeable {
    fn reached(&self, role: DateRole, now: &DateTime<FixedOffset>) -> bool {
        self.dates.get(role).is_some_and(|date| date <= *now)
    }

    /// 助教是否可以预览
    pub fn is_ta_view_open(&self, now: &DateTime<FixedOffset>) -> bool {
        self.reached(DateRole::TaViewStart, now)
    }

    /// 学生是否可以提交（已开放）
    pub fn is_submission_open(&self, now: &DateTime<FixedOffset>) -> bool {
        self.is_electronic() && self.reached(DateRole::SubmissionOpen, now)
    }

    /// 是否已过截止时间
    pub fn is_submission_closed(&self, now: &DateTime<FixedOffset>) -> bool {
        self.dates
            .submission_due_date
            .is_some_and(|due| due < *now)
    }

    /// 是否处于迟交窗口：已过截止时间但未超过迟交天数
    pub fn is_late_submission_window(&self, now: &DateTime<FixedOffset>) -> bool {
        if !self.late_submission_allowed || !self.is_submission_closed(now) {
            return false;
        }
        self.max_due_date().is_some_and(|max_due| *now <= max_due)
    }

    pub fn is_grading_open(&self, now: &DateTime<FixedOffset>) -> bool {
        self.reached(DateRole::GradeStart, now)
    }

    pub fn is_grade_released(&self, now: &DateTime<FixedOffset>) -> bool {
        self.reached(DateRole::GradeReleased, now)
    }

    pub fn is_grade_locked(&self, now: &DateTime<FixedOffset>) -> bool {
        self.reached(DateRole::GradeLocked, now)
    }

    pub fn is_team_locked(&self, now: &DateTime<FixedOffset>) -> bool {
        self.team_assignment && self.reached(DateRole::TeamLock, now)
    }

    /// 提交时间相对截止时间的秒数，负数表示按时提交
    pub fn seconds_late(&self, submitted_at: &DateTime<FixedOffset>) -> Option<i64> {
        self.dates
            .submission_due_date
            .map(|due| submitted_at.signed_duration_since(due).num_seconds())
    }

    /// 迟交天数，不足一天按一天计，按时提交为 0
    pub fn days_late(&self, submitted_at: &DateTime<FixedOffset>) -> Option<i64> {
        self.seconds_late(submitted_at).map(|seconds| {
            if seconds <= 0 {
                0
            } else {
                (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
            }
        })
    }

    /// 迟交是否仍在允许范围内
    pub fn is_late_within_allowance(&self, submitted_at: &DateTime<FixedOffset>) -> bool {
        let allowance = if self.late_submission_allowed {
            self.dates.late_days
        } else {
            0
        };
        self.days_late(submitted_at)
            .is_some_and(|days| days <= allowance)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{at, build, electronic};
    use crate::models::{DateRole, Gradeable, GradeableDatesRequest};

    fn scheduled(late_submission_allowed: bool) -> Gradeable {
        let mut request = electronic("hw1");
        request.late_submission_allowed = late_submission_allowed;
        let mut gradeable = build(request);
        gradeable
            .set_dates(
                &GradeableDatesRequest::new()
                    .with(DateRole::TaViewStart, "2026-09-01 00:00:00")
                    .with(DateRole::SubmissionOpen, "2026-09-02 00:00:00")
                    .with(DateRole::SubmissionDue, "2026-09-09 12:00:00")
                    .with(DateRole::GradeStart, "2026-09-12 00:00:00")
                    .with(DateRole::GradeReleased, "2026-09-20 00:00:00")
                    .with_late_days(2i64),
            )
            .unwrap();
        gradeable
    }

    #[test]
    fn test_date_status_progression() {
        let gradeable = scheduled(true);

        let before = at("2026-08-31T00:00:00+00:00");
        assert!(!gradeable.is_ta_view_open(&before));
        assert!(!gradeable.is_submission_open(&before));

        let during = at("2026-09-05T00:00:00+00:00");
        assert!(gradeable.is_ta_view_open(&during));
        assert!(gradeable.is_submission_open(&during));
        assert!(!gradeable.is_submission_closed(&during));
        assert!(!gradeable.is_late_submission_window(&during));

        let late = at("2026-09-10T00:00:00+00:00");
        assert!(gradeable.is_submission_closed(&late));
        assert!(gradeable.is_late_submission_window(&late));
        assert!(!gradeable.is_grading_open(&late));

        let released = at("2026-09-21T00:00:00+00:00");
        assert!(!gradeable.is_late_submission_window(&released));
        assert!(gradeable.is_grading_open(&released));
        assert!(gradeable.is_grade_released(&released));
        assert!(!gradeable.is_grade_locked(&released));
        assert!(!gradeable.is_team_locked(&released));
    }

    #[test]
    fn test_late_window_requires_late_submission() {
        let gradeable = scheduled(false);
        assert!(!gradeable.is_late_submission_window(&at("2026-09-10T00:00:00+00:00")));
    }

    #[test]
    fn test_lateness() {
        let gradeable = scheduled(true);

        let on_time = at("2026-09-09T11:00:00+00:00");
        assert_eq!(gradeable.seconds_late(&on_time), Some(-3600));
        assert_eq!(gradeable.days_late(&on_time), Some(0));

        let one_second = at("2026-09-09T12:00:01+00:00");
        assert_eq!(gradeable.days_late(&one_second), Some(1));

        let two_days = at("2026-09-11T12:00:00+00:00");
        assert_eq!(gradeable.days_late(&two_days), Some(2));
        assert!(gradeable.is_late_within_allowance(&two_days));

        let three_days = at("2026-09-11T12:00:01+00:00");
        assert_eq!(gradeable.days_late(&three_days), Some(3));
        assert!(!gradeable.is_late_within_allowance(&three_days));
    }

    #[test]
    fn test_lateness_without_due_date() {
        let gradeable = build(electronic("hw1"));
        let now = at("2026-09-10T00:00:00+00:00");
        assert_eq!(gradeable.seconds_late(&now), None);
        assert!(!gradeable.is_late_within_allowance(&now));
        assert!(!gradeable.is_submission_closed(&now));
    }
}
