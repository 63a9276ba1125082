use super::GradingOrder;
use crate::models::Submitter;

impl GradingOrder {
    /// 顺序中上一个有提交的提交者
    pub fn prev_submitter(&self, current: &Submitter) -> Option<&Submitter> {
        self.prev_submitter_by_id(current.id())
    }

    /// 顺序中下一个有提交的提交者
    pub fn next_submitter(&self, current: &Submitter) -> Option<&Submitter> {
        self.next_submitter_by_id(current.id())
    }

    pub fn prev_submitter_by_id(&self, submitter_id: &str) -> Option<&Submitter> {
        let start = self.submitter_index(submitter_id)?;
        (0..start)
            .rev()
            .filter_map(|position| self.submitter_at(position))
            .find(|submitter| self.has_submission(submitter))
    }

    pub fn next_submitter_by_id(&self, submitter_id: &str) -> Option<&Submitter> {
        let start = self.submitter_index(submitter_id)?;
        (start + 1..self.len())
            .filter_map(|position| self.submitter_at(position))
            .find(|submitter| self.has_submission(submitter))
    }
}
