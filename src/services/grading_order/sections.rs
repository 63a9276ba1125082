use std::collections::BTreeMap;

use super::GradingOrder;
use crate::models::{GradingSection, SectionKey, Submitter, User};

impl GradingOrder {
    /// 分组依据，由作业的按注册分组标志决定
    pub fn section_key(&self) -> SectionKey {
        self.gradeable.section_key()
    }

    /// 按顺序排列的分组
    pub fn sections(&self) -> &[GradingSection] {
        &self.sections
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    fn section(&self, name: &str) -> Option<&GradingSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// 分组内已排序的提交者，分组不存在时返回 None
    pub fn section_submitters(&self, name: &str) -> Option<&[Submitter]> {
        self.section(name).map(|s| s.submitters.as_slice())
    }

    pub fn section_graders(&self, name: &str) -> Option<&[User]> {
        self.section(name).map(|s| s.graders.as_slice())
    }

    pub fn submitters_by_section(&self) -> BTreeMap<&str, &[Submitter]> {
        self.sections
            .iter()
            .map(|s| (s.name.as_str(), s.submitters.as_slice()))
            .collect()
    }

    pub fn graders_by_section(&self) -> BTreeMap<&str, &[User]> {
        self.sections
            .iter()
            .map(|s| (s.name.as_str(), s.graders.as_slice()))
            .collect()
    }

    /// 提交者所在分组名
    pub fn section_of(&self, submitter_id: &str) -> Option<&str> {
        let position = self.submitter_index(submitter_id)?;
        let (section_idx, _) = *self.order.get(position)?;
        self.sections.get(section_idx).map(|s| s.name.as_str())
    }
}
