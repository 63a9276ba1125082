//! 评分顺序
//!
//! 构造时一次性拉取分组与提交版本，之后所有查询都只读取快照。
//! 各分组按解析器给出的顺序首尾相接，分组内按提交者 ID 升序，
//! 构成一个全局的扁平序列。

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::errors::Result;
use crate::models::{Gradeable, GradingSection, Submitter, User};
use crate::storage::{SectionResolver, VersionLookup};

pub mod navigation;
pub mod sections;

#[derive(Debug, Clone)]
pub struct GradingOrder {
    gradeable: Arc<Gradeable>,
    grader: User,
    all_sections: bool,
    sections: Vec<GradingSection>,
    // 扁平序列中的 (分组下标, 组内下标)
    order: Vec<(usize, usize)>,
    // 提交者 ID -> 扁平下标
    index: HashMap<String, usize>,
    has_submission: HashMap<String, bool>,
}

impl GradingOrder {
    /// 构造评分顺序
    ///
    /// 分组或版本查询失败时直接返回错误，不产生部分结果。
    pub fn new(
        gradeable: Arc<Gradeable>,
        grader: User,
        all_sections: bool,
        section_resolver: &dyn SectionResolver,
        version_lookup: &dyn VersionLookup,
    ) -> Result<Self> {
        let mut sections = if all_sections {
            section_resolver.all_sections(&gradeable)?
        } else {
            section_resolver.grader_sections(&gradeable, &grader)?
        };

        let mut user_ids = Vec::new();
        let mut team_ids = Vec::new();
        for submitter in sections.iter().flat_map(|s| s.submitters.iter()) {
            if gradeable.is_team_assignment() {
                team_ids.push(submitter.id().to_string());
            } else {
                user_ids.push(submitter.id().to_string());
            }
        }
        let mut submitter_ids = user_ids;
        submitter_ids.extend(team_ids);

        let has_submission = version_lookup
            .active_versions(&gradeable, &submitter_ids)?
            .into_iter()
            .map(|(id, version)| (id, version > 0))
            .collect::<HashMap<_, _>>();

        for section in &mut sections {
            section.submitters.sort_by(|a, b| a.id().cmp(b.id()));
        }

        let mut order = Vec::with_capacity(submitter_ids.len());
        let mut index = HashMap::with_capacity(submitter_ids.len());
        for (section_idx, section) in sections.iter().enumerate() {
            for (submitter_idx, submitter) in section.submitters.iter().enumerate() {
                index
                    .entry(submitter.id().to_string())
                    .or_insert(order.len());
                order.push((section_idx, submitter_idx));
            }
        }

        debug!(
            "Grading order for {} (grader: {}, all sections: {}): {} sections, {} submitters, {} with submissions",
            gradeable.id(),
            grader.id,
            all_sections,
            sections.len(),
            order.len(),
            has_submission.values().filter(|v| **v).count()
        );

        Ok(Self {
            gradeable,
            grader,
            all_sections,
            sections,
            order,
            index,
            has_submission,
        })
    }

    pub fn gradeable(&self) -> &Gradeable {
        &self.gradeable
    }

    pub fn grader(&self) -> &User {
        &self.grader
    }

    pub fn is_all_sections(&self) -> bool {
        self.all_sections
    }

    /// 提交者是否有有效提交，未知 ID 视为没有
    pub fn has_submission(&self, submitter: &Submitter) -> bool {
        self.has_submission_by_id(submitter.id())
    }

    pub fn has_submission_by_id(&self, submitter_id: &str) -> bool {
        self.has_submission
            .get(submitter_id)
            .copied()
            .unwrap_or(false)
    }

    /// 提交者是否出现在任一分组中
    pub fn contains_submitter(&self, submitter: &Submitter) -> bool {
        self.contains_submitter_id(submitter.id())
    }

    pub fn contains_submitter_id(&self, submitter_id: &str) -> bool {
        self.index.contains_key(submitter_id)
    }

    /// 提交者在扁平序列中的位置
    pub fn submitter_index(&self, submitter_id: &str) -> Option<usize> {
        self.index.get(submitter_id).copied()
    }

    /// 扁平序列中指定位置的提交者
    pub fn submitter_at(&self, position: usize) -> Option<&Submitter> {
        let (section_idx, submitter_idx) = *self.order.get(position)?;
        self.sections
            .get(section_idx)
            .and_then(|section| section.submitters.get(submitter_idx))
    }

    pub fn submitter(&self, submitter_id: &str) -> Option<&Submitter> {
        self.submitter_index(submitter_id)
            .and_then(|position| self.submitter_at(position))
    }

    /// 按评分顺序遍历所有提交者
    pub fn submitters(&self) -> impl Iterator<Item = &Submitter> {
        self.sections.iter().flat_map(|s| s.submitters.iter())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 有有效提交的提交者数量
    pub fn submission_count(&self) -> usize {
        self.submitters().filter(|s| self.has_submission(s)).count()
    }
}
