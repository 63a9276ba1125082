use std::collections::{BTreeMap, HashMap};
use std::fs;

use serde::Deserialize;
use tracing::debug;

use super::CourseDirectory;
use crate::errors::{GradingError, Result};
use crate::models::{Gradeable, GradingSection, SectionKey, Submitter, Team, User};
use crate::storage::SectionResolver;

/// `config/roster.json` 的结构
#[derive(Debug, Default, Deserialize)]
struct Roster {
    #[serde(default)]
    users: Vec<User>,
    // 作业 ID -> 队伍列表
    #[serde(default)]
    teams: HashMap<String, Vec<Team>>,
    #[serde(default)]
    graders: RosterGraders,
}

/// 分组名 -> 评分人 ID
#[derive(Debug, Default, Deserialize)]
struct RosterGraders {
    #[serde(default)]
    registration: HashMap<String, Vec<String>>,
    #[serde(default)]
    rotating: HashMap<String, Vec<String>>,
}

impl RosterGraders {
    fn by_key(&self, key: SectionKey) -> &HashMap<String, Vec<String>> {
        match key {
            SectionKey::Registration => &self.registration,
            SectionKey::Rotating => &self.rotating,
        }
    }
}

/// 按课程名单解析评分分组
///
/// 注册分组按名称升序排列，轮换分组按编号升序排列；
/// 没有所属分组的提交者不会出现在任何分组中。
#[derive(Debug, Clone)]
pub struct RosterSectionResolver {
    course: CourseDirectory,
}

impl RosterSectionResolver {
    pub fn new(course: CourseDirectory) -> Self {
        Self { course }
    }

    fn load_roster(&self) -> Result<Roster> {
        let path = self.course.roster_path();
        let content = fs::read_to_string(&path).map_err(|e| {
            GradingError::section_lookup(format!("读取名单失败 {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            GradingError::section_lookup(format!("名单格式错误 {}: {e}", path.display()))
        })
    }
}

impl SectionResolver for RosterSectionResolver {
    fn all_sections(&self, gradeable: &Gradeable) -> Result<Vec<GradingSection>> {
        let roster = self.load_roster()?;
        let key = gradeable.section_key();

        let submitters: Vec<Submitter> = if gradeable.is_team_assignment() {
            roster
                .teams
                .get(gradeable.id())
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(Submitter::from)
                .collect()
        } else {
            roster.users.iter().cloned().map(Submitter::from).collect()
        };

        let mut sections: BTreeMap<String, GradingSection> = BTreeMap::new();
        for submitter in submitters {
            if let Some(name) = submitter.section(key) {
                sections
                    .entry(name.clone())
                    .or_insert_with(|| GradingSection::new(name))
                    .submitters
                    .push(submitter);
            }
        }

        for (name, grader_ids) in roster.graders.by_key(key) {
            let section = sections
                .entry(name.clone())
                .or_insert_with(|| GradingSection::new(name.clone()));
            for grader_id in grader_ids {
                let grader = roster
                    .users
                    .iter()
                    .find(|u| &u.id == grader_id)
                    .cloned()
                    .unwrap_or_else(|| User::new(grader_id.clone()));
                section.graders.push(grader);
            }
        }

        debug!(
            "Resolved {} {} sections for {}",
            sections.len(),
            key,
            gradeable.id()
        );
        let mut sections: Vec<GradingSection> = sections.into_values().collect();
        if key == SectionKey::Rotating {
            sections.sort_by_key(|s| rotating_order(&s.name));
        }
        Ok(sections)
    }

    fn grader_sections(
        &self,
        gradeable: &Gradeable,
        grader: &User,
    ) -> Result<Vec<GradingSection>> {
        Ok(self
            .all_sections(gradeable)?
            .into_iter()
            .filter(|section| section.has_grader(&grader.id))
            .collect())
    }
}

// 非数字的轮换分组名排在数字分组之后
fn rotating_order(name: &str) -> (bool, i64, String) {
    match name.trim().parse::<i64>() {
        Ok(number) => (false, number, String::new()),
        Err(_) => (true, 0, name.to_string()),
    }
}
