//! 外部协作者接口
//!
//! 核心逻辑只通过这里的 trait 访问课程目录、文件、分组与提交版本。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::models::{Gradeable, GradingSection, User};
use crate::utils::date::CourseTimezone;

pub mod file_storage;
pub mod memory_storage;

pub use file_storage::{
    CourseDirectory, JsonFileReader, RosterSectionResolver, SubmissionDirectoryVersions,
};
pub use memory_storage::MemoryCourse;

/// 课程路径与时区
pub trait CoursePathProvider {
    // 课程根目录
    fn course_path(&self) -> &Path;
    // 课程时区，用于解释不带偏移量的日期
    fn timezone(&self) -> CourseTimezone;

    /// 作业自动评测配置文件路径
    fn autograding_config_path(&self, gradeable_id: &str) -> PathBuf {
        self.course_path()
            .join("config")
            .join("build")
            .join(format!("build_{gradeable_id}.json"))
    }

    /// 作业表单配置文件路径
    fn gradeable_form_path(&self, gradeable_id: &str) -> PathBuf {
        self.course_path()
            .join("config")
            .join("form")
            .join(format!("form_{gradeable_id}.json"))
    }
}

/// 结构化文档读取
pub trait FileReader {
    fn read_json(&self, path: &Path) -> Result<serde_json::Value>;
}

/// 评分分组解析
pub trait SectionResolver {
    // 作业的全部分组
    fn all_sections(&self, gradeable: &Gradeable) -> Result<Vec<GradingSection>>;
    // 评分人负责的分组
    fn grader_sections(&self, gradeable: &Gradeable, grader: &User)
    -> Result<Vec<GradingSection>>;
}

/// 当前有效提交版本查询
pub trait VersionLookup {
    /// 返回提交者 ID -> 有效版本号；0 或缺失表示没有提交
    fn active_versions(
        &self,
        gradeable: &Gradeable,
        submitter_ids: &[String],
    ) -> Result<HashMap<String, i64>>;
}
