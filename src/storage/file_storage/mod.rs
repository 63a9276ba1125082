//! 基于课程目录的协作者实现
//!
//! 课程目录布局：
//! - `config/form/form_<id>.json` 作业表单
//! - `config/build/build_<id>.json` 自动评测配置
//! - `config/roster.json` 名单与分组
//! - `submissions/<id>/<who>/user_assignment_settings.json` 提交版本

mod roster;
mod versions;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use super::{CoursePathProvider, FileReader};
use crate::config::CourseConfig;
use crate::errors::{GradingError, Result};
use crate::utils::date::{CourseTimezone, parse_timezone};

pub use roster::RosterSectionResolver;
pub use versions::SubmissionDirectoryVersions;

/// 从磁盘读取 JSON 文档
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileReader;

impl FileReader for JsonFileReader {
    fn read_json(&self, path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path).map_err(|e| {
            GradingError::file_operation(format!("读取文件失败 {}: {e}", path.display()))
        })?;
        let value = serde_json::from_str(&content)?;
        debug!("Loaded {}", path.display());
        Ok(value)
    }
}

/// 课程根目录与时区
#[derive(Debug, Clone)]
pub struct CourseDirectory {
    path: PathBuf,
    timezone: CourseTimezone,
}

impl CourseDirectory {
    pub fn new<P: Into<PathBuf>, T: Into<CourseTimezone>>(path: P, timezone: T) -> Self {
        Self {
            path: path.into(),
            timezone: timezone.into(),
        }
    }

    /// 从应用配置构建，时区字符串无法识别时返回错误
    pub fn from_config(config: &CourseConfig) -> Result<Self> {
        let timezone = parse_timezone(&config.timezone)
            .map_err(|e| GradingError::config(format!("课程时区配置无效: {}", e.message())))?;
        Ok(Self::new(&config.path, timezone))
    }

    pub fn roster_path(&self) -> PathBuf {
        self.path.join("config").join("roster.json")
    }

    pub fn submissions_path(&self) -> PathBuf {
        self.path.join("submissions")
    }
}

impl CoursePathProvider for CourseDirectory {
    fn course_path(&self) -> &Path {
        &self.path
    }

    fn timezone(&self) -> CourseTimezone {
        self.timezone
    }
}
