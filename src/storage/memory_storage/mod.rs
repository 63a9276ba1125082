//! 内存实现的协作者，供测试与嵌入场景使用

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{CoursePathProvider, FileReader, SectionResolver, VersionLookup};
use crate::errors::{GradingError, Result};
use crate::models::{Gradeable, GradingSection, User};
use crate::utils::date::CourseTimezone;

#[derive(Debug)]
pub struct MemoryCourse {
    course_path: PathBuf,
    timezone: CourseTimezone,
    documents: HashMap<PathBuf, Value>,
    sections: Vec<GradingSection>,
    versions: HashMap<String, i64>,
    section_error: Option<String>,
    version_error: Option<String>,
    // 版本查询返回全部已知版本，而不只是请求的 ID
    all_versions: bool,
    version_requests: RefCell<Vec<Vec<String>>>,
}

impl Default for MemoryCourse {
    fn default() -> Self {
        Self::new("/var/local/course")
    }
}

impl MemoryCourse {
    pub fn new<P: Into<PathBuf>>(course_path: P) -> Self {
        Self {
            course_path: course_path.into(),
            timezone: CourseTimezone::utc(),
            documents: HashMap::new(),
            sections: Vec::new(),
            versions: HashMap::new(),
            section_error: None,
            version_error: None,
            all_versions: false,
            version_requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_timezone<T: Into<CourseTimezone>>(mut self, timezone: T) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_document<P: Into<PathBuf>>(mut self, path: P, document: Value) -> Self {
        self.documents.insert(path.into(), document);
        self
    }

    pub fn with_section(mut self, section: GradingSection) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_version<S: Into<String>>(mut self, submitter_id: S, version: i64) -> Self {
        self.versions.insert(submitter_id.into(), version);
        self
    }

    /// 分组查询返回错误
    pub fn failing_sections<S: Into<String>>(mut self, message: S) -> Self {
        self.section_error = Some(message.into());
        self
    }

    /// 版本查询返回错误
    pub fn failing_versions<S: Into<String>>(mut self, message: S) -> Self {
        self.version_error = Some(message.into());
        self
    }

    /// 版本查询返回全部已知版本，包括未请求的 ID
    pub fn returning_all_versions(mut self) -> Self {
        self.all_versions = true;
        self
    }

    /// 历次版本查询收到的 ID 列表
    pub fn version_requests(&self) -> Vec<Vec<String>> {
        self.version_requests.borrow().clone()
    }
}

impl CoursePathProvider for MemoryCourse {
    fn course_path(&self) -> &Path {
        &self.course_path
    }

    fn timezone(&self) -> CourseTimezone {
        self.timezone
    }
}

impl FileReader for MemoryCourse {
    fn read_json(&self, path: &Path) -> Result<Value> {
        self.documents.get(path).cloned().ok_or_else(|| {
            GradingError::file_operation(format!("文件不存在: {}", path.display()))
        })
    }
}

impl SectionResolver for MemoryCourse {
    fn all_sections(&self, _gradeable: &Gradeable) -> Result<Vec<GradingSection>> {
        if let Some(message) = &self.section_error {
            return Err(GradingError::section_lookup(message.clone()));
        }
        Ok(self.sections.clone())
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

impl VersionLookup for MemoryCourse {
    fn active_versions(
        &self,
        _gradeable: &Gradeable,
        submitter_ids: &[String],
    ) -> Result<HashMap<String, i64>> {
        self.version_requests
            .borrow_mut()
            .push(submitter_ids.to_vec());
        if let Some(message) = &self.version_error {
            return Err(GradingError::version_lookup(message.clone()));
        }
        if self.all_versions {
            return Ok(self.versions.clone());
        }
        Ok(submitter_ids
            .iter()
            .filter_map(|id| self.versions.get(id).map(|v| (id.clone(), *v)))
            .collect())
    }
}
