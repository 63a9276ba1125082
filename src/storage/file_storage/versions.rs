use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use super::CourseDirectory;
use crate::errors::{GradingError, Result};
use crate::models::Gradeable;
use crate::storage::VersionLookup;
use crate::utils::validate::validate_submitter_id;

const SETTINGS_FILE: &str = "user_assignment_settings.json";

/// 从提交目录读取当前有效版本
///
/// 设置文件不存在视为没有提交；文件无法读取或内容错误时返回错误。
#[derive(Debug, Clone)]
pub struct SubmissionDirectoryVersions {
    course: CourseDirectory,
}

impl SubmissionDirectoryVersions {
    pub fn new(course: CourseDirectory) -> Self {
        Self { course }
    }

    fn settings_path(&self, gradeable_id: &str, submitter_id: &str) -> PathBuf {
        self.course
            .submissions_path()
            .join(gradeable_id)
            .join(submitter_id)
            .join(SETTINGS_FILE)
    }

    fn active_version(&self, gradeable_id: &str, submitter_id: &str) -> Result<Option<i64>> {
        validate_submitter_id(submitter_id).map_err(|reason| {
            GradingError::version_lookup(format!("无效的提交者 ID '{submitter_id}': {reason}"))
        })?;
        let path = self.settings_path(gradeable_id, submitter_id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(GradingError::version_lookup(format!(
                    "读取提交设置失败 {}: {e}",
                    path.display()
                )));
            }
        };

        let settings: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            GradingError::version_lookup(format!("提交设置格式错误 {}: {e}", path.display()))
        })?;
        settings
            .get("active_version")
            .and_then(|v| v.as_i64())
            .map(Some)
            .ok_or_else(|| {
                GradingError::version_lookup(format!(
                    "提交设置缺少 active_version: {}",
                    path.display()
                ))
            })
    }
}

impl VersionLookup for SubmissionDirectoryVersions {
    fn active_versions(
        &self,
        gradeable: &Gradeable,
        submitter_ids: &[String],
    ) -> Result<HashMap<String, i64>> {
        let mut versions = HashMap::with_capacity(submitter_ids.len());
        for submitter_id in submitter_ids {
            if let Some(version) = self.active_version(gradeable.id(), submitter_id)? {
                versions.insert(submitter_id.clone(), version);
            }
        }
        debug!(
            "Found {} submission settings for {} ({} requested)",
            versions.len(),
            gradeable.id(),
            submitter_ids.len()
        );
        Ok(versions)
    }
}
