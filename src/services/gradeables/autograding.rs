use tracing::{debug, warn};

use crate::models::AutogradingConfig;
use crate::storage::{CoursePathProvider, FileReader};

/// 加载作业的自动评测配置
///
/// 读取或解析失败只记录日志并返回 `None`，不向调用方报错。
pub fn load_autograding_config(
    course: &dyn CoursePathProvider,
    files: &dyn FileReader,
    gradeable_id: &str,
) -> Option<AutogradingConfig> {
    let path = course.autograding_config_path(gradeable_id);

    let document = match files.read_json(&path) {
        Ok(document) => document,
        Err(e) => {
            warn!(
                "Autograding config for {} unavailable at {}: {}",
                gradeable_id,
                path.display(),
                e
            );
            return None;
        }
    };

    match AutogradingConfig::from_document(document) {
        Some(config) => {
            debug!("Loaded autograding config for {}", gradeable_id);
            Some(config)
        }
        None => {
            warn!(
                "Autograding config for {} at {} is not a JSON object",
                gradeable_id,
                path.display()
            );
            None
        }
    }
}
