use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub course: CourseConfig,
    pub grading: GradingConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 课程目录配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseConfig {
    pub path: String,     // 课程根目录
    pub timezone: String, // 课程时区，如 "America/New_York"、"+08:00" 或 "UTC"
}

/// 评分顺序配置（命令行工具使用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingConfig {
    pub gradeable_id: String,
    pub grader_id: String,
    pub all_sections: bool,
}
