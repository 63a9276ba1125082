//! HWSystem Grading - 作业配置与评分顺序核心
//!
//! 负责作业日期的整体校验、分数取整，以及按分组划分的评分顺序与导航。
//!
//! # 架构
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `services`: 业务逻辑层（作业配置、评分顺序）
//! - `storage`: 外部协作者接口及其文件/内存实现
//! - `utils`: 工具函数

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;
