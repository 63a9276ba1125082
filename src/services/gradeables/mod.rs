//! 作业配置行为
//!
//! 各文件分别为 `Gradeable` 实现一组操作：构造、普通字段设置、
//! 日期整体提交、分数取整、自动评测配置加载与日期状态查询。

pub mod autograding;
pub mod create;
pub mod dates;
pub mod rounding;
pub mod setters;
pub mod status;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, FixedOffset};

    use crate::models::{Gradeable, GradeableType, NewGradeable};
    use crate::storage::MemoryCourse;

    pub fn electronic(id: &str) -> NewGradeable {
        NewGradeable::new(id, "Homework", GradeableType::ElectronicFile)
    }

    pub fn build(request: NewGradeable) -> Gradeable {
        let course = MemoryCourse::default();
        Gradeable::create(request, &course, &course).unwrap()
    }

    pub fn at(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).unwrap()
    }
}
