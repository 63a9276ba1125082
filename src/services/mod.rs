pub mod gradeables;
pub mod grading_order;

pub use grading_order::GradingOrder;
