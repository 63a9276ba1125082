pub mod date;
pub mod sanitize;
pub mod validate;

pub use date::{CourseTimezone, format_course_date, parse_course_date, parse_timezone};
pub use sanitize::sanitize_rich_text;
