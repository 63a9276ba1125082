pub mod components;
pub mod gradeables;
pub mod grading;

pub use components::entities::{Component, GradeableComponent};
pub use gradeables::autograding::AutogradingConfig;
pub use gradeables::entities::{DateRole, Gradeable, GradeableDates, GradeableType};
pub use gradeables::requests::{DateInput, GradeableDatesRequest, IntegerInput, NewGradeable};
pub use grading::entities::{GradingSection, SectionKey, Submitter, Team, User};
