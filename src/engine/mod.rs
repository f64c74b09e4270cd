pub mod grader;
pub mod selector;
pub mod stats;
