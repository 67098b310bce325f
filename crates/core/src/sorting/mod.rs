pub mod failure_log;
pub mod infrastructure;
pub mod outcome;
pub mod placement;
pub mod report;
pub mod sort_executor;
pub mod sort_images_use_case;
pub mod sort_logger;
