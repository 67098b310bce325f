pub mod domain;
pub mod fs_scan;
pub mod infrastructure;
