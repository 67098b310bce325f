pub mod sequential_sort_executor;
pub mod threaded_sort_executor;
