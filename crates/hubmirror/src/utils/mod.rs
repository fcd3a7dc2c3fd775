pub mod task_pool;
pub mod ui;
