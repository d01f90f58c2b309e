pub mod app;
pub mod domain;
pub mod infra;
pub mod task;
pub mod types;
