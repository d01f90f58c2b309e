pub mod api;
pub mod config;
pub mod html;
pub mod parser;
pub mod storage;
