pub mod asset;
pub mod docs;
pub mod http;
