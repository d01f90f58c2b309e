pub mod model;
pub mod service;

// 公開APIの再エクスポート

// model.rsから
pub use model::{ArticleSummary, EnrichedArticle, RawArticle};

// service.rsから
pub use service::assemble_article;
