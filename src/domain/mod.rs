//! ドメイン層
//!
//! - `catalog`: コレクション・カテゴリとそのキャッシュ
//! - `article`: 記事のモデルと結合処理
//! - `content`: 本文の書き換え・Markdown化・フロントマター

pub mod article;
pub mod catalog;
pub mod content;
