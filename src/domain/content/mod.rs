//! 記事本文の変換
//!
//! - `link`: hrefの分類とスラッグ相対への書き換え
//! - `rewrite`: 本文DOMのリンク・画像参照の書き換え
//! - `markdown`: HTMLからMarkdownへの変換（失敗時のフォールバック付き）
//! - `front_matter`: フロントマターの組み立てと出力

pub mod front_matter;
pub mod link;
pub mod markdown;
pub mod rewrite;

pub use front_matter::{
    build_front_matter, compose_tags, render_document, to_front_matter_block, ArticleFrontMatter,
    CategoryIndexFrontMatter,
};
pub use link::{classify_link, LinkKind, LinkRewrite};
pub use markdown::{convert_with_fallback, Html2MdConverter, MarkdownBody, MarkdownConverter};
pub use rewrite::{
    absolute_image_url, collect_image_sources, local_image_name, rewrite_document,
    unique_image_name, RewrittenContent,
};
