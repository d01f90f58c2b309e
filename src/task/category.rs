use crate::domain::content::{to_front_matter_block, CategoryIndexFrontMatter};
use crate::infra::config::AppConfig;
use crate::infra::storage::file::{ensure_dir, write_text_file};
use crate::types::ExportResult;
use std::path::{Path, PathBuf};
use tracing::info;

/// ページバンドルの一覧ページ・記事ページのファイル名
pub const INDEX_FILE_NAME: &str = "_index.md";

/// カテゴリのディレクトリ `<出力先>/<カテゴリ名>`
pub fn category_dir(output_dir: &Path, category_name: &str) -> PathBuf {
    output_dir.join(category_name)
}

/// カテゴリのディレクトリと一覧ページを用意する
///
/// 一覧ページが既にある場合は内容に触れない。新規作成した場合はtrueを返す。
pub fn ensure_category_index(
    config: &AppConfig,
    category_slug: &str,
    category_name: &str,
) -> ExportResult<bool> {
    let dir = category_dir(&config.output_dir, category_name);
    ensure_dir(&dir)?;

    let index_path = dir.join(INDEX_FILE_NAME);
    if index_path.exists() {
        return Ok(false);
    }

    let metadata = CategoryIndexFrontMatter::new(
        category_name,
        config.category_index_weight,
        &config.category_index_tags,
    );
    let block = to_front_matter_block(&metadata, category_name)?;
    write_text_file(&index_path, &block)?;
    info!(
        "カテゴリ一覧ページを作成: {} ({})",
        index_path.display(),
        category_slug
    );
    Ok(true)
}
