use super::model::{EnrichedArticle, RawArticle};
use crate::domain::catalog::DocsCatalog;
use crate::types::{ExportError, ExportResult};
use tracing::debug;

/// 記事にコレクションとカテゴリ名を結合する
///
/// ## 動作
/// - `collectionId` からコレクションを引く（無ければ `UnknownCollection`）
/// - カテゴリIDごとにスラッグと名前を引き、元の順序で並べる
///   （解決できないIDは `UnknownCategory`）
/// - 記事がタグを持たない場合は `default_tags` を付与する
///
/// カタログは呼び出し前に投入済みである必要がある。
pub fn assemble_article(
    raw: RawArticle,
    catalog: &DocsCatalog,
    default_tags: &[String],
) -> ExportResult<EnrichedArticle> {
    let collection = catalog
        .collection(&raw.collection_id)
        .cloned()
        .ok_or_else(|| ExportError::unknown_collection(&raw.collection_id))?;

    let mut categories = Vec::with_capacity(raw.categories.len());
    let mut categories_by_name = Vec::with_capacity(raw.categories.len());
    for category_id in &raw.categories {
        let (Some(slug), Some(name)) = (
            catalog.category_slug(category_id),
            catalog.category_name(category_id),
        ) else {
            return Err(ExportError::unknown_category(category_id, &raw.slug));
        };
        categories.push(slug.to_string());
        categories_by_name.push(name.to_string());
    }

    let keywords = match raw.keywords {
        Some(keywords) => keywords,
        None => {
            debug!("キーワードがありません: {}", raw.public_url);
            Vec::new()
        }
    };
    let tags = raw.tags.unwrap_or_else(|| default_tags.to_vec());

    Ok(EnrichedArticle {
        id: raw.id,
        slug: raw.slug,
        name: raw.name,
        text: raw.text,
        public_url: raw.public_url,
        last_published_at: raw.last_published_at,
        keywords,
        collection,
        categories,
        categories_by_name,
        tags,
    })
}
