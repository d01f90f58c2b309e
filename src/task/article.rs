use super::category::{category_dir, ensure_category_index, INDEX_FILE_NAME};
use crate::domain::article::EnrichedArticle;
use crate::domain::content::{
    absolute_image_url, build_front_matter, collect_image_sources, convert_with_fallback,
    local_image_name, render_document, rewrite_document, to_front_matter_block,
    unique_image_name, LinkKind, MarkdownBody, MarkdownConverter,
};
use crate::infra::api::asset::AssetFetcher;
use crate::infra::config::AppConfig;
use crate::infra::storage::file::{ensure_dir, write_bytes, write_text_file};
use crate::types::{AssetError, AssetResult, ExportError, ExportResult};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 1記事の書き出し結果
#[derive(Debug, Clone)]
pub struct ArticleOutcome {
    pub path: PathBuf,
    pub images_saved: usize,
    pub images_failed: usize,
    /// 書き換え前の本文でMarkdown化した場合にtrue
    pub fell_back: bool,
}

/// ローカルに保存した画像（元のsrc -> ファイル名）
#[derive(Debug, Default)]
pub struct LocalizedImages {
    pub localized: HashMap<String, String>,
    pub failed: usize,
}

/// 記事のディレクトリ `<出力先>/<主カテゴリ名>/<スラッグ>`
pub fn article_dir(output_dir: &Path, primary_category_name: &str, slug: &str) -> PathBuf {
    category_dir(output_dir, primary_category_name).join(slug)
}

/// 記事を主カテゴリのディレクトリ配下に書き出す
///
/// ## 動作
/// - 主カテゴリ（先頭のカテゴリ）のディレクトリと一覧ページを用意
/// - 本文の画像を記事ディレクトリにダウンロード
/// - リンク・画像参照を書き換えてMarkdown化し、フロントマターを付けて `_index.md` に保存
///
/// 既存の記事ファイルは常に上書きする。
pub async fn write_article<F, C>(
    article: &EnrichedArticle,
    fetcher: &F,
    converter: &C,
    config: &AppConfig,
) -> ExportResult<ArticleOutcome>
where
    F: AssetFetcher,
    C: MarkdownConverter,
{
    let (Some(primary_slug), Some(primary_name)) = (
        article.primary_category_slug(),
        article.primary_category_name(),
    ) else {
        return Err(ExportError::no_primary_category(&article.slug));
    };

    // ディレクトリ作成や画像取得の前に日付の不正を検出する
    let front_matter = build_front_matter(article)?;
    let block = to_front_matter_block(&front_matter, &article.slug)?;

    ensure_category_index(config, primary_slug, primary_name)?;
    let dir = article_dir(&config.output_dir, primary_name, &article.slug);
    ensure_dir(&dir)?;

    let images = localize_images(&article.text, &dir, fetcher).await;
    let body = render_body(article, &images.localized, converter, &config.docs_host)?;

    let path = dir.join(INDEX_FILE_NAME);
    write_text_file(&path, &render_document(&block, &body.markdown))?;

    Ok(ArticleOutcome {
        path,
        images_saved: images.localized.len(),
        images_failed: images.failed,
        fell_back: body.fell_back,
    })
}

/// 本文の画像を記事ディレクトリに保存する
///
/// 失敗した画像は警告を出して数えるだけで、記事の処理は続ける。
pub async fn localize_images<F: AssetFetcher>(
    html: &str,
    article_dir: &Path,
    fetcher: &F,
) -> LocalizedImages {
    let mut images = LocalizedImages::default();
    let mut taken: HashSet<String> = HashSet::new();

    for src in collect_image_sources(html) {
        match save_image(&src, article_dir, &taken, fetcher).await {
            Ok(name) => {
                info!("画像を保存: {}", article_dir.join(&name).display());
                taken.insert(name.clone());
                images.localized.insert(src, name);
            }
            Err(e) => {
                warn!("画像を保存できませんでした（元のURLのまま残します）: {}", e);
                images.failed += 1;
            }
        }
    }

    images
}

async fn save_image<F: AssetFetcher>(
    src: &str,
    dir: &Path,
    taken: &HashSet<String>,
    fetcher: &F,
) -> AssetResult<String> {
    let url = absolute_image_url(src).ok_or_else(|| AssetError::invalid_url(src))?;
    let original = local_image_name(src).ok_or_else(|| AssetError::invalid_url(src))?;
    let name = unique_image_name(&original, taken);
    if name != original {
        warn!("画像のファイル名が重複したため変更: {} -> {} ({})", original, name, src);
    }

    let bytes = fetcher.fetch_bytes(url.as_str()).await?;

    let path = dir.join(&name);
    write_bytes(&path, &bytes)
        .map_err(|e| AssetError::file_system(path.display().to_string(), e))?;
    Ok(name)
}

/// リンク・画像を書き換えた本文をMarkdownにする
fn render_body<C: MarkdownConverter>(
    article: &EnrichedArticle,
    localized: &HashMap<String, String>,
    converter: &C,
    docs_host: &str,
) -> ExportResult<MarkdownBody> {
    let rewritten = match rewrite_document(&article.text, docs_host, localized) {
        Ok(content) => content,
        Err(e) => {
            warn!("本文の書き換えに失敗したため元の本文を使います: {} ({})", article.slug, e);
            let markdown = converter.convert(&article.text)?;
            return Ok(MarkdownBody {
                markdown,
                fell_back: true,
            });
        }
    };

    debug!(
        "リンク集計 {}: category={} article={} unknown={} relative={} anchor={} external={}",
        article.slug,
        rewritten.count(LinkKind::Category),
        rewritten.count(LinkKind::Article),
        rewritten.count(LinkKind::UnknownInternal),
        rewritten.count(LinkKind::RootRelative),
        rewritten.count(LinkKind::Anchor),
        rewritten.count(LinkKind::External),
    );
    for link in rewritten.root_relative_links() {
        warn!("要確認の相対リンク ({}): {}", article.slug, link.original);
    }

    let body = convert_with_fallback(converter, &rewritten.html, &article.text, &article.slug)?;
    Ok(body)
}
