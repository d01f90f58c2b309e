use crate::{
    domain::{article::assemble_article, content::MarkdownConverter},
    infra::{
        api::{asset::AssetFetcher, docs::DocsApiClient, http::HttpClient},
        config::AppConfig,
        storage::file::{ensure_dir, write_json_pretty},
    },
    task::article::{write_article, ArticleOutcome},
    types::{ExportError, ExportResult, ExportSummary},
};
use tracing::{error, info, warn};

pub const COLLECTIONS_SNAPSHOT: &str = "collections.json";
pub const CATEGORIES_SNAPSHOT: &str = "categories.json";

/// エクスポートワークフローのメイン実行関数（依存性を注入）
///
/// 1. 対象コレクションの全記事を書き出す
/// 2. コレクション・カテゴリのスナップショットを書き出す
pub async fn execute_export_workflow<H, F, C>(
    client: &mut DocsApiClient<H>,
    fetcher: &F,
    converter: &C,
    config: &AppConfig,
) -> ExportResult<ExportSummary>
where
    H: HttpClient,
    F: AssetFetcher,
    C: MarkdownConverter,
{
    info!("=== エクスポート開始（コレクション: {}）===", config.collection_id);

    let summary = export_all(client, fetcher, converter, config).await?;
    export_metadata_snapshots(client, config).await?;

    info!("=== エクスポート完了 ===");
    Ok(summary)
}

/// 対象コレクションの記事を一覧・取得・結合・書き出しの順に処理する
///
/// 記事単位のエラーはログに残して次の記事へ進む。
/// 接続・APIのエラーはその場で中断する。
pub async fn export_all<H, F, C>(
    client: &mut DocsApiClient<H>,
    fetcher: &F,
    converter: &C,
    config: &AppConfig,
) -> ExportResult<ExportSummary>
where
    H: HttpClient,
    F: AssetFetcher,
    C: MarkdownConverter,
{
    ensure_dir(&config.output_dir)?;

    if !client
        .list_collections()
        .await?
        .contains_key(&config.collection_id)
    {
        return Err(ExportError::unknown_collection(&config.collection_id));
    }
    client.list_categories().await?;

    let summaries = client
        .list_articles(&config.collection_id, &config.article_status)
        .await?;
    info!("対象記事数: {}件", summaries.len());

    let mut summary = ExportSummary::empty();
    for article_summary in summaries {
        info!("記事処理中: {} ({})", article_summary.name, article_summary.id);

        match export_article(client, &article_summary.id, fetcher, converter, config).await {
            Ok(outcome) => {
                info!("  書き出し完了: {}", outcome.path.display());
                if outcome.fell_back {
                    warn!("  リンク・画像の書き換えは反映されていません: {}", outcome.path.display());
                }
                summary.written += 1;
                summary.images_saved += outcome.images_saved;
                summary.images_failed += outcome.images_failed;
            }
            Err(e) if e.is_fatal() => {
                error!("  接続エラーのため中断します: {}", e);
                return Err(e);
            }
            Err(e) => {
                error!("  記事をスキップ: {} - {}", article_summary.id, e);
                summary.failed += 1;
            }
        }
    }

    info!("{}", summary);
    Ok(summary)
}

/// 1記事を取得・結合して書き出す
async fn export_article<H, F, C>(
    client: &DocsApiClient<H>,
    article_id: &str,
    fetcher: &F,
    converter: &C,
    config: &AppConfig,
) -> ExportResult<ArticleOutcome>
where
    H: HttpClient,
    F: AssetFetcher,
    C: MarkdownConverter,
{
    let raw = client.get_article(article_id).await?;
    let article = assemble_article(raw, client.catalog(), &config.default_tags)?;
    write_article(&article, fetcher, converter, config).await
}

/// コレクション・カテゴリのキャッシュを監査用にJSONで書き出す
pub async fn export_metadata_snapshots<H: HttpClient>(
    client: &mut DocsApiClient<H>,
    config: &AppConfig,
) -> ExportResult<()> {
    ensure_dir(&config.output_dir)?;

    let collections_path = config.output_dir.join(COLLECTIONS_SNAPSHOT);
    write_json_pretty(&collections_path, client.list_collections().await?)?;

    let categories_path = config.output_dir.join(CATEGORIES_SNAPSHOT);
    write_json_pretty(&categories_path, client.list_categories().await?)?;

    info!(
        "スナップショットを書き出し: {}, {}",
        collections_path.display(),
        categories_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::Html2MdConverter;
    use crate::infra::api::asset::MockAssetFetcher;
    use crate::infra::api::http::{request_key, MockHttpClient};
    use crate::types::ApiError;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    const BASE: &str = "https://api.test";

    fn articles_key() -> String {
        request_key(
            &format!("{}/v1/collections/col1/articles", BASE),
            &[
                ("pageSize", "100".to_string()),
                ("status", "published".to_string()),
                ("page", "1".to_string()),
            ],
        )
    }

    fn article_json(id: &str, slug: &str, categories: &[&str], published: &str) -> String {
        json!({"article": {
            "id": id, "slug": slug, "name": slug, "text": format!("<p>{}</p>", slug),
            "collectionId": "col1", "categories": categories,
            "publicUrl": format!("https://docs.example.com/article/1-{}", slug),
            "lastPublishedAt": published
        }})
        .to_string()
    }

    fn base_mock(article_ids: &[&str]) -> MockHttpClient {
        let items: Vec<_> = article_ids.iter().map(|id| json!({"id": id, "name": id})).collect();
        MockHttpClient::new()
            .with_response(
                &format!("{}/v1/collections", BASE),
                &json!({"collections": {"items": [{"id": "col1", "slug": "help", "name": "Help"}]}})
                    .to_string(),
            )
            .with_response(
                &format!("{}/v1/collections/col1/categories", BASE),
                &json!({"categories": {"items": [
                    {"id": "c1", "slug": "billing", "name": "Billing", "collectionId": "col1"},
                    {"id": "c2", "slug": "general", "name": "General", "collectionId": "col1"}
                ]}})
                .to_string(),
            )
            .with_response(
                &articles_key(),
                &json!({"articles": {"page": 1, "pages": 1, "items": items}}).to_string(),
            )
    }

    fn config_in(dir: &Path) -> AppConfig {
        AppConfig::new("key", "col1", "docs.example.com")
            .with_api_base_url(BASE)
            .with_output_dir(dir)
    }

    #[tokio::test]
    async fn test_bad_article_does_not_abort_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let mock = base_mock(&["a1", "a2", "a3"])
            .with_response(
                &format!("{}/v1/articles/a1", BASE),
                &article_json("a1", "first", &["c1"], "2021-03-10T15:43:15Z"),
            )
            .with_response(
                &format!("{}/v1/articles/a2", BASE),
                &article_json("a2", "broken-date", &["c1"], "yesterday"),
            )
            .with_response(
                &format!("{}/v1/articles/a3", BASE),
                &article_json("a3", "orphan", &["unknown"], "2021-03-10T15:43:15Z"),
            );
        let mut client = DocsApiClient::new(mock, BASE);

        let summary = execute_export_workflow(
            &mut client,
            &MockAssetFetcher::new(),
            &Html2MdConverter,
            &config,
        )
        .await
        .unwrap();

        assert_eq!(summary.written, 1);
        assert_eq!(summary.failed, 2);
        assert!(tmp.path().join("Billing/first/_index.md").exists());
        assert!(!tmp.path().join("Billing/broken-date/_index.md").exists());
        assert!(tmp.path().join(COLLECTIONS_SNAPSHOT).exists());
        assert!(tmp.path().join(CATEGORIES_SNAPSHOT).exists());
    }

    #[tokio::test]
    async fn test_malformed_article_is_isolated() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let broken = json!({"article": {
            "id": "a2", "slug": "broken", "name": "Broken", "text": null,
            "collectionId": "col1", "categories": ["c1"],
            "lastPublishedAt": "2021-03-10T15:43:15Z"
        }})
        .to_string();
        let mock = base_mock(&["a1", "a2", "a3"])
            .with_response(
                &format!("{}/v1/articles/a1", BASE),
                &article_json("a1", "first", &["c1"], "2021-03-10T15:43:15Z"),
            )
            .with_response(&format!("{}/v1/articles/a2", BASE), &broken)
            .with_response(
                &format!("{}/v1/articles/a3", BASE),
                &article_json("a3", "third", &["c1"], "2021-03-10T15:43:15Z"),
            );
        let mut client = DocsApiClient::new(mock, BASE);

        let summary =
            export_all(&mut client, &MockAssetFetcher::new(), &Html2MdConverter, &config)
                .await
                .unwrap();

        assert_eq!(summary.written, 2);
        assert_eq!(summary.failed, 1);
        assert!(tmp.path().join("Billing/first/_index.md").exists());
        assert!(
            tmp.path().join("Billing/third/_index.md").exists(),
            "不正な記事の後も処理を続ける"
        );
    }

    #[tokio::test]
    async fn test_api_error_aborts_run() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let mock = base_mock(&["a1", "a2"])
            .with_status(&format!("{}/v1/articles/a1", BASE), 500, "")
            .with_response(
                &format!("{}/v1/articles/a2", BASE),
                &article_json("a2", "second", &["c1"], "2021-03-10T15:43:15Z"),
            );
        let mut client = DocsApiClient::new(mock, BASE);

        let result =
            export_all(&mut client, &MockAssetFetcher::new(), &Html2MdConverter, &config).await;

        assert!(matches!(
            result,
            Err(ExportError::Api(ApiError::Status { status: 500, .. }))
        ));
        assert!(
            !client
                .http()
                .requests()
                .iter()
                .any(|r| r.ends_with("/v1/articles/a2")),
            "中断後の記事は取得しない"
        );
    }

    #[tokio::test]
    async fn test_unknown_target_collection() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_in(tmp.path());
        config.collection_id = "nope".to_string();
        let mut client = DocsApiClient::new(base_mock(&[]), BASE);

        let result =
            export_all(&mut client, &MockAssetFetcher::new(), &Html2MdConverter, &config).await;
        assert!(matches!(result, Err(ExportError::UnknownCollection { .. })));
    }

    #[tokio::test]
    async fn test_snapshots_written_from_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let mut client = DocsApiClient::new(base_mock(&[]), BASE);

        export_metadata_snapshots(&mut client, &config).await.unwrap();
        export_metadata_snapshots(&mut client, &config).await.unwrap();

        let categories: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(tmp.path().join(CATEGORIES_SNAPSHOT)).unwrap(),
        )
        .unwrap();
        assert_eq!(categories["c1"]["slug"], "billing");
        assert_eq!(categories["c2"]["collectionId"], "col1");
        // collections 1回 + categories 1回（2回目はキャッシュ）
        assert_eq!(client.http().request_count(), 2);
    }
}
