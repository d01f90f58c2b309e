use anyhow::Context;
use helpdocs_export::app::workflow::execute_export_workflow;
use helpdocs_export::domain::content::Html2MdConverter;
use helpdocs_export::infra::api::asset::ReqwestAssetFetcher;
use helpdocs_export::infra::api::docs::DocsApiClient;
use helpdocs_export::infra::api::http::ReqwestHttpClient;
use helpdocs_export::infra::config::AppConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 環境変数を読み込み（.envファイルがあれば使用）
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("設定の読み込みに失敗しました")?;
    info!(
        "出力先: {} / ドキュメントホスト: {}",
        config.output_dir.display(),
        config.docs_host
    );

    let http = ReqwestHttpClient::new(config.api_key.clone());
    let mut client = DocsApiClient::new(http, config.api_base_url.clone());
    let fetcher = ReqwestAssetFetcher::new();

    let summary = execute_export_workflow(&mut client, &fetcher, &Html2MdConverter, &config)
        .await
        .context("エクスポートを中断しました")?;

    info!("{}", summary);
    Ok(())
}
