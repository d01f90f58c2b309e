use crate::types::{ConfigError, ConfigResult};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://docsapi.helpscout.net";
pub const DEFAULT_OUTPUT_DIR: &str = "articles";
pub const DEFAULT_ARTICLE_STATUS: &str = "published";
pub const DEFAULT_TAG: &str = "docs";

/// 実行時設定
///
/// 起動時に一度だけ環境変数（.envファイルを含む）から読み込む。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Basic認証のユーザー名として使うAPIキー
    pub api_key: String,
    /// エクスポート対象のコレクションID
    pub collection_id: String,
    /// 内部リンク判定に使うドキュメントサイトのホスト（host[:port]）
    pub docs_host: String,
    pub api_base_url: String,
    pub output_dir: PathBuf,
    pub article_status: String,
    /// 記事がタグを持たない場合に付与するタグ
    pub default_tags: Vec<String>,
    pub category_index_weight: u32,
    pub category_index_tags: Vec<String>,
}

impl AppConfig {
    /// 必須項目だけを指定し、残りは既定値で設定を作成
    pub fn new<K, C, H>(api_key: K, collection_id: C, docs_host: H) -> Self
    where
        K: Into<String>,
        C: Into<String>,
        H: AsRef<str>,
    {
        Self {
            api_key: api_key.into(),
            collection_id: collection_id.into(),
            docs_host: normalize_docs_host(docs_host.as_ref()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            article_status: DEFAULT_ARTICLE_STATUS.to_string(),
            default_tags: vec![DEFAULT_TAG.to_string()],
            category_index_weight: 1,
            category_index_tags: vec![DEFAULT_TAG.to_string()],
        }
    }

    pub fn with_api_base_url<U: Into<String>>(mut self, url: U) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// プロセスの環境変数から設定を読み込む
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の検索関数から設定を読み込む（テストで環境変数を汚さないため）
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> ConfigResult<String> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::missing_env_var(name))
        };
        let optional = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = Self::new(
            required("HELPSCOUT_API_KEY")?,
            required("COLLECTION_ID")?,
            required("COLLECTION_URL_BASE")?,
        );
        if config.docs_host.is_empty() {
            return Err(ConfigError::invalid_value(
                "COLLECTION_URL_BASE",
                "ホスト名を取得できません",
            ));
        }

        if let Some(base) = optional("HELPSCOUT_API_BASE") {
            config = config.with_api_base_url(base);
        }
        if let Some(dir) = optional("EXPORT_OUTPUT_DIR") {
            config = config.with_output_dir(dir);
        }
        if let Some(status) = optional("ARTICLE_STATUS") {
            config.article_status = status;
        }
        if let Some(tags) = optional("DEFAULT_TAGS") {
            config.default_tags = split_list(&tags);
        }
        if let Some(weight) = optional("CATEGORY_INDEX_WEIGHT") {
            config.category_index_weight = weight.parse().map_err(|_| {
                ConfigError::invalid_value("CATEGORY_INDEX_WEIGHT", format!("数値ではありません: {}", weight))
            })?;
        }
        if let Some(tags) = optional("CATEGORY_INDEX_TAGS") {
            config.category_index_tags = split_list(&tags);
        }

        Ok(config)
    }
}

/// `https://docs.example.com/` のようなURLが渡された場合もホスト部分だけにする
fn normalize_docs_host(value: &str) -> String {
    let value = value.trim();
    if value.contains("://") {
        if let Ok(url) = url::Url::parse(value) {
            return match (url.host_str(), url.port()) {
                (Some(host), Some(port)) => format!("{}:{}", host, port),
                (Some(host), None) => host.to_string(),
                (None, _) => String::new(),
            };
        }
    }
    value.trim_end_matches('/').to_ascii_lowercase()
}

/// カンマ区切りのリストを分割（空要素は除外）
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
