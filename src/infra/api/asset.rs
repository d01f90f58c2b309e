use crate::types::{AssetError, AssetResult};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Mutex;

/// 記事に埋め込まれた画像を取得するトレイト
///
/// 画像はAPIとは別ホストにあることが多いため、認証情報は付与しない。
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> AssetResult<Vec<u8>>;
}

/// `reqwest` を使用した本番用の画像取得実装
pub struct ReqwestAssetFetcher {
    client: Client,
}

impl ReqwestAssetFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for ReqwestAssetFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetFetcher for ReqwestAssetFetcher {
    async fn fetch_bytes(&self, url: &str) -> AssetResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AssetError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::status(url, status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AssetError::transport(url, e))?;
        Ok(bytes.to_vec())
    }
}

/// テスト用のモック画像取得
///
/// 登録済みのURLだけ内容を返し、それ以外は404を返す。
#[derive(Default)]
pub struct MockAssetFetcher {
    assets: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl MockAssetFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, url: &str, bytes: &[u8]) -> Self {
        self.assets.insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AssetFetcher for MockAssetFetcher {
    async fn fetch_bytes(&self, url: &str) -> AssetResult<Vec<u8>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.assets
            .get(url)
            .cloned()
            .ok_or_else(|| AssetError::status(url, 404))
    }
}
