use crate::types::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Mutex;

/// HTTPクライアントの抽象化トレイト
///
/// このトレイトは、実際のHTTP通信とモック実装の両方を
/// 統一的に扱えるようにするためのインターフェースです。
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// 指定されたURLにクエリ付きでGETし、本文をテキストで返す
    ///
    /// # Arguments
    /// * `url` - 取得対象のURL
    /// * `query` - クエリパラメータ（指定順に付与される）
    ///
    /// 2xx以外のステータスは `ApiError::Status` になる。
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> ApiResult<String>;
}

/// `reqwest` を使用した本番用のHTTPクライアント実装
///
/// APIキーをユーザー名としたBasic認証を全リクエストに付与する。
pub struct ReqwestHttpClient {
    client: Client,
    api_key: String,
}

/// Basic認証のパスワード欄。APIはキーのみで認証するため固定値を送る
const BASIC_AUTH_PASSWORD: &str = "X";

impl ReqwestHttpClient {
    /// 新しいHTTPクライアントを作成
    pub fn new<K: Into<String>>(api_key: K) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> ApiResult<String> {
        let response = self
            .client
            .get(url)
            .query(query)
            .basic_auth(&self.api_key, Some(BASIC_AUTH_PASSWORD))
            .send()
            .await
            .map_err(|e| ApiError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::status(url, status.as_u16()));
        }

        response.text().await.map_err(|e| ApiError::transport(url, e))
    }
}

/// クエリを含めたリクエストの識別キーを作る
pub fn request_key(url: &str, query: &[(&str, String)]) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let params: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("{}?{}", url, params.join("&"))
}

/// テスト用のモックHTTPクライアント
///
/// この実装はテスト時にDIされ、実際のHTTPリクエストを行わずに
/// `request_key` ごとに定義済みのレスポンスを返します。
/// 未登録のリクエストは404として扱います。
#[derive(Default)]
pub struct MockHttpClient {
    responses: HashMap<String, (u16, String)>,
    requests: Mutex<Vec<String>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 成功レスポンスを登録
    pub fn with_response(self, key: &str, body: &str) -> Self {
        self.with_status(key, 200, body)
    }

    /// ステータス付きでレスポンスを登録
    pub fn with_status(mut self, key: &str, status: u16, body: &str) -> Self {
        self.responses
            .insert(key.to_string(), (status, body.to_string()));
        self
    }

    /// これまでに受け付けたリクエストのキー一覧
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> ApiResult<String> {
        let key = request_key(url, query);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(key.clone());
        }

        match self.responses.get(&key) {
            Some((status, body)) if (200..300).contains(status) => Ok(body.clone()),
            Some((status, _)) => Err(ApiError::status(url, *status)),
            None => Err(ApiError::status(url, 404)),
        }
    }
}
