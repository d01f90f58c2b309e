//! ドキュメントAPI モックサーバー
//!
//! httpmockでAPIと画像配信をまとめてモックし、
//! 統合テストで外部通信を完全に遮断したテスト環境を提供します。

#![allow(dead_code)]

use helpdocs_export::infra::config::AppConfig;
use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::{json, Value};
use std::path::Path;

pub const API_KEY: &str = "test-key";
/// `test-key:X` のBasic認証ヘッダー
pub const AUTH_HEADER: &str = "Basic dGVzdC1rZXk6WA==";
pub const DOCS_HOST: &str = "docs.example.com";
pub const COLLECTION_ID: &str = "col1";

/// ドキュメントAPIのモックサーバー
pub struct DocsApiMockServer {
    server: MockServer,
}

impl DocsApiMockServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start_async().await,
        }
    }

    pub fn base_url(&self) -> String {
        self.server.base_url()
    }

    pub fn url(&self, path: &str) -> String {
        self.server.url(path)
    }

    /// モックサーバーに向けた設定を作成
    pub fn config(&self, output_dir: &Path) -> AppConfig {
        AppConfig::new(API_KEY, COLLECTION_ID, DOCS_HOST)
            .with_api_base_url(self.base_url())
            .with_output_dir(output_dir)
    }

    /// コレクション一覧をモック
    pub async fn mock_collections(&self, collections: Value) -> Mock<'_> {
        self.server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/collections")
                    .header("authorization", AUTH_HEADER);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"collections": {"page": 1, "pages": 1, "items": collections}}));
            })
            .await
    }

    /// コレクションのカテゴリ一覧をモック
    pub async fn mock_categories(&self, collection_id: &str, categories: Value) -> Mock<'_> {
        let path = format!("/v1/collections/{}/categories", collection_id);
        self.server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(path)
                    .header("authorization", AUTH_HEADER);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"categories": {"page": 1, "pages": 1, "items": categories}}));
            })
            .await
    }

    /// 記事一覧の指定ページをモック
    pub async fn mock_article_page(
        &self,
        collection_id: &str,
        page: u32,
        pages: u32,
        ids: &[&str],
    ) -> Mock<'_> {
        let path = format!("/v1/collections/{}/articles", collection_id);
        let items: Vec<Value> = ids.iter().map(|id| json!({"id": id, "name": id})).collect();
        self.server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(path)
                    .query_param("status", "published")
                    .query_param("pageSize", "100")
                    .query_param("page", page.to_string())
                    .header("authorization", AUTH_HEADER);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"articles": {
                        "page": page, "pages": pages, "count": ids.len(), "items": items
                    }}));
            })
            .await
    }

    /// 記事詳細をモック
    pub async fn mock_article(&self, article: Value) -> Mock<'_> {
        let path = format!("/v1/articles/{}", article["id"].as_str().unwrap_or_default());
        self.server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(path)
                    .header("authorization", AUTH_HEADER);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"article": article}));
            })
            .await
    }

    /// 記事本体を含まない記事詳細レスポンスをモック
    pub async fn mock_article_missing(&self, id: &str) -> Mock<'_> {
        let path = format!("/v1/articles/{}", id);
        self.server
            .mock_async(|when, then| {
                when.method(GET).path(path);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"error": "not published"}));
            })
            .await
    }

    /// 任意のパスのエラーステータスをモック
    pub async fn mock_error(&self, path: &str, status: u16) -> Mock<'_> {
        self.server
            .mock_async(|when, then| {
                when.method(GET).path(path);
                then.status(status).body("error");
            })
            .await
    }

    /// 画像の配信をモック
    pub async fn mock_image(&self, path: &str, bytes: &[u8]) -> Mock<'_> {
        self.server
            .mock_async(|when, then| {
                when.method(GET).path(path);
                then.status(200)
                    .header("content-type", "image/png")
                    .body(bytes);
            })
            .await
    }
}

/// 記事詳細のJSONを作成
pub fn article_json(id: &str, slug: &str, name: &str, categories: &[&str], text: &str) -> Value {
    json!({
        "id": id,
        "number": 1,
        "collectionId": COLLECTION_ID,
        "status": "published",
        "slug": slug,
        "name": name,
        "text": text,
        "categories": categories,
        "keywords": ["faq"],
        "publicUrl": format!("https://{}/article/{}-{}", DOCS_HOST, id.trim_start_matches('a'), slug),
        "lastPublishedAt": "2021-03-10T15:43:15Z"
    })
}
