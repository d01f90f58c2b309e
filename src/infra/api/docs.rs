//! ドキュメントAPIクライアント
//!
//! コレクション・カテゴリはクライアントが保持する `DocsCatalog` に
//! 一度だけ取得して保持し、記事一覧はページングしながら取得します。

use super::http::HttpClient;
use crate::domain::article::{ArticleSummary, RawArticle};
use crate::domain::catalog::{Category, Collection, DocsCatalog};
use crate::types::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, error, info};

/// 記事一覧の1ページあたりの件数
pub const ARTICLE_PAGE_SIZE: u32 = 100;

/// APIのページング付きリスト
#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default = "first_page")]
    pages: u32,
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct CollectionsEnvelope {
    collections: Page<Collection>,
}

#[derive(Debug, Deserialize)]
struct CategoriesEnvelope {
    categories: Page<Category>,
}

#[derive(Debug, Deserialize)]
struct ArticlesEnvelope {
    articles: Page<ArticleSummary>,
}

#[derive(Debug, Deserialize)]
struct ArticleEnvelope {
    article: Option<RawArticle>,
}

pub struct DocsApiClient<H: HttpClient> {
    http: H,
    base_url: String,
    catalog: DocsCatalog,
}

impl<H: HttpClient> DocsApiClient<H> {
    pub fn new<U: Into<String>>(http: H, base_url: U) -> Self {
        Self::with_catalog(http, base_url, DocsCatalog::new())
    }

    /// 投入済みのキャッシュを持たせて作成（テスト用）
    pub fn with_catalog<U: Into<String>>(http: H, base_url: U, catalog: DocsCatalog) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            catalog,
        }
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    pub fn catalog(&self) -> &DocsCatalog {
        &self.catalog
    }

    /// 全コレクションをID順のマップで返す。初回のみAPIを呼ぶ
    pub async fn list_collections(&mut self) -> ApiResult<&BTreeMap<String, Collection>> {
        if !self.catalog.collections_loaded() {
            let envelope: CollectionsEnvelope = self
                .get_json("/v1/collections", &[], "コレクション一覧")
                .await?;
            info!("コレクション取得完了: {}件", envelope.collections.items.len());
            self.catalog.seed_collections(envelope.collections.items);
        }
        Ok(self.catalog.collections())
    }

    /// 既知の全コレクションのカテゴリをIDで引けるマップで返す
    ///
    /// コレクションごとに1リクエストを発行し、全件そろった時点でキャッシュする。
    pub async fn list_categories(&mut self) -> ApiResult<&BTreeMap<String, Category>> {
        if !self.catalog.categories_loaded() {
            let collection_ids: Vec<String> = self.list_collections().await?.keys().cloned().collect();

            let mut categories = Vec::new();
            for collection_id in collection_ids {
                let path = format!("/v1/collections/{}/categories", collection_id);
                let envelope: CategoriesEnvelope = self
                    .get_json(&path, &[], &format!("カテゴリ一覧 ({})", collection_id))
                    .await?;
                categories.extend(envelope.categories.items);
            }
            info!("カテゴリ取得完了: {}件", categories.len());
            self.catalog.seed_categories(categories);
        }
        Ok(self.catalog.categories())
    }

    pub fn category_slug(&self, id: &str) -> Option<&str> {
        self.catalog.category_slug(id)
    }

    pub fn category_name(&self, id: &str) -> Option<&str> {
        self.catalog.category_name(id)
    }

    /// コレクション内の記事要約をページ順に連結して返す
    ///
    /// 最初のレスポンスが複数ページを報告した場合のみ、残りのページを
    /// 1ページにつき1リクエストで取得する。再試行は行わない。
    pub async fn list_articles(
        &self,
        collection_id: &str,
        status: &str,
    ) -> ApiResult<Vec<ArticleSummary>> {
        let path = format!("/v1/collections/{}/articles", collection_id);

        let first: ArticlesEnvelope = self
            .get_json(&path, &article_page_query(status, 1), "記事一覧 (1ページ目)")
            .await?;
        let total_pages = first.articles.pages;
        let mut items = first.articles.items;
        debug!(
            "記事一覧: page={} pages={} items={}",
            first.articles.page,
            total_pages,
            items.len()
        );

        for page in 2..=total_pages {
            let next: ArticlesEnvelope = self
                .get_json(
                    &path,
                    &article_page_query(status, page),
                    &format!("記事一覧 ({}ページ目)", page),
                )
                .await?;
            items.extend(next.articles.items);
        }

        info!(
            "記事一覧取得完了: コレクション{} {}件 ({}ページ)",
            collection_id,
            items.len(),
            total_pages.max(1)
        );
        Ok(items)
    }

    /// 記事詳細を取得する
    ///
    /// レスポンスに記事本体がない場合はペイロードをログに残して
    /// `ApiError::ArticleNotFound` を返す。記事本体が解析できない場合は
    /// `ApiError::InvalidArticle`。どちらも記事単位のエラーになる。
    pub async fn get_article(&self, id: &str) -> ApiResult<RawArticle> {
        let url = self.url(&format!("/v1/articles/{}", id));
        let body = self.http.get_text(&url, &[]).await?;
        let envelope: ArticleEnvelope = serde_json::from_str(&body).map_err(|e| {
            error!("記事詳細を解析できません: id={} payload={}", id, body);
            ApiError::invalid_article(id, e)
        })?;

        match envelope.article {
            Some(article) => Ok(article),
            None => {
                error!("記事本体がレスポンスにありません: id={} payload={}", id, body);
                Err(ApiError::article_not_found(id))
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        context: &str,
    ) -> ApiResult<T> {
        let url = self.url(path);
        let body = self.http.get_text(&url, query).await?;
        decode(&body, context)
    }
}

fn article_page_query(status: &str, page: u32) -> Vec<(&'static str, String)> {
    vec![
        ("pageSize", ARTICLE_PAGE_SIZE.to_string()),
        ("status", status.to_string()),
        ("page", page.to_string()),
    ]
}

fn decode<T: DeserializeOwned>(body: &str, context: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|e| ApiError::decode(context, e))
}
