use crate::domain::catalog::Collection;
use serde::{Deserialize, Serialize};

// 記事一覧APIが返す要約（本文を含まない）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "collectionId", default)]
    pub collection_id: String,
    #[serde(default)]
    pub status: String,
}

// 記事詳細APIが返す記事
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub id: String,
    pub slug: String,
    pub name: String,
    /// HTML本文
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub public_url: String,
    #[serde(default)]
    pub last_published_at: String,
    pub keywords: Option<Vec<String>>,
    /// APIは通常タグを返さない。返した場合は既定タグより優先する
    pub tags: Option<Vec<String>>,
    /// カテゴリIDの並び。先頭が主カテゴリ
    #[serde(default)]
    pub categories: Vec<String>,
    pub collection_id: String,
}

// コレクション・カテゴリを結合した記事
//
// `categories` と `categories_by_name` は同じ長さで、元のカテゴリIDの順序を保つ。
#[derive(Debug, Clone)]
pub struct EnrichedArticle {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub text: String,
    pub public_url: String,
    pub last_published_at: String,
    pub keywords: Vec<String>,
    pub collection: Collection,
    pub categories: Vec<String>,
    pub categories_by_name: Vec<String>,
    pub tags: Vec<String>,
}

impl EnrichedArticle {
    /// 出力先ディレクトリを決める主カテゴリ名
    pub fn primary_category_name(&self) -> Option<&str> {
        self.categories_by_name.first().map(String::as_str)
    }

    pub fn primary_category_slug(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_article_from_api_json() {
        let json = r#"{
            "id": "a1",
            "number": 12,
            "collectionId": "col1",
            "slug": "getting-started",
            "status": "published",
            "name": "Getting Started",
            "text": "<p>Hello</p>",
            "categories": ["c1", "c2"],
            "publicUrl": "https://docs.example.com/article/12-getting-started",
            "lastPublishedAt": "2021-03-10T15:43:15Z",
            "keywords": ["faq"]
        }"#;

        let article: RawArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.collection_id, "col1");
        assert_eq!(article.categories, vec!["c1", "c2"]);
        assert_eq!(article.keywords, Some(vec!["faq".to_string()]));
        assert_eq!(article.tags, None);
        assert_eq!(article.last_published_at, "2021-03-10T15:43:15Z");
    }

    #[test]
    fn test_raw_article_without_optional_fields() {
        let json = r#"{"id":"a2","collectionId":"col1","slug":"s","name":"N"}"#;
        let article: RawArticle = serde_json::from_str(json).unwrap();
        assert!(article.keywords.is_none());
        assert!(article.categories.is_empty());
        assert!(article.text.is_empty());
    }
}
