use crate::domain::article::EnrichedArticle;
use crate::infra::parser::parse_published_date;
use crate::types::{ExportError, ExportResult};
use chrono::NaiveDate;
use serde::Serialize;
use url::Url;

/// 記事ページのフロントマター
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleFrontMatter {
    /// コレクションのスラッグ
    pub collection: String,
    /// カテゴリ名（主カテゴリが先頭）
    pub categories: Vec<String>,
    /// 時刻を含まない日付
    pub date: NaiveDate,
    pub description: String,
    /// 旧URLのパス
    pub aliases: Vec<String>,
    pub helpscout_url: String,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// カテゴリ一覧ページ（`<カテゴリ名>/_index.md`）のフロントマター
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryIndexFrontMatter {
    pub description: String,
    pub title: String,
    #[serde(rename = "linkTitle")]
    pub link_title: String,
    pub weight: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl CategoryIndexFrontMatter {
    pub fn new(category_name: &str, weight: u32, tags: &[String]) -> Self {
        Self {
            description: format!("Articles about {}", category_name),
            title: category_name.to_string(),
            link_title: category_name.to_string(),
            weight,
            tags: tags.to_vec(),
        }
    }
}

/// タグとキーワードを連結する（重複は除かない）
pub fn compose_tags(tags: &[String], keywords: &[String]) -> Vec<String> {
    tags.iter().chain(keywords.iter()).cloned().collect()
}

/// 記事からフロントマターを組み立てる
///
/// `lastPublishedAt` が解釈できない場合は `BadTimestamp` で失敗する。
pub fn build_front_matter(article: &EnrichedArticle) -> ExportResult<ArticleFrontMatter> {
    let date = parse_published_date(&article.last_published_at)?;
    let aliases = Url::parse(&article.public_url)
        .ok()
        .map(|url| url.path().to_string())
        .filter(|path| !path.is_empty() && path != "/")
        .into_iter()
        .collect();

    Ok(ArticleFrontMatter {
        collection: article.collection.slug.clone(),
        categories: article.categories_by_name.clone(),
        date,
        description: article.name.clone(),
        aliases,
        helpscout_url: article.public_url.clone(),
        slug: article.slug.clone(),
        title: article.name.clone(),
        tags: compose_tags(&article.tags, &article.keywords),
    })
}

/// `---` で囲んだYAMLブロックにする
pub fn to_front_matter_block<T: Serialize>(metadata: &T, context: &str) -> ExportResult<String> {
    let yaml = serde_yaml::to_string(metadata).map_err(|e| ExportError::front_matter(context, e))?;
    Ok(format!("---\n{}---\n", yaml))
}

/// フロントマターと本文から出力ファイルの内容を作る
pub fn render_document(front_matter_block: &str, markdown_body: &str) -> String {
    format!("{}\n{}\n", front_matter_block, markdown_body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Collection;

    fn article() -> EnrichedArticle {
        EnrichedArticle {
            id: "a1".to_string(),
            slug: "getting-started".to_string(),
            name: "Getting Started".to_string(),
            text: "<p>Hello</p>".to_string(),
            public_url: "https://docs.example.com/article/1234-getting-started".to_string(),
            last_published_at: "2021-03-10T15:43:15Z".to_string(),
            keywords: vec!["faq".to_string(), "billing".to_string()],
            collection: Collection::new("col1", "help", "Help"),
            categories: vec!["billing".to_string(), "general".to_string()],
            categories_by_name: vec!["Billing".to_string(), "General".to_string()],
            tags: vec!["docs".to_string()],
        }
    }

    #[test]
    fn test_front_matter_date_has_no_time() {
        let metadata = build_front_matter(&article()).unwrap();
        assert_eq!(metadata.date, NaiveDate::from_ymd_opt(2021, 3, 10).unwrap());

        let block = to_front_matter_block(&metadata, "getting-started").unwrap();
        assert!(block.contains("2021-03-10"));
        assert!(!block.contains("15:43"), "時刻は出力しない");
    }

    #[test]
    fn test_tags_are_tags_then_keywords() {
        let metadata = build_front_matter(&article()).unwrap();
        assert_eq!(metadata.tags, vec!["docs", "faq", "billing"]);

        let duplicated = compose_tags(&["faq".to_string()], &["faq".to_string()]);
        assert_eq!(duplicated, vec!["faq", "faq"], "重複は除かない");
    }

    #[test]
    fn test_front_matter_fields() {
        let metadata = build_front_matter(&article()).unwrap();
        assert_eq!(metadata.collection, "help");
        assert_eq!(metadata.categories, vec!["Billing", "General"]);
        assert_eq!(metadata.aliases, vec!["/article/1234-getting-started"]);
        assert_eq!(metadata.title, "Getting Started");
        assert_eq!(metadata.description, "Getting Started");
        assert_eq!(metadata.slug, "getting-started");
    }

    #[test]
    fn test_bad_timestamp() {
        let mut broken = article();
        broken.last_published_at = "10/03/2021".to_string();
        let result = build_front_matter(&broken);
        assert!(matches!(result, Err(ExportError::BadTimestamp { .. })));
    }

    #[test]
    fn test_block_is_parseable_yaml() {
        let metadata = build_front_matter(&article()).unwrap();
        let block = to_front_matter_block(&metadata, "getting-started").unwrap();
        assert!(block.starts_with("---\n"));
        assert!(block.ends_with("---\n"));

        let inner = block.trim_start_matches("---\n").trim_end_matches("---\n");
        let parsed: serde_yaml::Value = serde_yaml::from_str(inner).unwrap();
        assert_eq!(parsed["slug"].as_str(), Some("getting-started"));
        assert_eq!(parsed["tags"][2].as_str(), Some("billing"));
        assert_eq!(parsed["categories"][0].as_str(), Some("Billing"));
    }

    #[test]
    fn test_empty_tags_omitted_and_render() {
        let mut no_tags = article();
        no_tags.tags.clear();
        no_tags.keywords.clear();
        let metadata = build_front_matter(&no_tags).unwrap();
        let block = to_front_matter_block(&metadata, "x").unwrap();
        assert!(!block.contains("tags:"));

        let document = render_document(&block, "Body");
        assert!(document.ends_with("---\n\nBody\n"));
    }

    #[test]
    fn test_category_index_front_matter() {
        let index = CategoryIndexFrontMatter::new("Billing", 1, &["docs".to_string()]);
        let block = to_front_matter_block(&index, "Billing").unwrap();
        assert!(block.contains("title: Billing"));
        assert!(block.contains("linkTitle: Billing"));
        assert!(block.contains("weight: 1"));
    }
}
