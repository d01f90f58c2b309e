use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// コレクション（記事の最上位グループ）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub slug: String,
    pub name: String,

    // スナップショットに元のフィールドをそのまま残すため
    #[serde(flatten)]
    pub additional_fields: serde_json::Map<String, serde_json::Value>,
}

impl Collection {
    pub fn new<I: Into<String>, S: Into<String>, N: Into<String>>(id: I, slug: S, name: N) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            name: name.into(),
            additional_fields: serde_json::Map::new(),
        }
    }
}

/// カテゴリ（コレクション内のサブグループ）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(rename = "collectionId", default)]
    pub collection_id: String,

    #[serde(flatten)]
    pub additional_fields: serde_json::Map<String, serde_json::Value>,
}

impl Category {
    pub fn new<I, S, N, C>(id: I, slug: S, name: N, collection_id: C) -> Self
    where
        I: Into<String>,
        S: Into<String>,
        N: Into<String>,
        C: Into<String>,
    {
        Self {
            id: id.into(),
            slug: slug.into(),
            name: name.into(),
            collection_id: collection_id.into(),
            additional_fields: serde_json::Map::new(),
        }
    }
}

/// コレクション・カテゴリのキャッシュ
///
/// それぞれ最初の取得時に一度だけ投入され、以後は読み取り専用。
/// 無効化は行わない。テストでは `seed_*` で直接投入できる。
#[derive(Debug, Clone, Default)]
pub struct DocsCatalog {
    collections: BTreeMap<String, Collection>,
    categories: BTreeMap<String, Category>,
    collections_loaded: bool,
    categories_loaded: bool,
}

impl DocsCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// コレクションを投入する。2回目以降の呼び出しは無視される
    pub fn seed_collections<I: IntoIterator<Item = Collection>>(&mut self, items: I) {
        if self.collections_loaded {
            return;
        }
        self.collections = items.into_iter().map(|c| (c.id.clone(), c)).collect();
        self.collections_loaded = true;
    }

    /// カテゴリを投入する。2回目以降の呼び出しは無視される
    pub fn seed_categories<I: IntoIterator<Item = Category>>(&mut self, items: I) {
        if self.categories_loaded {
            return;
        }
        self.categories = items.into_iter().map(|c| (c.id.clone(), c)).collect();
        self.categories_loaded = true;
    }

    pub fn collections_loaded(&self) -> bool {
        self.collections_loaded
    }

    pub fn categories_loaded(&self) -> bool {
        self.categories_loaded
    }

    pub fn collections(&self) -> &BTreeMap<String, Collection> {
        &self.collections
    }

    pub fn categories(&self) -> &BTreeMap<String, Category> {
        &self.categories
    }

    pub fn collection(&self, id: &str) -> Option<&Collection> {
        self.collections.get(id)
    }

    /// 未投入、または存在しないIDの場合はNone
    pub fn category_slug(&self, id: &str) -> Option<&str> {
        self.categories.get(id).map(|c| c.slug.as_str())
    }

    /// 未投入、または存在しないIDの場合はNone
    pub fn category_name(&self, id: &str) -> Option<&str> {
        self.categories.get(id).map(|c| c.name.as_str())
    }
}
