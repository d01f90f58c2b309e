//! 記事本文のリンク・画像の書き換え
//!
//! DOMの走査と書き換えはネットワークやファイルに触れない純粋な関数として実装し、
//! 画像のダウンロードは呼び出し側（task::article）で行う。

use super::link::{classify_link, LinkKind, LinkRewrite};
use crate::infra::html::{
    find_elements_by_name, get_attribute, parse_fragment, serialize_fragment, set_attribute,
};
use crate::types::{RenderError, RenderResult};
use std::collections::{HashMap, HashSet};
use url::Url;

/// 書き換え済みの本文と、リンクの判定結果
#[derive(Debug, Clone)]
pub struct RewrittenContent {
    pub html: String,
    pub links: Vec<LinkRewrite>,
}

impl RewrittenContent {
    /// 指定種別のリンク数
    pub fn count(&self, kind: LinkKind) -> usize {
        self.links.iter().filter(|l| l.kind == kind).count()
    }

    /// 手作業で確認が必要な `/` 始まりのリンク
    pub fn root_relative_links(&self) -> impl Iterator<Item = &LinkRewrite> {
        self.links
            .iter()
            .filter(|l| l.kind == LinkKind::RootRelative)
    }
}

/// 本文中の `<img src>` を文書順に重複なく集める
pub fn collect_image_sources(html: &str) -> Vec<String> {
    let dom = parse_fragment(html);
    let mut sources: Vec<String> = Vec::new();
    for img in find_elements_by_name(&dom.document, "img") {
        if let Some(src) = get_attribute(&img, "src") {
            if !sources.contains(&src) {
                sources.push(src);
            }
        }
    }
    sources
}

/// リンクと画像参照を書き換えた本文を返す
///
/// - `<a href>` は `classify_link` の結果に従って書き換える（hrefの無い要素は無視）
/// - `<img src>` は `localized_images` に対応があるものだけ置き換え、
///   それ以外（ダウンロード失敗など）は元のまま残す
pub fn rewrite_document(
    html: &str,
    docs_host: &str,
    localized_images: &HashMap<String, String>,
) -> RenderResult<RewrittenContent> {
    let dom = parse_fragment(html);

    let mut links = Vec::new();
    for anchor in find_elements_by_name(&dom.document, "a") {
        let Some(href) = get_attribute(&anchor, "href") else {
            continue;
        };
        let link = classify_link(&href, docs_host);
        if let Some(new_href) = &link.rewritten {
            set_attribute(&anchor, "href", new_href);
        }
        links.push(link);
    }

    for img in find_elements_by_name(&dom.document, "img") {
        let Some(src) = get_attribute(&img, "src") else {
            continue;
        };
        if let Some(local) = localized_images.get(&src) {
            set_attribute(&img, "src", local);
        }
    }

    let html = serialize_fragment(&dom).map_err(RenderError::serialization)?;
    Ok(RewrittenContent { html, links })
}

/// 画像のsrcを取得用の絶対URLにする
///
/// `//host/path` 形式はhttpsとして扱う。相対パスはNone。
pub fn absolute_image_url(src: &str) -> Option<Url> {
    let trimmed = src.trim();
    if trimmed.starts_with("//") {
        Url::parse(&format!("https:{}", trimmed)).ok()
    } else {
        Url::parse(trimmed).ok()
    }
}

/// 画像URLの最後のパス要素をローカルのファイル名として使う
///
/// 絶対URLでない場合やファイル名が取れない場合はNone。
pub fn local_image_name(src: &str) -> Option<String> {
    let url = absolute_image_url(src)?;
    let name = url.path().rsplit('/').next()?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

/// 同じ記事内で使用済みのファイル名と衝突しない名前を返す
///
/// `image.png` が使用済みなら `image-2.png`、`image-3.png` と番号を振る。
pub fn unique_image_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }

    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (2..)
        .map(|n| match extension {
            Some(ext) => format!("{}-{}.{}", stem, n, ext),
            None => format!("{}-{}", stem, n),
        })
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}
