use regex::Regex;
use std::sync::LazyLock;
use url::Url;

// "1234-getting-started" のような内部スラッグ（先頭の数字は省略可）
static INTERNAL_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[0-9]*-[a-zA-Z]*").expect("正規表現が不正"));
static CATEGORY_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/category/\d+-").expect("正規表現が不正"));
static ARTICLE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/article/\d+-").expect("正規表現が不正"));
static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+-").expect("正規表現が不正"));

/// リンクの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// ドキュメントサイトのカテゴリページ
    Category,
    /// ドキュメントサイトの記事ページ
    Article,
    /// ドキュメントサイト内だが種別が不明
    UnknownInternal,
    /// `/` 始まりの相対リンク。自動では書き換えず手作業で確認する
    RootRelative,
    /// ページ内アンカー
    Anchor,
    External,
    Mailto,
    Other,
}

impl LinkKind {
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Category | Self::Article | Self::UnknownInternal)
    }
}

/// 1つのリンクの判定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRewrite {
    pub original: String,
    pub kind: LinkKind,
    /// 書き換え後のhref。変更しない場合はNone
    pub rewritten: Option<String>,
}

impl LinkRewrite {
    /// 出力に使うhref
    pub fn href(&self) -> &str {
        self.rewritten.as_deref().unwrap_or(&self.original)
    }
}

/// hrefを分類し、内部リンクであればスラッグ相対の形に書き換える
///
/// `docs_host` に一致するホスト、または内部スラッグ形式のhrefを内部リンクとみなし、
/// `/category/<数字>-`・`/article/<数字>-`（どちらも無ければ先頭の `<数字>-`）を除去する。
pub fn classify_link(href: &str, docs_host: &str) -> LinkRewrite {
    let (host, path) = split_href(href);

    let kind;
    let mut rewritten = None;
    if host.as_deref() == Some(docs_host) || INTERNAL_SLUG.is_match(href) {
        if path.starts_with("/category/") {
            kind = LinkKind::Category;
            rewritten = Some(CATEGORY_PREFIX.replace_all(&path, "").into_owned());
        } else if path.starts_with("/article/") {
            kind = LinkKind::Article;
            rewritten = Some(ARTICLE_PREFIX.replace_all(&path, "").into_owned());
        } else {
            kind = LinkKind::UnknownInternal;
            rewritten = Some(NUMBER_PREFIX.replace(&path, "").into_owned());
        }
    } else if href.starts_with('/') {
        kind = LinkKind::RootRelative;
    } else if href.starts_with('#') {
        kind = LinkKind::Anchor;
    } else if href.starts_with("http") {
        kind = LinkKind::External;
    } else if href.starts_with("mailto:") {
        kind = LinkKind::Mailto;
    } else {
        kind = LinkKind::Other;
    }

    LinkRewrite {
        original: href.to_string(),
        kind,
        rewritten,
    }
}

/// hrefをホスト（host[:port]）とパスに分ける。クエリとフラグメントは捨てる
fn split_href(href: &str) -> (Option<String>, String) {
    let trimmed = href.trim();
    let parsed = if trimmed.starts_with("//") {
        Url::parse(&format!("https:{}", trimmed))
    } else {
        Url::parse(trimmed)
    };

    match parsed {
        Ok(url) => {
            let host = url.host_str().map(|h| match url.port() {
                Some(port) => format!("{}:{}", h, port),
                None => h.to_string(),
            });
            (host, url.path().to_string())
        }
        Err(_) => {
            let end = trimmed.find(['?', '#']).unwrap_or(trimmed.len());
            (None, trimmed[..end].to_string())
        }
    }
}
