use thiserror::Error;

/// ドキュメントAPI呼び出しのエラー型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 通信そのものの失敗（接続不可、レスポンス読み取り失敗など）
    #[error("HTTPリクエストの送信に失敗: {url} - {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 2xx以外のステータス
    #[error("APIが異常なステータスを返しました: {url} - {status}")]
    Status { url: String, status: u16 },

    /// JSONとして解釈できないレスポンス
    #[error("APIレスポンスの解析に失敗: {context} - {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// レスポンスに記事本体が含まれていない
    #[error("記事が見つかりません: {id}")]
    ArticleNotFound { id: String },

    /// 記事詳細の内容が不正（必須項目の欠落、型の不一致など）
    #[error("記事データが不正です: {id} - {source}")]
    InvalidArticle {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn transport<U: Into<String>>(url: U, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    pub fn status<U: Into<String>>(url: U, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    pub fn decode<C: Into<String>>(context: C, source: serde_json::Error) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }

    pub fn article_not_found<I: Into<String>>(id: I) -> Self {
        Self::ArticleNotFound { id: id.into() }
    }

    pub fn invalid_article<I: Into<String>>(id: I, source: serde_json::Error) -> Self {
        Self::InvalidArticle {
            id: id.into(),
            source,
        }
    }

    /// 接続系の問題かどうか。trueの場合は実行全体を中断する
    ///
    /// 記事詳細の欠落・不正は記事単位のエラーとして扱う。
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::ArticleNotFound { .. } | Self::InvalidArticle { .. }
        )
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// 画像ダウンロードのエラー型
/// 記事単位の処理を止めず、ログ出力のみに使う
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("画像URLが不正です: {url}")]
    InvalidUrl { url: String },

    #[error("画像の取得に失敗: {url} - {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("画像の取得で異常なステータス: {url} - {status}")]
    Status { url: String, status: u16 },

    #[error("画像の保存に失敗: {path} - {source}")]
    FileSystem {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl AssetError {
    pub fn invalid_url<U: Into<String>>(url: U) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    pub fn transport<U: Into<String>>(url: U, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    pub fn status<U: Into<String>>(url: U, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    pub fn file_system<P: Into<String>>(path: P, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }
}

pub type AssetResult<T> = std::result::Result<T, AssetError>;

/// HTMLの書き換え・Markdown変換のエラー型
#[derive(Error, Debug)]
pub enum RenderError {
    /// Markdown変換器が失敗した
    #[error("Markdown変換に失敗: {reason}")]
    Conversion { reason: String },

    /// 書き換え後のDOMをHTMLへ戻せなかった
    #[error("HTMLのシリアライズに失敗: {source}")]
    Serialization {
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    pub fn conversion<R: Into<String>>(reason: R) -> Self {
        Self::Conversion {
            reason: reason.into(),
        }
    }

    pub fn serialization(source: std::io::Error) -> Self {
        Self::Serialization { source }
    }
}

pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// エクスポート処理全体のエラー型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// 記事が参照するコレクションがキャッシュに存在しない
    #[error("不明なコレクションです: {id}")]
    UnknownCollection { id: String },

    /// 記事が参照するカテゴリがキャッシュに存在しない
    #[error("不明なカテゴリです: {id} (記事: {article})")]
    UnknownCategory { id: String, article: String },

    /// カテゴリを一つも持たない記事は出力先を決められない
    #[error("主カテゴリがありません: {slug}")]
    NoPrimaryCategory { slug: String },

    /// lastPublishedAtの形式が不正
    #[error("日時の形式が不正です: '{value}' - {source}")]
    BadTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// フロントマターのYAML化に失敗
    #[error("フロントマターの生成に失敗: {context} - {source}")]
    FrontMatter {
        context: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// スナップショットのJSON化に失敗
    #[error("JSON処理エラー: {context} - {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// ファイルシステムエラー
    #[error("ファイルシステムエラー: {path} - {source}")]
    FileSystem {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub fn unknown_collection<I: Into<String>>(id: I) -> Self {
        Self::UnknownCollection { id: id.into() }
    }

    pub fn unknown_category<I: Into<String>, A: Into<String>>(id: I, article: A) -> Self {
        Self::UnknownCategory {
            id: id.into(),
            article: article.into(),
        }
    }

    pub fn no_primary_category<S: Into<String>>(slug: S) -> Self {
        Self::NoPrimaryCategory { slug: slug.into() }
    }

    pub fn bad_timestamp<V: Into<String>>(value: V, source: chrono::ParseError) -> Self {
        Self::BadTimestamp {
            value: value.into(),
            source,
        }
    }

    pub fn front_matter<C: Into<String>>(context: C, source: serde_yaml::Error) -> Self {
        Self::FrontMatter {
            context: context.into(),
            source,
        }
    }

    pub fn json<C: Into<String>>(context: C, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    pub fn file_system<P: Into<String>>(path: P, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// 実行全体を中断すべきエラーかどうか
    ///
    /// 接続・APIの失敗は即座に中断し、それ以外は記事単位で隔離する。
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Api(e) => e.is_fatal(),
            _ => false,
        }
    }
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;
