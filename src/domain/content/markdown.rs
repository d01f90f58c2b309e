use crate::types::{RenderError, RenderResult};
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

/// HTMLからMarkdownへの変換器
pub trait MarkdownConverter {
    fn convert(&self, html: &str) -> RenderResult<String>;
}

/// `html2md` による変換
///
/// html2mdは不正な入力でpanicすることがあるため、panicをエラーとして扱う。
#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdConverter;

impl MarkdownConverter for Html2MdConverter {
    fn convert(&self, html: &str) -> RenderResult<String> {
        panic::catch_unwind(AssertUnwindSafe(|| html2md::parse_html(html))).map_err(|payload| {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "html2mdがpanicしました".to_string());
            RenderError::conversion(reason)
        })
    }
}

/// 変換結果。`fell_back` が真なら書き換え前の本文から変換した
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownBody {
    pub markdown: String,
    pub fell_back: bool,
}

/// 書き換え済みHTMLを変換し、失敗した場合は元のHTMLで再変換する
///
/// 再変換した場合はリンク・画像の書き換えが失われるため、
/// スラッグと元の本文を警告として残す。
pub fn convert_with_fallback<C: MarkdownConverter + ?Sized>(
    converter: &C,
    rewritten_html: &str,
    original_html: &str,
    slug: &str,
) -> RenderResult<MarkdownBody> {
    match converter.convert(rewritten_html) {
        Ok(markdown) => Ok(MarkdownBody {
            markdown,
            fell_back: false,
        }),
        Err(e) => {
            warn!(
                "書き換え後の本文の変換に失敗したため元の本文で変換します: {} ({})",
                slug, e
            );
            warn!("元の本文: {}", original_html);
            let markdown = converter.convert(original_html)?;
            Ok(MarkdownBody {
                markdown,
                fell_back: true,
            })
        }
    }
}
