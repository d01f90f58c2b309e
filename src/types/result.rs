/// エクスポート実行結果の集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// 書き出しに成功した記事数
    pub written: usize,
    /// 記事単位のエラーでスキップした記事数
    pub failed: usize,
    /// ローカルに保存できた画像数
    pub images_saved: usize,
    /// 取得・保存できなかった画像数
    pub images_failed: usize,
}

impl ExportSummary {
    pub fn new(written: usize, failed: usize) -> Self {
        Self {
            written,
            failed,
            ..Self::default()
        }
    }

    /// 空の結果（全て0）を作成
    pub fn empty() -> Self {
        Self::default()
    }

    /// 処理した記事の総数
    pub fn total(&self) -> usize {
        self.written + self.failed
    }
}

impl std::fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "エクスポート完了: 書き出し{}件、失敗{}件、画像保存{}件、画像失敗{}件",
            self.written, self.failed, self.images_saved, self.images_failed
        )
    }
}
