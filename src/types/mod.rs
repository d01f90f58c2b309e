//! 型定義モジュール
//!
//! アプリケーション全体で使用される共通的な型定義を管理します。
//! - エラー型: 設定・API・画像・変換・エクスポート各層のエラー
//! - 実行結果型: エクスポート件数の集計

pub mod config;
pub mod error;
pub mod result;

// 便利な再エクスポート
pub use config::{ConfigError, ConfigResult};
pub use error::{
    ApiError, ApiResult, AssetError, AssetResult, ExportError, ExportResult, RenderError,
    RenderResult,
};
pub use result::ExportSummary;
