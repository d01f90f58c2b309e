use crate::types::{ExportError, ExportResult};
use chrono::{NaiveDate, NaiveDateTime};

/// APIが返す公開日時の形式（UTC、秒まで）
pub const PUBLISHED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// 公開日時の文字列を日付のみの値に変換する
///
/// 形式が一致しない場合は既定値で補わず `ExportError::BadTimestamp` を返す。
///
/// # 例
/// - "2021-03-10T15:43:15Z" -> 2021-03-10
pub fn parse_published_date(value: &str) -> ExportResult<NaiveDate> {
    NaiveDateTime::parse_from_str(value.trim(), PUBLISHED_AT_FORMAT)
        .map(|dt| dt.date())
        .map_err(|e| ExportError::bad_timestamp(value, e))
}
