use crate::types::{ExportError, ExportResult};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// ディレクトリを（親も含めて）作成する。既に存在する場合は何もしない
pub fn ensure_dir(path: &Path) -> ExportResult<()> {
    fs::create_dir_all(path).map_err(|e| ExportError::file_system(path.display().to_string(), e))
}

/// UTF-8テキストとして書き込む（既存ファイルは上書き）
pub fn write_text_file(path: &Path, content: &str) -> ExportResult<()> {
    fs::write(path, content.as_bytes())
        .map_err(|e| ExportError::file_system(path.display().to_string(), e))
}

pub fn write_bytes(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    fs::write(path, bytes)
}

/// 4スペースインデントの整形済みJSONとして書き込む
///
/// 非ASCII文字はエスケープせずそのまま出力する。
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> ExportResult<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| ExportError::json(path.display().to_string(), e))?;

    fs::write(path, &buf).map_err(|e| ExportError::file_system(path.display().to_string(), e))
}
