// ==========================================
// 配置驱动表单构建器 - 导出产物
// ==========================================
// 交给传输层的结果：文档文本 + 建议文件名 + MIME 类型
// 传输层负责设置下载响应（attachment）
// ==========================================

use serde::{Deserialize, Serialize};

pub const CSV_CONTENT_TYPE: &str = "text/csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: String,
    pub content: String,
}

impl ExportArtifact {
    pub fn csv(filename: String, content: String) -> Self {
        Self {
            filename,
            content_type: CSV_CONTENT_TYPE.to_string(),
            content,
        }
    }
}
