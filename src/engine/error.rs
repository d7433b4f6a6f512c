// ==========================================
// 配置驱动表单构建器 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 引擎均为纯内存变换，错误只来自调用方输入
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 输入形状错误 =====
    #[error("提交载荷格式错误: {0}")]
    InvalidPayloadShape(String),

    #[error("模板解析失败: {0}")]
    InvalidTemplate(String),

    // ===== 序列化错误 =====
    #[error("列数不一致 (行 {row}): 期望 {expected} 列，实际 {actual} 列")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("分隔符非法: {0:?}（必须为单个 ASCII 字符，且不能是引号或换行）")]
    InvalidDelimiter(char),

    #[error("文档序列化失败: {0}")]
    Serialize(String),
}

impl From<csv::Error> for EngineError {
    fn from(err: csv::Error) -> Self {
        EngineError::Serialize(err.to_string())
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
