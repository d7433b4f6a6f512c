// ==========================================
// 配置驱动表单构建器 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把 Repository/Engine 错误转换为用户可读的错误消息
// ==========================================

use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("提交载荷格式错误: {0}")]
    InvalidPayloadShape(String),

    /// 必填字段缺失（field 为展示标签）
    #[error("必填字段缺失: {field}")]
    MissingMandatoryField { field: String },

    /// 配置存在但没有任何提交记录（区别于 NotFound）
    #[error("没有可导出的提交记录: config_id={config_id}")]
    NoSubmissions { config_id: String },

    // ==========================================
    // 导出错误
    // ==========================================
    #[error("导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定的错误码（供 CLI 或上层调用方判断）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidPayloadShape(_) => "INVALID_PAYLOAD_SHAPE",
            ApiError::MissingMandatoryField { .. } => "MISSING_MANDATORY_FIELD",
            ApiError::NoSubmissions { .. } => "NO_SUBMISSIONS",
            ApiError::ExportError(_) => "EXPORT_ERROR",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::DatabaseConnectionError(_) => "DATABASE_CONNECTION_ERROR",
            ApiError::ConfigError(_) => "CONFIG_ERROR",
            ApiError::Other(_) => "OTHER",
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::DatabaseError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::SerializationError { column, message } => {
                ApiError::DatabaseError(format!("存储数据损坏 ({}): {}", column, message))
            }
            RepositoryError::ConfigValueError {
                key,
                value,
                message,
            } => ApiError::ConfigError(format!("{}={:?}: {}", key, value, message)),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidPayloadShape(msg) => ApiError::InvalidPayloadShape(msg),
            EngineError::InvalidTemplate(msg) => ApiError::InvalidInput(msg),
            EngineError::InvalidDelimiter(c) => {
                ApiError::ConfigError(format!("分隔符非法: {:?}", c))
            }
            other @ (EngineError::ColumnCountMismatch { .. } | EngineError::Serialize(_)) => {
                ApiError::ExportError(other.to_string())
            }
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "Configuration".to_string(),
            id: "C001".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Configuration"));
                assert!(msg.contains("C001"));
            }
            _ => panic!("Expected NotFound"),
        }

        let repo_err = RepositoryError::ConfigValueError {
            key: "export.direct_delimiter".to_string(),
            value: "||".to_string(),
            message: "bad".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        assert_eq!(api_err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_engine_error_conversion() {
        let api_err: ApiError = EngineError::InvalidPayloadShape("array".to_string()).into();
        match api_err {
            ApiError::InvalidPayloadShape(msg) => assert_eq!(msg, "array"),
            _ => panic!("Expected InvalidPayloadShape"),
        }

        let api_err: ApiError = EngineError::ColumnCountMismatch {
            row: 2,
            expected: 3,
            actual: 1,
        }
        .into();
        assert_eq!(api_err.code(), "EXPORT_ERROR");
    }

    #[test]
    fn test_no_submissions_distinct_from_not_found() {
        let empty = ApiError::NoSubmissions {
            config_id: "C001".to_string(),
        };
        let missing = ApiError::NotFound("C001".to_string());
        assert_ne!(empty.code(), missing.code());
    }
}
