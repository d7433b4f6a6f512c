// ==========================================
// 配置驱动表单构建器 - API 层
// ==========================================
// 职责: 提供业务 API 接口（配置管理、提交、导出），供 CLI 或其他宿主调用
// ==========================================

pub mod configuration_api;
pub mod error;
pub mod submission_api;
pub mod validator;

// 重导出核心类型
pub use configuration_api::ConfigurationApi;
pub use error::{ApiError, ApiResult};
pub use submission_api::SubmissionApi;
pub use validator::{build_form_submission_data, validate_config_id, validate_mandatory_fields};
