// ==========================================
// 配置驱动表单构建器 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 约束: 不含数据访问逻辑，不含引擎逻辑
// ==========================================

pub mod configuration;
pub mod export;
pub mod field;
pub mod payload;
pub mod submission;
pub mod types;

// 重导出核心类型
pub use configuration::{Configuration, ConfigurationDraft, DEFAULT_FILENAME_TEMPLATE};
pub use export::{ExportArtifact, CSV_CONTENT_TYPE};
pub use field::{Field, FieldRecord};
pub use payload::Payload;
pub use submission::Submission;
pub use types::{EmptyValuePolicy, JoinKey, LeadingColumn, RequirementLevel};
