// ==========================================
// 配置驱动表单构建器 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口，屏蔽数据库细节
// 约束: Repository 不含业务逻辑；所有查询使用参数化
// ==========================================

pub mod configuration_repo;
pub mod error;
pub mod store;
pub mod submission_repo;

// 重导出核心仓储
pub use configuration_repo::ConfigurationRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use store::{ConfigurationStore, SubmissionStore};
pub use submission_repo::SubmissionRepository;
