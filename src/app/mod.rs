// ==========================================
// 配置驱动表单构建器 - 应用层
// ==========================================
// 职责: 组装数据库连接、仓储与 API，供 CLI 或其他宿主调用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
