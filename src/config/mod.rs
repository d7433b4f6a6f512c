// ==========================================
// 配置驱动表单构建器 - 配置层
// ==========================================
// 职责: 导出设置管理（默认文件名模板、分隔符）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, ExportSettings, GLOBAL_SCOPE};
