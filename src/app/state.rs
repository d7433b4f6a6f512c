// ==========================================
// 配置驱动表单构建器 - 应用状态
// ==========================================
// 职责: 组装共享连接、仓储与 API 实例
// 说明: 所有存储句柄显式注入 API，不存在全局单例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{ConfigurationApi, SubmissionApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema_version, open_sqlite_connection, CURRENT_SCHEMA_VERSION};
use crate::engine::filename::{Clock, SystemClock};
use crate::repository::{ConfigurationRepository, SubmissionRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "FORM_CONFIG_EXPORT_DB_PATH";

const DB_FILE_NAME: &str = "form_config_export.db";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 表单配置API
    pub configuration_api: Arc<ConfigurationApi>,

    /// 提交与导出API
    pub submission_api: Arc<SubmissionApi>,

    /// 导出设置
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例（系统时钟）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::with_clock(db_path, Arc::new(SystemClock))
    }

    /// 使用指定时钟创建AppState（测试/回放）
    pub fn with_clock(db_path: String, clock: Arc<dyn Clock>) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;

        match ensure_schema_version(&conn) {
            Ok(Some(v)) if v > CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    db_version = v,
                    expected = CURRENT_SCHEMA_VERSION,
                    "数据库 schema_version 高于当前程序版本"
                );
            }
            Ok(_) => {}
            Err(e) => return Err(format!("无法初始化 schema_version: {}", e)),
        }

        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let configuration_repo = Arc::new(
            ConfigurationRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigurationRepository: {}", e))?,
        );
        let submission_repo = Arc::new(
            SubmissionRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建SubmissionRepository: {}", e))?,
        );
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let configuration_api = Arc::new(ConfigurationApi::new(
            configuration_repo.clone(),
            config_manager.clone(),
        ));
        let submission_api = Arc::new(SubmissionApi::new(
            configuration_repo,
            submission_repo,
            config_manager.clone(),
            clock,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            configuration_api,
            submission_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 顺序: 环境变量 FORM_CONFIG_EXPORT_DB_PATH → 用户数据目录 → ./form_config_export.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = std::path::PathBuf::from(format!("./{}", DB_FILE_NAME));

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("form-config-export");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_app_state_on_temp_db() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap().to_string();

        let state = AppState::new(db_path.clone()).unwrap();
        assert_eq!(state.db_path, db_path);
        assert!(state.configuration_api.list_configurations().unwrap().is_empty());

        // 重复打开同一库保持幂等
        assert!(AppState::new(db_path).is_ok());
    }
}
