// ==========================================
// 配置驱动表单构建器 - 配置管理器
// ==========================================
// 职责: 导出相关设置的加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::domain::configuration::DEFAULT_FILENAME_TEMPLATE;
use crate::engine::serializer::DelimitedFormat;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// 全局作用域标识
pub const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ExportSettings - 导出设置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub default_filename_template: String,
    pub direct_delimiter: u8,
    pub history_delimiter: u8,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            default_filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
            direct_delimiter: DelimitedFormat::SINGLE_ROW.delimiter,
            history_delimiter: DelimitedFormat::MULTI_ROW.delimiter,
        }
    }
}

impl ExportSettings {
    /// 单条直接提交使用的格式
    pub fn direct_format(&self) -> DelimitedFormat {
        DelimitedFormat::SINGLE_ROW.with_delimiter(self.direct_delimiter)
    }

    /// 历史批量导出使用的格式
    pub fn history_format(&self) -> DelimitedFormat {
        DelimitedFormat::MULTI_ROW.with_delimiter(self.history_delimiter)
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        let manager = Self { conn };
        manager.ensure_table()?;
        Ok(manager)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
              scope_id TEXT NOT NULL,
              key TEXT NOT NULL,
              value TEXT NOT NULL,
              updated_at TEXT NOT NULL,
              PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(scope_id, key) DO UPDATE SET
              value = excluded.value,
              updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value, chrono::Utc::now().to_rfc3339()],
        )?;

        tracing::info!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 列出 global scope 的全部配置（按键排序）
    pub fn list_global_config(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }
        Ok(config_map)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    // ===== 导出配置 =====

    /// 新建配置时使用的默认文件名模板
    ///
    /// 空白值视为未配置
    pub fn get_default_filename_template(&self) -> RepositoryResult<String> {
        let value = self.get_config_or_default(
            config_keys::DEFAULT_FILENAME_TEMPLATE,
            DEFAULT_FILENAME_TEMPLATE,
        )?;

        if value.trim().is_empty() {
            tracing::warn!(
                config_key = config_keys::DEFAULT_FILENAME_TEMPLATE,
                "文件名模板配置为空，使用默认值"
            );
            return Ok(DEFAULT_FILENAME_TEMPLATE.to_string());
        }
        Ok(value)
    }

    pub fn get_direct_delimiter(&self) -> RepositoryResult<u8> {
        self.get_delimiter(
            config_keys::DIRECT_DELIMITER,
            DelimitedFormat::SINGLE_ROW.delimiter,
        )
    }

    pub fn get_history_delimiter(&self) -> RepositoryResult<u8> {
        self.get_delimiter(
            config_keys::HISTORY_DELIMITER,
            DelimitedFormat::MULTI_ROW.delimiter,
        )
    }

    fn get_delimiter(&self, key: &str, default: u8) -> RepositoryResult<u8> {
        let value = match self.get_global_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        parse_delimiter(&value).ok_or_else(|| RepositoryError::ConfigValueError {
            key: key.to_string(),
            value: value.clone(),
            message: "分隔符必须是单个 ASCII 字符".to_string(),
        })
    }

    /// 校验后写入一项导出设置
    ///
    /// 未知键或非法分隔符直接拒绝，不写入 config_kv
    pub fn set_export_setting(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let reject = |message: String| RepositoryError::ConfigValueError {
            key: key.to_string(),
            value: value.to_string(),
            message,
        };

        match key {
            config_keys::DEFAULT_FILENAME_TEMPLATE => {
                if value.trim().is_empty() {
                    return Err(reject("文件名模板不能为空".to_string()));
                }
            }
            config_keys::DIRECT_DELIMITER | config_keys::HISTORY_DELIMITER => {
                if parse_delimiter(value).is_none() {
                    return Err(reject("分隔符必须是单个 ASCII 字符".to_string()));
                }
            }
            _ => {
                return Err(reject(format!(
                    "未知设置项（可选: {}）",
                    config_keys::EXPORT_KEYS.join(", ")
                )))
            }
        }

        self.set_global_config_value(key, value)
    }

    /// 读取全部导出设置
    pub fn export_settings(&self) -> RepositoryResult<ExportSettings> {
        Ok(ExportSettings {
            default_filename_template: self.get_default_filename_template()?,
            direct_delimiter: self.get_direct_delimiter()?,
            history_delimiter: self.get_history_delimiter()?,
        })
    }
}

fn parse_delimiter(value: &str) -> Option<u8> {
    match value.as_bytes() {
        [b] if b.is_ascii() && !matches!(*b, b'"' | b'\n' | b'\r') => Some(*b),
        _ => None,
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 导出
    pub const DEFAULT_FILENAME_TEMPLATE: &str = "export.default_filename_template";
    pub const DIRECT_DELIMITER: &str = "export.direct_delimiter";
    pub const HISTORY_DELIMITER: &str = "export.history_delimiter";

    pub const EXPORT_KEYS: [&str; 3] = [DEFAULT_FILENAME_TEMPLATE, DIRECT_DELIMITER, HISTORY_DELIMITER];
}
