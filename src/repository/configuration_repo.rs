// ==========================================
// 配置驱动表单构建器 - 表单配置仓储
// ==========================================
// 职责: 管理 form_config 表
// 说明: 字段列表整体存为 JSON（fields_json），数组顺序即导出列顺序
// ==========================================

use crate::domain::configuration::Configuration;
use crate::domain::field::Field;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::store::ConfigurationStore;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = "id, name, filename_template, fields_json";

/// form_config 行（fields_json 尚未解析）
struct ConfigurationRow {
    id: String,
    name: String,
    filename_template: String,
    fields_json: String,
}

impl ConfigurationRow {
    fn from_row(row: &rusqlite::Row<'_>) -> SqliteResult<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            filename_template: row.get(2)?,
            fields_json: row.get(3)?,
        })
    }

    fn into_configuration(self) -> RepositoryResult<Configuration> {
        let fields: Vec<Field> = serde_json::from_str(&self.fields_json).map_err(|e| {
            RepositoryError::SerializationError {
                column: "form_config.fields_json".to_string(),
                message: format!("id={}: {}", self.id, e),
            }
        })?;

        Ok(Configuration {
            id: self.id,
            name: self.name,
            fields,
            filename_template: self.filename_template,
        })
    }
}

fn fields_to_json(config: &Configuration) -> RepositoryResult<String> {
    serde_json::to_string(&config.fields).map_err(|e| RepositoryError::SerializationError {
        column: "form_config.fields_json".to_string(),
        message: e.to_string(),
    })
}

fn now_string() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub struct ConfigurationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigurationRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS form_config (
              id TEXT PRIMARY KEY,
              name TEXT NOT NULL,
              filename_template TEXT NOT NULL,
              fields_json TEXT NOT NULL,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_form_config_created_at
              ON form_config(created_at);
            "#,
        )?;
        Ok(())
    }

    fn query_one(conn: &Connection, id: &str) -> RepositoryResult<Option<Configuration>> {
        let sql = format!("SELECT {} FROM form_config WHERE id = ?1", SELECT_COLUMNS);
        let row = conn
            .query_row(&sql, params![id], ConfigurationRow::from_row)
            .optional()?;

        row.map(ConfigurationRow::into_configuration).transpose()
    }
}

impl ConfigurationStore for ConfigurationRepository {
    fn list(&self) -> RepositoryResult<Vec<Configuration>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM form_config ORDER BY created_at ASC, rowid ASC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt
            .query_map([], ConfigurationRow::from_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        rows.into_iter()
            .map(ConfigurationRow::into_configuration)
            .collect()
    }

    fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Configuration>> {
        let conn = self.get_conn()?;
        Self::query_one(&conn, id)
    }

    fn insert(&self, config: &Configuration) -> RepositoryResult<()> {
        let fields_json = fields_to_json(config)?;
        let now = now_string();

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO form_config (
                id, name, filename_template, fields_json, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                config.id,
                config.name,
                config.filename_template,
                fields_json,
                now,
                now,
            ],
        )?;
        Ok(())
    }

    fn replace(&self, config: &Configuration) -> RepositoryResult<bool> {
        let fields_json = fields_to_json(config)?;

        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE form_config
            SET name = ?2, filename_template = ?3, fields_json = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
            params![
                config.id,
                config.name,
                config.filename_template,
                fields_json,
                now_string(),
            ],
        )?;
        Ok(affected > 0)
    }

    fn delete(&self, id: &str) -> RepositoryResult<Option<Configuration>> {
        let conn = self.get_conn()?;
        let existing = Self::query_one(&conn, id)?;
        if existing.is_some() {
            conn.execute("DELETE FROM form_config WHERE id = ?1", params![id])?;
        }
        Ok(existing)
    }
}
