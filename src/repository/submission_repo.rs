// ==========================================
// 配置驱动表单构建器 - 提交记录仓储
// ==========================================
// 职责: 管理 form_submission 表
// 说明: config_id 不设外键，配置删除后提交记录保留（孤儿记录允许存在）
// ==========================================

use crate::domain::payload::Payload;
use crate::domain::submission::Submission;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::store::SubmissionStore;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

struct SubmissionRow {
    submission_id: String,
    config_id: String,
    submitted_at: String,
    data_json: String,
}

impl SubmissionRow {
    fn into_submission(self) -> RepositoryResult<Submission> {
        let timestamp = DateTime::parse_from_rfc3339(&self.submitted_at)
            .map_err(|e| RepositoryError::SerializationError {
                column: "form_submission.submitted_at".to_string(),
                message: format!("submission_id={}: {}", self.submission_id, e),
            })?
            .with_timezone(&Utc);

        let data: Payload = serde_json::from_str(&self.data_json).map_err(|e| {
            RepositoryError::SerializationError {
                column: "form_submission.data_json".to_string(),
                message: format!("submission_id={}: {}", self.submission_id, e),
            }
        })?;

        Ok(Submission {
            submission_id: self.submission_id,
            config_id: self.config_id,
            timestamp,
            data,
        })
    }
}

pub struct SubmissionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SubmissionRepository {
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

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS form_submission (
              submission_id TEXT PRIMARY KEY,
              config_id TEXT NOT NULL,
              submitted_at TEXT NOT NULL,
              data_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_form_submission_config
              ON form_submission(config_id);
            "#,
        )?;
        Ok(())
    }
}

impl SubmissionStore for SubmissionRepository {
    fn insert(&self, submission: &Submission) -> RepositoryResult<()> {
        let data_json =
            serde_json::to_string(&submission.data).map_err(|e| RepositoryError::SerializationError {
                column: "form_submission.data_json".to_string(),
                message: e.to_string(),
            })?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO form_submission (submission_id, config_id, submitted_at, data_json)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                submission.submission_id,
                submission.config_id,
                submission.timestamp_iso(),
                data_json,
            ],
        )?;
        Ok(())
    }

    fn list_by_config(&self, config_id: &str) -> RepositoryResult<Vec<Submission>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT submission_id, config_id, submitted_at, data_json
            FROM form_submission
            WHERE config_id = ?1
            ORDER BY rowid ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![config_id], |row| {
                Ok(SubmissionRow {
                    submission_id: row.get(0)?,
                    config_id: row.get(1)?,
                    submitted_at: row.get(2)?,
                    data_json: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        rows.into_iter().map(SubmissionRow::into_submission).collect()
    }

    fn delete_by_config(&self, config_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM form_submission WHERE config_id = ?1",
            params![config_id],
        )?;
        Ok(affected)
    }
}
