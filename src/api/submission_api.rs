// ==========================================
// 配置驱动表单构建器 - 提交与导出 API
// ==========================================
// 职责:
// - 直接提交: 映射键载荷 → 单行分隔文档（不落库）
// - 表单提交: 字段名载荷 → 必填校验 → 存储提交记录
// - 批量导出: 某配置的全部历史提交 → 多行分隔文档
// ==========================================

use serde_json::Value;
use std::sync::Arc;

use crate::api::configuration_api::load_configuration;
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{
    build_form_submission_data, validate_config_id, validate_mandatory_fields,
};
use crate::config::config_manager::ConfigManager;
use crate::domain::export::ExportArtifact;
use crate::domain::payload::Payload;
use crate::domain::submission::Submission;
use crate::engine::filename::{history_filename, submission_filename, Clock};
use crate::engine::payload::payload_from_json;
use crate::engine::resolver::SubmissionResolver;
use crate::engine::sample;
use crate::engine::serializer::DelimitedSerializer;
use crate::repository::store::{ConfigurationStore, SubmissionStore};

// ==========================================
// SubmissionApi - 提交与导出 API
// ==========================================
pub struct SubmissionApi {
    config_store: Arc<dyn ConfigurationStore>,
    submission_store: Arc<dyn SubmissionStore>,
    config_manager: Arc<ConfigManager>,
    clock: Arc<dyn Clock>,
}

impl SubmissionApi {
    /// 创建新的SubmissionApi实例
    pub fn new(
        config_store: Arc<dyn ConfigurationStore>,
        submission_store: Arc<dyn SubmissionStore>,
        config_manager: Arc<ConfigManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config_store,
            submission_store,
            config_manager,
            clock,
        }
    }

    /// 直接提交：按映射键匹配载荷，生成单行文档
    ///
    /// # 参数
    /// - config_id: 配置ID
    /// - payload: JSON 对象，值为标量（null 视为缺失）
    ///
    /// # 返回
    /// - Ok(ExportArtifact): 文件名 + 文档内容
    /// - Err(ApiError::NotFound): 配置不存在
    /// - Err(ApiError::InvalidPayloadShape): 载荷不是扁平对象
    pub fn submit_direct(&self, config_id: &str, payload: &Value) -> ApiResult<ExportArtifact> {
        let config = load_configuration(self.config_store.as_ref(), config_id)?;
        let payload = payload_from_json(payload)?;
        let settings = self.config_manager.export_settings()?;

        let resolver = SubmissionResolver::direct(&config.fields);
        let header = resolver.header();
        let row = resolver.resolve(&payload);

        let content =
            DelimitedSerializer::new(settings.direct_format()).serialize_single(&header, &row)?;
        let filename = submission_filename(&config.filename_template, self.clock.now());

        tracing::info!(
            config_id = %config.id,
            filename = %filename,
            columns = header.len(),
            "直接提交已导出"
        );
        Ok(ExportArtifact::csv(filename, content))
    }

    /// 终端用户表单提交（键为字段名）
    ///
    /// 必填校验通过后生成提交记录并存储
    pub fn record_submission(&self, config_id: &str, values: &Payload) -> ApiResult<Submission> {
        let config = load_configuration(self.config_store.as_ref(), config_id)?;
        validate_mandatory_fields(&config.fields, values)?;

        let data = build_form_submission_data(&config.fields, values);
        let submission = Submission::new(config.id.clone(), data, self.clock.now());
        self.submission_store.insert(&submission)?;

        tracing::info!(
            config_id = %config.id,
            submission_id = %submission.submission_id,
            "表单提交已记录"
        );
        Ok(submission)
    }

    /// 同 record_submission，载荷为 JSON 对象
    pub fn record_submission_json(
        &self,
        config_id: &str,
        values: &Value,
    ) -> ApiResult<Submission> {
        let values = payload_from_json(values)?;
        self.record_submission(config_id, &values)
    }

    /// 查询某配置的全部提交（按写入顺序）
    pub fn list_submissions(&self, config_id: &str) -> ApiResult<Vec<Submission>> {
        let config = load_configuration(self.config_store.as_ref(), config_id)?;
        Ok(self.submission_store.list_by_config(&config.id)?)
    }

    /// 批量导出某配置的历史提交
    ///
    /// # 返回
    /// - Err(ApiError::NotFound): 配置不存在
    /// - Err(ApiError::NoSubmissions): 配置存在但没有提交记录
    pub fn export_submissions(&self, config_id: &str) -> ApiResult<ExportArtifact> {
        let config = load_configuration(self.config_store.as_ref(), config_id)?;

        let submissions = self.submission_store.list_by_config(&config.id)?;
        if submissions.is_empty() {
            return Err(ApiError::NoSubmissions {
                config_id: config.id,
            });
        }

        let settings = self.config_manager.export_settings()?;
        let resolver = SubmissionResolver::history(&config.fields);
        let header = resolver.header();
        let rows = resolver.resolve_all(&submissions);

        let content = DelimitedSerializer::new(settings.history_format()).serialize(&header, &rows)?;
        let filename = history_filename(&config.name);

        tracing::info!(
            config_id = %config.id,
            filename = %filename,
            rows = rows.len(),
            "历史提交已导出"
        );
        Ok(ExportArtifact::csv(filename, content))
    }

    /// 为配置生成一份可直接提交的样例载荷
    pub fn sample_payload(&self, config_id: &str) -> ApiResult<Payload> {
        let config = load_configuration(self.config_store.as_ref(), config_id)?;
        Ok(sample::sample_payload(&config.fields))
    }

    /// 清理某配置 id 下的全部提交（包括配置已删除后的孤儿记录）
    pub fn purge_submissions(&self, config_id: &str) -> ApiResult<usize> {
        validate_config_id(config_id)?;
        let removed = self.submission_store.delete_by_config(config_id)?;

        tracing::info!(config_id = config_id, removed = removed, "提交记录已清理");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_keys;
    use crate::domain::configuration::Configuration;
    use crate::domain::field::Field;
    use crate::engine::filename::FixedClock;
    use crate::repository::configuration_repo::ConfigurationRepository;
    use crate::repository::submission_repo::SubmissionRepository;
    use chrono::{DateTime, Utc};
    use rusqlite::Connection;
    use serde_json::json;
    use std::sync::Mutex;

    struct Fixture {
        api: SubmissionApi,
        configs: Arc<ConfigurationRepository>,
        config_manager: Arc<ConfigManager>,
    }

    fn setup() -> Fixture {
        let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let configs = Arc::new(ConfigurationRepository::from_connection(conn.clone()).unwrap());
        let submissions = Arc::new(SubmissionRepository::from_connection(conn.clone()).unwrap());
        let config_manager = Arc::new(ConfigManager::from_connection(conn).unwrap());
        let instant = DateTime::parse_from_rfc3339("2025-04-05T13:27:30.123Z")
            .unwrap()
            .with_timezone(&Utc);

        let api = SubmissionApi::new(
            configs.clone(),
            submissions,
            config_manager.clone(),
            Arc::new(FixedClock::new(instant)),
        );
        Fixture {
            api,
            configs,
            config_manager,
        }
    }

    fn insert_config(fixture: &Fixture, template: &str) -> Configuration {
        let config = Configuration {
            id: "c1".to_string(),
            name: "People".to_string(),
            fields: vec![
                Field::new("name", "field1").with_label("Name").mandatory(),
                Field::new("age", "field2"),
            ],
            filename_template: template.to_string(),
        };
        fixture.configs.insert(&config).unwrap();
        config
    }

    #[test]
    fn test_submit_direct_single_row() {
        let fixture = setup();
        insert_config(&fixture, "CONFIG");

        let artifact = fixture
            .api
            .submit_direct("c1", &json!({"field1": "John", "field2": 30}))
            .unwrap();

        assert_eq!(artifact.content, "field1|field2\nJohn|30");
        assert_eq!(artifact.filename, "CONFIG_2025-04-05T13-27-30.csv");
        assert_eq!(artifact.content_type, "text/csv");
    }

    #[test]
    fn test_submit_direct_uses_configured_delimiter() {
        let fixture = setup();
        insert_config(&fixture, "CONFIG_{timestamp}");
        fixture
            .config_manager
            .set_global_config_value(config_keys::DIRECT_DELIMITER, ";")
            .unwrap();

        let artifact = fixture
            .api
            .submit_direct("c1", &json!({"field1": "John"}))
            .unwrap();
        assert_eq!(artifact.content, "field1;field2\nJohn;");
        assert_eq!(artifact.filename, "CONFIG_2025-04-05T13-27-30.csv");
    }

    #[test]
    fn test_submit_direct_rejects_nested_payload() {
        let fixture = setup();
        insert_config(&fixture, "CONFIG");

        match fixture.api.submit_direct("c1", &json!({"field1": {"a": 1}})) {
            Err(ApiError::InvalidPayloadShape(_)) => {}
            _ => panic!("Expected InvalidPayloadShape"),
        }
    }

    #[test]
    fn test_export_not_found_vs_no_submissions() {
        let fixture = setup();

        match fixture.api.export_submissions("c1") {
            Err(ApiError::NotFound(_)) => {}
            _ => panic!("Expected NotFound"),
        }

        insert_config(&fixture, "CONFIG");
        match fixture.api.export_submissions("c1") {
            Err(ApiError::NoSubmissions { config_id }) => assert_eq!(config_id, "c1"),
            _ => panic!("Expected NoSubmissions"),
        }
    }

    #[test]
    fn test_record_then_export_history() {
        let fixture = setup();
        insert_config(&fixture, "CONFIG");

        let values: Payload = [("name", "He said \"hi\", ok"), ("age", "41")]
            .into_iter()
            .collect();
        let submission = fixture.api.record_submission("c1", &values).unwrap();

        let artifact = fixture.api.export_submissions("c1").unwrap();
        assert_eq!(artifact.filename, "People_submissions.csv");
        assert_eq!(
            artifact.content,
            format!(
                "submissionId,timestamp,name,age\n\"{}\",\"2025-04-05T13:27:30.123Z\",\"He said \"\"hi\"\", ok\",\"41\"",
                submission.submission_id
            )
        );
    }

    #[test]
    fn test_record_requires_mandatory_fields() {
        let fixture = setup();
        insert_config(&fixture, "CONFIG");

        let values: Payload = [("age", "41")].into_iter().collect();
        match fixture.api.record_submission("c1", &values) {
            Err(ApiError::MissingMandatoryField { field }) => assert_eq!(field, "Name"),
            _ => panic!("Expected MissingMandatoryField"),
        }
        assert!(fixture.api.list_submissions("c1").unwrap().is_empty());
    }

    #[test]
    fn test_sample_payload_and_purge() {
        let fixture = setup();
        insert_config(&fixture, "CONFIG");

        let sample = fixture.api.sample_payload("c1").unwrap();
        assert_eq!(sample.get("field1"), Some("Sample Value 1"));

        fixture
            .api
            .record_submission_json("c1", &json!({"name": "Ann"}))
            .unwrap();
        assert_eq!(fixture.api.purge_submissions("c1").unwrap(), 1);
        assert_eq!(fixture.api.purge_submissions("c1").unwrap(), 0);
    }
}
