// ==========================================
// 配置驱动表单构建器 - 表单配置 API
// ==========================================
// 职责: 配置的增删改查、模板/样例字段提取
// 约束: 创建/更新时按映射键排序字段，导出时不再排序
// ==========================================

use std::sync::Arc;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::validate_config_id;
use crate::config::config_manager::ConfigManager;
use crate::domain::configuration::{Configuration, ConfigurationDraft};
use crate::domain::field::Field;
use crate::engine::field_extractor;
use crate::engine::ordering::order_fields;
use crate::repository::store::ConfigurationStore;

/// 按 id 读取配置，不存在时返回 NotFound
pub(crate) fn load_configuration(
    store: &dyn ConfigurationStore,
    id: &str,
) -> ApiResult<Configuration> {
    validate_config_id(id)?;
    store
        .find_by_id(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Configuration(id={})不存在", id)))
}

// ==========================================
// ConfigurationApi - 表单配置 API
// ==========================================

/// 表单配置API
///
/// 职责：
/// 1. 配置查询（全部、单个）
/// 2. 配置创建/整体替换/删除
/// 3. 从上传模板或扁平样例派生字段
pub struct ConfigurationApi {
    store: Arc<dyn ConfigurationStore>,
    config_manager: Arc<ConfigManager>,
}

impl ConfigurationApi {
    /// 创建新的ConfigurationApi实例
    pub fn new(store: Arc<dyn ConfigurationStore>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            store,
            config_manager,
        }
    }

    /// 查询所有配置（按创建顺序）
    pub fn list_configurations(&self) -> ApiResult<Vec<Configuration>> {
        Ok(self.store.list()?)
    }

    /// 查询单个配置
    ///
    /// # 返回
    /// - Ok(Configuration): 配置
    /// - Err(ApiError::NotFound): 配置不存在
    /// - Err(ApiError::InvalidInput): id 为空或 "undefined"
    pub fn get_configuration(&self, id: &str) -> ApiResult<Configuration> {
        load_configuration(self.store.as_ref(), id)
    }

    /// 创建配置
    ///
    /// id 由系统生成（UUID v4）；草稿未给模板时使用导出设置中的默认模板
    pub fn create_configuration(&self, draft: ConfigurationDraft) -> ApiResult<Configuration> {
        let default_template = self.config_manager.get_default_filename_template()?;

        let mut config =
            Configuration::from_draft(Uuid::new_v4().to_string(), draft, &default_template);
        config.fields = order_fields(config.fields);

        self.store.insert(&config)?;

        tracing::info!(
            config_id = %config.id,
            name = %config.name,
            field_count = config.fields.len(),
            "配置已创建"
        );
        Ok(config)
    }

    /// 整体替换配置的名称与字段列表
    ///
    /// 草稿未给模板时保留原模板
    pub fn update_configuration(
        &self,
        id: &str,
        draft: ConfigurationDraft,
    ) -> ApiResult<Configuration> {
        let mut config = load_configuration(self.store.as_ref(), id)?;
        config.apply_draft(draft);
        config.fields = order_fields(config.fields);

        // 读取与写入之间被删除时同样视为不存在
        if !self.store.replace(&config)? {
            return Err(ApiError::NotFound(format!("Configuration(id={})不存在", id)));
        }

        tracing::info!(
            config_id = %config.id,
            field_count = config.fields.len(),
            "配置已更新"
        );
        Ok(config)
    }

    /// 删除配置，返回被删除的配置
    ///
    /// 已有提交记录不随之删除
    pub fn delete_configuration(&self, id: &str) -> ApiResult<Configuration> {
        validate_config_id(id)?;

        let removed = self
            .store
            .delete(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Configuration(id={})不存在", id)))?;

        tracing::info!(config_id = %removed.id, name = %removed.name, "配置已删除");
        Ok(removed)
    }

    /// 从 JSON 模板提取字段（<data["fieldN"]> 占位符）
    pub fn extract_template_fields(&self, template_json: &str) -> ApiResult<Vec<Field>> {
        Ok(field_extractor::extract_template_fields(template_json)?)
    }

    /// 从扁平 JSON 样例生成字段
    pub fn fields_from_sample(&self, sample_json: &str) -> ApiResult<Vec<Field>> {
        Ok(field_extractor::fields_from_sample(sample_json)?)
    }
}
