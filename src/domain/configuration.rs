// ==========================================
// 配置驱动表单构建器 - 表单配置模型
// ==========================================
// 职责: 命名的有序字段集合 + 导出文件名模板
// 约束: fields 的存储顺序即导出列顺序（创建/更新时按映射键排序）
// ==========================================

use crate::domain::field::Field;
use serde::{Deserialize, Serialize};

/// 默认文件名模板
pub const DEFAULT_FILENAME_TEMPLATE: &str = "CONFIG_{timestamp}";

fn default_filename_template() -> String {
    DEFAULT_FILENAME_TEMPLATE.to_string()
}

// ==========================================
// Configuration - 表单配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub id: String, // UUID，创建时生成，永不重新分配
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default = "default_filename_template")]
    pub filename_template: String,
}

impl Configuration {
    /// 由草稿构建新配置
    ///
    /// 草稿未给出模板时使用 default_template
    pub fn from_draft(id: String, draft: ConfigurationDraft, default_template: &str) -> Self {
        Self {
            id,
            name: draft.name,
            fields: draft.fields,
            filename_template: draft
                .filename_template
                .unwrap_or_else(|| default_template.to_string()),
        }
    }

    /// 整体替换名称和字段列表（不支持单字段补丁）
    ///
    /// 草稿未给出模板时保留原模板
    pub fn apply_draft(&mut self, draft: ConfigurationDraft) {
        self.name = draft.name;
        self.fields = draft.fields;
        if let Some(template) = draft.filename_template {
            self.filename_template = template;
        }
    }

    pub fn mapping_keys(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.mapping_key.as_str()).collect()
    }
}

// ==========================================
// ConfigurationDraft - 创建/更新输入
// ==========================================
// 不含 id：创建时生成，更新时由路径参数给出
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub filename_template: Option<String>,
}

impl ConfigurationDraft {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            filename_template: None,
        }
    }

    pub fn with_filename_template(mut self, template: impl Into<String>) -> Self {
        self.filename_template = Some(template.into());
        self
    }
}
