// ==========================================
// 配置驱动表单构建器 - 字段模型
// ==========================================
// 职责: 单个导出列的定义（名称、标签、默认值、必填级别、映射键）
// 线上格式: 保留 isMandatory / isOptional 两个布尔值以兼容旧数据
// ==========================================

use crate::domain::types::RequirementLevel;
use serde::{Deserialize, Serialize};

// ==========================================
// Field - 字段定义
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldRecord", into = "FieldRecord")]
pub struct Field {
    pub field_name: String,             // 字段名（来源路径或用户自定义）
    pub field_label: String,            // 显示标签
    pub default_value: Option<String>,  // 默认值（空字符串归一为 None）
    pub requirement: RequirementLevel,  // 必填级别
    pub mapping_key: String,            // 映射键 field<N>，允许为空
}

impl Field {
    /// 创建可选字段（无标签、无默认值）
    pub fn new(field_name: impl Into<String>, mapping_key: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_label: String::new(),
            default_value: None,
            requirement: RequirementLevel::Optional,
            mapping_key: mapping_key.into(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.field_label = label.into();
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = normalize_default(Some(value.into()));
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.requirement = RequirementLevel::Mandatory;
        self
    }

    /// 勾选/取消"必填"：同时反向设置"可选"
    pub fn set_mandatory(&mut self, on: bool) {
        self.requirement = if on {
            RequirementLevel::Mandatory
        } else {
            RequirementLevel::Optional
        };
    }

    /// 勾选/取消"可选"：同时反向设置"必填"
    pub fn set_optional(&mut self, on: bool) {
        self.set_mandatory(!on);
    }

    pub fn is_mandatory(&self) -> bool {
        self.requirement.is_mandatory()
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// 显示名称：标签为空时退回字段名
    pub fn display_label(&self) -> &str {
        if self.field_label.is_empty() {
            &self.field_name
        } else {
            &self.field_label
        }
    }
}

fn normalize_default(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ==========================================
// FieldRecord - 字段线上格式
// ==========================================
// 存储与外部接口使用的 camelCase 结构，读入时宽松（缺失/null 均可）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    #[serde(default)]
    pub field_name: Option<String>,
    #[serde(default)]
    pub field_label: Option<String>,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub is_mandatory: Option<bool>,
    #[serde(default)]
    pub is_optional: Option<bool>,
    #[serde(default)]
    pub mapping_key: Option<String>,
}

impl From<FieldRecord> for Field {
    fn from(record: FieldRecord) -> Self {
        Self {
            field_name: record.field_name.unwrap_or_default(),
            field_label: record.field_label.unwrap_or_default(),
            default_value: normalize_default(record.default_value),
            requirement: RequirementLevel::from_mandatory_flag(record.is_mandatory.unwrap_or(false)),
            mapping_key: record.mapping_key.unwrap_or_default(),
        }
    }
}

impl From<Field> for FieldRecord {
    fn from(field: Field) -> Self {
        let is_mandatory = field.requirement.is_mandatory();
        Self {
            field_name: Some(field.field_name),
            field_label: Some(field.field_label),
            default_value: Some(field.default_value.unwrap_or_default()),
            is_mandatory: Some(is_mandatory),
            is_optional: Some(!is_mandatory),
            mapping_key: Some(field.mapping_key),
        }
    }
}
