// ==========================================
// 配置驱动表单构建器 - 领域类型定义
// ==========================================
// 职责: 字段必填级别、解析连接键、固定前置列、空值策略
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 必填级别 (Requirement Level)
// ==========================================
// 取代 isMandatory / isOptional 两个独立布尔值
// 两者互斥由类型保证，不存在"都为真/都为假"的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementLevel {
    Mandatory, // 必填
    #[default]
    Optional, // 可选
}

impl RequirementLevel {
    /// 从旧数据的 isMandatory 标志构造
    ///
    /// isOptional 不参与判断：两者冲突时以 isMandatory 为准
    pub fn from_mandatory_flag(is_mandatory: bool) -> Self {
        if is_mandatory {
            RequirementLevel::Mandatory
        } else {
            RequirementLevel::Optional
        }
    }

    pub fn is_mandatory(self) -> bool {
        self == RequirementLevel::Mandatory
    }

    pub fn is_optional(self) -> bool {
        self == RequirementLevel::Optional
    }
}

impl fmt::Display for RequirementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementLevel::Mandatory => write!(f, "MANDATORY"),
            RequirementLevel::Optional => write!(f, "OPTIONAL"),
        }
    }
}

// ==========================================
// 连接键 (Join Key)
// ==========================================
// 解析时用字段的哪个属性去查找载荷中的值，同时也是导出表头
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinKey {
    MappingKey, // 直接提交（机器调用）
    FieldName,  // 历史提交批量导出
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinKey::MappingKey => write!(f, "mappingKey"),
            JoinKey::FieldName => write!(f, "fieldName"),
        }
    }
}

// ==========================================
// 固定前置列 (Leading Column)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadingColumn {
    SubmissionId,
    Timestamp,
}

impl LeadingColumn {
    /// 导出表头中的列名
    pub fn header(self) -> &'static str {
        match self {
            LeadingColumn::SubmissionId => "submissionId",
            LeadingColumn::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for LeadingColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ==========================================
// 空值策略 (Empty Value Policy)
// ==========================================
// 载荷中缺失/为 null 的值如何填充
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmptyValuePolicy {
    #[default]
    Blank, // 空字符串
    FieldDefault, // 字段默认值，无默认值时为空字符串
}
