// ==========================================
// 配置驱动表单构建器 - 字段提取器
// ==========================================
// 职责: 从上传的 JSON 文档派生字段列表
// ==========================================
// 模板模式 extract_template_fields:
// - 递归遍历对象属性，值为以 <data[ 开头的字符串时生成一个字段
// - 字段名 = 标签 = 属性路径（a.b.c，数组元素为 [i]）
// - 映射键取 <data["..."]> / <data['...']> 引号内文本，格式不符时为空
// - 数组中直接出现的占位符字符串（非键值对）跳过
// 样例模式 fields_from_sample:
// - 扁平 JSON 对象，每个顶层键生成一个字段，映射键为空
// ==========================================

use crate::domain::field::Field;
use crate::engine::error::{EngineError, EngineResult};
use serde_json::Value;

const PLACEHOLDER_OPEN: &str = "<data[";
const PLACEHOLDER_CLOSE: &str = "]>";

/// 从 JSON 模板提取字段（按文档顺序）
pub fn extract_template_fields(source: &str) -> EngineResult<Vec<Field>> {
    let document: Value =
        serde_json::from_str(source).map_err(|e| EngineError::InvalidTemplate(e.to_string()))?;

    let mut fields = Vec::new();
    collect_placeholders(&document, "", &mut fields);

    tracing::info!(count = fields.len(), "模板字段提取完成");
    Ok(fields)
}

/// 从扁平 JSON 样例生成字段
pub fn fields_from_sample(source: &str) -> EngineResult<Vec<Field>> {
    let document: Value =
        serde_json::from_str(source).map_err(|e| EngineError::InvalidTemplate(e.to_string()))?;

    let object = document
        .as_object()
        .ok_or_else(|| EngineError::InvalidTemplate("样例必须是 JSON 对象".to_string()))?;

    Ok(object
        .keys()
        .map(|key| Field::new(key.clone(), "").with_label(key.clone()))
        .collect())
}

fn collect_placeholders(node: &Value, parent_path: &str, out: &mut Vec<Field>) {
    match node {
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                let path = format!("{}[{}]", parent_path, idx);
                collect_placeholders(item, &path, out);
            }
        }
        Value::Object(map) => {
            for (key, value) in map {
                let path = if parent_path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", parent_path, key)
                };

                match value {
                    Value::Object(_) | Value::Array(_) => collect_placeholders(value, &path, out),
                    Value::String(s) if s.starts_with(PLACEHOLDER_OPEN) => {
                        out.push(Field::new(path.clone(), placeholder_mapping_key(s)).with_label(path));
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

/// 解析 <data["key"]> 或 <data['key']>，不匹配时返回空串
fn placeholder_mapping_key(raw: &str) -> String {
    let inner = raw
        .strip_prefix(PLACEHOLDER_OPEN)
        .and_then(|rest| rest.strip_suffix(PLACEHOLDER_CLOSE));

    let Some(quoted) = inner else {
        return String::new();
    };

    let mut chars = quoted.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && (open == '"' || open == '\'') => {
            quoted[1..quoted.len() - 1].to_string()
        }
        _ => String::new(),
    }
}
