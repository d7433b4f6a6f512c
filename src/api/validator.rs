// ==========================================
// 配置驱动表单构建器 - 输入校验
// ==========================================
// 职责: 路径参数校验、终端用户表单必填校验与提交数据构建
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::field::Field;
use crate::domain::payload::Payload;

/// 前端未取到 id 时会传字面量 "undefined"
const UNDEFINED_LITERAL: &str = "undefined";

/// 校验配置 id：非空白，且不是 "undefined"
pub fn validate_config_id(id: &str) -> ApiResult<()> {
    let trimmed = id.trim();
    if trimmed.is_empty() || trimmed == UNDEFINED_LITERAL {
        return Err(ApiError::InvalidInput(format!(
            "配置ID无效: {:?}",
            id
        )));
    }
    Ok(())
}

/// 校验终端用户表单的必填字段
///
/// 必填且无默认值的字段，输入值去掉首尾空白后不能为空。
/// 返回第一个缺失字段的展示标签。
pub fn validate_mandatory_fields(fields: &[Field], values: &Payload) -> ApiResult<()> {
    for field in fields {
        if !field.is_mandatory() || field.default_value().is_some() {
            continue;
        }

        let filled = values
            .get(&field.field_name)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false);

        if !filled {
            return Err(ApiError::MissingMandatoryField {
                field: field.display_label().to_string(),
            });
        }
    }
    Ok(())
}

/// 构建表单提交数据（键为字段名）
///
/// 有默认值的字段始终取默认值，否则取输入值，未输入为空串
pub fn build_form_submission_data(fields: &[Field], values: &Payload) -> Payload {
    fields
        .iter()
        .map(|field| {
            let value = field
                .default_value()
                .or_else(|| values.get(&field.field_name))
                .unwrap_or_default();
            (field.field_name.clone(), value.to_string())
        })
        .collect()
}
