// ==========================================
// 配置驱动表单构建器 - 样例载荷生成
// ==========================================
// 为配置生成一份可直接提交的模拟载荷（键为映射键）
// 值: 字段默认值；无默认值时为 "Sample Value <N>"
// 映射键为空的字段跳过
// ==========================================

use crate::domain::field::Field;
use crate::domain::payload::Payload;
use crate::engine::ordering::MAPPING_KEY_PREFIX;

pub fn sample_payload(fields: &[Field]) -> Payload {
    fields
        .iter()
        .filter(|f| !f.mapping_key.is_empty())
        .map(|f| {
            let value = match f.default_value() {
                Some(default) => default.to_string(),
                None => format!("Sample {}", f.mapping_key.replacen(MAPPING_KEY_PREFIX, "Value ", 1)),
            };
            (f.mapping_key.clone(), value)
        })
        .collect()
}
