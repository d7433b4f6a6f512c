// ==========================================
// 配置驱动表单构建器 - 映射键排序
// ==========================================
// 职责: 按映射键数字后缀对字段做稳定升序排序
// 调用点: 仅在配置创建/更新时调用，导出时不再重排
// ==========================================
// 规则:
// - 合规映射键: "field" + 至少一位 ASCII 数字，数值可放入 u64
// - 不合规映射键（空、前缀不同、尾部杂字符、溢出）不报错，
//   统一排在所有合规字段之后，彼此保持输入顺序
// ==========================================

use crate::domain::field::Field;

/// 映射键固定前缀
pub const MAPPING_KEY_PREFIX: &str = "field";

/// 排序位次
///
/// 派生的 Ord 保证 Indexed 全部排在 Unindexed 之前
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MappingKeyRank {
    Indexed(u64),
    Unindexed,
}

/// 解析映射键数字后缀，不合规时返回 None
pub fn parse_mapping_key(key: &str) -> Option<u64> {
    let digits = key.strip_prefix(MAPPING_KEY_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok()
}

pub fn mapping_key_rank(key: &str) -> MappingKeyRank {
    match parse_mapping_key(key) {
        Some(n) => MappingKeyRank::Indexed(n),
        None => MappingKeyRank::Unindexed,
    }
}

/// 按映射键排序（稳定排序，幂等）
pub fn order_fields(mut fields: Vec<Field>) -> Vec<Field> {
    for field in fields.iter().filter(|f| parse_mapping_key(&f.mapping_key).is_none()) {
        tracing::warn!(
            field_name = %field.field_name,
            mapping_key = %field.mapping_key,
            "映射键不合规，排在合规字段之后"
        );
    }

    // sort_by_key 为稳定排序
    fields.sort_by_key(|f| mapping_key_rank(&f.mapping_key));
    fields
}

/// 字段是否已按映射键有序
pub fn is_ordered(fields: &[Field]) -> bool {
    fields
        .windows(2)
        .all(|w| mapping_key_rank(&w[0].mapping_key) <= mapping_key_rank(&w[1].mapping_key))
}
