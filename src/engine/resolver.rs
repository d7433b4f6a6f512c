// ==========================================
// 配置驱动表单构建器 - 提交解析器
// ==========================================
// 职责: 将有序字段列表与任意键值数据对齐，产出有序的单元格行
// ==========================================
// 一个解析操作，三个参数:
// - JoinKey:          用字段的哪个属性查找值（同时作为表头）
// - LeadingColumn[]:  固定前置列（submissionId / timestamp）
// - EmptyValuePolicy: 缺失值填空串还是填字段默认值
//
// 两种预设:
// - direct():  按映射键查找，无前置列（单条直接提交）
// - history(): 按字段名查找，前置 submissionId + timestamp（历史批量导出）
//
// 必填字段缺失不是解析器的错误，校验在更外层完成
// ==========================================

use crate::domain::field::Field;
use crate::domain::payload::Payload;
use crate::domain::submission::Submission;
use crate::domain::types::{EmptyValuePolicy, JoinKey, LeadingColumn};

/// 解析后的一行单元格
pub type ResolvedRow = Vec<String>;

/// 历史导出的固定前置列
pub const HISTORY_LEADING_COLUMNS: [LeadingColumn; 2] =
    [LeadingColumn::SubmissionId, LeadingColumn::Timestamp];

// ==========================================
// RowSource - 行数据来源
// ==========================================
pub trait RowSource {
    /// 键值数据
    fn values(&self) -> &Payload;

    /// 前置列的值（数据源不提供时为空串）
    fn leading_value(&self, _column: LeadingColumn) -> String {
        String::new()
    }
}

impl RowSource for Payload {
    fn values(&self) -> &Payload {
        self
    }
}

impl RowSource for Submission {
    fn values(&self) -> &Payload {
        &self.data
    }

    fn leading_value(&self, column: LeadingColumn) -> String {
        match column {
            LeadingColumn::SubmissionId => self.submission_id.clone(),
            LeadingColumn::Timestamp => self.timestamp_iso(),
        }
    }
}

// ==========================================
// SubmissionResolver - 提交解析器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct SubmissionResolver<'a> {
    fields: &'a [Field],
    join_key: JoinKey,
    leading: &'a [LeadingColumn],
    empty_policy: EmptyValuePolicy,
}

impl<'a> SubmissionResolver<'a> {
    pub fn new(fields: &'a [Field], join_key: JoinKey) -> Self {
        Self {
            fields,
            join_key,
            leading: &[],
            empty_policy: EmptyValuePolicy::Blank,
        }
    }

    /// 直接提交模式
    pub fn direct(fields: &'a [Field]) -> Self {
        Self::new(fields, JoinKey::MappingKey)
    }

    /// 历史批量导出模式
    pub fn history(fields: &'a [Field]) -> Self {
        Self::new(fields, JoinKey::FieldName).with_leading_columns(&HISTORY_LEADING_COLUMNS)
    }

    pub fn with_leading_columns(mut self, leading: &'a [LeadingColumn]) -> Self {
        self.leading = leading;
        self
    }

    pub fn with_empty_policy(mut self, policy: EmptyValuePolicy) -> Self {
        self.empty_policy = policy;
        self
    }

    pub fn join_key(&self) -> JoinKey {
        self.join_key
    }

    /// 列数（前置列 + 字段列）
    pub fn width(&self) -> usize {
        self.leading.len() + self.fields.len()
    }

    /// 表头：前置列名 + 各字段的连接键属性
    pub fn header(&self) -> Vec<String> {
        self.leading
            .iter()
            .map(|c| c.header().to_string())
            .chain(self.fields.iter().map(|f| self.lookup_key(f).to_string()))
            .collect()
    }

    /// 解析单行
    pub fn resolve<S: RowSource + ?Sized>(&self, source: &S) -> ResolvedRow {
        let values = source.values();
        let mut row = Vec::with_capacity(self.width());

        row.extend(self.leading.iter().map(|c| source.leading_value(*c)));

        for field in self.fields {
            let cell = match values.get(self.lookup_key(field)) {
                Some(v) => v.to_string(),
                None => self.fill_missing(field),
            };
            row.push(cell);
        }

        tracing::debug!(
            join_key = %self.join_key,
            columns = row.len(),
            "解析行完成"
        );
        row
    }

    /// 解析多行，保持输入顺序
    pub fn resolve_all<'s, S, I>(&self, sources: I) -> Vec<ResolvedRow>
    where
        S: RowSource + 's,
        I: IntoIterator<Item = &'s S>,
    {
        sources.into_iter().map(|s| self.resolve(s)).collect()
    }

    fn lookup_key<'f>(&self, field: &'f Field) -> &'f str {
        match self.join_key {
            JoinKey::MappingKey => &field.mapping_key,
            JoinKey::FieldName => &field.field_name,
        }
    }

    fn fill_missing(&self, field: &Field) -> String {
        match self.empty_policy {
            EmptyValuePolicy::Blank => String::new(),
            EmptyValuePolicy::FieldDefault => field.default_value().unwrap_or_default().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_fields() -> Vec<Field> {
        vec![
            Field::new("name", "field1"),
            Field::new("age", "field2").with_default("18"),
            Field::new("city", "field3").mandatory(),
        ]
    }

    #[test]
    fn test_direct_resolves_by_mapping_key() {
        let fields = sample_fields();
        let payload: Payload = [("field1", "John"), ("field2", "30"), ("name", "ignored")]
            .into_iter()
            .collect();

        let resolver = SubmissionResolver::direct(&fields);
        assert_eq!(resolver.header(), vec!["field1", "field2", "field3"]);

        let row = resolver.resolve(&payload);
        assert_eq!(row.len(), fields.len());
        // 必填字段缺失不报错，填空串
        assert_eq!(row, vec!["John", "30", ""]);
    }

    #[test]
    fn test_direct_ignores_field_name_keys() {
        let fields = sample_fields();
        let payload: Payload = [("name", "John")].into_iter().collect();

        let row = SubmissionResolver::direct(&fields).resolve(&payload);
        assert_eq!(row, vec!["", "", ""]);
    }

    #[test]
    fn test_field_default_policy() {
        let fields = sample_fields();
        let payload = Payload::new();

        let row = SubmissionResolver::direct(&fields)
            .with_empty_policy(EmptyValuePolicy::FieldDefault)
            .resolve(&payload);
        assert_eq!(row, vec!["", "18", ""]);
    }

    #[test]
    fn test_history_prepends_fixed_columns() {
        let fields = sample_fields();
        let ts = Utc.with_ymd_and_hms(2025, 4, 5, 13, 27, 30).unwrap();
        let mut submission = Submission::new(
            "c1",
            [("name", "Ann"), ("city", "Oslo"), ("field1", "ignored")]
                .into_iter()
                .collect(),
            ts,
        );
        submission.submission_id = "s1".to_string();

        let resolver = SubmissionResolver::history(&fields);
        assert_eq!(
            resolver.header(),
            vec!["submissionId", "timestamp", "name", "age", "city"]
        );

        let rows = resolver.resolve_all(&[submission]);
        assert_eq!(
            rows,
            vec![vec!["s1", "2025-04-05T13:27:30.000Z", "Ann", "", "Oslo"]]
        );
    }

    #[test]
    fn test_payload_source_has_blank_leading_values() {
        let fields = vec![Field::new("name", "field1")];
        let payload: Payload = [("name", "Ann")].into_iter().collect();

        let row = SubmissionResolver::new(&fields, JoinKey::FieldName)
            .with_leading_columns(&HISTORY_LEADING_COLUMNS)
            .resolve(&payload);
        assert_eq!(row, vec!["", "", "Ann"]);
    }
}
