// ==========================================
// 配置驱动表单构建器 - 引擎层
// ==========================================
// 职责: 字段排序、提交解析、分隔文本序列化、文件名派生
// 约束: 纯内存变换，不拼 SQL，不做 I/O
// ==========================================

pub mod error;
pub mod field_extractor;
pub mod filename;
pub mod ordering;
pub mod payload;
pub mod resolver;
pub mod sample;
pub mod serializer;

// 重导出核心引擎
pub use error::{EngineError, EngineResult};
pub use field_extractor::{extract_template_fields, fields_from_sample};
pub use filename::{
    history_filename, submission_filename, timestamp_token, Clock, FixedClock, SystemClock,
    TIMESTAMP_PLACEHOLDER,
};
pub use ordering::{is_ordered, mapping_key_rank, order_fields, parse_mapping_key, MappingKeyRank};
pub use payload::payload_from_json;
pub use resolver::{ResolvedRow, RowSource, SubmissionResolver, HISTORY_LEADING_COLUMNS};
pub use sample::sample_payload;
pub use serializer::{DelimitedFormat, DelimitedSerializer, Quoting};
