// ==========================================
// 配置驱动表单构建器 - 提交记录
// ==========================================
// 职责: 一次终端用户提交（创建后不可变）
// 约束: config_id 为弱引用，配置删除后提交记录仍保留
// ==========================================

use crate::domain::payload::Payload;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub submission_id: String,
    pub config_id: String,
    pub timestamp: DateTime<Utc>,
    pub data: Payload, // 字段名 → 值
}

impl Submission {
    /// 创建新的提交记录（自动生成 UUID）
    pub fn new(config_id: impl Into<String>, data: Payload, timestamp: DateTime<Utc>) -> Self {
        Self {
            submission_id: Uuid::new_v4().to_string(),
            config_id: config_id.into(),
            timestamp,
            data,
        }
    }

    /// ISO-8601 时间戳（毫秒精度，Z 结尾），用于导出列与存储
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_iso_millis() {
        let ts = Utc.with_ymd_and_hms(2025, 4, 5, 13, 27, 30).unwrap()
            + chrono::Duration::milliseconds(123);
        let submission = Submission::new("c1", Payload::new(), ts);

        assert_eq!(submission.timestamp_iso(), "2025-04-05T13:27:30.123Z");
        assert!(!submission.submission_id.is_empty());
    }
}
