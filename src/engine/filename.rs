// ==========================================
// 配置驱动表单构建器 - 文件名/时间戳派生
// ==========================================
// 职责: 由模板 + 当前时刻生成下载文件名
// ==========================================
// 时间戳: UTC，YYYY-MM-DDTHH-MM-SS（秒精度，无毫秒、无时区后缀）
// 单条导出文件名:
// - 模板含 {timestamp} 占位符: 原位替换（所有出现处），再加 .csv
// - 模板不含占位符: 追加 _<时间戳>.csv
// 批量导出文件名: <配置名>_submissions.csv（不带时间戳）
// 文件名为单一路径片段: 路径分隔符、控制字符替换为 '_'，开头的 '.' 同样替换
// ==========================================

use chrono::{DateTime, Utc};

/// 模板中的时间戳占位符
pub const TIMESTAMP_PLACEHOLDER: &str = "{timestamp}";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

// ==========================================
// Clock - 时钟端口
// ==========================================
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 固定时钟（测试、回放用）
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 时间戳片段
pub fn timestamp_token(instant: DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// 单条直接提交导出文件名
pub fn submission_filename(template: &str, instant: DateTime<Utc>) -> String {
    let token = timestamp_token(instant);
    let name = if template.contains(TIMESTAMP_PLACEHOLDER) {
        format!("{}.csv", template.replace(TIMESTAMP_PLACEHOLDER, &token))
    } else {
        format!("{}_{}.csv", template, token)
    };
    sanitize_filename(&name)
}

/// 历史提交批量导出文件名
pub fn history_filename(config_name: &str) -> String {
    sanitize_filename(&format!("{}_submissions.csv", config_name))
}

/// 把名称收敛为单一路径片段（不会跳出输出目录）
pub fn sanitize_filename(name: &str) -> String {
    let mut leading = true;
    name.chars()
        .map(|c| {
            let replace = matches!(c, '/' | '\\') || c.is_control() || (leading && c == '.');
            if c != '.' {
                leading = false;
            }
            if replace {
                '_'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-04-05T13:27:30.123Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_timestamp_token_drops_millis() {
        assert_eq!(timestamp_token(instant()), "2025-04-05T13-27-30");
    }

    #[test]
    fn test_template_without_placeholder_appends() {
        assert_eq!(
            submission_filename("CONFIG", instant()),
            "CONFIG_2025-04-05T13-27-30.csv"
        );
    }

    #[test]
    fn test_placeholder_substituted_in_place() {
        assert_eq!(
            submission_filename("CONFIG_{timestamp}", instant()),
            "CONFIG_2025-04-05T13-27-30.csv"
        );
        assert_eq!(
            submission_filename("{timestamp}-orders", instant()),
            "2025-04-05T13-27-30-orders.csv"
        );
    }

    #[test]
    fn test_history_filename() {
        assert_eq!(history_filename("Orders"), "Orders_submissions.csv");
    }

    #[test]
    fn test_names_stay_in_one_path_segment() {
        assert_eq!(history_filename("../escaped"), "___escaped_submissions.csv");
        assert_eq!(history_filename("a\\b\nc"), "a_b_c_submissions.csv");
        assert_eq!(
            submission_filename("/tmp/out", instant()),
            "_tmp_out_2025-04-05T13-27-30.csv"
        );
        assert_eq!(
            submission_filename("v1.2_{timestamp}", instant()),
            "v1.2_2025-04-05T13-27-30.csv"
        );
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new(instant());
        assert_eq!(clock.now(), instant());
    }
}
