// ==========================================
// 配置驱动表单构建器 - 载荷归一化
// ==========================================
// 职责: JSON 提交体 → 扁平 Payload
// 规则:
// - 顶层必须是 JSON 对象
// - 字符串原样保留，数字/布尔转字符串，null 视为缺失
// - 值为对象/数组时拒绝（不做任何隐式拍平）
// ==========================================

use crate::domain::payload::Payload;
use crate::engine::error::{EngineError, EngineResult};
use serde_json::{Number, Value};

/// 将 JSON 提交体转换为 Payload
pub fn payload_from_json(value: &Value) -> EngineResult<Payload> {
    let object = value.as_object().ok_or_else(|| {
        EngineError::InvalidPayloadShape(format!(
            "提交体必须是 JSON 对象，实际为 {}",
            json_kind(value)
        ))
    })?;

    let mut payload = Payload::new();
    for (key, raw) in object {
        match raw {
            Value::Null => {}
            Value::String(s) => payload.insert(key.clone(), s.clone()),
            Value::Bool(b) => payload.insert(key.clone(), b.to_string()),
            Value::Number(n) => payload.insert(key.clone(), number_to_string(n)),
            Value::Array(_) | Value::Object(_) => {
                return Err(EngineError::InvalidPayloadShape(format!(
                    "键 {} 的值为 {}，只接受标量值",
                    key,
                    json_kind(raw)
                )));
            }
        }
    }

    Ok(payload)
}

/// 数字转字符串，输出与前端 String(n) 一致
///
/// 整数原样输出；浮点数取最短往返表示，按 ECMAScript Number::toString 规则
/// 选择定点或指数形式（-0 输出 "0"，指数带符号，如 1e+21、1e-7）
fn number_to_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => js_float_to_string(f),
        _ => n.to_string(),
    }
}

fn js_float_to_string(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    if !f.is_finite() {
        return f.to_string();
    }

    // {:e} 给出最短往返数字串，形如 "1.2345e-7"
    let sci = format!("{:e}", f.abs());
    let (mantissa, exponent) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return f.to_string(),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = match exponent.parse() {
        Ok(e) => e,
        Err(_) => return f.to_string(),
    };

    let k = digits.len() as i32;
    let n = exponent + 1;
    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        format!("{}.{}", int_part, frac_part)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, (n - 1).abs())
        } else {
            format!("{}.{}e{}{}", first, rest, sign, (n - 1).abs())
        }
    };

    if f < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_are_stringified() {
        let payload = payload_from_json(&json!({
            "field1": "John",
            "field2": 30,
            "field3": 2.5,
            "field4": 40.0,
            "field5": true,
            "field6": null
        }))
        .unwrap();

        assert_eq!(payload.get("field1"), Some("John"));
        assert_eq!(payload.get("field2"), Some("30"));
        assert_eq!(payload.get("field3"), Some("2.5"));
        assert_eq!(payload.get("field4"), Some("40"));
        assert_eq!(payload.get("field5"), Some("true"));
        assert_eq!(payload.get("field6"), None);
        assert_eq!(payload.len(), 5);
    }

    #[test]
    fn test_non_object_rejected() {
        let err = payload_from_json(&json!(["field1", "John"])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPayloadShape(_)));
    }

    #[test]
    fn test_nested_value_rejected() {
        let err = payload_from_json(&json!({"field1": {"first": "John"}})).unwrap_err();
        match err {
            EngineError::InvalidPayloadShape(msg) => assert!(msg.contains("field1")),
            other => panic!("Expected InvalidPayloadShape, got {:?}", other),
        }
    }

    #[test]
    fn test_float_rendering_matches_js() {
        let cases = [
            (-0.0, "0"),
            (1e21, "1e+21"),
            (1e20, "100000000000000000000"),
            (1.5e-7, "1.5e-7"),
            (0.000001, "0.000001"),
            (0.1, "0.1"),
            (-2.5, "-2.5"),
            (123.456, "123.456"),
            (1.7976931348623157e308, "1.7976931348623157e+308"),
        ];
        for (value, expected) in cases {
            assert_eq!(js_float_to_string(value), expected, "value={:?}", value);
        }
    }
}
