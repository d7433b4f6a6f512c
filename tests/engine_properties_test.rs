// ==========================================
// 引擎层性质测试
// ==========================================
// 测试范围:
// 1. 映射键排序: 升序、稳定、幂等
// 2. 解析器: 行宽 = 字段数，位置对齐
// 3. 序列化器: 单行/多行格式、列数校验
// 4. 文件名派生
// ==========================================


use form_config_export::domain::{Field, Payload};
use form_config_export::engine::{
    history_filename, is_ordered, order_fields, submission_filename, timestamp_token,
    DelimitedFormat, DelimitedSerializer, EngineError, SubmissionResolver,
};
use test_helpers::fixed_instant;

fn fields_with_keys(keys: &[&str]) -> Vec<Field> {
    keys.iter()
        .enumerate()
        .map(|(i, k)| Field::new(format!("f{}", i), *k))
        .collect()
}

fn mapping_keys(fields: &[Field]) -> Vec<String> {
    fields.iter().map(|f| f.mapping_key.clone()).collect()
}

// ==========================================
// 映射键排序
// ==========================================

#[test]
fn test_order_fields_升序且幂等() {
    let fields = fields_with_keys(&["field12", "field2", "field100", "field1", "field2"]);

    let once = order_fields(fields);
    assert_eq!(
        mapping_keys(&once),
        vec!["field1", "field2", "field2", "field12", "field100"]
    );
    assert!(is_ordered(&once));

    // 相同键保持输入顺序（f1 在 f4 之前）
    let names: Vec<&str> = once.iter().map(|f| f.field_name.as_str()).collect();
    assert_eq!(names, vec!["f3", "f1", "f4", "f0", "f2"]);

    let twice = order_fields(once.clone());
    assert_eq!(twice, once);
}

#[test]
fn test_order_fields_前导零与溢出() {
    let fields = fields_with_keys(&["field99999999999999999999", "field010", "field9"]);
    let ordered = order_fields(fields);

    assert_eq!(
        mapping_keys(&ordered),
        vec!["field9", "field010", "field99999999999999999999"]
    );
}

// ==========================================
// 解析器
// ==========================================

#[test]
fn test_resolver_行宽与位置对齐() {
    let fields = fields_with_keys(&["field1", "field2", "field3"]);
    let payload: Payload = [("field3", "c"), ("field1", "a"), ("other", "x")]
        .into_iter()
        .collect();

    let row = SubmissionResolver::direct(&fields).resolve(&payload);
    assert_eq!(row.len(), fields.len());
    assert_eq!(row, vec!["a", "", "c"]);
}

// ==========================================
// 序列化器
// ==========================================

#[test]
fn test_serialize_single_row() {
    let header = vec!["h1".to_string(), "h2".to_string()];
    let row = vec!["v1".to_string(), "v2".to_string()];

    let doc = DelimitedSerializer::single_row()
        .serialize_single(&header, &row)
        .unwrap();
    assert_eq!(doc, "h1|h2\nv1|v2");
}

#[test]
fn test_serialize_multi_row_不移位() {
    let header = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let rows = vec![vec![
        "x".to_string(),
        "He said \"hi\", ok".to_string(),
        "y".to_string(),
    ]];

    let doc = DelimitedSerializer::multi_row().serialize(&header, &rows).unwrap();
    assert_eq!(doc, "a,b,c\n\"x\",\"He said \"\"hi\"\", ok\",\"y\"");
}

#[test]
fn test_serialize_零行只有表头() {
    let header = vec!["a".to_string(), "b".to_string()];
    let doc = DelimitedSerializer::multi_row().serialize(&header, &[]).unwrap();
    assert_eq!(doc, "a,b");
}

#[test]
fn test_serialize_列数不一致() {
    let header = vec!["a".to_string(), "b".to_string()];
    let rows = vec![vec!["only".to_string()]];

    match DelimitedSerializer::multi_row().serialize(&header, &rows) {
        Err(EngineError::ColumnCountMismatch {
            row,
            expected,
            actual,
        }) => {
            assert_eq!((row, expected, actual), (1, 2, 1));
        }
        other => panic!("Expected ColumnCountMismatch, got {:?}", other),
    }
}

#[test]
fn test_serialize_非法分隔符() {
    let header = vec!["a".to_string()];
    let serializer = DelimitedSerializer::new(DelimitedFormat::MULTI_ROW.with_delimiter(b'"'));
    assert!(matches!(
        serializer.serialize(&header, &[]),
        Err(EngineError::InvalidDelimiter('"'))
    ));
}

// ==========================================
// 文件名派生
// ==========================================

#[test]
fn test_filename_时间戳片段() {
    let instant = fixed_instant();

    assert_eq!(timestamp_token(instant), "2025-04-05T13-27-30");
    assert_eq!(submission_filename("CONFIG", instant), "CONFIG_2025-04-05T13-27-30.csv");
    assert_eq!(
        submission_filename("CONFIG_{timestamp}", instant),
        "CONFIG_2025-04-05T13-27-30.csv"
    );
    assert_eq!(
        submission_filename("{timestamp}_report", instant),
        "2025-04-05T13-27-30_report.csv"
    );
    assert_eq!(history_filename("People"), "People_submissions.csv");
}
