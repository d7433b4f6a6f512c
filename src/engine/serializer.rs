// ==========================================
// 配置驱动表单构建器 - 分隔文本序列化器
// ==========================================
// 职责: 表头 + 若干解析行 → 完整文档文本（整体物化，不做流式）
// ==========================================
// 两种默认格式（兼容要求，不可互换）:
// - 单行模式  '|'，不加引号，值原样写入；只适用于不含分隔符的值
// - 多行模式  ','，每个数据单元格加双引号，内部双引号加倍
// 共同约定:
// - 行之间以 '\n' 连接，末尾不带换行
// - 表头行总是以分隔符原样拼接（不加引号）
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use csv::{QuoteStyle, Terminator, WriterBuilder};

/// 引号策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    Never,
    Always,
}

/// 分隔格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedFormat {
    pub delimiter: u8,
    pub quoting: Quoting,
}

impl DelimitedFormat {
    /// 单条直接提交导出
    pub const SINGLE_ROW: Self = Self {
        delimiter: b'|',
        quoting: Quoting::Never,
    };

    /// 历史提交批量导出
    pub const MULTI_ROW: Self = Self {
        delimiter: b',',
        quoting: Quoting::Always,
    };

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// 分隔符必须是单个 ASCII 字符，且不能是引号/换行
    pub fn validate(&self) -> EngineResult<()> {
        let c = self.delimiter as char;
        if !self.delimiter.is_ascii() || matches!(c, '"' | '\n' | '\r') {
            return Err(EngineError::InvalidDelimiter(c));
        }
        Ok(())
    }
}

// ==========================================
// DelimitedSerializer
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct DelimitedSerializer {
    format: DelimitedFormat,
}

impl DelimitedSerializer {
    pub fn new(format: DelimitedFormat) -> Self {
        Self { format }
    }

    pub fn single_row() -> Self {
        Self::new(DelimitedFormat::SINGLE_ROW)
    }

    pub fn multi_row() -> Self {
        Self::new(DelimitedFormat::MULTI_ROW)
    }

    pub fn format(&self) -> DelimitedFormat {
        self.format
    }

    /// 序列化表头 + 单行（直接提交导出）
    pub fn serialize_single(&self, header: &[String], row: &[String]) -> EngineResult<String> {
        let rows = [row.to_vec()];
        self.serialize(header, &rows)
    }

    /// 序列化表头 + 任意行数
    ///
    /// 行宽与表头不一致时返回 ColumnCountMismatch
    pub fn serialize(&self, header: &[String], rows: &[Vec<String>]) -> EngineResult<String> {
        self.format.validate()?;

        for (idx, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(EngineError::ColumnCountMismatch {
                    row: idx + 1,
                    expected: header.len(),
                    actual: row.len(),
                });
            }
        }

        let separator = (self.format.delimiter as char).to_string();
        let mut document = header.join(&separator);

        if rows.is_empty() {
            return Ok(document);
        }

        let body = match self.format.quoting {
            Quoting::Never => rows
                .iter()
                .map(|row| row.join(&separator))
                .collect::<Vec<_>>()
                .join("\n"),
            Quoting::Always => self.write_quoted(rows)?,
        };

        document.push('\n');
        document.push_str(&body);
        Ok(document)
    }

    /// 使用 csv 写出全引号数据行（内部双引号加倍）
    fn write_quoted(&self, rows: &[Vec<String>]) -> EngineResult<String> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.format.delimiter)
            .quote_style(QuoteStyle::Always)
            .double_quote(true)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        for row in rows {
            writer.write_record(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| EngineError::Serialize(e.to_string()))?;
        let text = String::from_utf8(bytes).map_err(|e| EngineError::Serialize(e.to_string()))?;

        Ok(text.strip_suffix('\n').unwrap_or(text.as_str()).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_single_row_exact_output() {
        let doc = DelimitedSerializer::single_row()
            .serialize_single(&strings(&["h1", "h2"]), &strings(&["v1", "v2"]))
            .unwrap();
        assert_eq!(doc, "h1|h2\nv1|v2");
    }

    #[test]
    fn test_single_row_values_are_verbatim() {
        let doc = DelimitedSerializer::single_row()
            .serialize_single(&strings(&["a", "b"]), &strings(&["say \"hi\"", ""]))
            .unwrap();
        assert_eq!(doc, "a|b\nsay \"hi\"|");
    }

    #[test]
    fn test_single_row_one_empty_cell() {
        let doc = DelimitedSerializer::single_row()
            .serialize_single(&strings(&["field1"]), &strings(&[""]))
            .unwrap();
        assert_eq!(doc, "field1\n");
    }

    #[test]
    fn test_multi_row_quotes_and_escapes() {
        let header = strings(&["submissionId", "comment", "after"]);
        let rows = vec![
            strings(&["s1", "He said \"hi\", ok", "x"]),
            strings(&["s2", "", "y"]),
        ];

        let doc = DelimitedSerializer::multi_row().serialize(&header, &rows).unwrap();
        assert_eq!(
            doc,
            "submissionId,comment,after\n\"s1\",\"He said \"\"hi\"\", ok\",\"x\"\n\"s2\",\"\",\"y\""
        );
    }

    #[test]
    fn test_multi_row_zero_rows_is_header_only() {
        let doc = DelimitedSerializer::multi_row()
            .serialize(&strings(&["a", "b"]), &[])
            .unwrap();
        assert_eq!(doc, "a,b");
    }

    #[test]
    fn test_column_count_mismatch() {
        let err = DelimitedSerializer::multi_row()
            .serialize(&strings(&["a", "b"]), &[strings(&["1"])])
            .unwrap_err();
        match err {
            EngineError::ColumnCountMismatch {
                row,
                expected,
                actual,
            } => {
                assert_eq!(row, 1);
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("Expected ColumnCountMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_delimiter() {
        let serializer = DelimitedSerializer::new(DelimitedFormat::MULTI_ROW.with_delimiter(b';'));
        let doc = serializer
            .serialize(&strings(&["a", "b"]), &[strings(&["1;2", "3"])])
            .unwrap();
        assert_eq!(doc, "a;b\n\"1;2\";\"3\"");
    }

    #[test]
    fn test_invalid_delimiter_rejected() {
        let serializer = DelimitedSerializer::new(DelimitedFormat::SINGLE_ROW.with_delimiter(b'"'));
        let err = serializer.serialize(&strings(&["a"]), &[]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDelimiter('"')));
    }
}
