// ==========================================
// 财务流水导入 - 记录解析器
// ==========================================
// 阶段 1: 字节流 → CandidateRecord 序列
// 规则: 首行表头无条件跳过；每行恰好 4 列；各字段去首尾空白
// 列序: title, flow, value, category
// ==========================================

use crate::domain::{CandidateRecord, MalformedRowPolicy};
use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use std::io::Read;
use tracing::warn;

/// 每行期望的列数
pub const EXPECTED_FIELD_COUNT: usize = 4;

// ==========================================
// RecordParser
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct RecordParser {
    delimiter: u8,
    policy: MalformedRowPolicy,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(b',', MalformedRowPolicy::Reject)
    }
}

impl RecordParser {
    pub fn new(delimiter: u8, policy: MalformedRowPolicy) -> Self {
        Self { delimiter, policy }
    }

    pub fn policy(&self) -> MalformedRowPolicy {
        self.policy
    }

    /// 将可读流解析为惰性的 CandidateRecord 序列
    ///
    /// # 说明
    /// - 不做数值/枚举校验（由物化阶段负责）
    /// - 序列只能消费一次
    /// - 空行与仅含空白的行均被忽略，不计为数据行
    pub fn parse<R: Read>(&self, reader: R) -> CandidateRecords<R> {
        let records = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .flexible(true) // 列数校验由本模块完成
            .trim(Trim::All)
            .from_reader(reader)
            .into_records();

        CandidateRecords {
            records,
            policy: self.policy,
            skipped_rows: 0,
        }
    }
}

// ==========================================
// CandidateRecords - 惰性记录序列
// ==========================================
pub struct CandidateRecords<R: Read> {
    records: StringRecordsIntoIter<R>,
    policy: MalformedRowPolicy,
    skipped_rows: usize,
}

impl<R: Read> CandidateRecords<R> {
    /// 已按 Skip 策略跳过的行数
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    fn to_candidate(record: &StringRecord, row_number: usize) -> CandidateRecord {
        CandidateRecord {
            title: record[0].to_string(),
            flow: record[1].to_string(),
            value: record[2].to_string(),
            category_title: record[3].to_string(),
            row_number,
        }
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record[0].is_empty()
}

impl<R: Read> Iterator for CandidateRecords<R> {
    type Item = ImportResult<CandidateRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(ImportError::from(e))),
            };

            let row_number = record
                .position()
                .map(|pos| pos.line() as usize)
                .unwrap_or_default();

            // 仅含空白的行与空行同等对待
            if is_blank(&record) {
                continue;
            }

            if record.len() == EXPECTED_FIELD_COUNT {
                return Some(Ok(Self::to_candidate(&record, row_number)));
            }

            match self.policy {
                MalformedRowPolicy::Reject => {
                    return Some(Err(ImportError::MalformedRow {
                        row: row_number,
                        expected: EXPECTED_FIELD_COUNT,
                        actual: record.len(),
                    }));
                }
                MalformedRowPolicy::Skip => {
                    warn!(
                        row_number,
                        fields = record.len(),
                        "行列数不符，已跳过"
                    );
                    self.skipped_rows += 1;
                }
            }
        }
    }
}
