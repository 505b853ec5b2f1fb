// ==========================================
// 财务流水导入 - 交易物化
// ==========================================
// 阶段 3: CandidateRecord + CategoryLookup → NewTransaction
// 约束: 保持输入顺序；不做任何 I/O
// ==========================================

use crate::domain::{CandidateRecord, NewTransaction, TransactionFlow};
use crate::importer::category_reconciler::CategoryLookup;
use crate::importer::error::{ImportError, ImportResult};

pub struct TransactionMaterializer<'a> {
    lookup: &'a CategoryLookup,
}

impl<'a> TransactionMaterializer<'a> {
    pub fn new(lookup: &'a CategoryLookup) -> Self {
        Self { lookup }
    }

    /// 按原始顺序逐条绑定分类
    ///
    /// # 错误
    /// - InvalidField: 金额非有限数值 / 流向不是 income|outcome
    /// - UnresolvedCategory: 分类名不在映射中（内部一致性错误，不重试）
    pub fn materialize(&self, records: &[CandidateRecord]) -> ImportResult<Vec<NewTransaction>> {
        records.iter().map(|record| self.bind(record)).collect()
    }

    fn bind(&self, record: &CandidateRecord) -> ImportResult<NewTransaction> {
        let value = parse_value(record)?;
        let flow = parse_flow(record)?;

        let category = self.lookup.resolve(&record.category_title).ok_or_else(|| {
            ImportError::UnresolvedCategory {
                row: record.row_number,
                title: record.category_title.clone(),
            }
        })?;

        Ok(NewTransaction {
            row_number: record.row_number,
            title: record.title.clone(),
            value,
            flow,
            category_id: category.category_id.clone(),
        })
    }
}

fn parse_value(record: &CandidateRecord) -> ImportResult<f64> {
    record
        .value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ImportError::InvalidField {
            row: record.row_number,
            field: "value".to_string(),
            value: record.value.clone(),
        })
}

fn parse_flow(record: &CandidateRecord) -> ImportResult<TransactionFlow> {
    record
        .flow
        .parse::<TransactionFlow>()
        .map_err(|_| ImportError::InvalidField {
            row: record.row_number,
            field: "flow".to_string(),
            value: record.flow.clone(),
        })
}
