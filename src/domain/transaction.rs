// ==========================================
// 财务流水导入 - 交易领域模型
// ==========================================
// 对齐: ledger_transaction 表
// 流程: CandidateRecord（解析）→ NewTransaction（绑定分类）→ Transaction（落库）
// ==========================================

use crate::domain::types::TransactionFlow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// CandidateRecord - 导入中间结构体
// ==========================================
// 用途: 文件解析产物，字段均为去空白后的原始文本
// 生命周期: 仅在导入流程内，不直接落库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub title: String,          // 交易标题
    pub flow: String,           // 资金流向（原始文本）
    pub value: String,          // 金额（原始文本）
    pub category_title: String, // 分类名称

    // 元信息
    pub row_number: usize, // 原始文件行号（1 起，含表头）
}

// ==========================================
// NewTransaction - 已绑定分类的交易草稿
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub row_number: usize,
    pub title: String,
    pub value: f64,
    pub flow: TransactionFlow,
    pub category_id: String,
}

// ==========================================
// Transaction - 交易流水
// ==========================================
// 红线: category_id 必须指向已存在（或同批次新建）的分类
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String, // 交易ID（UUID v4）
    pub title: String,
    pub value: f64,
    pub flow: TransactionFlow,
    pub category_id: String,       // 关联 category（FK，非拥有引用）
    pub created_at: DateTime<Utc>, // 创建时间
}

impl From<NewTransaction> for Transaction {
    fn from(draft: NewTransaction) -> Self {
        Self {
            transaction_id: Uuid::new_v4().to_string(),
            title: draft.title,
            value: draft.value,
            flow: draft.flow,
            category_id: draft.category_id,
            created_at: Utc::now(),
        }
    }
}
