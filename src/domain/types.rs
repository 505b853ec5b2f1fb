// ==========================================
// 财务流水导入 - 领域类型定义
// ==========================================
// 职责: 定义跨模块共享的枚举类型
// 约束: 序列化格式与数据库存储格式一致（全小写）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// TransactionFlow - 资金流向
// ==========================================
// 存储: ledger_transaction.flow（'income' / 'outcome'）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionFlow {
    Income,  // 收入
    Outcome, // 支出
}

impl TransactionFlow {
    /// 数据库/文件中的文本表示
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionFlow::Income => "income",
            TransactionFlow::Outcome => "outcome",
        }
    }
}

impl fmt::Display for TransactionFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionFlow {
    type Err = String;

    /// 解析流向文本（区分大小写，仅接受 income / outcome）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionFlow::Income),
            "outcome" => Ok(TransactionFlow::Outcome),
            other => Err(format!("未知的资金流向: {}", other)),
        }
    }
}

// ==========================================
// MalformedRowPolicy - 异常行处理策略
// ==========================================
// 存储: config_kv.import_malformed_row_policy（'reject' / 'skip'）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    #[default]
    Reject, // 整批拒绝
    Skip,   // 跳过该行并告警
}

impl MalformedRowPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MalformedRowPolicy::Reject => "reject",
            MalformedRowPolicy::Skip => "skip",
        }
    }
}

impl FromStr for MalformedRowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(MalformedRowPolicy::Reject),
            "skip" => Ok(MalformedRowPolicy::Skip),
            other => Err(format!("未知的异常行策略: {}", other)),
        }
    }
}
