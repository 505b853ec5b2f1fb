// ==========================================
// 财务流水导入 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod category;
pub mod transaction;
pub mod types;

// 重导出核心类型
pub use category::Category;
pub use transaction::{CandidateRecord, NewTransaction, Transaction};
pub use types::{MalformedRowPolicy, TransactionFlow};
