// ==========================================
// 财务流水导入 - 导入层
// ==========================================
// 职责: 分隔文本 → 分类对账 → 交易入库
// 数据流: record_parser → category_reconciler → transaction_materializer → transaction_importer_impl
// ==========================================

// 模块声明
pub mod category_reconciler;
pub mod error;
pub mod record_parser;
pub mod transaction_importer_impl;
pub mod transaction_importer_trait;
pub mod transaction_materializer;

// 重导出核心类型
pub use category_reconciler::{CategoryLookup, CategoryReconciler};
pub use error::{ImportError, ImportResult};
pub use record_parser::{CandidateRecords, RecordParser, EXPECTED_FIELD_COUNT};
pub use transaction_importer_impl::TransactionImporterImpl;
pub use transaction_materializer::TransactionMaterializer;

// 重导出 Trait 接口
pub use transaction_importer_trait::TransactionImporter;
