// ==========================================
// 财务流水导入 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + tokio
// 系统定位: 交易流水文件导入，分类对账后入库
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 解析/对账/物化/编排
pub mod importer;

// 配置层 - 导入参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建库）
pub mod db;

// 上传文件接收
pub mod upload;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{CandidateRecord, Category, MalformedRowPolicy, Transaction, TransactionFlow};
pub use importer::{ImportError, ImportResult, TransactionImporter, TransactionImporterImpl};
pub use repository::{
    CategoryRepository, LedgerRepositoryImpl, RepositoryError, TransactionRepository,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "财务流水导入";
