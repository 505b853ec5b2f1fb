// ==========================================
// 财务流水导入 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 仓储层错误原样透传（transparent），不做二次包装
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 行结构/字段错误 =====
    #[error("行结构错误 (行 {row}): 期望 {expected} 列，实际 {actual} 列")]
    MalformedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("字段值非法 (行 {row}, 字段 {field}): {value}")]
    InvalidField {
        row: usize,
        field: String,
        value: String,
    },

    // ===== 一致性错误 =====
    #[error("分类未解析 (行 {row}): {title}")]
    UnresolvedCategory { row: usize, title: String },

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 仓储错误 =====
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

impl ImportError {
    /// 是否为存储层错误
    pub fn is_store_error(&self) -> bool {
        matches!(self, ImportError::Store(_))
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
