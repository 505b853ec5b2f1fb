// ==========================================
// 财务流水导入 - 配置管理器
// ==========================================
// 职责: 配置查询与覆写
// 存储: config_kv 表 (key-value + scope，当前仅使用 global)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::types::MalformedRowPolicy;
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    // 解析
    pub const MALFORMED_ROW_POLICY: &str = "import_malformed_row_policy";
    pub const DELIMITER: &str = "import_delimiter";

    // 文件
    pub const UPLOAD_DIR: &str = "import_upload_dir";
    pub const DELETE_SOURCE_ON_SUCCESS: &str = "import_delete_source_on_success";
}

/// 默认上传目录
pub fn default_upload_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("ledger-import").join("tmp"),
        None => std::env::temp_dir().join("ledger-import"),
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path).map_err(|e| ImportError::ConfigReadError {
            key: "*".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ImportResult<Self> {
        {
            let guard = conn.lock().map_err(|e| ImportError::ConfigReadError {
                key: "*".to_string(),
                message: format!("锁获取失败: {}", e),
            })?;
            configure_sqlite_connection(&guard).map_err(|e| ImportError::ConfigReadError {
                key: "*".to_string(),
                message: e.to_string(),
            })?;
        }

        Ok(Self { conn })
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let read_err = |message: String| ImportError::ConfigReadError {
            key: key.to_string(),
            message,
        };

        let conn = self
            .conn
            .lock()
            .map_err(|e| read_err(format!("锁获取失败: {}", e)))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| read_err(e.to_string()))?;

        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let write_err = |message: String| ImportError::ConfigReadError {
            key: key.to_string(),
            message,
        };

        let conn = self
            .conn
            .lock()
            .map_err(|e| write_err(format!("锁获取失败: {}", e)))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )
        .map_err(|e| write_err(e.to_string()))?;

        Ok(())
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ImportResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    fn value_error(key: &str, value: &str, message: impl Into<String>) -> ImportError {
        ImportError::ConfigValueError {
            key: key.to_string(),
            value: value.to_string(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_malformed_row_policy(&self) -> ImportResult<MalformedRowPolicy> {
        let key = config_keys::MALFORMED_ROW_POLICY;
        let raw = self.get_config_or_default(key, MalformedRowPolicy::default().as_str())?;
        raw.parse::<MalformedRowPolicy>()
            .map_err(|e| Self::value_error(key, &raw, e))
    }

    async fn get_delimiter(&self) -> ImportResult<u8> {
        let key = config_keys::DELIMITER;
        let raw = self.get_config_or_default(key, ",")?;

        // "\t" 作为制表符的转义写法
        let text = if raw == "\\t" { "\t" } else { raw.as_str() };
        match text.as_bytes() {
            [byte] if byte.is_ascii() && !byte.is_ascii_alphanumeric() && *byte != b'"' => {
                Ok(*byte)
            }
            _ => Err(Self::value_error(key, &raw, "分隔符必须是单个非字母数字 ASCII 字符")),
        }
    }

    async fn get_upload_dir(&self) -> ImportResult<PathBuf> {
        Ok(self
            .get_global_config_value(config_keys::UPLOAD_DIR)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_upload_dir))
    }

    async fn get_delete_source_on_success(&self) -> ImportResult<bool> {
        let key = config_keys::DELETE_SOURCE_ON_SUCCESS;
        let raw = self.get_config_or_default(key, "true")?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(Self::value_error(key, &raw, "期望布尔值")),
        }
    }
}
