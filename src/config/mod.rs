// ==========================================
// 财务流水导入 - 配置层
// ==========================================
// 职责: 导入参数管理（解析策略、分隔符、上传目录、源文件清理）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, default_upload_dir, ConfigManager};
pub use import_config_trait::ImportConfigReader;
