// ==========================================
// 财务流水导入 - 命令行入口
// ==========================================
// 用法:
//   ledger-import <csv_path> [db_path]
//
// 未指定 db_path 时使用 LEDGER_IMPORT_DB_PATH 或用户数据目录
// 源文件先复制到上传目录再导入，用户的原始文件保留
// ==========================================

use anyhow::{bail, Context};
use ledger_import::config::ConfigManager;
use ledger_import::db::{get_default_db_path, init_schema, open_sqlite_connection};
use ledger_import::upload::UploadDirectory;
use ledger_import::{LedgerRepositoryImpl, TransactionImporter, TransactionImporterImpl};
use std::path::Path;
use std::sync::{Arc, Mutex};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ledger_import::logging::init();

    let mut args = std::env::args().skip(1);
    let csv_path = match args.next() {
        Some(path) => path,
        None => bail!("用法: ledger-import <csv_path> [db_path]"),
    };
    let db_path = args.next().unwrap_or_else(get_default_db_path);

    tracing::info!("{} v{}", ledger_import::APP_NAME, ledger_import::VERSION);
    tracing::info!("使用数据库: {}", db_path);

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    init_schema(&conn).context("数据库初始化失败")?;
    let conn = Arc::new(Mutex::new(conn));

    let config = ConfigManager::from_connection(conn.clone())?;
    let staged_path = UploadDirectory::from_config(&config)
        .await?
        .stage_file(Path::new(&csv_path))
        .await
        .with_context(|| format!("无法暂存源文件: {}", csv_path))?;

    let importer = TransactionImporterImpl::new(
        LedgerRepositoryImpl::from_connection(conn.clone())?,
        LedgerRepositoryImpl::from_connection(conn)?,
        config,
    );

    let transactions = importer
        .import_transactions(&staged_path)
        .await
        .with_context(|| format!("导入失败: {}", csv_path))?;

    println!("{}", serde_json::to_string_pretty(&transactions)?);
    Ok(())
}
