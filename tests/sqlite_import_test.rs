// ==========================================
// 导入流程集成测试（SQLite 仓储）
// ==========================================
// 测试目标: 验证完整的导入流程落库结果
// ==========================================


use async_trait::async_trait;
use ledger_import::config::{config_keys, ConfigManager, ImportConfigReader};
use ledger_import::db::open_sqlite_connection;
use ledger_import::domain::Category;
use ledger_import::logging;
use ledger_import::repository::{
    CategoryRepository, LedgerRepositoryImpl, RepositoryError, RepositoryResult,
    TransactionRepository,
};
use ledger_import::upload::UploadDirectory;
use ledger_import::{ImportError, TransactionImporter, TransactionImporterImpl};
use std::collections::HashSet;
use tempfile::TempDir;
use test_helpers::{create_sqlite_importer, create_test_db, write_csv, HEADER};

#[tokio::test]
async fn test_import_persists_categories_and_transactions() {
    logging::init_test();
    let (_db_file, db_path) = create_test_db().expect("Failed to create test db");
    let dir = TempDir::new().unwrap();
    let csv = write_csv(
        dir.path(),
        "statement.csv",
        &[
            "Groceries,outcome,150.00,Food",
            "Salary,income,3000.00,Work",
            "Snacks,outcome,4.20,Food",
        ],
    );

    let importer = create_sqlite_importer(&db_path).expect("Failed to create importer");
    let transactions = importer.import_transactions(&csv).await.unwrap();

    assert_eq!(transactions.len(), 3);
    assert!(!csv.exists());

    // 持久化结果与返回值一致
    let stored = importer.transaction_repo().list_transactions().await.unwrap();
    assert_eq!(stored, transactions);

    let categories = importer.category_repo().list_categories().await.unwrap();
    let titles: Vec<&str> = categories.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Food", "Work"]);

    // 直接用 SQL 校验外键关联
    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let joined: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM ledger_transaction t JOIN category c ON c.category_id = t.category_id WHERE c.title = 'Food'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(joined, 2);
}

#[tokio::test]
async fn test_separate_runs_share_category() {
    logging::init_test();
    let (_db_file, db_path) = create_test_db().expect("Failed to create test db");
    let dir = TempDir::new().unwrap();
    let first = write_csv(dir.path(), "first.csv", &["Lunch,outcome,12.50,Food"]);
    let second = write_csv(dir.path(), "second.csv", &["Dinner,outcome,30.00,Food"]);

    // 两次导入使用各自独立的连接
    let first_run = create_sqlite_importer(&db_path)
        .unwrap()
        .import_transactions(&first)
        .await
        .unwrap();
    let importer = create_sqlite_importer(&db_path).unwrap();
    let second_run = importer.import_transactions(&second).await.unwrap();

    assert_eq!(first_run[0].category_id, second_run[0].category_id);
    assert_eq!(importer.category_repo().list_categories().await.unwrap().len(), 1);
    assert_eq!(importer.transaction_repo().count_transactions().await.unwrap(), 2);
}

#[tokio::test]
async fn test_config_kv_controls_parsing_and_cleanup() {
    logging::init_test();
    let (_db_file, db_path) = create_test_db().expect("Failed to create test db");

    let config = ConfigManager::new(&db_path).unwrap();
    config
        .set_global_config_value(config_keys::MALFORMED_ROW_POLICY, "skip")
        .unwrap();
    config.set_global_config_value(config_keys::DELIMITER, ";").unwrap();
    config
        .set_global_config_value(config_keys::DELETE_SOURCE_ON_SUCCESS, "false")
        .unwrap();

    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("semicolon.csv");
    std::fs::write(
        &csv,
        "title;type;value;category\nBus;outcome;2.80;Transport\nbroken row\nTrain;outcome;9.10;Transport\n",
    )
    .unwrap();

    let importer = create_sqlite_importer(&db_path).unwrap();
    let transactions = importer.import_transactions(&csv).await.unwrap();

    let titles: Vec<&str> = transactions.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Bus", "Train"]);
    assert!(csv.exists());
}

#[tokio::test]
async fn test_uploaded_file_is_imported_and_released() {
    logging::init_test();
    let (_db_file, db_path) = create_test_db().expect("Failed to create test db");
    let upload_root = TempDir::new().unwrap();

    let config = ConfigManager::new(&db_path).unwrap();
    config
        .set_global_config_value(
            config_keys::UPLOAD_DIR,
            upload_root.path().join("tmp").to_str().unwrap(),
        )
        .unwrap();

    let uploads = UploadDirectory::from_config(&config).await.unwrap();
    let content = format!("{}\nRent,outcome,900,Home\n", HEADER);
    let stored_path = uploads.store("march.csv", content.as_bytes()).await.unwrap();

    assert!(stored_path.starts_with(upload_root.path().join("tmp")));
    assert!(stored_path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with("-march.csv"))
        .unwrap_or(false));

    let importer = create_sqlite_importer(&db_path).unwrap();
    let transactions = importer.import_transactions(&stored_path).await.unwrap();

    assert_eq!(transactions.len(), 1);
    assert!(!stored_path.exists());
}

#[tokio::test]
async fn test_staged_import_keeps_user_original() {
    logging::init_test();
    let (_db_file, db_path) = create_test_db().expect("Failed to create test db");
    let user_dir = TempDir::new().unwrap();
    let upload_root = TempDir::new().unwrap();
    let original = write_csv(user_dir.path(), "my_statement.csv", &["Lunch,outcome,12.50,Food"]);

    let config = ConfigManager::new(&db_path).unwrap();
    config
        .set_global_config_value(config_keys::UPLOAD_DIR, upload_root.path().to_str().unwrap())
        .unwrap();

    // 与命令行入口一致：先暂存副本，再导入副本
    let staged = UploadDirectory::from_config(&config)
        .await
        .unwrap()
        .stage_file(&original)
        .await
        .unwrap();
    let importer = create_sqlite_importer(&db_path).unwrap();
    let transactions = importer.import_transactions(&staged).await.unwrap();

    assert_eq!(transactions.len(), 1);
    assert!(original.exists());
    assert!(!staged.exists());
}

// ==========================================
// 跨批次竞争：由 category.title 唯一约束兜底
// ==========================================

/// 查询总是返回空（模拟并发导入的过期读）
struct StaleReadRepository {
    inner: LedgerRepositoryImpl,
}

#[async_trait]
impl CategoryRepository for StaleReadRepository {
    async fn find_by_titles(&self, _titles: &HashSet<String>) -> RepositoryResult<Vec<Category>> {
        Ok(Vec::new())
    }

    fn create_categories(&self, titles: &[String]) -> Vec<Category> {
        self.inner.create_categories(titles)
    }

    async fn save_categories(&self, categories: &[Category]) -> RepositoryResult<()> {
        self.inner.save_categories(categories).await
    }

    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        self.inner.list_categories().await
    }
}

#[tokio::test]
async fn test_concurrent_duplicate_category_is_rejected_by_store() {
    logging::init_test();
    let (_db_file, db_path) = create_test_db().expect("Failed to create test db");
    let dir = TempDir::new().unwrap();
    let first = write_csv(dir.path(), "first.csv", &["Lunch,outcome,12.50,Food"]);
    let racing = write_csv(dir.path(), "racing.csv", &["Dinner,outcome,30.00,Food"]);

    create_sqlite_importer(&db_path)
        .unwrap()
        .import_transactions(&first)
        .await
        .unwrap();

    let racer = TransactionImporterImpl::new(
        StaleReadRepository {
            inner: LedgerRepositoryImpl::new(&db_path).unwrap(),
        },
        LedgerRepositoryImpl::new(&db_path).unwrap(),
        ConfigManager::new(&db_path).unwrap(),
    );

    let err = racer.import_transactions(&racing).await.unwrap_err();

    assert!(matches!(
        err,
        ImportError::Store(RepositoryError::UniqueConstraintViolation(_))
    ));
    assert!(racing.exists());

    // 数据库中仍只有一个 Food 分类与一条交易
    let conn = open_sqlite_connection(&db_path).unwrap();
    let food_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM category WHERE title = 'Food'", [], |row| row.get(0))
        .unwrap();
    let tx_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM ledger_transaction", [], |row| row.get(0))
        .unwrap();
    assert_eq!(food_count, 1);
    assert_eq!(tx_count, 1);
}

#[tokio::test]
async fn test_default_config_values_from_empty_table() {
    let (_db_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = ConfigManager::new(&db_path).unwrap();

    assert_eq!(config.get_delimiter().await.unwrap(), b',');
    assert!(config.get_delete_source_on_success().await.unwrap());
}
