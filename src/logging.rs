// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 过滤器优先取 RUST_LOG，未设置时使用内置默认值
// 导入流程的 span 携带 import_id，可按批次检索日志
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 运行时默认过滤器
pub const DEFAULT_FILTER: &str = "info";

/// 测试默认过滤器（本 crate 输出 debug，依赖库保持 warn）
pub const TEST_FILTER: &str = "warn,ledger_import=debug";

/// 构建过滤器：RUST_LOG 有效时使用之，否则回退到 default_directives
fn build_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=ledger_import::importer=trace
///
/// # 示例
/// ```no_run
/// use ledger_import::logging;
/// logging::init();
/// ```
pub fn init() {
    fmt()
        .with_env_filter(build_filter(DEFAULT_FILTER))
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// 初始化测试环境的日志系统
///
/// - 默认输出本 crate 的 debug 日志（各导入阶段的计数、跳过的异常行、清理告警）
/// - 输出经由测试 writer，仅在测试失败或 `--nocapture` 时可见
/// - 可被 RUST_LOG 覆盖；可重复调用，仅首次生效
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(build_filter(TEST_FILTER))
        .with_test_writer()
        .try_init();
}
