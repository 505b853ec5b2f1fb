// ==========================================
// 集成测试辅助模块
// ==========================================

#![allow(dead_code)]

pub mod memory_store;
pub mod mock_config;
