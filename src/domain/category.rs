// ==========================================
// 财务流水导入 - 分类领域模型
// ==========================================
// 对齐: category 表
// 生命周期: 导入时按需创建，本系统不更新/不删除
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Category - 交易分类
// ==========================================
// 约束: title 唯一且区分大小写
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: String,       // 分类ID（UUID v4，创建时生成，落库后持久）
    pub title: String,             // 分类名称
    pub created_at: DateTime<Utc>, // 创建时间
}

impl Category {
    /// 构造一个未落库的分类
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            category_id: Uuid::new_v4().to_string(),
            title: title.into(),
            created_at: Utc::now(),
        }
    }
}
