// ==========================================
// 财务流水导入 - 分类对账
// ==========================================
// 阶段 2: 引用分类名 → 已存在分类 ∪ 新建分类
// 流程: 提取名称 → 查询已存在 → 计算缺失（首次出现顺序去重）→ 构造 → 批量落库
// 保证: 每个被引用的名称在结果中恰好对应一个分类
// ==========================================

use crate::domain::{CandidateRecord, Category};
use crate::importer::error::ImportResult;
use crate::repository::CategoryRepository;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

// ==========================================
// CategoryLookup - 名称 → 分类 映射
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CategoryLookup {
    by_title: HashMap<String, Category>,
    created: Vec<Category>,
    reused: usize,
}

impl CategoryLookup {
    /// 由新建分类与已存在分类合并（同名时已存在分类优先）
    pub fn from_parts(created: Vec<Category>, existing: Vec<Category>) -> Self {
        let reused = existing.len();
        let mut by_title = HashMap::with_capacity(created.len() + existing.len());
        for category in created.iter().cloned() {
            by_title.insert(category.title.clone(), category);
        }
        for category in existing {
            by_title.insert(category.title.clone(), category);
        }

        Self {
            by_title,
            created,
            reused,
        }
    }

    /// 按名称精确查找（区分大小写）
    pub fn resolve(&self, title: &str) -> Option<&Category> {
        self.by_title.get(title)
    }

    /// 本次新建的分类（首次出现顺序）
    pub fn created(&self) -> &[Category] {
        &self.created
    }

    /// 复用的已存在分类数量
    pub fn reused_count(&self) -> usize {
        self.reused
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }
}

/// 稳定去重：保留每个名称首次出现的位置，O(n)
pub fn distinct_in_order<I, S>(titles: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for title in titles {
        let title = title.into();
        if seen.insert(title.clone()) {
            ordered.push(title);
        }
    }
    ordered
}

/// 计算缺失名称：在 referenced 中但不在 existing 中，顺序与 referenced 一致
pub fn missing_titles(referenced: &[String], existing: &[Category]) -> Vec<String> {
    let existing_titles: HashSet<&str> = existing.iter().map(|c| c.title.as_str()).collect();
    referenced
        .iter()
        .filter(|title| !existing_titles.contains(title.as_str()))
        .cloned()
        .collect()
}

// ==========================================
// CategoryReconciler
// ==========================================
pub struct CategoryReconciler<'a, R: CategoryRepository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: CategoryRepository + ?Sized> CategoryReconciler<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// 对全部候选记录执行分类对账
    ///
    /// # 前置条件
    /// - records 必须已完整读取（去重依赖全量名称）
    ///
    /// # 返回
    /// - Ok(CategoryLookup): 覆盖所有被引用名称
    /// - Err: 仓储读/写错误原样透传；写失败时本批分类均未提交
    pub async fn reconcile(&self, records: &[CandidateRecord]) -> ImportResult<CategoryLookup> {
        // 工作列表（含重复）
        let working: Vec<&str> = records.iter().map(|r| r.category_title.as_str()).collect();
        let referenced = distinct_in_order(working.iter().copied());
        let title_set: HashSet<String> = referenced.iter().cloned().collect();

        let existing = self.repo.find_by_titles(&title_set).await?;
        let missing = missing_titles(&referenced, &existing);
        debug!(
            referenced = referenced.len(),
            existing = existing.len(),
            missing = missing.len(),
            "分类差异计算完成"
        );

        let created = self.repo.create_categories(&missing);
        self.repo.save_categories(&created).await?;

        info!(
            created = created.len(),
            reused = existing.len(),
            "分类对账完成"
        );

        Ok(CategoryLookup::from_parts(created, existing))
    }
}
