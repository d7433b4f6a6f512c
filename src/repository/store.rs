// ==========================================
// 配置驱动表单构建器 - 存储接口
// ==========================================
// 职责: 定义配置/提交的数据访问接口（不包含业务逻辑）
// 说明: API 层只依赖这两个 Trait，由调用方显式注入存储句柄
// ==========================================

use crate::domain::configuration::Configuration;
use crate::domain::submission::Submission;
use crate::repository::error::RepositoryResult;

// ==========================================
// ConfigurationStore
// ==========================================
// 实现者: ConfigurationRepository（rusqlite）
// 写入为按 id 的单记录替换，并发写同一 id 时后写覆盖
pub trait ConfigurationStore: Send + Sync {
    /// 列出所有配置（按创建顺序）
    fn list(&self) -> RepositoryResult<Vec<Configuration>>;

    /// 按 id 查找
    fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Configuration>>;

    /// 插入新配置
    fn insert(&self, config: &Configuration) -> RepositoryResult<()>;

    /// 整体替换已有配置
    ///
    /// # 返回
    /// - Ok(true): 已替换
    /// - Ok(false): id 不存在
    fn replace(&self, config: &Configuration) -> RepositoryResult<bool>;

    /// 按 id 删除，返回被删除的配置（不存在时为 None）
    ///
    /// 不级联删除提交记录
    fn delete(&self, id: &str) -> RepositoryResult<Option<Configuration>>;
}

// ==========================================
// SubmissionStore
// ==========================================
// 实现者: SubmissionRepository（rusqlite）
pub trait SubmissionStore: Send + Sync {
    fn insert(&self, submission: &Submission) -> RepositoryResult<()>;

    /// 按配置 id 列出提交（按写入顺序）
    fn list_by_config(&self, config_id: &str) -> RepositoryResult<Vec<Submission>>;

    /// 清理某配置的所有提交，返回删除条数
    fn delete_by_config(&self, config_id: &str) -> RepositoryResult<usize>;
}
