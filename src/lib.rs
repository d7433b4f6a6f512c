// ==========================================
// 配置驱动表单构建器 - 核心库
// ==========================================
// 系统定位: 管理员定义表单配置（字段、默认值、必填、映射键），
//           提交数据按配置对齐后导出为分隔文本文档
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 排序、解析、序列化、文件名
pub mod engine;

// 配置层 - 导出设置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{EmptyValuePolicy, JoinKey, LeadingColumn, RequirementLevel};

// 领域实体
pub use domain::{Configuration, ConfigurationDraft, ExportArtifact, Field, Payload, Submission};

// 引擎
pub use engine::{
    order_fields, Clock, DelimitedFormat, DelimitedSerializer, FixedClock, SubmissionResolver,
    SystemClock,
};

// API
pub use api::{ApiError, ApiResult, ConfigurationApi, SubmissionApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "配置驱动表单构建器";
