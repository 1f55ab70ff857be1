// ==========================================
// 工位轮岗排班 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 轮岗分配引擎（人员 × 工位的分阶段约束满足）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 分配规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{LeadershipScope, Phase, RestrictionType, RoleTag, SessionStatus};

// 领域实体
pub use domain::{Capability, Restriction, RotationAssignment, RotationSession, Worker, Workstation};

// 引擎
pub use engine::{
    EligibilityFilter, EngineError, RotationDiagnostics, RotationEngine, RotationResult,
    RotationRunner, RotationSnapshot, RunContext,
};

// API
pub use api::{ApiError, RotationApi, RotationRunSummary};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "工位轮岗排班";
