// ==========================================
// 工位轮岗排班 - 引擎层
// ==========================================
// 职责: 实现分配规则引擎,不拼 SQL
// 红线: Engine 不拼 SQL, 所有跳过/否决必须输出 reason
// ==========================================
// 阶段: 领班固定 → 带教配对 → 优先补齐 → 通用分配 → 校验
// ==========================================

pub mod eligibility;
pub mod error;
pub mod general;
pub mod leadership;
pub mod orchestrator;
pub mod priority_fill;
pub mod report;
pub mod repositories;
pub mod runner;
pub mod snapshot;
pub mod state;
pub mod training;
pub mod validator;

// 重导出核心引擎
pub use eligibility::{EligibilityFilter, IneligibleReason};
pub use error::{EngineError, EngineResult};
pub use general::GeneralAssigner;
pub use leadership::LeadershipAssigner;
pub use orchestrator::RotationEngine;
pub use priority_fill::PriorityCompletionAssigner;
pub use report::{
    ExcludedWorker, RestrictionWarning, RotationDiagnostics, RotationResult, SkippedEntry,
    StageSummary, UnderstaffedStation,
};
pub use repositories::{AssignmentWriter, RotationRepositories, RotationSnapshotSource};
pub use runner::RotationRunner;
pub use snapshot::{RotationSnapshot, RunContext};
pub use state::AssignmentState;
pub use training::TrainingPairAssigner;
pub use validator::{RotationValidator, ValidationReport};
