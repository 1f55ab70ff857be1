// ==========================================
// 工位轮岗排班 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assignment;
pub mod capability;
pub mod station;
pub mod types;
pub mod worker;

// 重导出核心类型
pub use assignment::{RotationAssignment, RotationSession};
pub use capability::{Capability, Restriction};
pub use station::Workstation;
pub use types::{LeadershipScope, Phase, RestrictionType, RoleTag, RotationHalf, SessionStatus};
pub use worker::Worker;
