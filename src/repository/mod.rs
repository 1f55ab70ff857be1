// ==========================================
// 工位轮岗排班 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod assignment_repo;
pub mod capability_repo;
pub mod error;
pub mod row_utils;
pub mod session_repo;
pub mod station_repo;
pub mod worker_repo;

// 重导出核心仓储
pub use assignment_repo::AssignmentRepository;
pub use capability_repo::CapabilityRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use session_repo::SessionRepository;
pub use station_repo::StationRepository;
pub use worker_repo::WorkerRepository;
