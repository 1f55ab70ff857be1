// ==========================================
// 工位轮岗排班 - 引擎层仓储端口与聚合
// ==========================================
// 职责: 定义引擎读写边界（快照读取 / 整批写入）
//       并提供基于 SQLite 仓储的默认实现
// 红线: 引擎只经由端口访问数据,不持有全局连接
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::domain::{Capability, Phase, Restriction, RotationAssignment, Worker, Workstation};
use crate::repository::{
    AssignmentRepository, CapabilityRepository, RepositoryResult, SessionRepository,
    StationRepository, WorkerRepository,
};

// ==========================================
// 端口定义
// ==========================================

/// 快照读取端口（运行开始时一次性读取）
pub trait RotationSnapshotSource: Send + Sync {
    fn list_active_workers(&self) -> RepositoryResult<Vec<Worker>>;
    fn list_active_stations(&self) -> RepositoryResult<Vec<Workstation>>;
    fn list_active_capabilities(&self) -> RepositoryResult<Vec<Capability>>;
    fn list_active_restrictions(&self) -> RepositoryResult<Vec<Restriction>>;
}

/// 分配写入端口
///
/// 红线: 实现必须保证原子性,失败时 (session, phase) 的旧分配保持不变
pub trait AssignmentWriter: Send + Sync {
    fn replace_assignments(
        &self,
        session_id: &str,
        phase: Phase,
        assignments: &[RotationAssignment],
    ) -> RepositoryResult<usize>;
}

// ==========================================
// RotationRepositories - 轮岗仓储集合
// ==========================================

/// 聚合轮岗所需的全部 Repository,共享同一连接
#[derive(Clone)]
pub struct RotationRepositories {
    pub worker_repo: Arc<WorkerRepository>,
    pub station_repo: Arc<StationRepository>,
    pub capability_repo: Arc<CapabilityRepository>,
    pub assignment_repo: Arc<AssignmentRepository>,
    pub session_repo: Arc<SessionRepository>,
}

impl RotationRepositories {
    /// 基于共享连接创建仓储集合
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            worker_repo: Arc::new(WorkerRepository::from_connection(conn.clone())),
            station_repo: Arc::new(StationRepository::from_connection(conn.clone())),
            capability_repo: Arc::new(CapabilityRepository::from_connection(conn.clone())),
            assignment_repo: Arc::new(AssignmentRepository::from_connection(conn.clone())),
            session_repo: Arc::new(SessionRepository::from_connection(conn)),
        }
    }
}

impl RotationSnapshotSource for RotationRepositories {
    fn list_active_workers(&self) -> RepositoryResult<Vec<Worker>> {
        self.worker_repo.list_active()
    }

    fn list_active_stations(&self) -> RepositoryResult<Vec<Workstation>> {
        self.station_repo.list_active()
    }

    fn list_active_capabilities(&self) -> RepositoryResult<Vec<Capability>> {
        self.capability_repo.list_active_capabilities()
    }

    fn list_active_restrictions(&self) -> RepositoryResult<Vec<Restriction>> {
        self.capability_repo.list_active_restrictions()
    }
}

impl AssignmentWriter for RotationRepositories {
    fn replace_assignments(
        &self,
        session_id: &str,
        phase: Phase,
        assignments: &[RotationAssignment],
    ) -> RepositoryResult<usize> {
        self.assignment_repo.replace_batch(session_id, phase, assignments)
    }
}
