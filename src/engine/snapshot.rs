// ==========================================
// 工位轮岗排班 - 运行快照与上下文
// ==========================================
// 红线: 引擎只读快照,运行期间不回查数据库
// ==========================================

use crate::domain::{Capability, Phase, Restriction, Worker, Workstation};
use crate::engine::repositories::RotationSnapshotSource;
use crate::repository::error::RepositoryResult;
use chrono::NaiveDate;

// ==========================================
// RotationSnapshot - 四份只读快照
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RotationSnapshot {
    pub workers: Vec<Worker>,
    pub stations: Vec<Workstation>,
    pub capabilities: Vec<Capability>,
    pub restrictions: Vec<Restriction>,
}

impl RotationSnapshot {
    pub fn new(
        workers: Vec<Worker>,
        stations: Vec<Workstation>,
        capabilities: Vec<Capability>,
        restrictions: Vec<Restriction>,
    ) -> Self {
        Self {
            workers,
            stations,
            capabilities,
            restrictions,
        }
    }

    /// 从快照端口一次性读取
    pub fn load<S>(source: &S) -> RepositoryResult<Self>
    where
        S: RotationSnapshotSource + ?Sized,
    {
        Ok(Self {
            workers: source.list_active_workers()?,
            stations: source.list_active_stations()?,
            capabilities: source.list_active_capabilities()?,
            restrictions: source.list_active_restrictions()?,
        })
    }
}

// ==========================================
// RunContext - 单次运行上下文
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub session_id: String,
    pub phase: Phase,
    /// 认证有效期与限制时间窗的判定日期
    pub today: NaiveDate,
}

impl RunContext {
    pub fn new(session_id: impl Into<String>, phase: Phase, today: NaiveDate) -> Self {
        Self {
            session_id: session_id.into(),
            phase,
            today,
        }
    }
}
