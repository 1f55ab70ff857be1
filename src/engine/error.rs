// ==========================================
// 工位轮岗排班 - 引擎错误类型
// ==========================================
// 错误分类:
// - 配置错误: 运行前中止,不写任何分配
// - 完整性违反: 生成后自检失败,整批拒绝
// - 覆盖不足/个体排除: 不属于错误,进入诊断报告
// ==========================================

use crate::domain::types::Phase;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 配置错误 =====
    #[error("配置错误: 没有在职员工")]
    NoActiveWorkers,

    #[error("配置错误: 没有启用的工位")]
    NoActiveStations,

    #[error("配置错误: 没有任何员工持有可分配能力")]
    NoAssignableWorkers,

    // ===== 完整性违反 =====
    #[error("完整性违反: 员工重复分配 session={session_id}, phase={phase}, worker={worker_id}, count={count}")]
    DuplicateAssignment {
        session_id: String,
        phase: Phase,
        worker_id: String,
        count: usize,
    },

    #[error("完整性违反: 工位超员 station={station_id}, required={required}, actual={actual}")]
    CapacityExceeded {
        station_id: String,
        required: u32,
        actual: u32,
    },

    #[error("完整性违反: 不合格分配 worker={worker_id}, station={station_id}")]
    IneligibleAssignment { worker_id: String, station_id: String },

    // ===== 端口错误 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl EngineError {
    /// 是否为配置错误（运行前中止）
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            EngineError::NoActiveWorkers
                | EngineError::NoActiveStations
                | EngineError::NoAssignableWorkers
        )
    }

    /// 是否为完整性违反（流水线缺陷,输出被拒绝）
    pub fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            EngineError::DuplicateAssignment { .. }
                | EngineError::CapacityExceeded { .. }
                | EngineError::IneligibleAssignment { .. }
        )
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
