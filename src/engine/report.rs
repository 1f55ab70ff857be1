// ==========================================
// 工位轮岗排班 - 运行诊断报告
// ==========================================
// 用途: 覆盖不足、个体排除、软限制等非致命信息
//       随成功结果一起返回,由调用方决定如何呈现
// ==========================================

use crate::domain::{RestrictionType, RotationAssignment};
use crate::engine::state::AssignmentState;
use serde::{Deserialize, Serialize};

/// 优先工位缺员
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderstaffedStation {
    pub station_id: String,
    pub station_name: String,
    pub required: u32,
    pub actual: u32,
}

/// 因无任何可分配能力被排除的在职员工
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedWorker {
    pub worker_id: String,
    pub name: String,
}

/// 已分配记录上生效的软限制（LIMITED / TEMPORARY）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictionWarning {
    pub worker_id: String,
    pub station_id: String,
    pub restriction_type: RestrictionType,
    pub reason: Option<String>,
}

/// 阶段内被跳过的员工（含原因）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub worker_id: String,
    pub station_id: Option<String>,
    pub reason: String,
}

impl SkippedEntry {
    pub fn new(worker_id: &str, station_id: Option<&str>, reason: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.to_string(),
            station_id: station_id.map(str::to_string),
            reason: reason.into(),
        }
    }
}

/// 阶段汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSummary {
    pub stage: String,
    pub placed: usize,
    pub skipped: Vec<SkippedEntry>,
}

// ==========================================
// StageOutcome - 单阶段输出
// ==========================================
#[derive(Debug, Clone)]
pub struct StageOutcome {
    pub state: AssignmentState,
    pub placed: usize,
    pub skipped: Vec<SkippedEntry>,
    /// 仅优先补齐阶段填写: 候选不足的优先工位
    pub shortfalls: Vec<UnderstaffedStation>,
}

impl StageOutcome {
    pub fn new(state: AssignmentState) -> Self {
        Self {
            state,
            placed: 0,
            skipped: Vec::new(),
            shortfalls: Vec::new(),
        }
    }

    pub fn summary(&self, stage: &str) -> StageSummary {
        StageSummary {
            stage: stage.to_string(),
            placed: self.placed,
            skipped: self.skipped.clone(),
        }
    }
}

// ==========================================
// RotationDiagnostics - 运行诊断
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationDiagnostics {
    /// 生成的分配数
    pub assignments_created: usize,
    /// 缺员的优先工位 (required, actual)
    pub understaffed_stations: Vec<UnderstaffedStation>,
    /// 无任何可分配能力的在职员工
    pub excluded_workers: Vec<ExcludedWorker>,
    /// 软限制提示
    pub restriction_warnings: Vec<RestrictionWarning>,
    /// 各阶段落位/跳过明细
    pub stages: Vec<StageSummary>,
}

impl RotationDiagnostics {
    pub fn has_warnings(&self) -> bool {
        !self.understaffed_stations.is_empty()
            || !self.excluded_workers.is_empty()
            || !self.restriction_warnings.is_empty()
    }
}

// ==========================================
// RotationResult - 引擎输出
// ==========================================
#[derive(Debug, Clone)]
pub struct RotationResult {
    pub assignments: Vec<RotationAssignment>,
    pub diagnostics: RotationDiagnostics,
}
