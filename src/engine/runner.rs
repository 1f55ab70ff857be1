// ==========================================
// 工位轮岗排班 - 运行器
// ==========================================
// 流程: 读取快照 → 引擎生成 → 整批替换写入
// 红线: 引擎失败不写入;写入失败时旧分配保持不变
// ==========================================

use crate::domain::Phase;
use crate::engine::error::EngineResult;
use crate::engine::orchestrator::RotationEngine;
use crate::engine::report::RotationResult;
use crate::engine::repositories::{AssignmentWriter, RotationSnapshotSource};
use crate::engine::snapshot::{RotationSnapshot, RunContext};
use chrono::NaiveDate;
use rand::Rng;
use std::sync::Arc;
use tracing::{error, info};

pub struct RotationRunner {
    source: Arc<dyn RotationSnapshotSource>,
    writer: Arc<dyn AssignmentWriter>,
    engine: RotationEngine,
}

impl RotationRunner {
    /// # 参数
    /// - source: 快照读取端口
    /// - writer: 分配写入端口
    /// - engine: 已载入配置的引擎
    pub fn new(
        source: Arc<dyn RotationSnapshotSource>,
        writer: Arc<dyn AssignmentWriter>,
        engine: RotationEngine,
    ) -> Self {
        Self {
            source,
            writer,
            engine,
        }
    }

    /// 执行一次完整运行
    ///
    /// # 返回
    /// - Ok(RotationResult): 已提交的分配 + 诊断
    /// - Err: 配置错误 / 完整性违反 / 端口错误（均未改动已有分配）
    pub fn run<R>(
        &self,
        session_id: &str,
        phase: Phase,
        today: NaiveDate,
        rng: &mut R,
    ) -> EngineResult<RotationResult>
    where
        R: Rng + ?Sized,
    {
        let snapshot = RotationSnapshot::load(self.source.as_ref())?;
        let ctx = RunContext::new(session_id, phase, today);

        let result = self.engine.generate(&snapshot, &ctx, rng)?;

        let written = self
            .writer
            .replace_assignments(session_id, phase, &result.assignments)
            .map_err(|e| {
                error!(session_id, phase = %phase, error = %e, "分配写入失败,保留原分配");
                e
            })?;

        info!(session_id, phase = %phase, written, "分配已提交");
        Ok(result)
    }
}
