// ==========================================
// 工位轮岗排班 - 引擎编排器
// ==========================================
// 用途: 协调五个分配阶段的执行顺序
// 流程: 前置检查 → 领班固定 → 带教配对 → 优先补齐 → 通用分配 → 校验
// 红线: 纯函数（快照 + 随机源 → 结果或错误）,无 I/O
// ==========================================

use crate::config::RotationConfig;
use crate::engine::eligibility::EligibilityFilter;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::general::GeneralAssigner;
use crate::engine::leadership::LeadershipAssigner;
use crate::engine::priority_fill::PriorityCompletionAssigner;
use crate::engine::report::{ExcludedWorker, RotationDiagnostics, RotationResult};
use crate::engine::snapshot::{RotationSnapshot, RunContext};
use crate::engine::state::AssignmentState;
use crate::engine::training::TrainingPairAssigner;
use crate::engine::validator::RotationValidator;
use rand::Rng;
use tracing::{debug, info, instrument};

/// 阶段名称（写入诊断）
pub mod stage_names {
    pub const LEADERSHIP: &str = "LEADERSHIP";
    pub const TRAINING: &str = "TRAINING";
    pub const PRIORITY_FILL: &str = "PRIORITY_FILL";
    pub const GENERAL: &str = "GENERAL";
}

// ==========================================
// RotationEngine - 引擎编排器
// ==========================================
pub struct RotationEngine {
    config: RotationConfig,
    leadership: LeadershipAssigner,
    training: TrainingPairAssigner,
    priority_fill: PriorityCompletionAssigner,
    general: GeneralAssigner,
    validator: RotationValidator,
}

impl RotationEngine {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 运行配置（熟练度门槛、认证门控）
    pub fn new(config: RotationConfig) -> Self {
        Self {
            config,
            leadership: LeadershipAssigner::new(),
            training: TrainingPairAssigner::new(),
            priority_fill: PriorityCompletionAssigner::new(),
            general: GeneralAssigner::new(),
            validator: RotationValidator::new(),
        }
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    /// 前置检查
    ///
    /// # 返回
    /// - Ok(excluded): 无任何可分配能力的在职员工（仅提示）
    /// - Err: 配置错误,整次运行中止
    pub fn precheck(
        &self,
        snapshot: &RotationSnapshot,
        filter: &EligibilityFilter<'_>,
    ) -> EngineResult<Vec<ExcludedWorker>> {
        let active_workers: Vec<_> = snapshot.workers.iter().filter(|w| w.is_active).collect();
        if active_workers.is_empty() {
            return Err(EngineError::NoActiveWorkers);
        }
        if !snapshot.stations.iter().any(|s| s.is_active) {
            return Err(EngineError::NoActiveStations);
        }

        let mut excluded: Vec<ExcludedWorker> = active_workers
            .iter()
            .filter(|w| filter.assignable_station_count(&w.worker_id) == 0)
            .map(|w| ExcludedWorker {
                worker_id: w.worker_id.clone(),
                name: w.name.clone(),
            })
            .collect();
        excluded.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.worker_id.cmp(&b.worker_id)));

        if excluded.len() == active_workers.len() {
            return Err(EngineError::NoAssignableWorkers);
        }

        for w in &excluded {
            debug!(worker_id = %w.worker_id, "员工无任何可分配能力,本次排除");
        }
        Ok(excluded)
    }

    /// 生成一个阶段的轮岗分配
    ///
    /// # 参数
    /// - snapshot: 员工/工位/能力/限制 只读快照
    /// - ctx: 会话、阶段与判定日期
    /// - rng: 随机源（生产使用新熵,测试可固定种子）
    ///
    /// # 返回
    /// - Ok(RotationResult): 分配列表 + 诊断
    /// - Err(EngineError): 配置错误或完整性违反
    #[instrument(skip(self, snapshot, ctx, rng), fields(
        session_id = %ctx.session_id,
        phase = %ctx.phase,
        workers = snapshot.workers.len(),
        stations = snapshot.stations.len()
    ))]
    pub fn generate<R>(
        &self,
        snapshot: &RotationSnapshot,
        ctx: &RunContext,
        rng: &mut R,
    ) -> EngineResult<RotationResult>
    where
        R: Rng + ?Sized,
    {
        info!("开始生成轮岗分配");
        let filter = EligibilityFilter::new(snapshot, &self.config, ctx.today);

        // ==========================================
        // 步骤0: 前置检查
        // ==========================================
        let excluded_workers = self.precheck(snapshot, &filter)?;

        // ==========================================
        // 步骤1: 领班固定
        // ==========================================
        let leadership = self
            .leadership
            .assign(ctx, &snapshot.workers, &filter, AssignmentState::new());
        let mut stages = vec![leadership.summary(stage_names::LEADERSHIP)];

        // ==========================================
        // 步骤2: 带教配对
        // ==========================================
        let training = self
            .training
            .assign(ctx, &snapshot.workers, &filter, leadership.state);
        stages.push(training.summary(stage_names::TRAINING));

        // ==========================================
        // 步骤3: 优先工位补齐
        // ==========================================
        let priority = self
            .priority_fill
            .assign(ctx, &snapshot.workers, &filter, training.state, rng);
        stages.push(priority.summary(stage_names::PRIORITY_FILL));

        // ==========================================
        // 步骤4: 通用分配
        // ==========================================
        let general = self
            .general
            .assign(ctx, &snapshot.workers, &filter, priority.state, rng);
        stages.push(general.summary(stage_names::GENERAL));

        // ==========================================
        // 步骤5: 校验
        // ==========================================
        let assignments = general.state.into_assignments();
        let report = self.validator.validate(ctx, &assignments, &filter)?;

        let diagnostics = RotationDiagnostics {
            assignments_created: assignments.len(),
            understaffed_stations: report.understaffed_stations,
            excluded_workers,
            restriction_warnings: report.restriction_warnings,
            stages,
        };

        info!(
            assignments = diagnostics.assignments_created,
            understaffed = diagnostics.understaffed_stations.len(),
            excluded = diagnostics.excluded_workers.len(),
            "轮岗分配生成完成"
        );

        Ok(RotationResult {
            assignments,
            diagnostics,
        })
    }
}
