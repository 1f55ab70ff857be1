// ==========================================
// 工位轮岗排班 - 优先工位补齐引擎
// ==========================================
// 红线: 优先工位先于任何非优先工位补齐
// 红线: 候选不足时尽量分配并记录缺员,不视为失败
// ==========================================
// 职责: 把优先工位补到需求人数
// 输入: 员工快照 + 已分配状态 + 随机源
// 输出: 新的已分配状态 + 缺员记录
// ==========================================
// 注: 候选先按 worker_id 排序再洗牌,结果只由随机源决定
// ==========================================

use crate::domain::types::stage_rank;
use crate::domain::{RoleTag, Worker, Workstation};
use crate::engine::eligibility::EligibilityFilter;
use crate::engine::report::{StageOutcome, UnderstaffedStation};
use crate::engine::snapshot::RunContext;
use crate::engine::state::AssignmentState;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

// ==========================================
// PriorityCompletionAssigner - 优先工位补齐引擎
// ==========================================
#[derive(Debug, Default)]
pub struct PriorityCompletionAssigner {
    // 无状态引擎,不需要注入依赖
}

impl PriorityCompletionAssigner {
    pub fn new() -> Self {
        Self {}
    }

    /// 某优先工位的候选池
    ///
    /// 候选条件: 未分配、在职、对该工位合格（含禁止性限制判定）
    pub fn candidates<'a>(
        &self,
        station: &Workstation,
        workers: &'a [Worker],
        filter: &EligibilityFilter<'_>,
        state: &AssignmentState,
    ) -> Vec<&'a Worker> {
        let mut pool: Vec<&Worker> = workers
            .iter()
            .filter(|w| !state.is_assigned(&w.worker_id))
            .filter(|w| filter.is_eligible(w, station))
            .collect();
        pool.sort_by(|a, b| a.worker_id.cmp(&b.worker_id));
        pool
    }

    /// 补齐优先工位
    ///
    /// # 规则
    /// - 优先工位按名称顺序处理
    /// - needed = required - 已分配（含领班/学员）
    /// - 候选洗牌后取前 needed 名
    /// - 候选不足: 全部分配并记录缺员
    pub fn assign<R>(
        &self,
        ctx: &RunContext,
        workers: &[Worker],
        filter: &EligibilityFilter<'_>,
        state: AssignmentState,
        rng: &mut R,
    ) -> StageOutcome
    where
        R: Rng + ?Sized,
    {
        debug!(phase = %ctx.phase, "优先工位补齐: 开始");
        let mut outcome = StageOutcome::new(state);

        let priority_stations = filter
            .stations()
            .iter()
            .copied()
            .filter(|s| s.is_priority && s.is_active);

        for station in priority_stations {
            let needed = outcome.state.open_capacity(station) as usize;
            if needed == 0 {
                continue;
            }

            let mut pool = self.candidates(station, workers, filter, &outcome.state);
            pool.shuffle(rng);

            let available = pool.len();
            for worker in pool.into_iter().take(needed) {
                if outcome.state.place(
                    ctx,
                    &worker.worker_id,
                    station,
                    stage_rank::PRIORITY_FILL,
                    vec![RoleTag::PriorityFill],
                ) {
                    outcome.placed += 1;
                }
            }

            if available < needed {
                let actual = outcome.state.assigned_count(&station.station_id);
                warn!(
                    station_id = %station.station_id,
                    required = station.required_workers,
                    actual,
                    "优先工位候选不足"
                );
                outcome.shortfalls.push(UnderstaffedStation {
                    station_id: station.station_id.clone(),
                    station_name: station.name.clone(),
                    required: station.required_workers,
                    actual,
                });
            }
        }

        info!(
            phase = %ctx.phase,
            placed = outcome.placed,
            shortfalls = outcome.shortfalls.len(),
            "优先工位补齐完成"
        );
        outcome
    }
}
