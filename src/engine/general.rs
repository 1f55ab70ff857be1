// ==========================================
// 工位轮岗排班 - 通用分配引擎
// ==========================================
// 红线: 只填剩余空位,不改派前序阶段的员工
// 红线: 普通员工的工位选择必须随机,保证轮岗多样性
// ==========================================
// 职责: 把剩余员工放入所有启用工位的剩余空位
// 策略:
//   - 特殊角色员工（领班/师傅/学员未落位者）: 最佳匹配
//   - 普通员工: 打乱处理顺序,在合格且有空位的工位中均匀随机选择
// ==========================================

use crate::domain::types::stage_rank;
use crate::domain::{RoleTag, Worker, Workstation};
use crate::engine::eligibility::EligibilityFilter;
use crate::engine::report::{SkippedEntry, StageOutcome};
use crate::engine::snapshot::RunContext;
use crate::engine::state::AssignmentState;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use std::cmp::Reverse;
use tracing::{debug, info};

/// 最佳匹配档位（越小越优先）
const TIER_LEADERSHIP: u8 = 0;
const TIER_TRAINING: u8 = 1;
const TIER_OTHER: u8 = 2;

// ==========================================
// GeneralAssigner - 通用分配引擎
// ==========================================
#[derive(Debug, Default)]
pub struct GeneralAssigner {
    // 无状态引擎,不需要注入依赖
}

impl GeneralAssigner {
    pub fn new() -> Self {
        Self {}
    }

    /// 特殊角色员工在某工位的匹配档位
    ///
    /// # 规则
    /// - 0: 本人的领导工位,或能力记录可任领班
    /// - 1: 本人的培训工位,或能力记录可带教
    /// - 2: 其他合格工位
    pub fn fit_tier(&self, worker: &Worker, station: &Workstation, filter: &EligibilityFilter<'_>) -> u8 {
        let cap = filter.capability(&worker.worker_id, &station.station_id);

        let leads_here = worker.leadership_station_id.as_deref() == Some(station.station_id.as_str())
            || cap.is_some_and(|c| c.can_be_leader);
        if leads_here {
            return TIER_LEADERSHIP;
        }

        let trains_here = worker.training_station_id.as_deref() == Some(station.station_id.as_str())
            || cap.is_some_and(|c| c.can_train);
        if trains_here {
            return TIER_TRAINING;
        }

        TIER_OTHER
    }

    /// 特殊角色员工的最佳匹配工位
    ///
    /// 排序键: 档位升序 → 熟练度降序 → 工位名称升序
    pub fn best_fit<'a>(
        &self,
        worker: &Worker,
        filter: &EligibilityFilter<'a>,
        state: &AssignmentState,
    ) -> Option<&'a Workstation> {
        filter
            .eligible_stations(worker)
            .into_iter()
            .filter(|s| state.has_open_slot(s))
            .min_by_key(|s| {
                let level = filter
                    .capability(&worker.worker_id, &s.station_id)
                    .map(|c| c.competency_level)
                    .unwrap_or(0);
                (self.fit_tier(worker, s, filter), Reverse(level), s.name.clone(), s.station_id.clone())
            })
    }

    /// 普通员工的随机工位（合格且有空位的工位中均匀选择）
    pub fn random_fit<'a, R>(
        &self,
        worker: &Worker,
        filter: &EligibilityFilter<'a>,
        state: &AssignmentState,
        rng: &mut R,
    ) -> Option<&'a Workstation>
    where
        R: Rng + ?Sized,
    {
        let open: Vec<&Workstation> = filter
            .eligible_stations(worker)
            .into_iter()
            .filter(|s| state.has_open_slot(s))
            .collect();
        open.choose(rng).copied()
    }

    /// 通用分配
    ///
    /// # 处理顺序
    /// 1) 未落位的特殊角色员工,按姓名排序,最佳匹配
    /// 2) 未落位的普通员工,随机顺序,随机工位
    ///
    /// 找不到合格空位的员工保持未分配（正常情况）
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
        debug!(phase = %ctx.phase, "通用分配: 开始");
        let mut outcome = StageOutcome::new(state);

        let (mut special, mut ordinary): (Vec<&Worker>, Vec<&Worker>) = workers
            .iter()
            .filter(|w| w.is_active && !outcome.state.is_assigned(&w.worker_id))
            .partition(|w| w.has_special_role());

        // ===== 特殊角色: 最佳匹配 =====
        special.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.worker_id.cmp(&b.worker_id)));
        for worker in special {
            let Some(station) = self.best_fit(worker, filter, &outcome.state) else {
                outcome
                    .skipped
                    .push(SkippedEntry::new(&worker.worker_id, None, "NO_OPEN_ELIGIBLE_STATION"));
                continue;
            };

            let mut tags = vec![RoleTag::BestFit];
            if worker.is_leader {
                tags.push(RoleTag::Leader);
            }
            if worker.is_trainer {
                tags.push(RoleTag::Trainer);
            }
            if worker.is_trainee {
                tags.push(RoleTag::Trainee);
            }

            if outcome
                .state
                .place(ctx, &worker.worker_id, station, stage_rank::GENERAL, tags)
            {
                outcome.placed += 1;
            }
        }

        // ===== 普通员工: 随机轮岗 =====
        ordinary.sort_by(|a, b| a.worker_id.cmp(&b.worker_id));
        ordinary.shuffle(rng);
        for worker in ordinary {
            let Some(station) = self.random_fit(worker, filter, &outcome.state, rng) else {
                outcome
                    .skipped
                    .push(SkippedEntry::new(&worker.worker_id, None, "NO_OPEN_ELIGIBLE_STATION"));
                continue;
            };

            if outcome.state.place(
                ctx,
                &worker.worker_id,
                station,
                stage_rank::GENERAL,
                vec![RoleTag::Rotation],
            ) {
                outcome.placed += 1;
            }
        }

        info!(
            phase = %ctx.phase,
            placed = outcome.placed,
            unplaced = outcome.skipped.len(),
            "通用分配完成"
        );
        outcome
    }
}
