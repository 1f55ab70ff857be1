// ==========================================
// 工位轮岗排班 - 领班固定引擎
// ==========================================
// 红线: 领导范围覆盖本阶段的在职领班必须落在其指定工位
// ==========================================
// 职责: 按领导范围把领班钉在领导工位
// 输入: 员工快照 + 本阶段半程 + 已分配状态
// 输出: 新的已分配状态 + 跳过原因
// ==========================================
// 注: 领导工位未启用时静默跳过,缺员由校验器报告
// ==========================================

use crate::domain::types::stage_rank;
use crate::domain::{LeadershipScope, RoleTag, Worker};
use crate::engine::eligibility::EligibilityFilter;
use crate::engine::report::{SkippedEntry, StageOutcome};
use crate::engine::snapshot::RunContext;
use crate::engine::state::AssignmentState;
use tracing::{debug, info};

// ==========================================
// LeadershipAssigner - 领班固定引擎
// ==========================================
#[derive(Debug, Default)]
pub struct LeadershipAssigner {
    // 无状态引擎,不需要注入依赖
}

impl LeadershipAssigner {
    pub fn new() -> Self {
        Self {}
    }

    /// 领班的有效领导范围（未填写视为全程）
    fn effective_scope(worker: &Worker) -> LeadershipScope {
        worker.leadership_scope.unwrap_or(LeadershipScope::Both)
    }

    /// 领班处理顺序
    ///
    /// 排序键:
    /// 1) 领导范围 BOTH 优先
    /// 2) 姓名升序
    /// 3) worker_id 升序（兜底）
    fn ordered_leaders<'w>(&self, workers: &'w [Worker], ctx: &RunContext) -> Vec<&'w Worker> {
        let half = ctx.phase.half();
        let mut leaders: Vec<&Worker> = workers
            .iter()
            .filter(|w| w.is_leader && w.leadership_station_id.is_some())
            .filter(|w| Self::effective_scope(w).covers(half))
            .collect();

        leaders.sort_by(|a, b| {
            let a_both = Self::effective_scope(a) == LeadershipScope::Both;
            let b_both = Self::effective_scope(b) == LeadershipScope::Both;
            b_both
                .cmp(&a_both)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.worker_id.cmp(&b.worker_id))
        });
        leaders
    }

    /// 固定领班
    ///
    /// # 参数
    /// - `ctx`: 运行上下文（阶段决定半程）
    /// - `workers`: 员工快照
    /// - `filter`: 资格过滤器
    /// - `state`: 前序阶段的分配状态
    ///
    /// # 返回
    /// 阶段输出（状态 + 落位数 + 跳过原因）
    pub fn assign(
        &self,
        ctx: &RunContext,
        workers: &[Worker],
        filter: &EligibilityFilter<'_>,
        state: AssignmentState,
    ) -> StageOutcome {
        debug!(phase = %ctx.phase, "领班固定: 开始");
        let mut outcome = StageOutcome::new(state);

        for leader in self.ordered_leaders(workers, ctx) {
            let Some(station_id) = leader.leadership_station_id.as_deref() else {
                continue;
            };

            if !leader.is_active {
                outcome
                    .skipped
                    .push(SkippedEntry::new(&leader.worker_id, Some(station_id), "LEADER_INACTIVE"));
                continue;
            }

            if outcome.state.is_assigned(&leader.worker_id) {
                outcome
                    .skipped
                    .push(SkippedEntry::new(&leader.worker_id, Some(station_id), "ALREADY_ASSIGNED"));
                continue;
            }

            let station = match filter.station(station_id) {
                Some(s) if s.is_active => s,
                _ => {
                    debug!(worker_id = %leader.worker_id, station_id, "领导工位未启用,跳过");
                    outcome
                        .skipped
                        .push(SkippedEntry::new(&leader.worker_id, Some(station_id), "STATION_INACTIVE"));
                    continue;
                }
            };

            if let Err(reason) = filter.check(leader, station) {
                outcome.skipped.push(SkippedEntry::new(
                    &leader.worker_id,
                    Some(station_id),
                    format!("LEADER_INELIGIBLE: {}", reason),
                ));
                continue;
            }

            let mut tags = vec![RoleTag::Leader];
            if leader.is_trainer {
                tags.push(RoleTag::Trainer);
            }

            if outcome
                .state
                .place(ctx, &leader.worker_id, station, stage_rank::LEADERSHIP, tags)
            {
                outcome.placed += 1;
            } else {
                outcome
                    .skipped
                    .push(SkippedEntry::new(&leader.worker_id, Some(station_id), "STATION_FULL"));
            }
        }

        info!(
            phase = %ctx.phase,
            placed = outcome.placed,
            skipped = outcome.skipped.len(),
            "领班固定完成"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RotationConfig;
    use crate::domain::{Capability, Phase, Workstation};
    use crate::engine::snapshot::RotationSnapshot;
    use chrono::NaiveDate;

    fn leader(id: &str, name: &str, station: &str, scope: Option<LeadershipScope>) -> Worker {
        let mut w = Worker::new(id, name);
        w.is_leader = true;
        w.leadership_station_id = Some(station.to_string());
        w.leadership_scope = scope;
        w
    }

    fn ctx(phase: Phase) -> RunContext {
        RunContext::new("S", phase, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())
    }

    fn snapshot() -> RotationSnapshot {
        let mut inactive_station = Workstation::new("C", "停用工位", 1);
        inactive_station.is_active = false;

        RotationSnapshot::new(
            vec![
                leader("L1", "Alice", "A", Some(LeadershipScope::FirstHalf)),
                leader("L2", "Bob", "A", Some(LeadershipScope::SecondHalf)),
                leader("L3", "Carol", "B", None),
                leader("L4", "Dave", "C", Some(LeadershipScope::Both)),
            ],
            vec![Workstation::new("A", "A", 2), Workstation::new("B", "B", 1), inactive_station],
            vec![
                Capability::new("L1", "A", 4),
                Capability::new("L2", "A", 4),
                Capability::new("L3", "B", 4),
                Capability::new("L4", "C", 4),
            ],
            vec![],
        )
    }

    #[test]
    fn test_scope_selects_half_specific_leaders() {
        let snap = snapshot();
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), ctx(Phase::Current).today);

        let current = LeadershipAssigner::new().assign(&ctx(Phase::Current), &snap.workers, &filter, AssignmentState::new());
        let placed: Vec<(&str, &str)> = current
            .state
            .assignments()
            .iter()
            .map(|a| (a.worker_id.as_str(), a.station_id.as_str()))
            .collect();
        assert!(placed.contains(&("L1", "A")));
        assert!(placed.contains(&("L3", "B")));
        assert!(!placed.iter().any(|(w, _)| *w == "L2"));

        let next = LeadershipAssigner::new().assign(&ctx(Phase::Next), &snap.workers, &filter, AssignmentState::new());
        assert!(next.state.is_assigned("L2"));
        assert!(!next.state.is_assigned("L1"));
    }

    #[test]
    fn test_inactive_station_is_skipped_silently() {
        let snap = snapshot();
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), ctx(Phase::Current).today);
        let outcome = LeadershipAssigner::new().assign(&ctx(Phase::Current), &snap.workers, &filter, AssignmentState::new());

        assert!(!outcome.state.is_assigned("L4"));
        assert!(outcome
            .skipped
            .iter()
            .any(|s| s.worker_id == "L4" && s.reason == "STATION_INACTIVE"));
    }

    #[test]
    fn test_both_scope_processed_first() {
        let snap = snapshot();
        let leaders = LeadershipAssigner::new().ordered_leaders(&snap.workers, &ctx(Phase::Current));
        let ids: Vec<&str> = leaders.iter().map(|w| w.worker_id.as_str()).collect();
        // L3（未填写 = BOTH）与 L4（BOTH）在前,按姓名排序;L1 在后
        assert_eq!(ids, vec!["L3", "L4", "L1"]);
    }

    #[test]
    fn test_leader_tags_and_rank() {
        let snap = snapshot();
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), ctx(Phase::Current).today);
        let outcome = LeadershipAssigner::new().assign(&ctx(Phase::Current), &snap.workers, &filter, AssignmentState::new());
        for a in outcome.state.assignments() {
            assert!(a.has_tag(RoleTag::Leader));
            assert_eq!(a.priority_rank, stage_rank::LEADERSHIP);
        }
    }
}
