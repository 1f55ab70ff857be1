// ==========================================
// 工位轮岗排班 - 带教配对引擎
// ==========================================
// 红线: 有效的师徒配对不拆分,学员落在培训工位时师傅同工位
// ==========================================
// 职责: 把学员与带教师傅一起固定到学员的培训工位
// 输入: 员工快照 + 已分配状态
// 输出: 新的已分配状态 + 跳过原因
// ==========================================

use crate::domain::types::stage_rank;
use crate::domain::{RoleTag, Worker, Workstation};
use crate::engine::eligibility::EligibilityFilter;
use crate::engine::report::{SkippedEntry, StageOutcome};
use crate::engine::snapshot::RunContext;
use crate::engine::state::AssignmentState;
use tracing::{debug, info};

/// 已校验的师徒配对
#[derive(Debug, Clone, Copy)]
pub struct TrainingPair<'a> {
    pub trainee: &'a Worker,
    pub trainer: &'a Worker,
    pub station: &'a Workstation,
}

// ==========================================
// TrainingPairAssigner - 带教配对引擎
// ==========================================
#[derive(Debug, Default)]
pub struct TrainingPairAssigner {
    // 无状态引擎,不需要注入依赖
}

impl TrainingPairAssigner {
    pub fn new() -> Self {
        Self {}
    }

    /// 校验配对
    ///
    /// # 有效条件
    /// 1) 学员在职, is_trainee, 师傅与培训工位均已填写
    /// 2) 师傅存在、在职且 is_trainer
    /// 3) 培训工位存在且启用
    /// 4) 学员在培训工位持有可分配能力（且未被禁止）
    ///
    /// # 返回
    /// - Ok(TrainingPair): 有效配对
    /// - Err(reason): 无效原因
    pub fn validate_pair<'a>(
        &self,
        trainee: &'a Worker,
        filter: &EligibilityFilter<'a>,
    ) -> Result<TrainingPair<'a>, String> {
        if !trainee.is_active || !trainee.is_trainee {
            return Err("TRAINEE_INVALID".to_string());
        }
        let (Some(trainer_id), Some(station_id)) =
            (trainee.trainer_id.as_deref(), trainee.training_station_id.as_deref())
        else {
            return Err("PAIR_INCOMPLETE".to_string());
        };

        let trainer = match filter.worker(trainer_id) {
            Some(t) if t.is_active && t.is_trainer => t,
            Some(_) => return Err("TRAINER_INVALID".to_string()),
            None => return Err("TRAINER_NOT_FOUND".to_string()),
        };

        let station = match filter.station(station_id) {
            Some(s) if s.is_active => s,
            _ => return Err("STATION_INACTIVE".to_string()),
        };

        filter
            .check(trainee, station)
            .map_err(|reason| format!("TRAINEE_INELIGIBLE: {}", reason))?;

        Ok(TrainingPair {
            trainee,
            trainer,
            station,
        })
    }

    /// 收集有效配对并排序
    ///
    /// 排序键:
    /// 1) 培训工位为优先工位者在前
    /// 2) 学员姓名升序
    /// 3) 学员 worker_id 升序（兜底）
    pub fn collect_pairs<'a>(
        &self,
        workers: &'a [Worker],
        filter: &EligibilityFilter<'a>,
        skipped: &mut Vec<SkippedEntry>,
    ) -> Vec<TrainingPair<'a>> {
        let mut pairs = Vec::new();
        for trainee in workers.iter().filter(|w| w.is_trainee) {
            match self.validate_pair(trainee, filter) {
                Ok(pair) => pairs.push(pair),
                Err(reason) => skipped.push(SkippedEntry::new(
                    &trainee.worker_id,
                    trainee.training_station_id.as_deref(),
                    reason,
                )),
            }
        }

        pairs.sort_by(|a, b| {
            b.station
                .is_priority
                .cmp(&a.station.is_priority)
                .then_with(|| a.trainee.name.cmp(&b.trainee.name))
                .then_with(|| a.trainee.worker_id.cmp(&b.trainee.worker_id))
        });
        pairs
    }

    /// 固定师徒配对
    ///
    /// 规则:
    /// - 学员已分配（例如已作为领班固定）→ 跳过学员,师傅仍单独尝试落在培训工位
    /// - 培训工位无空位 → 整对跳过
    /// - 师傅对培训工位不合格 → 师傅留给通用分配
    pub fn assign<'a>(
        &self,
        ctx: &RunContext,
        workers: &'a [Worker],
        filter: &EligibilityFilter<'a>,
        state: AssignmentState,
    ) -> StageOutcome {
        debug!(phase = %ctx.phase, "带教配对: 开始");
        let mut outcome = StageOutcome::new(state);
        let pairs = self.collect_pairs(workers, filter, &mut outcome.skipped);

        for pair in pairs {
            let station_id = pair.station.station_id.as_str();

            if outcome.state.is_assigned(&pair.trainee.worker_id) {
                outcome.skipped.push(SkippedEntry::new(
                    &pair.trainee.worker_id,
                    Some(station_id),
                    "ALREADY_ASSIGNED",
                ));
                self.place_trainer(ctx, &pair, filter, &mut outcome);
                continue;
            }

            let trainee_tags = vec![RoleTag::Trainee];
            if !outcome.state.place(
                ctx,
                &pair.trainee.worker_id,
                pair.station,
                stage_rank::TRAINING,
                trainee_tags,
            ) {
                outcome.skipped.push(SkippedEntry::new(
                    &pair.trainee.worker_id,
                    Some(station_id),
                    "STATION_FULL",
                ));
                continue;
            }
            outcome.placed += 1;

            self.place_trainer(ctx, &pair, filter, &mut outcome);
        }

        info!(
            phase = %ctx.phase,
            placed = outcome.placed,
            skipped = outcome.skipped.len(),
            "带教配对完成"
        );
        outcome
    }

    /// 师傅落位（未分配且对培训工位合格、仍有空位时）
    fn place_trainer(
        &self,
        ctx: &RunContext,
        pair: &TrainingPair<'_>,
        filter: &EligibilityFilter<'_>,
        outcome: &mut StageOutcome,
    ) {
        let trainer = pair.trainer;
        let station_id = pair.station.station_id.as_str();

        if outcome.state.is_assigned(&trainer.worker_id) {
            return;
        }

        if let Err(reason) = filter.check(trainer, pair.station) {
            outcome.skipped.push(SkippedEntry::new(
                &trainer.worker_id,
                Some(station_id),
                format!("TRAINER_INELIGIBLE: {}", reason),
            ));
            return;
        }

        let mut tags = vec![RoleTag::Trainer];
        if trainer.is_leader {
            tags.push(RoleTag::Leader);
        }

        if outcome
            .state
            .place(ctx, &trainer.worker_id, pair.station, stage_rank::TRAINING, tags)
        {
            outcome.placed += 1;
        } else {
            outcome
                .skipped
                .push(SkippedEntry::new(&trainer.worker_id, Some(station_id), "STATION_FULL"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RotationConfig;
    use crate::domain::{Capability, Phase};
    use crate::engine::snapshot::RotationSnapshot;
    use chrono::NaiveDate;

    fn ctx() -> RunContext {
        RunContext::new("S", Phase::Current, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())
    }

    fn trainer(id: &str, name: &str) -> Worker {
        let mut w = Worker::new(id, name);
        w.is_trainer = true;
        w
    }

    fn trainee(id: &str, name: &str, trainer_id: &str, station: &str) -> Worker {
        let mut w = Worker::new(id, name);
        w.is_trainee = true;
        w.trainer_id = Some(trainer_id.to_string());
        w.training_station_id = Some(station.to_string());
        w
    }

    #[test]
    fn test_pair_placed_together() {
        let snap = RotationSnapshot::new(
            vec![trainer("T1", "师傅"), trainee("T2", "学员", "T1", "B")],
            vec![Workstation::new("B", "B", 2)],
            vec![Capability::new("T1", "B", 5), Capability::new("T2", "B", 2)],
            vec![],
        );
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), ctx().today);
        let outcome = TrainingPairAssigner::new().assign(&ctx(), &snap.workers, &filter, AssignmentState::new());

        assert_eq!(outcome.placed, 2);
        assert!(outcome.state.assignments().iter().all(|a| a.station_id == "B"));
    }

    #[test]
    fn test_single_slot_takes_trainee_only() {
        let snap = RotationSnapshot::new(
            vec![trainer("T1", "师傅"), trainee("T2", "学员", "T1", "B")],
            vec![Workstation::new("B", "B", 1).priority()],
            vec![Capability::new("T1", "B", 5), Capability::new("T2", "B", 2)],
            vec![],
        );
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), ctx().today);
        let outcome = TrainingPairAssigner::new().assign(&ctx(), &snap.workers, &filter, AssignmentState::new());

        assert!(outcome.state.is_assigned("T2"));
        assert!(!outcome.state.is_assigned("T1"));
        assert!(outcome
            .skipped
            .iter()
            .any(|s| s.worker_id == "T1" && s.reason == "STATION_FULL"));
    }

    #[test]
    fn test_trainer_ineligible_stays_unassigned() {
        let snap = RotationSnapshot::new(
            vec![trainer("T1", "师傅"), trainee("T2", "学员", "T1", "B")],
            vec![Workstation::new("B", "B", 2)],
            vec![Capability::new("T2", "B", 3)],
            vec![],
        );
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), ctx().today);
        let outcome = TrainingPairAssigner::new().assign(&ctx(), &snap.workers, &filter, AssignmentState::new());

        assert!(outcome.state.is_assigned("T2"));
        assert!(!outcome.state.is_assigned("T1"));
    }

    #[test]
    fn test_trainee_already_assigned_trainer_still_attempted() {
        let snap = RotationSnapshot::new(
            vec![trainer("T1", "师傅"), trainee("T2", "学员", "T1", "B")],
            vec![Workstation::new("A", "A", 1), Workstation::new("B", "B", 2)],
            vec![
                Capability::new("T1", "B", 5),
                Capability::new("T2", "A", 3),
                Capability::new("T2", "B", 3),
            ],
            vec![],
        );
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), ctx().today);

        let mut state = AssignmentState::new();
        let station_a = filter.station("A").unwrap();
        assert!(state.place(&ctx(), "T2", station_a, stage_rank::LEADERSHIP, vec![RoleTag::Leader]));

        let outcome = TrainingPairAssigner::new().assign(&ctx(), &snap.workers, &filter, state);
        let trainer_assignment = outcome
            .state
            .assignments()
            .iter()
            .find(|a| a.worker_id == "T1")
            .expect("师傅应单独落位");
        assert_eq!(trainer_assignment.station_id, "B");
        // 学员保持原分配
        assert_eq!(
            outcome.state.assignments().iter().filter(|a| a.worker_id == "T2").count(),
            1
        );
    }

    #[test]
    fn test_invalid_pairs_are_reported() {
        let mut not_a_trainer = Worker::new("X", "普通");
        not_a_trainer.is_trainer = false;
        let snap = RotationSnapshot::new(
            vec![
                not_a_trainer,
                trainee("T2", "学员甲", "X", "B"),
                trainee("T3", "学员乙", "NOBODY", "B"),
            ],
            vec![Workstation::new("B", "B", 3)],
            vec![Capability::new("T2", "B", 3), Capability::new("T3", "B", 3)],
            vec![],
        );
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), ctx().today);
        let outcome = TrainingPairAssigner::new().assign(&ctx(), &snap.workers, &filter, AssignmentState::new());

        assert_eq!(outcome.placed, 0);
        let reasons: Vec<&str> = outcome.skipped.iter().map(|s| s.reason.as_str()).collect();
        assert!(reasons.contains(&"TRAINER_INVALID"));
        assert!(reasons.contains(&"TRAINER_NOT_FOUND"));
    }

    #[test]
    fn test_priority_station_pairs_first() {
        let snap = RotationSnapshot::new(
            vec![
                trainer("T1", "师傅甲"),
                trainer("T9", "师傅乙"),
                trainee("A1", "Aaron", "T1", "N"),
                trainee("Z1", "Zed", "T9", "P"),
            ],
            vec![Workstation::new("N", "普通", 2), Workstation::new("P", "优先", 2).priority()],
            vec![Capability::new("A1", "N", 3), Capability::new("Z1", "P", 3)],
            vec![],
        );
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), ctx().today);
        let mut skipped = Vec::new();
        let pairs = TrainingPairAssigner::new().collect_pairs(&snap.workers, &filter, &mut skipped);
        let order: Vec<&str> = pairs.iter().map(|p| p.trainee.worker_id.as_str()).collect();
        assert_eq!(order, vec!["Z1", "A1"]);
    }
}
