// ==========================================
// 工位轮岗排班 - 结果校验器
// ==========================================
// 红线: 只读,不修改分配集合
// ==========================================
// 硬失败（整次运行中止）:
//   - 同一 (会话, 阶段) 内员工重复分配
//   - 工位分配数超过需求人数
//   - 分配到不合格的 (员工, 工位)
// 软提示（随结果返回）:
//   - 优先工位最终人数不足
//   - 已分配记录上生效的 LIMITED / TEMPORARY 限制
// ==========================================

use crate::domain::RotationAssignment;
use crate::engine::eligibility::EligibilityFilter;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::report::{RestrictionWarning, UnderstaffedStation};
use crate::engine::snapshot::RunContext;
use std::collections::HashMap;
use tracing::{error, warn};

/// 校验报告（仅软提示,硬失败以错误返回）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub understaffed_stations: Vec<UnderstaffedStation>,
    pub restriction_warnings: Vec<RestrictionWarning>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.understaffed_stations.is_empty() && self.restriction_warnings.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RotationValidator {
    // 无状态引擎,不需要注入依赖
}

impl RotationValidator {
    pub fn new() -> Self {
        Self {}
    }

    /// 校验最终分配集合
    ///
    /// # 返回
    /// - Ok(ValidationReport): 无硬失败,附软提示
    /// - Err(EngineError): 首个硬失败
    pub fn validate(
        &self,
        ctx: &RunContext,
        assignments: &[RotationAssignment],
        filter: &EligibilityFilter<'_>,
    ) -> EngineResult<ValidationReport> {
        self.check_duplicates(ctx, assignments)?;
        self.check_capacity(assignments, filter)?;
        self.check_eligibility(assignments, filter)?;

        let report = ValidationReport {
            understaffed_stations: self.understaffed_priority_stations(assignments, filter),
            restriction_warnings: self.restriction_warnings(assignments, filter),
        };

        for s in &report.understaffed_stations {
            warn!(
                station_id = %s.station_id,
                required = s.required,
                actual = s.actual,
                "优先工位缺员"
            );
        }
        for r in &report.restriction_warnings {
            warn!(
                worker_id = %r.worker_id,
                station_id = %r.station_id,
                restriction_type = %r.restriction_type,
                "分配命中软限制"
            );
        }

        Ok(report)
    }

    fn check_duplicates(&self, ctx: &RunContext, assignments: &[RotationAssignment]) -> EngineResult<()> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for a in assignments {
            *counts.entry(a.worker_id.as_str()).or_insert(0) += 1;
        }

        let mut duplicates: Vec<(&str, usize)> = counts.into_iter().filter(|(_, n)| *n > 1).collect();
        duplicates.sort();
        if let Some(&(worker_id, count)) = duplicates.first() {
            error!(
                session_id = %ctx.session_id,
                phase = %ctx.phase,
                worker_id,
                count,
                "员工重复分配"
            );
            return Err(EngineError::DuplicateAssignment {
                session_id: ctx.session_id.clone(),
                phase: ctx.phase,
                worker_id: worker_id.to_string(),
                count,
            });
        }
        Ok(())
    }

    fn check_capacity(
        &self,
        assignments: &[RotationAssignment],
        filter: &EligibilityFilter<'_>,
    ) -> EngineResult<()> {
        let fill = Self::station_fill(assignments);
        for station in filter.stations() {
            let actual = fill.get(station.station_id.as_str()).copied().unwrap_or(0);
            if actual > station.required_workers {
                error!(
                    station_id = %station.station_id,
                    required = station.required_workers,
                    actual,
                    "工位超员"
                );
                return Err(EngineError::CapacityExceeded {
                    station_id: station.station_id.clone(),
                    required: station.required_workers,
                    actual,
                });
            }
        }
        Ok(())
    }

    fn check_eligibility(
        &self,
        assignments: &[RotationAssignment],
        filter: &EligibilityFilter<'_>,
    ) -> EngineResult<()> {
        for a in assignments {
            let eligible = match (filter.worker(&a.worker_id), filter.station(&a.station_id)) {
                (Some(w), Some(s)) => filter.is_eligible(w, s),
                _ => false,
            };
            if !eligible {
                error!(worker_id = %a.worker_id, station_id = %a.station_id, "分配不满足上岗资格");
                return Err(EngineError::IneligibleAssignment {
                    worker_id: a.worker_id.clone(),
                    station_id: a.station_id.clone(),
                });
            }
        }
        Ok(())
    }

    /// 最终人数不足的启用优先工位
    pub fn understaffed_priority_stations(
        &self,
        assignments: &[RotationAssignment],
        filter: &EligibilityFilter<'_>,
    ) -> Vec<UnderstaffedStation> {
        let fill = Self::station_fill(assignments);
        filter
            .stations()
            .iter()
            .filter(|s| s.is_priority && s.is_active)
            .filter_map(|s| {
                let actual = fill.get(s.station_id.as_str()).copied().unwrap_or(0);
                (actual < s.required_workers).then(|| UnderstaffedStation {
                    station_id: s.station_id.clone(),
                    station_name: s.name.clone(),
                    required: s.required_workers,
                    actual,
                })
            })
            .collect()
    }

    /// 已分配记录上生效的软限制
    pub fn restriction_warnings(
        &self,
        assignments: &[RotationAssignment],
        filter: &EligibilityFilter<'_>,
    ) -> Vec<RestrictionWarning> {
        assignments
            .iter()
            .flat_map(|a| {
                filter
                    .soft_restrictions(&a.worker_id, &a.station_id)
                    .into_iter()
                    .map(|r| RestrictionWarning {
                        worker_id: r.worker_id.clone(),
                        station_id: r.station_id.clone(),
                        restriction_type: r.restriction_type,
                        reason: r.reason.clone(),
                    })
            })
            .collect()
    }

    fn station_fill(assignments: &[RotationAssignment]) -> HashMap<&str, u32> {
        let mut fill: HashMap<&str, u32> = HashMap::new();
        for a in assignments {
            *fill.entry(a.station_id.as_str()).or_insert(0) += 1;
        }
        fill
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RotationConfig;
    use crate::domain::{Capability, Phase, Restriction, RestrictionType, RoleTag, Worker, Workstation};
    use crate::engine::snapshot::RotationSnapshot;
    use chrono::NaiveDate;

    fn ctx() -> RunContext {
        RunContext::new("S", Phase::Current, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())
    }

    fn snapshot() -> RotationSnapshot {
        RotationSnapshot::new(
            vec![Worker::new("W1", "甲"), Worker::new("W2", "乙"), Worker::new("W3", "丙")],
            vec![Workstation::new("A", "A", 2).priority(), Workstation::new("B", "B", 1)],
            vec![
                Capability::new("W1", "A", 3),
                Capability::new("W2", "A", 3),
                Capability::new("W2", "B", 3),
                Capability::new("W3", "B", 3),
            ],
            vec![Restriction {
                restriction_id: "R1".to_string(),
                worker_id: "W3".to_string(),
                station_id: "B".to_string(),
                restriction_type: RestrictionType::Limited,
                valid_from: None,
                valid_until: None,
                reason: Some("限时".to_string()),
                is_active: true,
            }],
        )
    }

    fn assignment(worker: &str, station: &str) -> RotationAssignment {
        RotationAssignment::new("S", worker, station, Phase::Current, 4, vec![RoleTag::Rotation])
    }

    #[test]
    fn test_duplicate_worker_is_hard_failure() {
        let snap = snapshot();
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), ctx().today);
        let result = RotationValidator::new().validate(
            &ctx(),
            &[assignment("W2", "A"), assignment("W2", "B")],
            &filter,
        );
        assert!(matches!(result, Err(EngineError::DuplicateAssignment { count: 2, .. })));
    }

    #[test]
    fn test_over_capacity_is_hard_failure() {
        let snap = snapshot();
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), ctx().today);
        let result = RotationValidator::new().validate(
            &ctx(),
            &[assignment("W2", "B"), assignment("W3", "B")],
            &filter,
        );
        assert!(matches!(result, Err(EngineError::CapacityExceeded { actual: 2, .. })));
    }

    #[test]
    fn test_ineligible_pair_is_hard_failure() {
        let snap = snapshot();
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), ctx().today);
        let result = RotationValidator::new().validate(&ctx(), &[assignment("W1", "B")], &filter);
        assert!(matches!(result, Err(EngineError::IneligibleAssignment { .. })));
    }

    #[test]
    fn test_soft_warnings_reported() {
        let snap = snapshot();
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), ctx().today);
        let report = RotationValidator::new()
            .validate(&ctx(), &[assignment("W1", "A"), assignment("W3", "B")], &filter)
            .unwrap();

        assert_eq!(report.understaffed_stations.len(), 1);
        assert_eq!(report.understaffed_stations[0].station_id, "A");
        assert_eq!(report.understaffed_stations[0].actual, 1);
        assert_eq!(report.restriction_warnings.len(), 1);
        assert_eq!(report.restriction_warnings[0].restriction_type, RestrictionType::Limited);
    }

    #[test]
    fn test_full_coverage_is_clean() {
        let snap = snapshot();
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), ctx().today);
        let report = RotationValidator::new()
            .validate(&ctx(), &[assignment("W1", "A"), assignment("W2", "A")], &filter)
            .unwrap();
        assert!(report.is_clean());
    }
}
