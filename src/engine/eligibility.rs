// ==========================================
// 工位轮岗排班 - 上岗资格过滤器
// ==========================================
// 红线: 纯谓词,无副作用、无 I/O
// 红线: PROHIBITED 限制永远覆盖能力记录
// ==========================================
// 职责: 判定 (员工, 工位) 是否可合法分配
// 输入: 员工/工位/能力/限制 快照 + 运行配置
// 输出: bool 或不合格原因
// ==========================================

use crate::config::RotationConfig;
use crate::domain::{Capability, Restriction, Worker, Workstation};
use crate::engine::snapshot::RotationSnapshot;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// 不合格原因（可解释性: 每次否决都要给出原因）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IneligibleReason {
    WorkerInactive,
    StationInactive,
    NoCapability,
    CapabilityInactive,
    BelowMinCompetency { level: i32, min: i32 },
    CertificationInvalid,
    Prohibited,
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IneligibleReason::WorkerInactive => write!(f, "WORKER_INACTIVE"),
            IneligibleReason::StationInactive => write!(f, "STATION_INACTIVE"),
            IneligibleReason::NoCapability => write!(f, "NO_CAPABILITY"),
            IneligibleReason::CapabilityInactive => write!(f, "CAPABILITY_INACTIVE"),
            IneligibleReason::BelowMinCompetency { level, min } => {
                write!(f, "BELOW_MIN_COMPETENCY: level={}, min={}", level, min)
            }
            IneligibleReason::CertificationInvalid => write!(f, "CERTIFICATION_INVALID"),
            IneligibleReason::Prohibited => write!(f, "PROHIBITED"),
        }
    }
}

// ==========================================
// EligibilityFilter - 上岗资格过滤器
// ==========================================
// 构造时按 worker_id / station_id 建立索引,之后只读
pub struct EligibilityFilter<'a> {
    workers: HashMap<&'a str, &'a Worker>,
    stations: Vec<&'a Workstation>,
    station_index: HashMap<&'a str, &'a Workstation>,
    capabilities: HashMap<&'a str, HashMap<&'a str, &'a Capability>>,
    restrictions: HashMap<&'a str, HashMap<&'a str, Vec<&'a Restriction>>>,
    min_competency_level: i32,
    certification_gated: bool,
    today: NaiveDate,
}

impl<'a> EligibilityFilter<'a> {
    /// 基于快照构建过滤器
    ///
    /// # 参数
    /// - snapshot: 本次运行的只读快照
    /// - config: 运行配置（熟练度门槛、认证门控）
    /// - today: 认证有效期/限制时间窗判定日期
    pub fn new(snapshot: &'a RotationSnapshot, config: &RotationConfig, today: NaiveDate) -> Self {
        let workers = snapshot
            .workers
            .iter()
            .map(|w| (w.worker_id.as_str(), w))
            .collect();

        // 工位按 名称 + ID 排序,保证遍历顺序与输入顺序无关
        let mut stations: Vec<&Workstation> = snapshot.stations.iter().collect();
        stations.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.station_id.cmp(&b.station_id)));
        let station_index = stations
            .iter()
            .copied()
            .map(|s| (s.station_id.as_str(), s))
            .collect();

        let mut capabilities: HashMap<&str, HashMap<&str, &Capability>> = HashMap::new();
        for cap in &snapshot.capabilities {
            let by_station = capabilities.entry(cap.worker_id.as_str()).or_default();
            if by_station.contains_key(cap.station_id.as_str()) {
                // 每对至多一条能力记录: 重复记录保留首条
                warn!(
                    worker_id = %cap.worker_id,
                    station_id = %cap.station_id,
                    "重复的能力记录,忽略后出现的记录"
                );
                continue;
            }
            by_station.insert(cap.station_id.as_str(), cap);
        }

        let mut restrictions: HashMap<&str, HashMap<&str, Vec<&Restriction>>> = HashMap::new();
        for r in &snapshot.restrictions {
            restrictions
                .entry(r.worker_id.as_str())
                .or_default()
                .entry(r.station_id.as_str())
                .or_default()
                .push(r);
        }

        Self {
            workers,
            stations,
            station_index,
            capabilities,
            restrictions,
            min_competency_level: config.min_competency_level,
            certification_gated: config.certification_gated,
            today,
        }
    }

    // ==========================================
    // 核心判定
    // ==========================================

    /// 是否可合法分配
    pub fn is_eligible(&self, worker: &Worker, station: &Workstation) -> bool {
        self.check(worker, station).is_ok()
    }

    /// 资格判定（带原因）
    ///
    /// # 规则（按顺序短路）
    /// 1) 员工未启用 → WORKER_INACTIVE
    /// 2) 工位未启用 → STATION_INACTIVE
    /// 3) 无能力记录 → NO_CAPABILITY
    /// 4) 能力记录未启用 → CAPABILITY_INACTIVE
    /// 5) 熟练度低于门槛 → BELOW_MIN_COMPETENCY
    /// 6) 认证门控开启且认证无效 → CERTIFICATION_INVALID
    /// 7) 存在生效中的 PROHIBITED 限制 → PROHIBITED
    ///
    /// LIMITED / TEMPORARY 不阻断资格,由校验器作为软提示输出
    pub fn check(&self, worker: &Worker, station: &Workstation) -> Result<(), IneligibleReason> {
        if !worker.is_active {
            return Err(IneligibleReason::WorkerInactive);
        }
        if !station.is_active {
            return Err(IneligibleReason::StationInactive);
        }

        let cap = self
            .capability(&worker.worker_id, &station.station_id)
            .ok_or(IneligibleReason::NoCapability)?;

        if !cap.is_active {
            return Err(IneligibleReason::CapabilityInactive);
        }
        if cap.competency_level < self.min_competency_level {
            return Err(IneligibleReason::BelowMinCompetency {
                level: cap.competency_level,
                min: self.min_competency_level,
            });
        }
        if self.certification_gated && !cap.certification_valid_on(self.today) {
            return Err(IneligibleReason::CertificationInvalid);
        }
        if self.is_prohibited(&worker.worker_id, &station.station_id) {
            return Err(IneligibleReason::Prohibited);
        }

        Ok(())
    }

    /// 员工在该工位是否持有"可分配能力"（不考虑限制）
    pub fn has_assignable_capability(&self, worker_id: &str, station_id: &str) -> bool {
        self.capability(worker_id, station_id).is_some_and(|cap| {
            cap.is_assignable(self.min_competency_level, self.certification_gated, self.today)
        })
    }

    /// 员工在启用工位上持有的可分配能力数量
    pub fn assignable_station_count(&self, worker_id: &str) -> usize {
        self.stations
            .iter()
            .filter(|s| s.is_active && self.has_assignable_capability(worker_id, &s.station_id))
            .count()
    }

    /// 员工可合法分配的工位（按工位名称排序）
    pub fn eligible_stations(&self, worker: &Worker) -> Vec<&'a Workstation> {
        self.stations
            .iter()
            .copied()
            .filter(|s| self.is_eligible(worker, s))
            .collect()
    }

    /// 是否存在生效中的禁止性限制
    pub fn is_prohibited(&self, worker_id: &str, station_id: &str) -> bool {
        self.restrictions_for(worker_id, station_id)
            .iter()
            .any(|r| r.is_prohibiting(self.today))
    }

    /// 生效中的软限制（LIMITED / TEMPORARY）
    pub fn soft_restrictions(&self, worker_id: &str, station_id: &str) -> Vec<&'a Restriction> {
        self.restrictions_for(worker_id, station_id)
            .iter()
            .copied()
            .filter(|r| r.is_in_effect(self.today) && !r.is_prohibiting(self.today))
            .collect()
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn capability(&self, worker_id: &str, station_id: &str) -> Option<&'a Capability> {
        self.capabilities
            .get(worker_id)
            .and_then(|by_station| by_station.get(station_id))
            .copied()
    }

    pub fn worker(&self, worker_id: &str) -> Option<&'a Worker> {
        self.workers.get(worker_id).copied()
    }

    pub fn station(&self, station_id: &str) -> Option<&'a Workstation> {
        self.station_index.get(station_id).copied()
    }

    /// 全部工位（按名称排序）
    pub fn stations(&self) -> &[&'a Workstation] {
        &self.stations
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn restrictions_for(&self, worker_id: &str, station_id: &str) -> &[&'a Restriction] {
        self.restrictions
            .get(worker_id)
            .and_then(|by_station| by_station.get(station_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RestrictionType;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn snapshot() -> RotationSnapshot {
        let mut inactive = Worker::new("W9", "停用员工");
        inactive.is_active = false;

        RotationSnapshot::new(
            vec![Worker::new("W1", "张三"), Worker::new("W2", "李四"), inactive],
            vec![Workstation::new("S1", "装配", 2), Workstation::new("S2", "质检", 1)],
            vec![
                Capability::new("W1", "S1", 3),
                Capability::new("W1", "S2", 1),
                Capability::new("W2", "S1", 4),
                Capability::new("W2", "S2", 4),
                Capability::new("W9", "S1", 5),
            ],
            vec![Restriction {
                restriction_id: "R1".to_string(),
                worker_id: "W2".to_string(),
                station_id: "S2".to_string(),
                restriction_type: RestrictionType::Prohibited,
                valid_from: None,
                valid_until: None,
                reason: Some("腰伤".to_string()),
                is_active: true,
            }],
        )
    }

    #[test]
    fn test_eligible_with_assignable_capability() {
        let snap = snapshot();
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), today());
        assert!(filter.is_eligible(&snap.workers[0], &snap.stations[0]));
    }

    #[test]
    fn test_below_floor_is_ineligible() {
        let snap = snapshot();
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), today());
        assert_eq!(
            filter.check(&snap.workers[0], &snap.stations[1]),
            Err(IneligibleReason::BelowMinCompetency { level: 1, min: 2 })
        );
    }

    #[test]
    fn test_prohibited_overrides_capability() {
        let snap = snapshot();
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), today());
        assert!(filter.has_assignable_capability("W2", "S2"));
        assert_eq!(
            filter.check(&snap.workers[1], &snap.stations[1]),
            Err(IneligibleReason::Prohibited)
        );
    }

    #[test]
    fn test_inactive_worker_is_ineligible() {
        let snap = snapshot();
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), today());
        assert_eq!(
            filter.check(&snap.workers[2], &snap.stations[0]),
            Err(IneligibleReason::WorkerInactive)
        );
    }

    #[test]
    fn test_missing_capability() {
        let mut snap = snapshot();
        snap.stations.push(Workstation::new("S3", "包装", 1));
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), today());
        assert_eq!(
            filter.check(&snap.workers[0], &snap.stations[2]),
            Err(IneligibleReason::NoCapability)
        );
    }

    #[test]
    fn test_eligible_stations_and_counts() {
        let snap = snapshot();
        let filter = EligibilityFilter::new(&snap, &RotationConfig::default(), today());

        let ids: Vec<&str> = filter
            .eligible_stations(&snap.workers[1])
            .iter()
            .map(|s| s.station_id.as_str())
            .collect();
        assert_eq!(ids, vec!["S1"]);

        // 能力计数不考虑限制
        assert_eq!(filter.assignable_station_count("W2"), 2);
        assert_eq!(filter.assignable_station_count("W1"), 1);
    }

    #[test]
    fn test_custom_floor() {
        let snap = snapshot();
        let config = RotationConfig {
            min_competency_level: 4,
            certification_gated: false,
        };
        let filter = EligibilityFilter::new(&snap, &config, today());
        assert!(!filter.is_eligible(&snap.workers[0], &snap.stations[0]));
        assert!(filter.is_eligible(&snap.workers[1], &snap.stations[0]));
    }
}
