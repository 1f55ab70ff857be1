// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use station_rotation::domain::types::{LeadershipScope, Phase, RestrictionType};
use station_rotation::domain::{Capability, Restriction, Worker, Workstation};
use station_rotation::engine::{RotationSnapshot, RunContext};

/// 测试统一使用的判定日期
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn run_ctx(phase: Phase) -> RunContext {
    RunContext::new("SESSION-TEST", phase, test_today())
}

// ==========================================
// Worker 构建器
// ==========================================

pub struct WorkerBuilder {
    worker: Worker,
}

impl WorkerBuilder {
    pub fn new(worker_id: &str, name: &str) -> Self {
        Self {
            worker: Worker::new(worker_id, name),
        }
    }

    /// 领班（指定领导工位）
    pub fn leader(mut self, station_id: &str) -> Self {
        self.worker.is_leader = true;
        self.worker.leadership_station_id = Some(station_id.to_string());
        self
    }

    pub fn scope(mut self, scope: LeadershipScope) -> Self {
        self.worker.leadership_scope = Some(scope);
        self
    }

    pub fn trainer(mut self) -> Self {
        self.worker.is_trainer = true;
        self
    }

    /// 学员（指定师傅与培训工位）
    pub fn trainee(mut self, trainer_id: &str, station_id: &str) -> Self {
        self.worker.is_trainee = true;
        self.worker.trainer_id = Some(trainer_id.to_string());
        self.worker.training_station_id = Some(station_id.to_string());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.worker.is_active = false;
        self
    }

    pub fn build(self) -> Worker {
        self.worker
    }
}

// ==========================================
// Workstation 构建器
// ==========================================

pub struct StationBuilder {
    station: Workstation,
}

impl StationBuilder {
    pub fn new(station_id: &str, name: &str, required_workers: u32) -> Self {
        Self {
            station: Workstation::new(station_id, name, required_workers),
        }
    }

    pub fn priority(mut self) -> Self {
        self.station.is_priority = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.station.is_active = false;
        self
    }

    pub fn build(self) -> Workstation {
        self.station
    }
}

// ==========================================
// Capability 构建器
// ==========================================

pub struct CapabilityBuilder {
    cap: Capability,
}

impl CapabilityBuilder {
    pub fn new(worker_id: &str, station_id: &str, level: i32) -> Self {
        Self {
            cap: Capability::new(worker_id, station_id, level),
        }
    }

    pub fn certified(mut self, from: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        self.cap.is_certified = true;
        self.cap.certified_from = from;
        self.cap.certified_until = until;
        self
    }

    pub fn can_lead(mut self) -> Self {
        self.cap.can_be_leader = true;
        self
    }

    pub fn can_train(mut self) -> Self {
        self.cap.can_train = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.cap.is_active = false;
        self
    }

    pub fn build(self) -> Capability {
        self.cap
    }
}

/// 简写: 指定熟练度的能力记录
pub fn cap(worker_id: &str, station_id: &str, level: i32) -> Capability {
    Capability::new(worker_id, station_id, level)
}

pub fn restriction(
    restriction_id: &str,
    worker_id: &str,
    station_id: &str,
    restriction_type: RestrictionType,
) -> Restriction {
    Restriction {
        restriction_id: restriction_id.to_string(),
        worker_id: worker_id.to_string(),
        station_id: station_id.to_string(),
        restriction_type,
        valid_from: None,
        valid_until: None,
        reason: Some(format!("{} 测试限制", restriction_type)),
        is_active: true,
    }
}

// ==========================================
// 场景构建
// ==========================================

/// 基准场景
///
/// 工位:
/// - A: 优先,需 2 人;L1 为其领班
/// - B: 优先,需 1 人;T2（学员）随 T1（师傅）在此培训
/// - C: 普通,需 2 人
///
/// 员工: L1, T1, T2, W1, W2 全部合格;X1 无任何能力
pub fn example_scenario() -> RotationSnapshot {
    let workers = vec![
        WorkerBuilder::new("L1", "Leader-1").leader("A").build(),
        WorkerBuilder::new("T1", "Trainer-1").trainer().build(),
        WorkerBuilder::new("T2", "Trainee-2").trainee("T1", "B").build(),
        WorkerBuilder::new("W1", "Worker-1").build(),
        WorkerBuilder::new("W2", "Worker-2").build(),
        WorkerBuilder::new("X1", "Newcomer-1").build(),
    ];

    let stations = vec![
        StationBuilder::new("A", "A", 2).priority().build(),
        StationBuilder::new("B", "B", 1).priority().build(),
        StationBuilder::new("C", "C", 2).build(),
    ];

    let capabilities = vec![
        CapabilityBuilder::new("L1", "A", 4).can_lead().build(),
        CapabilityBuilder::new("T1", "B", 5).can_train().build(),
        cap("T1", "C", 4),
        cap("T2", "B", 2),
        cap("W1", "A", 3),
        cap("W1", "B", 3),
        cap("W1", "C", 3),
        cap("W2", "A", 3),
        cap("W2", "B", 3),
        cap("W2", "C", 3),
    ];

    RotationSnapshot::new(workers, stations, capabilities, vec![])
}

/// 规模场景（确定性构造,不依赖随机数）
///
/// - stations 个工位,每 3 个中 1 个为优先工位,需求人数 1..=3
/// - workers 个员工,约 2/3 的 (员工, 工位) 组合持有能力,其中部分低于门槛
/// - 前两个工位各有一名领班,另有一组师徒
pub fn scaled_scenario(workers: usize, stations: usize) -> RotationSnapshot {
    let station_list: Vec<Workstation> = (0..stations)
        .map(|j| {
            let id = format!("S{:02}", j);
            let builder = StationBuilder::new(&id, &format!("Station-{:02}", j), (j % 3 + 1) as u32);
            if j % 3 == 0 {
                builder.priority().build()
            } else {
                builder.build()
            }
        })
        .collect();

    let mut worker_list = Vec::with_capacity(workers);
    let mut capabilities = Vec::new();
    for i in 0..workers {
        let id = format!("W{:03}", i);
        let mut builder = WorkerBuilder::new(&id, &format!("Worker-{:03}", i));
        if i < 2 && stations > i {
            builder = builder.leader(&format!("S{:02}", i));
        }
        if i == 2 {
            builder = builder.trainer();
        }
        if i == 3 && stations > 2 {
            builder = builder.trainee("W002", "S02");
        }
        worker_list.push(builder.build());

        for j in 0..stations {
            let leads_here = i < 2 && i == j;
            let trains_here = (i == 2 || i == 3) && j == 2;
            if leads_here || trains_here || (i + j) % 3 != 0 {
                let level = if leads_here || trains_here {
                    4
                } else if (i + j) % 5 == 0 {
                    1
                } else {
                    2 + ((i * j) % 4) as i32
                };
                capabilities.push(cap(&id, &format!("S{:02}", j), level));
            }
        }
    }

    RotationSnapshot::new(worker_list, station_list, capabilities, vec![])
}
