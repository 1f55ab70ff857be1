// ==========================================
// 工位轮岗排班 - 阶段间分配状态
// ==========================================
// 红线: 已分配员工不可被后续阶段改派
// 红线: 工位分配数不超过需求人数
// ==========================================
// 用途: 各阶段以值传递方式接收并返回该状态,
//       任一阶段都可用给定的"已分配"输入单独测试
// ==========================================

use crate::domain::{RotationAssignment, RoleTag, Workstation};
use crate::engine::snapshot::RunContext;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct AssignmentState {
    assignments: Vec<RotationAssignment>,
    assigned_workers: HashSet<String>,
    station_fill: HashMap<String, u32>,
}

impl AssignmentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 员工是否已被前序阶段分配
    pub fn is_assigned(&self, worker_id: &str) -> bool {
        self.assigned_workers.contains(worker_id)
    }

    /// 工位当前已分配人数
    pub fn assigned_count(&self, station_id: &str) -> u32 {
        self.station_fill.get(station_id).copied().unwrap_or(0)
    }

    /// 工位剩余空位
    pub fn open_capacity(&self, station: &Workstation) -> u32 {
        station
            .required_workers
            .saturating_sub(self.assigned_count(&station.station_id))
    }

    pub fn has_open_slot(&self, station: &Workstation) -> bool {
        self.open_capacity(station) > 0
    }

    /// 落位
    ///
    /// # 返回
    /// - true: 已落位
    /// - false: 员工已分配或工位已满（状态不变）
    pub fn place(
        &mut self,
        ctx: &RunContext,
        worker_id: &str,
        station: &Workstation,
        priority_rank: i32,
        role_tags: Vec<RoleTag>,
    ) -> bool {
        if self.is_assigned(worker_id) || !self.has_open_slot(station) {
            return false;
        }

        self.assigned_workers.insert(worker_id.to_string());
        *self.station_fill.entry(station.station_id.clone()).or_insert(0) += 1;
        self.assignments.push(RotationAssignment::new(
            &ctx.session_id,
            worker_id,
            &station.station_id,
            ctx.phase,
            priority_rank,
            role_tags,
        ));
        true
    }

    pub fn assignments(&self) -> &[RotationAssignment] {
        &self.assignments
    }

    pub fn assigned_worker_count(&self) -> usize {
        self.assigned_workers.len()
    }

    pub fn into_assignments(self) -> Vec<RotationAssignment> {
        self.assignments
    }
}
