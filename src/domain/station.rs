// ==========================================
// 工位轮岗排班 - 工位领域模型
// ==========================================
// 用途: 外部维护,引擎只读
// 对齐: workstation 表
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Workstation - 工位
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workstation {
    pub station_id: String,    // 工位唯一标识
    pub name: String,          // 工位名称
    pub required_workers: u32, // 需求人数（>= 1）
    pub is_priority: bool,     // 优先工位（必须先补齐）
    pub is_active: bool,       // 启用标记
}

impl Workstation {
    pub fn new(station_id: impl Into<String>, name: impl Into<String>, required_workers: u32) -> Self {
        Self {
            station_id: station_id.into(),
            name: name.into(),
            required_workers: required_workers.max(1),
            is_priority: false,
            is_active: true,
        }
    }

    /// 标记为优先工位
    pub fn priority(mut self) -> Self {
        self.is_priority = true;
        self
    }
}
