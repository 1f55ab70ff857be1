// ==========================================
// 工位轮岗排班 - 员工领域模型
// ==========================================
// 用途: 由外部人员管理模块维护,引擎只读
// 对齐: worker 表
// ==========================================

use crate::domain::types::LeadershipScope;
use serde::{Deserialize, Serialize};

// ==========================================
// Worker - 员工
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    // ===== 主键 =====
    pub worker_id: String, // 员工唯一标识

    // ===== 基础信息 =====
    pub name: String,              // 姓名（排序兜底键）
    pub is_active: bool,           // 在职/启用标记
    pub availability_pct: i32,     // 出勤可用率（0-100）

    // ===== 角色标记 =====
    pub is_leader: bool,  // 领班
    pub is_trainer: bool, // 带教师傅
    pub is_trainee: bool, // 学员

    // ===== 领班信息（is_leader 时有效）=====
    pub leadership_scope: Option<LeadershipScope>, // 领导范围
    pub leadership_station_id: Option<String>,     // 指定领导工位

    // ===== 学员信息（is_trainee 时有效）=====
    pub trainer_id: Option<String>,          // 带教师傅
    pub training_station_id: Option<String>, // 培训工位

    // ===== 备注 =====
    pub restriction_notes: Option<String>, // 限制说明（自由文本）
}

impl Worker {
    /// 创建普通员工（无特殊角色）
    pub fn new(worker_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            name: name.into(),
            is_active: true,
            availability_pct: 100,
            is_leader: false,
            is_trainer: false,
            is_trainee: false,
            leadership_scope: None,
            leadership_station_id: None,
            trainer_id: None,
            training_station_id: None,
            restriction_notes: None,
        }
    }

    /// 是否持有任一特殊角色（领班/师傅/学员）
    pub fn has_special_role(&self) -> bool {
        self.is_leader || self.is_trainer || self.is_trainee
    }

    /// 普通员工：无任何特殊角色标记
    pub fn is_ordinary(&self) -> bool {
        !self.has_special_role()
    }
}
