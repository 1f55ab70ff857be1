// ==========================================
// 工位轮岗排班 - 能力与限制领域模型
// ==========================================
// 红线: 每个 (员工, 工位) 至多一条能力记录
// 红线: PROHIBITED 限制永远覆盖能力记录
// ==========================================

use crate::domain::types::RestrictionType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Capability - 员工×工位 能力记录
// ==========================================
// 对齐: capability 表（主键 worker_id + station_id）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    // ===== 主键 =====
    pub worker_id: String,
    pub station_id: String,

    // ===== 能力评估 =====
    pub competency_level: i32, // 熟练度（1=新手 … 5=专家）
    pub is_active: bool,       // 启用标记

    // ===== 资质认证 =====
    pub is_certified: bool,
    pub certified_from: Option<NaiveDate>,  // 认证生效日
    pub certified_until: Option<NaiveDate>, // 认证失效日（含）

    // ===== 角色资格 =====
    pub can_be_leader: bool, // 可担任该工位领班
    pub can_train: bool,     // 可在该工位带教

    // ===== 经验 =====
    pub experience_months: i32,              // 经验（月）
    pub last_evaluation_score: Option<f64>, // 最近评估得分
}

impl Capability {
    pub fn new(worker_id: impl Into<String>, station_id: impl Into<String>, competency_level: i32) -> Self {
        Self {
            worker_id: worker_id.into(),
            station_id: station_id.into(),
            competency_level,
            is_active: true,
            is_certified: false,
            certified_from: None,
            certified_until: None,
            can_be_leader: false,
            can_train: false,
            experience_months: 0,
            last_evaluation_score: None,
        }
    }

    /// 认证在指定日期是否有效
    ///
    /// # 规则
    /// - is_certified = false → 无效
    /// - certified_from / certified_until 为空 → 该侧不设限
    pub fn certification_valid_on(&self, today: NaiveDate) -> bool {
        if !self.is_certified {
            return false;
        }
        let started = self.certified_from.map_or(true, |from| from <= today);
        let not_expired = self.certified_until.map_or(true, |until| today <= until);
        started && not_expired
    }

    /// 是否为"可分配能力"
    ///
    /// # 规则
    /// 1) 能力记录启用
    /// 2) 熟练度 >= min_competency_level
    /// 3) 若启用认证门控,认证在 today 有效
    pub fn is_assignable(&self, min_competency_level: i32, certification_gated: bool, today: NaiveDate) -> bool {
        if !self.is_active {
            return false;
        }
        if self.competency_level < min_competency_level {
            return false;
        }
        if certification_gated && !self.certification_valid_on(today) {
            return false;
        }
        true
    }
}

// ==========================================
// Restriction - 员工×工位 上岗限制
// ==========================================
// 对齐: restriction 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restriction {
    pub restriction_id: String,
    pub worker_id: String,
    pub station_id: String,
    pub restriction_type: RestrictionType,
    pub valid_from: Option<NaiveDate>,  // 生效日（空 = 不限）
    pub valid_until: Option<NaiveDate>, // 失效日（含，空 = 不限）
    pub reason: Option<String>,
    pub is_active: bool,
}

impl Restriction {
    /// 限制在指定日期是否生效
    pub fn is_in_effect(&self, today: NaiveDate) -> bool {
        if !self.is_active {
            return false;
        }
        let started = self.valid_from.map_or(true, |from| from <= today);
        let not_expired = self.valid_until.map_or(true, |until| today <= until);
        started && not_expired
    }

    /// 是否为生效中的禁止性限制
    pub fn is_prohibiting(&self, today: NaiveDate) -> bool {
        self.restriction_type == RestrictionType::Prohibited && self.is_in_effect(today)
    }
}
