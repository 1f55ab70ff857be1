// ==========================================
// 工位轮岗排班 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 轮岗阶段 (Rotation Phase)
// ==========================================
// 每个轮岗会话并行维护 CURRENT / NEXT 两套分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Current, // 当前轮
    Next,    // 下一轮
}

impl Phase {
    /// 阶段映射到轮岗半程（领班的领导范围按半程判定）
    ///
    /// - CURRENT → 前半程
    /// - NEXT → 后半程
    pub fn half(self) -> RotationHalf {
        match self {
            Phase::Current => RotationHalf::FirstHalf,
            Phase::Next => RotationHalf::SecondHalf,
        }
    }

    /// 从字符串解析阶段（大小写不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CURRENT" => Some(Phase::Current),
            "NEXT" => Some(Phase::Next),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Current => write!(f, "CURRENT"),
            Phase::Next => write!(f, "NEXT"),
        }
    }
}

// ==========================================
// 轮岗半程 (Rotation Half)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RotationHalf {
    FirstHalf,
    SecondHalf,
}

// ==========================================
// 领导范围 (Leadership Scope)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadershipScope {
    FirstHalf,  // 仅前半程
    SecondHalf, // 仅后半程
    Both,       // 全程
}

impl LeadershipScope {
    /// 领导范围是否覆盖指定半程
    pub fn covers(self, half: RotationHalf) -> bool {
        match self {
            LeadershipScope::Both => true,
            LeadershipScope::FirstHalf => half == RotationHalf::FirstHalf,
            LeadershipScope::SecondHalf => half == RotationHalf::SecondHalf,
        }
    }

    /// 从字符串解析领导范围
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "FIRST_HALF" => Some(LeadershipScope::FirstHalf),
            "SECOND_HALF" => Some(LeadershipScope::SecondHalf),
            "BOTH" => Some(LeadershipScope::Both),
            _ => None,
        }
    }
}

impl fmt::Display for LeadershipScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadershipScope::FirstHalf => write!(f, "FIRST_HALF"),
            LeadershipScope::SecondHalf => write!(f, "SECOND_HALF"),
            LeadershipScope::Both => write!(f, "BOTH"),
        }
    }
}

// ==========================================
// 限制类型 (Restriction Type)
// ==========================================
// 红线: PROHIBITED 永远覆盖能力记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestrictionType {
    Prohibited, // 禁止上岗
    Limited,    // 限制上岗（软提示）
    Temporary,  // 临时限制（软提示）
}

impl RestrictionType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PROHIBITED" => Some(RestrictionType::Prohibited),
            "LIMITED" => Some(RestrictionType::Limited),
            "TEMPORARY" => Some(RestrictionType::Temporary),
            _ => None,
        }
    }
}

impl fmt::Display for RestrictionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestrictionType::Prohibited => write!(f, "PROHIBITED"),
            RestrictionType::Limited => write!(f, "LIMITED"),
            RestrictionType::Temporary => write!(f, "TEMPORARY"),
        }
    }
}

// ==========================================
// 轮岗会话状态 (Session Status)
// ==========================================
// 生命周期: DRAFT → ACTIVE → COMPLETED / CANCELLED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Draft,     // 草稿
    Active,    // 进行中
    Completed, // 已完成
    Cancelled, // 已取消
}

impl SessionStatus {
    /// 是否允许迁移到目标状态
    pub fn can_transition_to(self, target: SessionStatus) -> bool {
        matches!(
            (self, target),
            (SessionStatus::Draft, SessionStatus::Active)
                | (SessionStatus::Active, SessionStatus::Completed)
                | (SessionStatus::Draft, SessionStatus::Cancelled)
                | (SessionStatus::Active, SessionStatus::Cancelled)
        )
    }

    /// 已关闭的会话不再接受新的分配
    pub fn is_closed(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "DRAFT" => Some(SessionStatus::Draft),
            "ACTIVE" => Some(SessionStatus::Active),
            "COMPLETED" => Some(SessionStatus::Completed),
            "CANCELLED" => Some(SessionStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Draft => write!(f, "DRAFT"),
            SessionStatus::Active => write!(f, "ACTIVE"),
            SessionStatus::Completed => write!(f, "COMPLETED"),
            SessionStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

// ==========================================
// 分配角色标签 (Role Tag)
// ==========================================
// 标记分配记录的来源阶段与角色，供报表解释
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleTag {
    Leader,      // 领班固定
    Trainer,     // 带教师傅
    Trainee,     // 学员
    PriorityFill, // 优先工位补齐
    Rotation,    // 普通随机轮岗
    BestFit,     // 特殊角色最佳匹配
}

impl RoleTag {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "LEADER" => Some(RoleTag::Leader),
            "TRAINER" => Some(RoleTag::Trainer),
            "TRAINEE" => Some(RoleTag::Trainee),
            "PRIORITY_FILL" => Some(RoleTag::PriorityFill),
            "ROTATION" => Some(RoleTag::Rotation),
            "BEST_FIT" => Some(RoleTag::BestFit),
            _ => None,
        }
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleTag::Leader => write!(f, "LEADER"),
            RoleTag::Trainer => write!(f, "TRAINER"),
            RoleTag::Trainee => write!(f, "TRAINEE"),
            RoleTag::PriorityFill => write!(f, "PRIORITY_FILL"),
            RoleTag::Rotation => write!(f, "ROTATION"),
            RoleTag::BestFit => write!(f, "BEST_FIT"),
        }
    }
}

/// 分配阶段序号（写入 priority_rank）
pub mod stage_rank {
    pub const LEADERSHIP: i32 = 1;
    pub const TRAINING: i32 = 2;
    pub const PRIORITY_FILL: i32 = 3;
    pub const GENERAL: i32 = 4;
}
