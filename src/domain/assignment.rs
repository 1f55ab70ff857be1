// ==========================================
// 工位轮岗排班 - 轮岗分配与会话
// ==========================================
// 红线: 同一 (会话, 阶段) 内每个员工至多一条分配
// 红线: 每个工位分配数不超过需求人数
// ==========================================

use crate::domain::types::{Phase, RoleTag, SessionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// RotationAssignment - 轮岗分配记录
// ==========================================
// 用途: 引擎每次运行生成, 下次运行或阶段提升时整体替换
// 对齐: rotation_assignment 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationAssignment {
    pub assignment_id: String,
    pub session_id: String,
    pub worker_id: String,
    pub station_id: String,
    pub phase: Phase,
    pub priority_rank: i32,     // 产生该分配的阶段序号（1=领班 … 4=通用）
    pub role_tags: Vec<RoleTag>,
    pub created_at: DateTime<Utc>,
}

impl RotationAssignment {
    pub fn new(
        session_id: &str,
        worker_id: &str,
        station_id: &str,
        phase: Phase,
        priority_rank: i32,
        role_tags: Vec<RoleTag>,
    ) -> Self {
        Self {
            assignment_id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            worker_id: worker_id.to_string(),
            station_id: station_id.to_string(),
            phase,
            priority_rank,
            role_tags,
            created_at: Utc::now(),
        }
    }

    pub fn has_tag(&self, tag: RoleTag) -> bool {
        self.role_tags.contains(&tag)
    }

    /// 角色标签序列化为逗号分隔文本（落库格式）
    pub fn role_tags_text(&self) -> String {
        self.role_tags
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// 从落库文本解析角色标签（未知标签忽略）
    pub fn parse_role_tags(text: &str) -> Vec<RoleTag> {
        text.split(',')
            .filter(|s| !s.trim().is_empty())
            .filter_map(RoleTag::parse)
            .collect()
    }
}

// ==========================================
// RotationSession - 轮岗会话
// ==========================================
// 生命周期: DRAFT → ACTIVE → COMPLETED / CANCELLED
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationSession {
    pub session_id: String,
    pub name: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RotationSession {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4().to_string(),
            name: name.into(),
            status: SessionStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }
}
