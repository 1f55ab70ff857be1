// ==========================================
// 工位轮岗排班 - 能力与限制数据仓储
// ==========================================
// 红线: 每个 (员工, 工位) 至多一条能力记录（主键约束）
// ==========================================

use crate::domain::{Capability, Restriction, RestrictionType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{format_date, parse_enum, parse_optional_date};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// CapabilityRepository - 能力记录仓储
// ==========================================
pub struct CapabilityRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CapabilityRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_capability(row: &Row<'_>) -> SqliteResult<Capability> {
        Ok(Capability {
            worker_id: row.get(0)?,
            station_id: row.get(1)?,
            competency_level: row.get(2)?,
            is_active: row.get(3)?,
            is_certified: row.get(4)?,
            certified_from: parse_optional_date(5, row.get(5)?)?,
            certified_until: parse_optional_date(6, row.get(6)?)?,
            can_be_leader: row.get(7)?,
            can_train: row.get(8)?,
            experience_months: row.get(9)?,
            last_evaluation_score: row.get(10)?,
        })
    }

    fn map_restriction(row: &Row<'_>) -> SqliteResult<Restriction> {
        let raw_type: String = row.get(3)?;
        Ok(Restriction {
            restriction_id: row.get(0)?,
            worker_id: row.get(1)?,
            station_id: row.get(2)?,
            restriction_type: parse_enum(3, &raw_type, RestrictionType::parse)?,
            valid_from: parse_optional_date(4, row.get(4)?)?,
            valid_until: parse_optional_date(5, row.get(5)?)?,
            reason: row.get(6)?,
            is_active: row.get(7)?,
        })
    }

    // ==========================================
    // 能力记录
    // ==========================================

    /// 插入或更新能力记录（同一对覆盖写）
    pub fn upsert_capability(&self, cap: &Capability) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO capability (
                worker_id, station_id, competency_level, is_active,
                is_certified, certified_from, certified_until,
                can_be_leader, can_train, experience_months, last_evaluation_score
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                cap.worker_id,
                cap.station_id,
                cap.competency_level,
                cap.is_active,
                cap.is_certified,
                format_date(cap.certified_from),
                format_date(cap.certified_until),
                cap.can_be_leader,
                cap.can_train,
                cap.experience_months,
                cap.last_evaluation_score,
            ],
        )?;
        Ok(())
    }

    /// 启用的能力记录
    pub fn list_active_capabilities(&self) -> RepositoryResult<Vec<Capability>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                worker_id, station_id, competency_level, is_active,
                is_certified, certified_from, certified_until,
                can_be_leader, can_train, experience_months, last_evaluation_score
            FROM capability
            WHERE is_active = 1
            ORDER BY worker_id, station_id
            "#,
        )?;
        let caps = stmt
            .query_map([], Self::map_capability)?
            .collect::<SqliteResult<Vec<Capability>>>()?;
        Ok(caps)
    }

    pub fn list_by_worker(&self, worker_id: &str) -> RepositoryResult<Vec<Capability>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                worker_id, station_id, competency_level, is_active,
                is_certified, certified_from, certified_until,
                can_be_leader, can_train, experience_months, last_evaluation_score
            FROM capability
            WHERE worker_id = ?1
            ORDER BY station_id
            "#,
        )?;
        let caps = stmt
            .query_map(params![worker_id], Self::map_capability)?
            .collect::<SqliteResult<Vec<Capability>>>()?;
        Ok(caps)
    }

    // ==========================================
    // 上岗限制
    // ==========================================

    pub fn upsert_restriction(&self, restriction: &Restriction) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO restriction (
                restriction_id, worker_id, station_id, restriction_type,
                valid_from, valid_until, reason, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                restriction.restriction_id,
                restriction.worker_id,
                restriction.station_id,
                restriction.restriction_type.to_string(),
                format_date(restriction.valid_from),
                format_date(restriction.valid_until),
                restriction.reason,
                restriction.is_active,
            ],
        )?;
        Ok(())
    }

    /// 启用的限制（时间窗由引擎按运行日期判定）
    pub fn list_active_restrictions(&self) -> RepositoryResult<Vec<Restriction>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                restriction_id, worker_id, station_id, restriction_type,
                valid_from, valid_until, reason, is_active
            FROM restriction
            WHERE is_active = 1
            ORDER BY worker_id, station_id, restriction_id
            "#,
        )?;
        let restrictions = stmt
            .query_map([], Self::map_restriction)?
            .collect::<SqliteResult<Vec<Restriction>>>()?;
        Ok(restrictions)
    }
}
