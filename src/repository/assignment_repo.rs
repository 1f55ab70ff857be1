// ==========================================
// 工位轮岗排班 - 轮岗分配数据仓储
// ==========================================
// 红线: 整批替换在单个事务内完成,失败时旧分配保持不变
// 红线: 阶段提升（NEXT → CURRENT）同样在单个事务内完成
// ==========================================

use crate::domain::{Phase, RotationAssignment};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{parse_enum, parse_timestamp};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};
use tracing::debug;

// ==========================================
// AssignmentRepository - 轮岗分配仓储
// ==========================================
pub struct AssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssignmentRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<RotationAssignment> {
        let phase: String = row.get(4)?;
        let role_tags: String = row.get(6)?;
        let created_at: String = row.get(7)?;

        Ok(RotationAssignment {
            assignment_id: row.get(0)?,
            session_id: row.get(1)?,
            worker_id: row.get(2)?,
            station_id: row.get(3)?,
            phase: parse_enum(4, &phase, Phase::parse)?,
            priority_rank: row.get(5)?,
            role_tags: RotationAssignment::parse_role_tags(&role_tags),
            created_at: parse_timestamp(7, &created_at)?,
        })
    }

    /// 整批替换 (session, phase) 的分配
    ///
    /// # 参数
    /// - session_id: 会话ID
    /// - phase: 阶段
    /// - assignments: 新的分配集合（必须全部属于该 session/phase）
    ///
    /// # 返回
    /// - Ok(usize): 写入条数
    /// - Err: 任一步失败,事务回滚,旧分配保留
    pub fn replace_batch(
        &self,
        session_id: &str,
        phase: Phase,
        assignments: &[RotationAssignment],
    ) -> RepositoryResult<usize> {
        if let Some(stray) = assignments
            .iter()
            .find(|a| a.session_id != session_id || a.phase != phase)
        {
            return Err(RepositoryError::FieldValueError {
                field: "session_id/phase".to_string(),
                message: format!(
                    "分配 {} 属于 {}/{},与目标 {}/{} 不一致",
                    stray.assignment_id, stray.session_id, stray.phase, session_id, phase
                ),
            });
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let deleted = tx.execute(
            "DELETE FROM rotation_assignment WHERE session_id = ?1 AND phase = ?2",
            params![session_id, phase.to_string()],
        )?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO rotation_assignment (
                        assignment_id, session_id, worker_id, station_id,
                        phase, priority_rank, role_tags, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            )?;

            for a in assignments {
                stmt.execute(params![
                    a.assignment_id,
                    a.session_id,
                    a.worker_id,
                    a.station_id,
                    a.phase.to_string(),
                    a.priority_rank,
                    a.role_tags_text(),
                    a.created_at.to_rfc3339(),
                ])?;
                inserted += 1;
            }
        }

        tx.commit()?;
        debug!(session_id, phase = %phase, deleted, inserted, "分配整批替换完成");
        Ok(inserted)
    }

    /// 查询 (session, phase) 的分配（按工位、员工排序）
    pub fn find_by_session_phase(
        &self,
        session_id: &str,
        phase: Phase,
    ) -> RepositoryResult<Vec<RotationAssignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                assignment_id, session_id, worker_id, station_id,
                phase, priority_rank, role_tags, created_at
            FROM rotation_assignment
            WHERE session_id = ?1 AND phase = ?2
            ORDER BY station_id, priority_rank, worker_id
            "#,
        )?;
        let rows = stmt
            .query_map(params![session_id, phase.to_string()], Self::map_row)?
            .collect::<SqliteResult<Vec<RotationAssignment>>>()?;
        Ok(rows)
    }

    /// 各工位分配人数
    pub fn count_by_station(&self, session_id: &str, phase: Phase) -> RepositoryResult<Vec<(String, u32)>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT station_id, COUNT(*)
            FROM rotation_assignment
            WHERE session_id = ?1 AND phase = ?2
            GROUP BY station_id
            ORDER BY station_id
            "#,
        )?;
        let rows = stmt
            .query_map(params![session_id, phase.to_string()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
            })?
            .collect::<SqliteResult<Vec<(String, u32)>>>()?;
        Ok(rows)
    }

    /// 阶段提升: NEXT → CURRENT
    ///
    /// 规则:
    /// - 删除 CURRENT 分配
    /// - NEXT 分配改标为 CURRENT
    /// - NEXT 为空时 CURRENT 同样被清空
    ///
    /// # 返回
    /// - Ok(usize): 提升的分配条数
    pub fn promote_next_to_current(&self, session_id: &str) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let cleared = tx.execute(
            "DELETE FROM rotation_assignment WHERE session_id = ?1 AND phase = ?2",
            params![session_id, Phase::Current.to_string()],
        )?;
        let promoted = tx.execute(
            "UPDATE rotation_assignment SET phase = ?1 WHERE session_id = ?2 AND phase = ?3",
            params![Phase::Current.to_string(), session_id, Phase::Next.to_string()],
        )?;

        tx.commit()?;
        debug!(session_id, cleared, promoted, "阶段提升完成");
        Ok(promoted)
    }

    /// 删除 (session, phase) 的全部分配
    pub fn delete_by_session_phase(&self, session_id: &str, phase: Phase) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let deleted = conn.execute(
            "DELETE FROM rotation_assignment WHERE session_id = ?1 AND phase = ?2",
            params![session_id, phase.to_string()],
        )?;
        Ok(deleted)
    }
}
