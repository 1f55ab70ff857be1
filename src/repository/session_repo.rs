// ==========================================
// 工位轮岗排班 - 轮岗会话数据仓储
// ==========================================
// 生命周期: DRAFT → ACTIVE → COMPLETED, DRAFT/ACTIVE → CANCELLED
// ==========================================

use crate::domain::{RotationSession, SessionStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{parse_enum, parse_timestamp};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// SessionRepository - 轮岗会话仓储
// ==========================================
pub struct SessionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SessionRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<RotationSession> {
        let status: String = row.get(2)?;
        let created_at: String = row.get(3)?;
        let updated_at: String = row.get(4)?;
        Ok(RotationSession {
            session_id: row.get(0)?,
            name: row.get(1)?,
            status: parse_enum(2, &status, SessionStatus::parse)?,
            created_at: parse_timestamp(3, &created_at)?,
            updated_at: parse_timestamp(4, &updated_at)?,
        })
    }

    pub fn insert(&self, session: &RotationSession) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO rotation_session (session_id, name, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                session.session_id,
                session.name,
                session.status.to_string(),
                session.created_at.to_rfc3339(),
                session.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, session_id: &str) -> RepositoryResult<Option<RotationSession>> {
        let conn = self.get_conn()?;
        let session = conn
            .query_row(
                r#"
                SELECT session_id, name, status, created_at, updated_at
                FROM rotation_session WHERE session_id = ?1
                "#,
                params![session_id],
                Self::map_row,
            )
            .optional()?;
        Ok(session)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<RotationSession>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT session_id, name, status, created_at, updated_at
            FROM rotation_session
            ORDER BY created_at DESC, session_id
            "#,
        )?;
        let sessions = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<RotationSession>>>()?;
        Ok(sessions)
    }

    /// 更新会话状态（带状态机校验）
    ///
    /// # 返回
    /// - Ok(RotationSession): 更新后的会话
    /// - Err(NotFound): 会话不存在
    /// - Err(InvalidStateTransition): 状态迁移不允许
    pub fn update_status(&self, session_id: &str, target: SessionStatus) -> RepositoryResult<RotationSession> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let current: Option<RotationSession> = tx
            .query_row(
                r#"
                SELECT session_id, name, status, created_at, updated_at
                FROM rotation_session WHERE session_id = ?1
                "#,
                params![session_id],
                Self::map_row,
            )
            .optional()?;

        let mut session = current.ok_or_else(|| RepositoryError::NotFound {
            entity: "RotationSession".to_string(),
            id: session_id.to_string(),
        })?;

        if !session.status.can_transition_to(target) {
            return Err(RepositoryError::InvalidStateTransition {
                from: session.status.to_string(),
                to: target.to_string(),
            });
        }

        session.status = target;
        session.updated_at = Utc::now();
        tx.execute(
            "UPDATE rotation_session SET status = ?1, updated_at = ?2 WHERE session_id = ?3",
            params![session.status.to_string(), session.updated_at.to_rfc3339(), session_id],
        )?;
        tx.commit()?;

        Ok(session)
    }
}
