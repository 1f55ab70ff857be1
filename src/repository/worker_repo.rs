// ==========================================
// 工位轮岗排班 - 员工数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::{LeadershipScope, Worker};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::parse_enum;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const WORKER_COLUMNS: &str = r#"
    worker_id, name, is_active, availability_pct,
    is_leader, is_trainer, is_trainee,
    leadership_scope, leadership_station_id,
    trainer_id, training_station_id, restriction_notes
"#;

// ==========================================
// WorkerRepository - 员工仓储
// ==========================================
pub struct WorkerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WorkerRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Worker> {
        let scope: Option<String> = row.get(7)?;
        let leadership_scope = match scope {
            Some(s) => Some(parse_enum(7, &s, LeadershipScope::parse)?),
            None => None,
        };

        Ok(Worker {
            worker_id: row.get(0)?,
            name: row.get(1)?,
            is_active: row.get(2)?,
            availability_pct: row.get(3)?,
            is_leader: row.get(4)?,
            is_trainer: row.get(5)?,
            is_trainee: row.get(6)?,
            leadership_scope,
            leadership_station_id: row.get(8)?,
            trainer_id: row.get(9)?,
            training_station_id: row.get(10)?,
            restriction_notes: row.get(11)?,
        })
    }

    /// 插入或更新员工
    ///
    /// 注: 使用 UPSERT 而非 REPLACE,避免级联删除该员工的能力记录
    pub fn upsert(&self, worker: &Worker) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO worker (
                worker_id, name, is_active, availability_pct,
                is_leader, is_trainer, is_trainee,
                leadership_scope, leadership_station_id,
                trainer_id, training_station_id, restriction_notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(worker_id) DO UPDATE SET
                name = excluded.name,
                is_active = excluded.is_active,
                availability_pct = excluded.availability_pct,
                is_leader = excluded.is_leader,
                is_trainer = excluded.is_trainer,
                is_trainee = excluded.is_trainee,
                leadership_scope = excluded.leadership_scope,
                leadership_station_id = excluded.leadership_station_id,
                trainer_id = excluded.trainer_id,
                training_station_id = excluded.training_station_id,
                restriction_notes = excluded.restriction_notes
            "#,
            params![
                worker.worker_id,
                worker.name,
                worker.is_active,
                worker.availability_pct,
                worker.is_leader,
                worker.is_trainer,
                worker.is_trainee,
                worker.leadership_scope.map(|s| s.to_string()),
                worker.leadership_station_id,
                worker.trainer_id,
                worker.training_station_id,
                worker.restriction_notes,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, worker_id: &str) -> RepositoryResult<Option<Worker>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM worker WHERE worker_id = ?1", WORKER_COLUMNS);
        let worker = conn
            .query_row(&sql, params![worker_id], Self::map_row)
            .optional()?;
        Ok(worker)
    }

    /// 在职员工（按姓名排序）
    pub fn list_active(&self) -> RepositoryResult<Vec<Worker>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM worker WHERE is_active = 1 ORDER BY name, worker_id",
            WORKER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let workers = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Worker>>>()?;
        Ok(workers)
    }

    pub fn set_active(&self, worker_id: &str, is_active: bool) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let updated = conn.execute(
            "UPDATE worker SET is_active = ?1 WHERE worker_id = ?2",
            params![is_active, worker_id],
        )?;
        if updated == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Worker".to_string(),
                id: worker_id.to_string(),
            });
        }
        Ok(())
    }
}
