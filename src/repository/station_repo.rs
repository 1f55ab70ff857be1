// ==========================================
// 工位轮岗排班 - 工位数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::Workstation;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// StationRepository - 工位仓储
// ==========================================
pub struct StationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StationRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Workstation> {
        Ok(Workstation {
            station_id: row.get(0)?,
            name: row.get(1)?,
            required_workers: row.get(2)?,
            is_priority: row.get(3)?,
            is_active: row.get(4)?,
        })
    }

    pub fn upsert(&self, station: &Workstation) -> RepositoryResult<()> {
        if station.required_workers < 1 {
            return Err(RepositoryError::FieldValueError {
                field: "required_workers".to_string(),
                message: format!("工位 {} 需求人数必须 >= 1", station.station_id),
            });
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO workstation (
                station_id, name, required_workers, is_priority, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(station_id) DO UPDATE SET
                name = excluded.name,
                required_workers = excluded.required_workers,
                is_priority = excluded.is_priority,
                is_active = excluded.is_active
            "#,
            params![
                station.station_id,
                station.name,
                station.required_workers,
                station.is_priority,
                station.is_active,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, station_id: &str) -> RepositoryResult<Option<Workstation>> {
        let conn = self.get_conn()?;
        let station = conn
            .query_row(
                r#"
                SELECT station_id, name, required_workers, is_priority, is_active
                FROM workstation WHERE station_id = ?1
                "#,
                params![station_id],
                Self::map_row,
            )
            .optional()?;
        Ok(station)
    }

    /// 启用工位（按名称排序）
    pub fn list_active(&self) -> RepositoryResult<Vec<Workstation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT station_id, name, required_workers, is_priority, is_active
            FROM workstation
            WHERE is_active = 1
            ORDER BY name, station_id
            "#,
        )?;
        let stations = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Workstation>>>()?;
        Ok(stations)
    }
}
