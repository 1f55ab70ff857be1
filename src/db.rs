// ==========================================
// 工位轮岗排班 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 幂等建表（无迁移工具，schema_version 仅做提示）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
///
/// 说明：
/// - capability 以 (worker_id, station_id) 为主键,保证每对至多一条能力记录
/// - rotation_assignment 以 (session_id, phase, worker_id) 唯一,数据库层兜底防重复分配
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS worker (
            worker_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            availability_pct INTEGER NOT NULL DEFAULT 100,
            is_leader INTEGER NOT NULL DEFAULT 0,
            is_trainer INTEGER NOT NULL DEFAULT 0,
            is_trainee INTEGER NOT NULL DEFAULT 0,
            leadership_scope TEXT,
            leadership_station_id TEXT,
            trainer_id TEXT,
            training_station_id TEXT,
            restriction_notes TEXT
        );

        CREATE TABLE IF NOT EXISTS workstation (
            station_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            required_workers INTEGER NOT NULL CHECK (required_workers >= 1),
            is_priority INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS capability (
            worker_id TEXT NOT NULL REFERENCES worker(worker_id) ON DELETE CASCADE,
            station_id TEXT NOT NULL REFERENCES workstation(station_id) ON DELETE CASCADE,
            competency_level INTEGER NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            is_certified INTEGER NOT NULL DEFAULT 0,
            certified_from TEXT,
            certified_until TEXT,
            can_be_leader INTEGER NOT NULL DEFAULT 0,
            can_train INTEGER NOT NULL DEFAULT 0,
            experience_months INTEGER NOT NULL DEFAULT 0,
            last_evaluation_score REAL,
            PRIMARY KEY (worker_id, station_id)
        );

        CREATE TABLE IF NOT EXISTS restriction (
            restriction_id TEXT PRIMARY KEY,
            worker_id TEXT NOT NULL REFERENCES worker(worker_id) ON DELETE CASCADE,
            station_id TEXT NOT NULL REFERENCES workstation(station_id) ON DELETE CASCADE,
            restriction_type TEXT NOT NULL,
            valid_from TEXT,
            valid_until TEXT,
            reason TEXT,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS rotation_session (
            session_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS rotation_assignment (
            assignment_id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL,
            worker_id TEXT NOT NULL,
            station_id TEXT NOT NULL,
            phase TEXT NOT NULL,
            priority_rank INTEGER NOT NULL,
            role_tags TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            UNIQUE (session_id, phase, worker_id)
        );

        CREATE INDEX IF NOT EXISTS idx_rotation_assignment_session_phase
            ON rotation_assignment (session_id, phase);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "STATION_ROTATION_DB_PATH";

/// 默认数据库路径
///
/// # 规则
/// 1) 环境变量 STATION_ROTATION_DB_PATH（非空）优先
/// 2) 用户数据目录/station-rotation/station_rotation.db
/// 3) 取不到数据目录时回退到 ./station_rotation.db
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./station_rotation.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("station-rotation");
        // 目录创建失败时由 Connection::open 报告错误
        std::fs::create_dir_all(&dir).ok();
        path = dir.join("station_rotation.db");
    }
    path.to_string_lossy().to_string()
}
