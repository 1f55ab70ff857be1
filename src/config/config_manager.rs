// ==========================================
// 工位轮岗排班 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::rotation_config::{DEFAULT_MAX_COMPETENCY_LEVEL, DEFAULT_MIN_COMPETENCY_LEVEL};
use crate::config::rotation_config_trait::{ConfigError, RotationConfigReader};
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 轮岗生成时记录配置口径,便于事后解释
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key",
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }
}

// ==========================================
// RotationConfigReader Trait 实现
// ==========================================
#[async_trait]
impl RotationConfigReader for ConfigManager {
    async fn get_min_competency_level(&self) -> Result<i32, ConfigError> {
        let default = DEFAULT_MIN_COMPETENCY_LEVEL.to_string();
        let value = self.get_config_or_default(config_keys::MIN_COMPETENCY_LEVEL, &default)?;
        Ok(value.trim().parse::<i32>().unwrap_or_else(|_| {
            tracing::warn!(
                config_key = config_keys::MIN_COMPETENCY_LEVEL,
                raw_value = %value,
                "熟练度门槛配置格式错误，使用默认值"
            );
            DEFAULT_MIN_COMPETENCY_LEVEL
        }))
    }

    async fn get_max_competency_level(&self) -> Result<i32, ConfigError> {
        let default = DEFAULT_MAX_COMPETENCY_LEVEL.to_string();
        let value = self.get_config_or_default(config_keys::MAX_COMPETENCY_LEVEL, &default)?;
        Ok(value.trim().parse::<i32>().unwrap_or(DEFAULT_MAX_COMPETENCY_LEVEL))
    }

    async fn get_certification_gated(&self) -> Result<bool, ConfigError> {
        let value = self.get_config_or_default(config_keys::CERTIFICATION_GATED, "0")?;
        Ok(matches!(
            value.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 能力门槛
    pub const MIN_COMPETENCY_LEVEL: &str = "rotation/min_competency_level";
    pub const MAX_COMPETENCY_LEVEL: &str = "rotation/max_competency_level";

    // 认证门控
    pub const CERTIFICATION_GATED: &str = "rotation/certification_gated";
}
