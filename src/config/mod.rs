// ==========================================
// 工位轮岗排班 - 配置层
// ==========================================
// 职责: 系统配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod rotation_config;
pub mod rotation_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use rotation_config::RotationConfig;
pub use rotation_config_trait::{ConfigError, RotationConfigReader};
