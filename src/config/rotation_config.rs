// ==========================================
// 工位轮岗排班 - 引擎运行配置
// ==========================================
// 用途: 引擎只消费该值对象,不直接读取配置表
// ==========================================

use crate::config::rotation_config_trait::{ConfigError, RotationConfigReader};
use serde::{Deserialize, Serialize};

/// 默认最低熟练度门槛（5 级制）
pub const DEFAULT_MIN_COMPETENCY_LEVEL: i32 = 2;

/// 默认最高熟练度
pub const DEFAULT_MAX_COMPETENCY_LEVEL: i32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationConfig {
    /// 最低熟练度门槛
    pub min_competency_level: i32,
    /// 认证门控
    pub certification_gated: bool,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            min_competency_level: DEFAULT_MIN_COMPETENCY_LEVEL,
            certification_gated: false,
        }
    }
}

impl RotationConfig {
    /// 从配置读取器构建运行配置
    ///
    /// 熟练度门槛被钳制到 1..=max_competency_level
    pub async fn load<C>(reader: &C) -> Result<Self, ConfigError>
    where
        C: RotationConfigReader + ?Sized,
    {
        let max_level = reader.get_max_competency_level().await?.max(1);
        let min_level = reader.get_min_competency_level().await?.clamp(1, max_level);
        let certification_gated = reader.get_certification_gated().await?;

        Ok(Self {
            min_competency_level: min_level,
            certification_gated,
        })
    }
}
