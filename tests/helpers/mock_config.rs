// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use station_rotation::config::{ConfigError, RotationConfigReader};

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockRotationConfig {
    pub min_competency_level: i32,
    pub max_competency_level: i32,
    pub certification_gated: bool,
    /// 为 true 时所有读取返回错误（模拟配置表不可用）
    pub broken: bool,
}

impl MockRotationConfig {
    /// 创建默认配置（门槛 2 / 最高 5 / 不做认证门控）
    pub fn default() -> Self {
        Self {
            min_competency_level: 2,
            max_competency_level: 5,
            certification_gated: false,
            broken: false,
        }
    }

    pub fn with_min_level(level: i32) -> Self {
        let mut config = Self::default();
        config.min_competency_level = level;
        config
    }

    pub fn certification_gated() -> Self {
        let mut config = Self::default();
        config.certification_gated = true;
        config
    }

    pub fn broken() -> Self {
        let mut config = Self::default();
        config.broken = true;
        config
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.broken {
            return Err("配置表不可用".into());
        }
        Ok(())
    }
}

#[async_trait]
impl RotationConfigReader for MockRotationConfig {
    async fn get_min_competency_level(&self) -> Result<i32, ConfigError> {
        self.check()?;
        Ok(self.min_competency_level)
    }

    async fn get_max_competency_level(&self) -> Result<i32, ConfigError> {
        self.check()?;
        Ok(self.max_competency_level)
    }

    async fn get_certification_gated(&self) -> Result<bool, ConfigError> {
        self.check()?;
        Ok(self.certification_gated)
    }
}
