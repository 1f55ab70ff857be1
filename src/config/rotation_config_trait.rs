// ==========================================
// 工位轮岗排班 - 轮岗配置读取 Trait
// ==========================================
// 职责: 定义轮岗引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

/// 配置读取错误
pub type ConfigError = Box<dyn Error + Send + Sync>;

// ==========================================
// RotationConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait RotationConfigReader: Send + Sync {
    /// 获取最低熟练度门槛
    ///
    /// # 返回
    /// - i32: 熟练度低于该值的能力记录不可分配
    ///
    /// # 默认值
    /// - 2（取值范围 1..=最高熟练度）
    async fn get_min_competency_level(&self) -> Result<i32, ConfigError>;

    /// 获取最高熟练度等级
    ///
    /// # 默认值
    /// - 5
    async fn get_max_competency_level(&self) -> Result<i32, ConfigError>;

    /// 是否启用认证门控
    ///
    /// # 返回
    /// - true: 能力记录必须持有当日有效的认证才可分配
    /// - false: 不检查认证
    ///
    /// # 默认值
    /// - false
    async fn get_certification_gated(&self) -> Result<bool, ConfigError>;
}
