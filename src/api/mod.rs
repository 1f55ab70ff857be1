// ==========================================
// 工位轮岗排班 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行或上层应用调用
// ==========================================

pub mod error;
pub mod rotation_api;
pub mod session_lock;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use rotation_api::{RotationApi, RotationRunSummary};
pub use session_lock::SessionLockRegistry;
