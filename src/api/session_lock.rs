// ==========================================
// 工位轮岗排班 - 会话级运行锁
// ==========================================
// 红线: 同一 (会话, 阶段) 的生成/提升串行执行
// 不同键之间互不阻塞
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::Phase;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockKey = (String, Phase);

#[derive(Default)]
pub struct SessionLockRegistry {
    locks: Mutex<HashMap<LockKey, Arc<AsyncMutex<()>>>>,
}

impl SessionLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, session_id: &str, phase: Phase) -> ApiResult<Arc<AsyncMutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|e| ApiError::InternalError(format!("会话锁表获取失败: {}", e)))?;
        Ok(locks
            .entry((session_id.to_string(), phase))
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone())
    }

    /// 获取 (session, phase) 的独占锁,守卫释放前其他同键运行等待
    pub async fn acquire(&self, session_id: &str, phase: Phase) -> ApiResult<OwnedMutexGuard<()>> {
        let lock = self.lock_for(session_id, phase)?;
        Ok(lock.lock_owned().await)
    }

    /// 同时获取会话两个阶段的锁（固定顺序 CURRENT → NEXT）
    pub async fn acquire_session(
        &self,
        session_id: &str,
    ) -> ApiResult<(OwnedMutexGuard<()>, OwnedMutexGuard<()>)> {
        let current = self.acquire(session_id, Phase::Current).await?;
        let next = self.acquire(session_id, Phase::Next).await?;
        Ok((current, next))
    }

    pub fn len(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
