// ==========================================
// 工位轮岗排班 - 轮岗 API
// ==========================================
// 职责: 会话生命周期、分配生成、阶段提升、分配查询
// 并发: 同一 (会话, 阶段) 的运行串行,不同键可并行
// 说明: 引擎与仓储均为同步代码,经 spawn_blocking 执行
// ==========================================

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::session_lock::SessionLockRegistry;
use crate::config::{ConfigManager, RotationConfig, RotationConfigReader};
use crate::domain::{Phase, RotationAssignment, RotationSession, SessionStatus};
use crate::engine::{RotationDiagnostics, RotationEngine, RotationRepositories, RotationRunner};

/// 一次生成的汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationRunSummary {
    pub session_id: String,
    pub phase: Phase,
    pub assignments_created: usize,
    pub diagnostics: RotationDiagnostics,
}

// ==========================================
// RotationApi - 轮岗 API
// ==========================================
pub struct RotationApi {
    repos: RotationRepositories,
    config_reader: Arc<dyn RotationConfigReader>,
    locks: SessionLockRegistry,
    fixed_date: Option<NaiveDate>,
}

impl RotationApi {
    pub fn new(repos: RotationRepositories, config_reader: Arc<dyn RotationConfigReader>) -> Self {
        Self {
            repos,
            config_reader,
            locks: SessionLockRegistry::new(),
            fixed_date: None,
        }
    }

    /// 基于共享连接装配（仓储 + ConfigManager）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ApiResult<Self> {
        let config_manager = ConfigManager::from_connection(conn.clone())
            .map_err(|e| ApiError::InternalError(format!("配置管理器初始化失败: {}", e)))?;
        Ok(Self::new(
            RotationRepositories::from_connection(conn),
            Arc::new(config_manager),
        ))
    }

    /// 固定判定日期（认证有效期/限制时间窗）
    pub fn with_fixed_date(mut self, date: NaiveDate) -> Self {
        self.fixed_date = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.fixed_date.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn repositories(&self) -> &RotationRepositories {
        &self.repos
    }

    // ==========================================
    // 会话生命周期
    // ==========================================

    /// 创建会话（DRAFT）
    pub fn create_session(&self, name: &str) -> ApiResult<RotationSession> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput("会话名称不能为空".to_string()));
        }
        let session = RotationSession::new(name.trim());
        self.repos.session_repo.insert(&session)?;
        info!(session_id = %session.session_id, "轮岗会话已创建");
        Ok(session)
    }

    pub fn get_session(&self, session_id: &str) -> ApiResult<RotationSession> {
        self.repos
            .session_repo
            .find_by_id(session_id)?
            .ok_or_else(|| ApiError::NotFound(format!("RotationSession(id={})不存在", session_id)))
    }

    pub fn list_sessions(&self) -> ApiResult<Vec<RotationSession>> {
        Ok(self.repos.session_repo.list_all()?)
    }

    pub fn activate_session(&self, session_id: &str) -> ApiResult<RotationSession> {
        self.transition(session_id, SessionStatus::Active)
    }

    pub fn complete_session(&self, session_id: &str) -> ApiResult<RotationSession> {
        self.transition(session_id, SessionStatus::Completed)
    }

    pub fn cancel_session(&self, session_id: &str) -> ApiResult<RotationSession> {
        self.transition(session_id, SessionStatus::Cancelled)
    }

    fn transition(&self, session_id: &str, target: SessionStatus) -> ApiResult<RotationSession> {
        let session = self.repos.session_repo.update_status(session_id, target)?;
        info!(session_id, status = %session.status, "会话状态已更新");
        Ok(session)
    }

    /// 会话必须存在且未关闭
    fn ensure_open(&self, session_id: &str) -> ApiResult<RotationSession> {
        let session = self.get_session(session_id)?;
        if session.status.is_closed() {
            return Err(ApiError::SessionClosed {
                session_id: session_id.to_string(),
                status: session.status.to_string(),
            });
        }
        Ok(session)
    }

    // ==========================================
    // 分配生成
    // ==========================================

    /// 生成一个阶段的分配（每次运行使用新熵）
    pub async fn generate_rotation(&self, session_id: &str, phase: Phase) -> ApiResult<RotationRunSummary> {
        self.run(session_id, phase, StdRng::from_os_rng()).await
    }

    /// 生成一个阶段的分配（固定种子,可复现）
    pub async fn generate_rotation_seeded(
        &self,
        session_id: &str,
        phase: Phase,
        seed: u64,
    ) -> ApiResult<RotationRunSummary> {
        self.run(session_id, phase, StdRng::seed_from_u64(seed)).await
    }

    #[instrument(skip(self, session_id, phase, rng), fields(session_id = %session_id, phase = %phase))]
    async fn run(&self, session_id: &str, phase: Phase, mut rng: StdRng) -> ApiResult<RotationRunSummary> {
        let _guard = self.locks.acquire(session_id, phase).await?;
        self.ensure_open(session_id)?;

        let config = RotationConfig::load(self.config_reader.as_ref())
            .await
            .map_err(|e| ApiError::ConfigurationError(format!("配置读取失败: {}", e)))?;

        let runner = RotationRunner::new(
            Arc::new(self.repos.clone()),
            Arc::new(self.repos.clone()),
            RotationEngine::new(config),
        );
        let today = self.today();
        let owned_session_id = session_id.to_string();

        let result = tokio::task::spawn_blocking(move || runner.run(&owned_session_id, phase, today, &mut rng))
            .await
            .map_err(|e| ApiError::InternalError(format!("任务执行失败: {}", e)))??;

        Ok(RotationRunSummary {
            session_id: session_id.to_string(),
            phase,
            assignments_created: result.assignments.len(),
            diagnostics: result.diagnostics,
        })
    }

    // ==========================================
    // 阶段提升
    // ==========================================

    /// NEXT → CURRENT（两个阶段锁按固定顺序获取）
    ///
    /// # 返回
    /// - Ok(usize): 提升的分配条数
    pub async fn promote_next_to_current(&self, session_id: &str) -> ApiResult<usize> {
        let _guards = self.locks.acquire_session(session_id).await?;
        self.ensure_open(session_id)?;

        let assignment_repo = self.repos.assignment_repo.clone();
        let owned_session_id = session_id.to_string();
        let promoted = tokio::task::spawn_blocking(move || assignment_repo.promote_next_to_current(&owned_session_id))
            .await
            .map_err(|e| ApiError::InternalError(format!("任务执行失败: {}", e)))??;

        info!(session_id, promoted, "NEXT 阶段已提升为 CURRENT");
        Ok(promoted)
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn list_assignments(&self, session_id: &str, phase: Phase) -> ApiResult<Vec<RotationAssignment>> {
        self.get_session(session_id)?;
        Ok(self.repos.assignment_repo.find_by_session_phase(session_id, phase)?)
    }

    pub fn count_by_station(&self, session_id: &str, phase: Phase) -> ApiResult<Vec<(String, u32)>> {
        self.get_session(session_id)?;
        Ok(self.repos.assignment_repo.count_by_station(session_id, phase)?)
    }
}
