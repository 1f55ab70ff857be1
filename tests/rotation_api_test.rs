// ==========================================
// 轮岗 API 集成测试
// ==========================================
// 职责: 验证 会话生命周期 → 生成 → 提升 的完整链路（真实 SQLite）
// ==========================================


mod helpers;

use helpers::mock_config::MockRotationConfig;
use helpers::test_data_builder::*;
use rusqlite::Connection;
use station_rotation::api::{ApiError, RotationApi};
use station_rotation::config::{config_keys, ConfigManager};
use station_rotation::domain::types::{Phase, SessionStatus};
use station_rotation::engine::RotationRepositories;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use test_helpers::{create_test_db, open_test_connection, seed_snapshot};

struct TestEnv {
    _tmp: tempfile::NamedTempFile,
    conn: Arc<Mutex<Connection>>,
    api: RotationApi,
}

/// 建库 + 写入基准场景 + 构建 API（固定判定日期）
fn setup() -> TestEnv {
    let (tmp, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    seed_snapshot(&RotationRepositories::from_connection(conn.clone()), &example_scenario()).unwrap();

    let api = RotationApi::from_connection(conn.clone())
        .unwrap()
        .with_fixed_date(test_today());
    TestEnv { _tmp: tmp, conn, api }
}

// ==========================================
// 会话生命周期
// ==========================================

#[tokio::test]
async fn test_session_lifecycle() {
    let env = setup();

    let session = env.api.create_session("  早班第一周 ").unwrap();
    assert_eq!(session.name, "早班第一周");
    assert_eq!(session.status, SessionStatus::Draft);

    let session = env.api.activate_session(&session.session_id).unwrap();
    assert_eq!(session.status, SessionStatus::Active);

    let session = env.api.complete_session(&session.session_id).unwrap();
    assert_eq!(session.status, SessionStatus::Completed);

    let err = env.api.cancel_session(&session.session_id).unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));

    assert_eq!(env.api.list_sessions().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_session_rejects_blank_name() {
    let env = setup();
    let err = env.api.create_session("   ").unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_unknown_session_not_found() {
    let env = setup();

    let err = env.api.get_session("missing").unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = env
        .api
        .generate_rotation_seeded("missing", Phase::Current, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = env.api.list_assignments("missing", Phase::Current).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

// ==========================================
// 生成
// ==========================================

#[tokio::test]
async fn test_generate_persists_assignments() {
    let env = setup();
    let session = env.api.create_session("第一周").unwrap();

    let summary = env
        .api
        .generate_rotation_seeded(&session.session_id, Phase::Current, 11)
        .await
        .unwrap();
    assert_eq!(summary.session_id, session.session_id);
    assert_eq!(summary.phase, Phase::Current);
    assert_eq!(summary.assignments_created, 5);
    assert_eq!(summary.diagnostics.excluded_workers.len(), 1);

    let stored = env.api.list_assignments(&session.session_id, Phase::Current).unwrap();
    assert_eq!(stored.len(), 5);
    assert!(stored.iter().any(|a| a.worker_id == "L1" && a.station_id == "A"));

    let counts = env.api.count_by_station(&session.session_id, Phase::Current).unwrap();
    assert_eq!(
        counts,
        vec![("A".to_string(), 2), ("B".to_string(), 1), ("C".to_string(), 2)]
    );

    // 另一阶段尚未生成
    assert!(env
        .api
        .list_assignments(&session.session_id, Phase::Next)
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_unseeded_generation_respects_invariants() {
    let env = setup();
    let session = env.api.create_session("新熵").unwrap();

    for _ in 0..5 {
        let summary = env
            .api
            .generate_rotation(&session.session_id, Phase::Next)
            .await
            .unwrap();
        assert_eq!(summary.assignments_created, 5);

        let stored = env.api.list_assignments(&session.session_id, Phase::Next).unwrap();
        let unique: HashSet<_> = stored.iter().map(|a| a.worker_id.clone()).collect();
        assert_eq!(unique.len(), stored.len());
    }
}

#[tokio::test]
async fn test_closed_session_rejects_generation() {
    let env = setup();
    let session = env.api.create_session("已取消").unwrap();
    env.api
        .generate_rotation_seeded(&session.session_id, Phase::Current, 1)
        .await
        .unwrap();
    env.api.cancel_session(&session.session_id).unwrap();

    let err = env
        .api
        .generate_rotation_seeded(&session.session_id, Phase::Current, 2)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::SessionClosed { .. }));

    let err = env.api.promote_next_to_current(&session.session_id).await.unwrap_err();
    assert!(matches!(err, ApiError::SessionClosed { .. }));

    // 已有分配保持不变
    assert_eq!(
        env.api
            .list_assignments(&session.session_id, Phase::Current)
            .unwrap()
            .len(),
        5
    );
}

#[tokio::test]
async fn test_configuration_error_keeps_existing_assignments() {
    let env = setup();
    let session = env.api.create_session("停用全部员工").unwrap();
    env.api
        .generate_rotation_seeded(&session.session_id, Phase::Current, 3)
        .await
        .unwrap();

    let repos = env.api.repositories();
    for id in ["L1", "T1", "T2", "W1", "W2", "X1"] {
        repos.worker_repo.set_active(id, false).unwrap();
    }

    let err = env
        .api
        .generate_rotation_seeded(&session.session_id, Phase::Current, 4)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ConfigurationError(_)));

    assert_eq!(
        env.api
            .list_assignments(&session.session_id, Phase::Current)
            .unwrap()
            .len(),
        5
    );
}

#[tokio::test]
async fn test_min_competency_from_config_table() {
    let env = setup();
    ConfigManager::from_connection(env.conn.clone())
        .unwrap()
        .set_global_config_value(config_keys::MIN_COMPETENCY_LEVEL, "4")
        .unwrap();

    let session = env.api.create_session("高门槛").unwrap();
    let summary = env
        .api
        .generate_rotation_seeded(&session.session_id, Phase::Current, 9)
        .await
        .unwrap();

    // 仅 L1(A,4) 与 T1(B,5 / C,4) 达到门槛;T1 不再随学员固定,由优先补齐放入 B
    let stored = env.api.list_assignments(&session.session_id, Phase::Current).unwrap();
    let workers: HashSet<_> = stored.iter().map(|a| a.worker_id.as_str()).collect();
    assert_eq!(workers, HashSet::from(["L1", "T1"]));
    assert_eq!(summary.assignments_created, 2);
    assert_eq!(summary.diagnostics.excluded_workers.len(), 4);
}

#[tokio::test]
async fn test_config_reader_failure_is_configuration_error() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    let repos = RotationRepositories::from_connection(conn);
    seed_snapshot(&repos, &example_scenario()).unwrap();

    let api = RotationApi::new(repos, Arc::new(MockRotationConfig::broken()));
    let session = api.create_session("配置损坏").unwrap();

    let err = api
        .generate_rotation_seeded(&session.session_id, Phase::Current, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ConfigurationError(_)));
}

// ==========================================
// 阶段提升
// ==========================================

#[tokio::test]
async fn test_promote_next_to_current() {
    let env = setup();
    let session = env.api.create_session("提升").unwrap();

    env.api
        .generate_rotation_seeded(&session.session_id, Phase::Current, 1)
        .await
        .unwrap();
    env.api
        .generate_rotation_seeded(&session.session_id, Phase::Next, 2)
        .await
        .unwrap();
    let next = env.api.list_assignments(&session.session_id, Phase::Next).unwrap();

    let promoted = env.api.promote_next_to_current(&session.session_id).await.unwrap();
    assert_eq!(promoted, next.len());

    let current = env.api.list_assignments(&session.session_id, Phase::Current).unwrap();
    let next_ids: HashSet<_> = next.iter().map(|a| a.assignment_id.clone()).collect();
    let current_ids: HashSet<_> = current.iter().map(|a| a.assignment_id.clone()).collect();
    assert_eq!(next_ids, current_ids);
    assert!(env
        .api
        .list_assignments(&session.session_id, Phase::Next)
        .unwrap()
        .is_empty());
}

// ==========================================
// 并发控制
// ==========================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_generation_same_key_serialized() {
    let env = setup();
    let session = env.api.create_session("并发").unwrap();
    let api = Arc::new(env.api);

    let mut handles = Vec::new();
    for seed in 0..8u64 {
        let api = api.clone();
        let session_id = session.session_id.clone();
        handles.push(tokio::spawn(async move {
            api.generate_rotation_seeded(&session_id, Phase::Current, seed).await
        }));
    }

    for handle in handles {
        let summary = handle.await.unwrap().unwrap();
        assert_eq!(summary.assignments_created, 5);
    }

    // 最终只保留最后一次运行的完整集合,无重复员工
    let stored = api.list_assignments(&session.session_id, Phase::Current).unwrap();
    assert_eq!(stored.len(), 5);
    let unique: HashSet<_> = stored.iter().map(|a| a.worker_id.clone()).collect();
    assert_eq!(unique.len(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_generation_different_phases() {
    let env = setup();
    let session = env.api.create_session("并发两阶段").unwrap();
    let api = Arc::new(env.api);

    let current = {
        let api = api.clone();
        let sid = session.session_id.clone();
        tokio::spawn(async move { api.generate_rotation_seeded(&sid, Phase::Current, 1).await })
    };
    let next = {
        let api = api.clone();
        let sid = session.session_id.clone();
        tokio::spawn(async move { api.generate_rotation_seeded(&sid, Phase::Next, 2).await })
    };

    current.await.unwrap().unwrap();
    next.await.unwrap().unwrap();

    assert_eq!(api.list_assignments(&session.session_id, Phase::Current).unwrap().len(), 5);
    assert_eq!(api.list_assignments(&session.session_id, Phase::Next).unwrap().len(), 5);
}
