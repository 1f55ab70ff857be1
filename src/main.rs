// ==========================================
// 工位轮岗排班 - 命令行入口
// ==========================================
// 用法:
//   station-rotation create-session <name>
//   station-rotation generate <session_id> <CURRENT|NEXT> [seed]
//   station-rotation promote <session_id>
//   station-rotation show <session_id> <CURRENT|NEXT>
// 数据库路径: 环境变量 STATION_ROTATION_DB_PATH 或用户数据目录
// ==========================================

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Context, Result};
use station_rotation::api::{RotationApi, RotationRunSummary};
use station_rotation::db::{default_db_path, ensure_schema, open_sqlite_connection};
use station_rotation::domain::Phase;
use station_rotation::logging;

fn usage() -> String {
    [
        "用法:",
        "  station-rotation create-session <name>",
        "  station-rotation generate <session_id> <CURRENT|NEXT> [seed]",
        "  station-rotation promote <session_id>",
        "  station-rotation show <session_id> <CURRENT|NEXT>",
    ]
    .join("\n")
}

fn parse_phase(raw: Option<&String>) -> Result<Phase> {
    let raw = raw.ok_or_else(|| anyhow!("缺少阶段参数\n{}", usage()))?;
    Phase::parse(raw).ok_or_else(|| anyhow!("无效的阶段: {} (应为 CURRENT 或 NEXT)", raw))
}

fn print_summary(summary: &RotationRunSummary) {
    println!(
        "会话 {} / {}: 生成 {} 条分配",
        summary.session_id, summary.phase, summary.assignments_created
    );
    for s in &summary.diagnostics.understaffed_stations {
        println!("  [缺员] {} ({}): {}/{}", s.station_name, s.station_id, s.actual, s.required);
    }
    for w in &summary.diagnostics.excluded_workers {
        println!("  [排除] {} ({}): 无可分配能力", w.name, w.worker_id);
    }
    for r in &summary.diagnostics.restriction_warnings {
        println!(
            "  [限制] {} @ {}: {} {}",
            r.worker_id,
            r.station_id,
            r.restriction_type,
            r.reason.as_deref().unwrap_or("")
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("{}", usage());
    };

    let db_path = default_db_path();
    tracing::info!(db_path = %db_path, version = station_rotation::VERSION, "使用数据库");

    let conn = open_sqlite_connection(&db_path).with_context(|| format!("无法打开数据库: {}", db_path))?;
    ensure_schema(&conn).context("建表失败")?;
    let api = RotationApi::from_connection(Arc::new(Mutex::new(conn)))?;

    match command.as_str() {
        "create-session" => {
            let name = args.get(1).ok_or_else(|| anyhow!("缺少会话名称\n{}", usage()))?;
            let session = api.create_session(name)?;
            println!("{}", session.session_id);
        }
        "generate" => {
            let session_id = args.get(1).ok_or_else(|| anyhow!("缺少会话ID\n{}", usage()))?;
            let phase = parse_phase(args.get(2))?;
            let summary = match args.get(3) {
                Some(seed) => {
                    let seed: u64 = seed.parse().with_context(|| format!("无效的种子: {}", seed))?;
                    api.generate_rotation_seeded(session_id, phase, seed).await?
                }
                None => api.generate_rotation(session_id, phase).await?,
            };
            print_summary(&summary);
        }
        "promote" => {
            let session_id = args.get(1).ok_or_else(|| anyhow!("缺少会话ID\n{}", usage()))?;
            let promoted = api.promote_next_to_current(session_id).await?;
            println!("会话 {}: {} 条 NEXT 分配已提升为 CURRENT", session_id, promoted);
        }
        "show" => {
            let session_id = args.get(1).ok_or_else(|| anyhow!("缺少会话ID\n{}", usage()))?;
            let phase = parse_phase(args.get(2))?;
            for a in api.list_assignments(session_id, phase)? {
                println!(
                    "{}\t{}\t{}\t{}",
                    a.station_id,
                    a.worker_id,
                    a.priority_rank,
                    a.role_tags_text()
                );
            }
        }
        other => bail!("未知命令: {}\n{}", other, usage()),
    }

    Ok(())
}
