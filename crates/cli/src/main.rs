//! # target-rest
//!
//! 命令行入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - 日志/指标初始化 (日志写入 stderr)
//! - 管道运行与 state 输出 (stdout)

mod cli;
mod run;
mod usage;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(cli.observability_config())?;

    info!(version = env!("CARGO_PKG_VERSION"), "target-rest starting");

    let result = run::run_target(&cli).await;

    if let Err(ref e) = result {
        error!(error = %format!("{e:#}"), "Target failed");
    }

    result
}
