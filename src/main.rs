use anyhow::Result;
use clap::Parser;
use deepreport_rs::{cli, launch};
use tracing_subscriber::EnvFilter;

fn build_subscriber(default_level: &str) -> impl tracing::Subscriber + Send + Sync + 'static {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish()
}

#[tokio::main]
async fn main() -> Result<()> {
    // 凭据只在进程启动时从 .env 加载
    let _ = dotenvy::dotenv();

    let args = cli::Args::parse();

    // 加载配置期间的告警先按命令行的 -v 输出
    let (request, config) = {
        let level = if args.verbose { "debug" } else { "info" };
        let _guard = tracing::subscriber::set_default(build_subscriber(level));
        (args.report_request()?, args.into_config()?)
    };

    tracing::subscriber::set_global_default(build_subscriber(config.log_level()))?;

    launch(&config, request).await
}
