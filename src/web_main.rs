//! Web 服务器主程序入口

use clap::Parser;
use tracing_subscriber::EnvFilter;

use edge_translate::env::{self, EnvVar};
use edge_translate::translation::TranslationService;
use edge_translate::web::{AppConfig, AppState, WebServer};

#[derive(Parser, Debug)]
#[command(
    name = "edge-translate",
    version,
    about = "Translation endpoint with provider fallback and caching"
)]
struct Cli {
    /// Bind address [env: EDGE_TRANSLATE_BIND_ADDRESS]
    #[arg(short, long)]
    bind: Option<String>,

    /// Port number [env: EDGE_TRANSLATE_PORT]
    #[arg(short, long)]
    port: Option<u16>,

    /// Print environment variable documentation and exit
    #[arg(long)]
    print_env_docs: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.print_env_docs {
        println!("{}", env::generate_env_docs());
        return Ok(());
    }

    // .env 文件是可选的
    dotenv::dotenv().ok();

    // 先初始化日志，配置加载失败时也能输出错误
    init_tracing(&startup_log_level());

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(variable = %e.variable, error = %e.message, "配置加载失败");
            return Err(e.into());
        }
    };

    if let Some(bind) = cli.bind {
        config.web.bind_addr = bind;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Err(e) = config.web.validate() {
        tracing::error!(variable = %e.variable, error = %e.message, "命令行参数无效");
        return Err(e.into());
    }
    config.log_summary();

    let service = TranslationService::from_config(&config.providers, &config.cache);
    let state = AppState::new(service, config.policies.clone());

    let server = WebServer::new(config.web.clone(), state);
    server.start().await?;

    Ok(())
}

/// 日志级别变量无效时退回 info，错误在加载完整配置时报告
fn startup_log_level() -> String {
    env::core::LogLevel::get_or_default("info".to_string())
}

fn init_tracing(log_level: &str) {
    // RUST_LOG 优先于 EDGE_TRANSLATE_LOG_LEVEL
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "edge_translate={level},tower_http={level}",
            level = log_level
        ))
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
