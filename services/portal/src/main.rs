//! Portal 二进制入口：仅负责启动应用。

mod api;
mod app;
mod cli;
mod config;
mod guests;
mod logging;
mod login;
mod mail;
mod registration;
mod session;
mod state;

#[tokio::main]
/// 启动 Portal 服务。
async fn main() -> anyhow::Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    match cli::dispatch(&args)? {
        cli::CliDispatch::Run => {}
        cli::CliDispatch::Exit => return Ok(()),
    }

    let config = config::PortalConfig::from_env()?;
    let _log_runtime = logging::init("portal")?;
    app::run(config).await
}
