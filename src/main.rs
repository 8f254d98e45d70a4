use anyhow::Result;
use htp_batch_analysis::utils::logging;
use htp_batch_analysis::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行应用（缺少 API 密钥在这里直接失败）
    App::initialize(config)?.run().await?;

    Ok(())
}
