/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::BatchRun;

/// 初始化日志订阅器
///
/// 日志级别通过 RUST_LOG 环境变量控制，默认 info
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量绘画分析模式");
    info!("🌐 报告语言: {}", config.language);
    info!("🍓 多模态模型: {}", config.multimodal_model_name);
    info!("🍓 文本模型: {}", config.text_model_name);
    info!("{}", "=".repeat(60));
}

/// 记录图片加载信息
pub fn log_images_loaded(total: usize) {
    info!("✓ 找到 {} 张待分析的图片", total);
    info!("💡 将按输入顺序逐张分析，单张失败不影响批次\n");
}

/// 打印最终统计信息
pub fn log_run_complete(run: &BatchRun) {
    info!("\n{}", "=".repeat(60));
    info!("📊 批量分析完成统计");
    info!("开始时间: {}", run.started_at.format("%Y-%m-%d %H:%M:%S"));
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", run.success, run.total);
    info!("❌ 失败: {}", run.failed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        // 按字符截断而不是字节，避免切断多字节字符
        assert_eq!(truncate_text("观察信号很长", 2), "观察...");
    }
}
