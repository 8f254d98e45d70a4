//! 批量图片处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量图片的处理与结果交付。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验凭证、构建分析流程
//! 2. **批量加载**：扫描并加载所有待分析的图片（`Vec<BatchItem>`）
//! 3. **顺序处理**：严格按输入顺序逐张分析，不并发
//! 4. **故障隔离**：单张图片失败只记录结局，批次继续
//! 5. **进度反馈**：每张完成后产出进度快照并回调
//! 6. **结果交付**：汇总统计并打包压缩包
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单张图片的细节
//! - **向下委托**：委托 workflow 处理单张图片、services 打包结果
//! - **顺序语义**：结局顺序与进度事件顺序都等于输入顺序

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{load_all_images, BatchItem, BatchRun, Language, Outcome};
use crate::orchestrator::progress::{ProgressSnapshot, ProgressTracker};
use crate::services::ResultPackager;
use crate::utils::logging::{log_images_loaded, log_run_complete, log_startup};
use crate::workflow::{HtpAnalysisFlow, ImageAnalyzer, ItemCtx};

/// 顺序执行一个批次
///
/// # 参数
/// - `items`: 按输入顺序排列的图片列表
/// - `analyzer`: 图片分析器（批次内只读共享）
/// - `language`: 报告语言
/// - `on_progress`: 进度回调，每张图片的结局记录之后恰好触发一次
///
/// # 返回
/// 返回完成的批次聚合结果；单张图片的失败不会中断批次，
/// 空输入直接返回空批次且不触发任何进度事件
pub async fn run_batch<A: ImageAnalyzer>(
    items: Vec<BatchItem>,
    analyzer: &A,
    language: Language,
    mut on_progress: impl FnMut(&ProgressSnapshot),
) -> BatchRun {
    let total = items.len();
    let mut run = BatchRun::new(total, language);

    if total == 0 {
        warn!("⚠️ 批次为空，直接完成");
        return run;
    }

    let mut tracker = ProgressTracker::new(total);

    for (index, item) in items.into_iter().enumerate() {
        let ctx = ItemCtx::new(item.file_name.clone(), index + 1, total);
        info!("\n{} {}", ctx, "─".repeat(30));
        info!("{} 开始分析", ctx);

        match analyzer.analyze(&item.image, language).await {
            Ok(report) => {
                info!(
                    "{} ✓ 分析完成 (可分析: {})",
                    ctx,
                    report.classification()
                );
                run.push(Outcome::success(item, report));
            }
            Err(e) => {
                // 故障隔离：失败只记录结局，批次继续
                error!("{} ❌ 分析失败: {}", ctx, e);
                run.push(Outcome::failed(item, e.to_string()));
            }
        }

        let snapshot = tracker.record_completion();
        info!("{} {}", ctx, snapshot);
        on_progress(&snapshot);
    }

    run
}

/// 应用主结构
pub struct App {
    config: Config,
    flow: HtpAnalysisFlow,
}

impl App {
    /// 初始化应用
    ///
    /// 缺少 API 密钥在这里失败，任何图片都不会被处理
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.ensure_credentials()?;

        let flow = HtpAnalysisFlow::new(&config);

        Ok(Self { config, flow })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        log_startup(&self.config);

        // 加载所有待分析的图片
        let items = self.load_images().await?;
        if items.is_empty() {
            warn!("⚠️ 没有找到待分析的图片，仍会生成只含空 failed.txt 的结果包");
        }
        log_images_loaded(items.len());

        // 处理所有图片（进度条由进度回调驱动）
        let bar = progress_bar(items.len() as u64);
        let run = run_batch(items, &self.flow, self.config.language, |snapshot| {
            bar.set_position(snapshot.completed as u64);
            bar.set_message(snapshot.to_string());
        })
        .await;
        bar.finish_and_clear();

        // 输出最终统计
        log_run_complete(&run);

        // 打包并写出结果
        let archive = ResultPackager::new().package(&run)?;
        tokio::fs::write(&self.config.output_zip_file, &archive)
            .await
            .map_err(|e| {
                crate::error::AppError::file_write_failed(&self.config.output_zip_file, e)
            })?;

        info!("📦 结果已保存至: {}", self.config.output_zip_file);

        Ok(())
    }

    /// 加载图片
    async fn load_images(&self) -> Result<Vec<BatchItem>> {
        info!("\n📁 正在扫描待分析的图片...");
        load_all_images(&self.config.input_folder).await
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::models::AnalysisReport;

    /// 按图片首字节脚本化结果的分析器
    struct ScriptedAnalyzer;

    impl ImageAnalyzer for ScriptedAnalyzer {
        async fn analyze(
            &self,
            image: &[u8],
            _language: Language,
        ) -> Result<AnalysisReport, AnalysisError> {
            match image.first() {
                Some(0) => Err(AnalysisError::EmptyContent {
                    model: "test-model".to_string(),
                }),
                Some(1) => Ok(AnalysisReport::Classified {
                    signal: "signal".to_string(),
                    final_report: "final".to_string(),
                }),
                _ => Ok(AnalysisReport::Unclassified {
                    fix_signal: "fix".to_string(),
                }),
            }
        }
    }

    #[test]
    fn test_run_batch_isolates_failures() {
        let items = vec![
            BatchItem::new("bad.png", vec![0]),
            BatchItem::new("good.png", vec![1]),
        ];

        let run = tokio_test::block_on(run_batch(
            items,
            &ScriptedAnalyzer,
            Language::Chinese,
            |_| {},
        ));

        // 第一张失败不影响第二张
        assert_eq!(run.total, 2);
        assert_eq!(run.failed, 1);
        assert_eq!(run.success, 1);
        assert!(!run.outcomes[0].is_success());
        assert!(run.outcomes[1].is_success());
        // 失败结局仍保留自己的图片字节
        assert_eq!(run.outcomes[0].image, vec![0]);
    }

    #[test]
    fn test_run_batch_progress_fires_once_per_item() {
        let items = vec![
            BatchItem::new("a.png", vec![1]),
            BatchItem::new("b.png", vec![2]),
            BatchItem::new("c.png", vec![0]),
        ];

        let mut completions = Vec::new();
        let run = tokio_test::block_on(run_batch(
            items,
            &ScriptedAnalyzer,
            Language::English,
            |snapshot| completions.push(snapshot.completed),
        ));

        assert!(run.is_complete());
        // 每张图片恰好一次进度事件，按输入顺序递增
        assert_eq!(completions, vec![1, 2, 3]);
    }

    #[test]
    fn test_run_batch_empty_fires_no_progress() {
        let mut fired = 0;
        let run = tokio_test::block_on(run_batch(
            Vec::new(),
            &ScriptedAnalyzer,
            Language::Chinese,
            |_| fired += 1,
        ));

        assert_eq!(run.total, 0);
        assert!(run.outcomes.is_empty());
        assert_eq!(fired, 0);
    }
}
