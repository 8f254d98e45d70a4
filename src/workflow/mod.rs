//! 流程层（Workflow Layer）
//!
//! 定义"一张图片"的完整分析流程
//!
//! - `ImageAnalyzer` - 图片分析能力契约
//! - `HtpAnalysisFlow` - 两段式 HTP 分析流程（分类 → 报告）
//! - `ItemCtx` - 上下文封装（序号 + 文件名）

pub mod analysis_flow;
pub mod item_ctx;

pub use analysis_flow::HtpAnalysisFlow;
pub use item_ctx::ItemCtx;

use crate::error::AnalysisError;
use crate::models::{AnalysisReport, Language};

/// 图片分析能力契约
///
/// 对编排层而言，分析器是一个黑盒：给一张图片，返回结构化报告或失败。
/// 没有内置重试，单次失败对该图片即为终局。
/// 编排层通过这个契约与具体模型调用解耦，测试时可以换成脚本化实现。
#[allow(async_fn_in_trait)]
pub trait ImageAnalyzer {
    /// 分析单张图片
    async fn analyze(
        &self,
        image: &[u8],
        language: Language,
    ) -> Result<AnalysisReport, AnalysisError>;
}
