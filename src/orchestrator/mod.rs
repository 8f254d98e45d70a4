//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_runner` - 批量图片处理器
//! - 管理应用生命周期（初始化、运行、交付）
//! - 批量加载图片（Vec<BatchItem>）
//! - 严格顺序处理，逐张隔离故障
//! - 输出全局统计信息并打包结果
//!
//! ### `progress` - 进度统计
//! - 与循环体解耦的进度/ETA 累加器
//! - 每张图片完成后产出一份进度快照
//!
//! ## 层次关系
//!
//! ```text
//! batch_runner (处理 Vec<BatchItem>)
//!     ↓
//! workflow::HtpAnalysisFlow (处理单张图片)
//!     ↓
//! services (能力层：llm / packager)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_runner 管批次，progress 管计时
//! 2. **向下依赖**：编排层 → workflow → services
//! 3. **无业务逻辑**：只做调度和统计，不做具体分析判断

pub mod batch_runner;
pub mod progress;

// 重新导出主要类型
pub use batch_runner::{run_batch, App};
pub use progress::{ProgressSnapshot, ProgressTracker};
