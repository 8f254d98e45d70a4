//! # HTP Batch Analysis
//!
//! 一个用于批量分析房-树-人（HTP）绘画测验图片的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的三层架构：
//!
//! ### ① 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单次调用
//! - `LlmService` - 多模态/文本模型调用能力
//! - `ResultPackager` - 把批次结果打成 zip 包的能力
//!
//! ### ② 流程层（Workflow）
//! - `workflow/` - 定义"一张图片"的完整分析流程
//! - `ImageAnalyzer` - 图片分析能力契约
//! - `HtpAnalysisFlow` - 两段式流程编排（分类 → 观察信号 → 最终报告）
//! - `ItemCtx` - 上下文封装（序号 + 文件名）
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_runner` - 批量图片处理器，顺序执行并隔离故障
//! - `orchestrator/progress` - 进度统计，线性外推 ETA
//!
//! ## 模块结构

pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AnalysisError, AppError, AppResult, CredentialError, PackagingError};
pub use models::{
    load_all_images, load_image_from_file, AnalysisReport, BatchItem, BatchRun, Language, Outcome,
    OutcomeStatus,
};
pub use orchestrator::{run_batch, App, ProgressSnapshot, ProgressTracker};
pub use services::{LlmService, ResultPackager};
pub use workflow::{HtpAnalysisFlow, ImageAnalyzer, ItemCtx};
