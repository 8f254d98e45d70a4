//! 结果打包服务 - 业务能力层
//!
//! 只负责"把一次批量分析的结果打成压缩包"能力，不关心流程
//!
//! ## 压缩包布局
//!
//! ```text
//! <文件名去扩展名>/<原始文件名>        原始图片（字节不变）
//! <文件名去扩展名>/<文件名去扩展名>.report  报告文档
//! failed.txt                          失败清单（每行一个原始文件名）
//! ```

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::Path;

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{AppError, AppResult};
use crate::models::{AnalysisReport, BatchRun, Language, Outcome, OutcomeStatus};

/// 失败结局的报告占位标记
const FAILURE_MARKER: &str = "failed";

/// 结果打包服务
///
/// 职责：
/// - 把 BatchRun 序列化为单个 zip 压缩包（内存中组装，整体返回）
/// - 每个结局一个子目录，目录名冲突时确定性消歧
/// - 顶层写入 failed.txt 失败清单
/// - 对同一个 BatchRun 重复打包产出逐字节相同的压缩包
pub struct ResultPackager;

impl ResultPackager {
    /// 创建新的打包服务
    pub fn new() -> Self {
        Self
    }

    /// 打包一次批量分析的全部结果
    ///
    /// 要么返回完整的压缩包字节，要么返回打包错误；
    /// 不会对外暴露不完整的压缩包
    pub fn package(&self, run: &BatchRun) -> AppResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        // 固定压缩方式与条目时间戳，保证重复打包逐字节一致
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        let mut used_stems: HashSet<String> = HashSet::new();

        for outcome in &run.outcomes {
            let stem = allocate_stem(file_stem(&outcome.file_name), &mut used_stems);
            debug!("打包结局: {} -> {}/", outcome.file_name, stem);

            // 原始图片（字节不变）
            writer.start_file(format!("{}/{}", stem, outcome.file_name), options)?;
            writer
                .write_all(&outcome.image)
                .map_err(AppError::archive_write_failed)?;

            // 报告文档
            writer.start_file(format!("{}/{}.report", stem, stem), options)?;
            writer
                .write_all(report_text(outcome, run.language).as_bytes())
                .map_err(AppError::archive_write_failed)?;
        }

        // 顶层失败清单（无失败时为空文件）
        let mut failed_list = String::new();
        for outcome in &run.outcomes {
            if !outcome.is_success() {
                failed_list.push_str(&outcome.file_name);
                failed_list.push('\n');
            }
        }
        writer.start_file("failed.txt", options)?;
        writer
            .write_all(failed_list.as_bytes())
            .map_err(AppError::archive_write_failed)?;

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}

/// 去掉文件名的扩展名
fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string())
}

/// 分配目录名，冲突时按输入顺序追加数字后缀
fn allocate_stem(stem: String, used: &mut HashSet<String>) -> String {
    if used.insert(stem.clone()) {
        return stem;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", stem, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// 组装报告文本
///
/// - 成功且可分析：免责声明 + 观察信号 + 最终报告
/// - 成功但不可分析：免责声明 + 修正指引
/// - 失败：只有失败标记，不加免责声明
fn report_text(outcome: &Outcome, language: Language) -> String {
    match &outcome.status {
        OutcomeStatus::Failed(_) => {
            let mut text = String::from(FAILURE_MARKER);
            text.push('\n');
            text
        }
        OutcomeStatus::Success(report) => {
            let mut text = String::from(language.disclaimer());
            text.push_str("\n\n");
            match report {
                AnalysisReport::Classified {
                    signal,
                    final_report,
                } => {
                    text.push_str(signal);
                    text.push_str("\n\n");
                    text.push_str(final_report);
                }
                AnalysisReport::Unclassified { fix_signal } => {
                    text.push_str(fix_signal);
                }
            }
            text.push('\n');
            text
        }
    }
}
