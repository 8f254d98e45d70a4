//! 批量分析数据模型
//!
//! 定义一次批量分析从输入到聚合结果的全部数据类型：
//! `BatchItem`（输入）→ `Outcome`（单张结局）→ `BatchRun`（批次聚合）

use chrono::{DateTime, Local};

use crate::models::language::Language;

/// 批量分析的输入单元：一张待分析的图片
///
/// 入队后不可变；`file_name` 是该图片在批次内的标识
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// 原始文件名
    pub file_name: String,
    /// 原始图片字节
    pub image: Vec<u8>,
}

impl BatchItem {
    /// 创建新的输入单元
    pub fn new(file_name: impl Into<String>, image: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            image,
        }
    }
}

/// 单张图片分析成功后的结构化报告
///
/// 分类判定决定报告的分支：可分析的图片产出观察信号和最终报告，
/// 不可分析的图片只产出修正指引
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisReport {
    /// 图片被判定为可分析
    Classified {
        /// 中间观察信号（结构化观察文本）
        signal: String,
        /// 最终叙述报告
        final_report: String,
    },
    /// 图片被判定为不可分析
    Unclassified {
        /// 修正指引（为什么不可分析、如何修正）
        fix_signal: String,
    },
}

impl AnalysisReport {
    /// 分类判定结果
    pub fn classification(&self) -> bool {
        matches!(self, AnalysisReport::Classified { .. })
    }
}

/// 单张图片的处理结局
///
/// 无论成功失败都保留当前图片自身的字节，供打包使用
#[derive(Debug, Clone)]
pub struct Outcome {
    /// 原始文件名（与输入单元一一对应）
    pub file_name: String,
    /// 原始图片字节
    pub image: Vec<u8>,
    /// 成功报告或失败描述
    pub status: OutcomeStatus,
}

/// 结局的两种形态
#[derive(Debug, Clone)]
pub enum OutcomeStatus {
    /// 分析成功
    Success(AnalysisReport),
    /// 分析失败（错误描述）
    Failed(String),
}

impl Outcome {
    /// 创建成功结局
    pub fn success(item: BatchItem, report: AnalysisReport) -> Self {
        Self {
            file_name: item.file_name,
            image: item.image,
            status: OutcomeStatus::Success(report),
        }
    }

    /// 创建失败结局
    pub fn failed(item: BatchItem, error: impl Into<String>) -> Self {
        Self {
            file_name: item.file_name,
            image: item.image,
            status: OutcomeStatus::Failed(error.into()),
        }
    }

    /// 该结局是否成功
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Success(_))
    }
}

/// 一次批量分析的聚合结果
///
/// 结局顺序等于输入顺序（处理是严格顺序的）；
/// 批次耗尽输入后计数冻结
#[derive(Debug, Clone)]
pub struct BatchRun {
    /// 本次运行的报告语言
    pub language: Language,
    /// 批次开始时间
    pub started_at: DateTime<Local>,
    /// 输入图片总数
    pub total: usize,
    /// 成功数量
    pub success: usize,
    /// 失败数量
    pub failed: usize,
    /// 按输入顺序排列的结局列表
    pub outcomes: Vec<Outcome>,
}

impl BatchRun {
    /// 创建新的批次（在处理第一张图片之前调用）
    pub fn new(total: usize, language: Language) -> Self {
        Self {
            language,
            started_at: Local::now(),
            total,
            success: 0,
            failed: 0,
            outcomes: Vec::with_capacity(total),
        }
    }

    /// 追加一个结局并更新计数
    pub fn push(&mut self, outcome: Outcome) {
        if outcome.is_success() {
            self.success += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }

    /// 批次是否已处理完所有输入
    pub fn is_complete(&self) -> bool {
        self.outcomes.len() == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> BatchItem {
        BatchItem::new(name, vec![1, 2, 3])
    }

    #[test]
    fn test_classification_branches() {
        let classified = AnalysisReport::Classified {
            signal: "观察".to_string(),
            final_report: "报告".to_string(),
        };
        let unclassified = AnalysisReport::Unclassified {
            fix_signal: "请重新上传".to_string(),
        };

        assert!(classified.classification());
        assert!(!unclassified.classification());
    }

    #[test]
    fn test_outcome_retains_image_bytes() {
        let outcome = Outcome::failed(item("a.png"), "网络错误");

        // 失败结局仍保留当前图片自身的字节
        assert_eq!(outcome.image, vec![1, 2, 3]);
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_batch_run_counts() {
        let mut run = BatchRun::new(3, Language::Chinese);
        run.push(Outcome::success(
            item("a.png"),
            AnalysisReport::Unclassified {
                fix_signal: "模糊".to_string(),
            },
        ));
        run.push(Outcome::failed(item("b.png"), "超时"));
        run.push(Outcome::success(
            item("c.png"),
            AnalysisReport::Classified {
                signal: "s".to_string(),
                final_report: "f".to_string(),
            },
        ));

        assert!(run.is_complete());
        assert_eq!(run.success, 2);
        assert_eq!(run.failed, 1);
        assert_eq!(run.success + run.failed, run.total);
        // 结局顺序等于输入顺序
        let names: Vec<&str> = run.outcomes.iter().map(|o| o.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_empty_batch_is_complete() {
        let run = BatchRun::new(0, Language::English);
        assert!(run.is_complete());
        assert_eq!(run.success + run.failed, 0);
    }
}
