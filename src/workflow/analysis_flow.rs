//! HTP 图片分析流程 - 流程层
//!
//! 核心职责：定义"一张图片"的完整分析流程
//!
//! 流程顺序：
//! 1. 多模态模型：判定图片是否可分析，产出观察信号或修正指引
//! 2. 文本模型：根据观察信号生成最终叙述报告（仅当判定可分析时）

use base64::{engine::general_purpose, Engine};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::AnalysisError;
use crate::models::{AnalysisReport, Language};
use crate::services::LlmService;
use crate::utils::logging::truncate_text;
use crate::workflow::ImageAnalyzer;

/// 分类阶段的模型响应载荷
#[derive(Debug, Deserialize)]
struct ClassifyPayload {
    classification: bool,
    #[serde(default)]
    signal: Option<String>,
    #[serde(default)]
    fix_signal: Option<String>,
}

/// HTP 图片分析流程
///
/// - 编排完整的两段式分析流程
/// - 决定何时调用多模态模型、何时调用文本模型
/// - 不持有任何批次状态
/// - 只依赖业务能力（services）
pub struct HtpAnalysisFlow {
    llm: LlmService,
    verbose_logging: bool,
}

impl HtpAnalysisFlow {
    /// 创建新的分析流程
    pub fn new(config: &Config) -> Self {
        Self {
            llm: LlmService::new(config),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 解析分类阶段的响应
    fn parse_classify_response(response: &str) -> Result<ClassifyPayload, AnalysisError> {
        let json_text = extract_json(response).ok_or_else(|| {
            AnalysisError::malformed_response("classification", truncate_text(response, 200))
        })?;

        serde_json::from_str(&json_text).map_err(|_| {
            AnalysisError::malformed_response("classification", truncate_text(response, 200))
        })
    }
}

impl ImageAnalyzer for HtpAnalysisFlow {
    async fn analyze(
        &self,
        image: &[u8],
        language: Language,
    ) -> Result<AnalysisReport, AnalysisError> {
        let data_url = image_data_url(image);

        // ========== 阶段 1: 分类 + 观察（多模态模型） ==========
        info!("🔍 阶段 1: 判定图片是否可分析...");

        let response = self
            .llm
            .send_multimodal(
                classify_user_prompt(language),
                Some(classify_system_prompt(language)),
                &[data_url],
            )
            .await?;

        let payload = Self::parse_classify_response(&response)?;

        if !payload.classification {
            let fix_signal = payload
                .fix_signal
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| {
                    AnalysisError::malformed_response(
                        "classification",
                        truncate_text(&response, 200),
                    )
                })?;

            info!("⚠️ 图片被判定为不可分析");
            return Ok(AnalysisReport::Unclassified { fix_signal });
        }

        let signal = payload
            .signal
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                AnalysisError::malformed_response("classification", truncate_text(&response, 200))
            })?;

        info!("✓ 图片可分析，已获得观察信号");
        if self.verbose_logging {
            info!("观察信号全文: {}", signal);
        } else {
            debug!("观察信号: {}", truncate_text(&signal, 120));
        }

        // ========== 阶段 2: 最终报告（文本模型） ==========
        info!("📝 阶段 2: 生成最终报告...");

        let final_report = self
            .llm
            .send_text(
                &build_final_user_prompt(&signal, language),
                Some(final_system_prompt(language)),
            )
            .await?;

        info!("✓ 最终报告生成完成");

        Ok(AnalysisReport::Classified {
            signal,
            final_report,
        })
    }
}

// ========== 提示词构建 ==========

fn classify_system_prompt(language: Language) -> &'static str {
    match language {
        Language::Chinese => {
            "你是一名专业的房-树-人（HTP）投射绘画测验分析师。\
             你擅长从来访者的绘画中观察房屋、树木与人物的特征，\
             并据此提出有临床参考价值的客观观察。"
        }
        Language::English => {
            "You are a professional analyst of the House-Tree-Person (HTP) \
             projective drawing test. You observe the houses, trees and persons \
             in a client's drawing and produce objective, clinically useful notes."
        }
    }
}

fn classify_user_prompt(language: Language) -> &'static str {
    match language {
        Language::Chinese => {
            r#"请先判断这张图片是否是一张可以进行房-树-人（HTP）分析的绘画作品。

【判定标准】
- 图片应是手绘作品（纸笔或数位绘制均可），而不是照片、截图或空白图片
- 画面中应至少能辨认出房、树、人三要素中的一个
- 画面应足够清晰，能看出线条与构图

【输出要求】
只返回一个 JSON 对象，不要返回任何其他内容：
- 如果可以分析：{"classification": true, "signal": "<对房、树、人各要素的客观观察，包括大小、位置、线条力度、细节与省略>"}
- 如果不可以分析：{"classification": false, "fix_signal": "<说明为什么无法分析，以及应如何调整后重新提交>"}"#
        }
        Language::English => {
            r#"First decide whether this image is a drawing suitable for House-Tree-Person (HTP) analysis.

Criteria:
- The image should be a drawing (pen-and-paper or digital), not a photo, screenshot or blank image
- At least one of the three elements (house, tree, person) should be recognizable
- The image should be clear enough to see strokes and composition

Output requirements — return a single JSON object and nothing else:
- If analyzable: {"classification": true, "signal": "<objective observations of the house, tree and person elements: size, placement, stroke pressure, details and omissions>"}
- If not analyzable: {"classification": false, "fix_signal": "<why it cannot be analyzed and how to adjust before resubmitting>"}"#
        }
    }
}

fn final_system_prompt(language: Language) -> &'static str {
    match language {
        Language::Chinese => {
            "你是一名资深心理咨询师，擅长把绘画测验的观察信号整理成面向来访者的叙述性报告。\
             报告应克制、专业，避免下诊断结论。"
        }
        Language::English => {
            "You are a senior counselor who turns drawing-test observations into \
             a narrative report for the client. The report should be measured and \
             professional, and must not state a diagnosis."
        }
    }
}

fn build_final_user_prompt(signal: &str, language: Language) -> String {
    match language {
        Language::Chinese => format!(
            r#"以下是一张房-树-人绘画的观察信号：

{}

请根据这些观察撰写最终分析报告：先概述整体印象，再分别讨论房、树、人三个要素所反映的心理特征，最后给出温和的总结与建议。直接输出报告正文。"#,
            signal
        ),
        Language::English => format!(
            r#"Here are the observations for a House-Tree-Person drawing:

{}

Write the final analysis report based on these observations: start with an overall impression, then discuss what the house, tree and person elements each suggest, and close with a gentle summary and suggestions. Output the report body directly."#,
            signal
        ),
    }
}

// ========== 辅助函数 ==========

/// 从模型响应中提取 JSON 对象
///
/// 模型偶尔会把 JSON 包在 markdown 代码块里或附带解释文字
fn extract_json(response: &str) -> Option<String> {
    // 优先提取代码块中的 JSON
    if let Ok(re) = Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```") {
        if let Some(caps) = re.captures(response) {
            return caps.get(1).map(|m| m.as_str().to_string());
        }
    }

    // 退而求其次：截取最外层花括号
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end > start {
        Some(response[start..=end].to_string())
    } else {
        None
    }
}

/// 根据图片魔数判断 MIME 类型
fn image_mime(image: &[u8]) -> &'static str {
    if image.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else {
        // 输入边界只接受 jpg/jpeg/png
        "image/jpeg"
    }
}

/// 把图片字节编码为 base64 data URL
fn image_data_url(image: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        image_mime(image),
        general_purpose::STANDARD.encode(image)
    )
}
