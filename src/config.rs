use crate::error::{AppError, AppResult};
use crate::models::Language;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 待分析图片所在目录
    pub input_folder: String,
    /// 结果压缩包输出路径
    pub output_zip_file: String,
    /// 报告语言
    pub language: Language,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    /// 多模态模型（分类 + 观察信号）
    pub multimodal_model_name: String,
    /// 文本模型（最终报告）
    pub text_model_name: String,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_folder: "images".to_string(),
            output_zip_file: "batch_analysis_results.zip".to_string(),
            language: Language::default(),
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            multimodal_model_name: "gpt-4o-2024-08-06".to_string(),
            text_model_name: "claude-3-5-sonnet-20240620".to_string(),
            temperature: 0.2,
            top_p: 0.75,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(default.input_folder),
            output_zip_file: std::env::var("OUTPUT_ZIP_FILE").unwrap_or(default.output_zip_file),
            language: std::env::var("ANALYSIS_LANGUAGE").ok().and_then(|v| Language::find(&v)).unwrap_or(default.language),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            multimodal_model_name: std::env::var("MULTIMODAL_MODEL_NAME").unwrap_or(default.multimodal_model_name),
            text_model_name: std::env::var("TEXT_MODEL_NAME").unwrap_or(default.text_model_name),
            temperature: std::env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.temperature),
            top_p: std::env::var("LLM_TOP_P").ok().and_then(|v| v.parse().ok()).unwrap_or(default.top_p),
        }
    }

    /// 校验凭证
    ///
    /// 缺少 API 密钥是前置条件失败，必须在处理任何图片之前阻断运行
    pub fn ensure_credentials(&self) -> AppResult<()> {
        if self.llm_api_key.trim().is_empty() {
            return Err(AppError::missing_api_key());
        }
        Ok(())
    }
}
