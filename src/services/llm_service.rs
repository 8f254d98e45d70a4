//! LLM 服务 - 业务能力层
//!
//! 只负责"调用模型"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Claude 网关等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::AnalysisError;

/// LLM 服务
///
/// 职责：
/// - 调用多模态模型（带图片的 Vision 请求）
/// - 调用文本模型（纯文本请求）
/// - 只处理单次请求
/// - 不出现 Vec<BatchItem>
/// - 不关心流程顺序
///
/// 凭证和连接状态在整个批次内只读共享，不会被单张图片的分析修改
pub struct LlmService {
    client: Client<OpenAIConfig>,
    multimodal_model: String,
    text_model: String,
    temperature: f32,
    top_p: f32,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            multimodal_model: config.multimodal_model_name.clone(),
            text_model: config.text_model_name.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
        }
    }

    /// 发送多模态请求（文本 + 图片）
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    /// - `image_data_urls`: base64 data URL 形式的图片列表
    ///
    /// # 返回
    /// 返回模型的响应内容（字符串）
    pub async fn send_multimodal(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        image_data_urls: &[String],
    ) -> Result<String, AnalysisError> {
        debug!("调用多模态模型: {}", self.multimodal_model);
        debug!("包含 {} 张图片", image_data_urls.len());

        let mut messages = Vec::new();

        // 添加系统消息（如果提供）
        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| AnalysisError::api_call_failed(&self.multimodal_model, e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        // 构建包含文本和图片的用户消息内容
        let mut content_parts: Vec<ChatCompletionRequestUserMessageContentPart> = Vec::new();

        content_parts.push(ChatCompletionRequestUserMessageContentPart::Text(
            ChatCompletionRequestMessageContentPartText {
                text: user_message.to_string(),
            },
        ));

        for url in image_data_urls.iter() {
            content_parts.push(ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: url.clone(),
                        detail: Some(ImageDetail::Auto),
                    },
                },
            ));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
            .build()
            .map_err(|e| AnalysisError::api_call_failed(&self.multimodal_model, e))?;

        messages.push(ChatCompletionRequestMessage::User(user_msg));

        self.send(&self.multimodal_model, messages).await
    }

    /// 发送纯文本请求
    pub async fn send_text(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String, AnalysisError> {
        debug!("调用文本模型: {}", self.text_model);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| AnalysisError::api_call_failed(&self.text_model, e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| AnalysisError::api_call_failed(&self.text_model, e))?;

        messages.push(ChatCompletionRequestMessage::User(user_msg));

        self.send(&self.text_model, messages).await
    }

    /// 通用的请求发送与内容提取
    async fn send(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<String, AnalysisError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .temperature(self.temperature)
            .top_p(self.top_p)
            .max_tokens(2048u32)
            .build()
            .map_err(|e| AnalysisError::api_call_failed(model, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AnalysisError::api_call_failed(model, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AnalysisError::EmptyContent {
                model: model.to_string(),
            })?;

        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(AnalysisError::EmptyContent {
                model: model.to_string(),
            });
        }

        Ok(content)
    }
}
