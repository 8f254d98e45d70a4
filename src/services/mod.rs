pub mod llm_service;
pub mod packager;

pub use llm_service::LlmService;
pub use packager::ResultPackager;
