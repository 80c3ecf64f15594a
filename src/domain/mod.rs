pub mod caption;
pub mod error;
pub mod llm_config;
pub mod place;
