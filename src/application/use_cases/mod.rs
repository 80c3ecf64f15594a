pub mod caption;
pub mod place_info;
pub mod prompt_builder;
