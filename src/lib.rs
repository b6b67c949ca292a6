pub mod agent;
pub mod errors;
pub mod file_tools;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod prompt_template;
pub mod providers;
pub mod schema;
pub mod tool;
