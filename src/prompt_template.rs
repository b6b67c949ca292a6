use serde::Serialize;
use tera::{Context, Error as TeraError, Tera};

use crate::tool::Tool;

const SYSTEM_TEMPLATE: &str = include_str!("prompts/system.md");

pub fn load_prompt<T: Serialize>(template: &str, context_data: &T) -> Result<String, TeraError> {
    let mut tera = Tera::default();
    tera.add_raw_template("inline_template", template)?;
    let context = Context::from_serialize(context_data)?;
    tera.render("inline_template", &context)
}

#[derive(Serialize)]
struct ToolInfo<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: String,
}

#[derive(Serialize)]
struct SystemContext<'a> {
    tools: Vec<ToolInfo<'a>>,
}

/// Render the system instruction advertising `tools` to the model
pub fn system_prompt(tools: &[Tool]) -> Result<String, TeraError> {
    let tools = tools
        .iter()
        .map(|tool| ToolInfo {
            name: &tool.name,
            description: &tool.description,
            input_schema: tool.input_schema.to_string(),
        })
        .collect();
    load_prompt(SYSTEM_TEMPLATE, &SystemContext { tools })
}
