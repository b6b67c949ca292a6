use serde_json::{json, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{AgentError, AgentResult};
use crate::tool::{Tool, ToolCall, ToolExecutor};

/// The local file tools: read, list, and edit/create.
///
/// Relative paths resolve against the working directory captured when the
/// value is built. Nothing confines the paths.
pub struct FileTools {
    tools: Vec<Tool>,
    working_dir: PathBuf,
}

impl FileTools {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self::with_working_dir(std::env::current_dir()?))
    }

    pub fn with_working_dir(working_dir: impl Into<PathBuf>) -> Self {
        let read_file_tool = Tool::new(
            "read_file",
            "Read the contents of a file at the specified path",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "The path to the file to read"
                    }
                },
                "required": ["path"]
            }),
        );

        let list_files_tool = Tool::new(
            "list_files",
            "List all files and directories in the specified path",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "The directory path to list (defaults to current directory)"
                    }
                },
                "required": []
            }),
        );

        let edit_file_tool = Tool::new(
            "edit_file",
            "Edits a file by replacing old_text with new_text. Creates the file if it doesn't exist.",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "The path to the file to edit"
                    },
                    "old_text": {
                        "type": "string",
                        "description": "The text to search for and replace (leave empty to create new file)"
                    },
                    "new_text": {
                        "type": "string",
                        "description": "The text to replace old_text with"
                    }
                },
                "required": ["path", "new_text"]
            }),
        );

        Self {
            tools: vec![read_file_tool, list_files_tool, edit_file_tool],
            working_dir: working_dir.into(),
        }
    }

    fn resolve_path(&self, path_str: &str) -> PathBuf {
        let path = Path::new(path_str);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }

    fn dispatch(&self, tool_call: &ToolCall) -> AgentResult<String> {
        let tool = self
            .tools
            .iter()
            .find(|tool| tool.name == tool_call.name)
            .ok_or_else(|| AgentError::ToolNotFound(tool_call.name.clone()))?;

        let params = tool_call.input.as_object().ok_or_else(|| {
            AgentError::InvalidParameters("tool input must be a JSON object".into())
        })?;
        for key in tool.required_keys() {
            if !params.contains_key(key) {
                return Err(AgentError::InvalidParameters(format!(
                    "Missing '{}' parameter",
                    key
                )));
            }
        }

        let input = &tool_call.input;
        match tool.name.as_str() {
            "read_file" => Ok(self.read_file(required_str(input, "path")?)),
            "list_files" => Ok(self.list_files(optional_str(input, "path", ".")?)),
            "edit_file" => Ok(self.edit_file(
                required_str(input, "path")?,
                optional_str(input, "old_text", "")?,
                required_str(input, "new_text")?,
            )),
            _ => Err(AgentError::ToolNotFound(tool.name.clone())),
        }
    }

    fn read_file(&self, path: &str) -> String {
        match fs::read_to_string(self.resolve_path(path)) {
            Ok(content) => format!("File contents of {}:\n{}", path, content),
            Err(e) if e.kind() == ErrorKind::NotFound => format!("File not found: {}", path),
            Err(e) => format!("Error reading file: {}", e),
        }
    }

    fn list_files(&self, path: &str) -> String {
        let dir = self.resolve_path(path);
        if path.is_empty() || !dir.exists() {
            return format!("Path not found: {}", path);
        }

        let entries = match fs::read_dir(&dir).and_then(|entries| entries.collect::<Result<Vec<_>, _>>())
        {
            Ok(entries) => entries,
            Err(e) => return format!("Error listing files: {}", e),
        };

        let mut children: Vec<(String, bool)> = entries
            .iter()
            .map(|entry| {
                (
                    entry.file_name().to_string_lossy().into_owned(),
                    entry.path().is_dir(),
                )
            })
            .collect();
        if children.is_empty() {
            return format!("Empty directory: {}", path);
        }
        children.sort();

        let lines: Vec<String> = children
            .into_iter()
            .map(|(name, is_dir)| {
                if is_dir {
                    format!("[DIR]  {}/", name)
                } else {
                    format!("[FILE] {}", name)
                }
            })
            .collect();
        format!("Contents of {}:\n{}", path, lines.join("\n"))
    }

    fn edit_file(&self, path: &str, old_text: &str, new_text: &str) -> String {
        let file = self.resolve_path(path);
        let result = if file.exists() && !old_text.is_empty() {
            replace_in_file(&file, old_text, new_text).map(|replaced| {
                if replaced {
                    format!("Successfully edited {}", path)
                } else {
                    format!("Text not found in file: {}", old_text)
                }
            })
        } else {
            create_file(&file, new_text).map(|()| format!("Successfully created {}", path))
        };

        result.unwrap_or_else(|e| format!("Error editing file: {}", e))
    }
}

/// Replaces every occurrence of `old_text`. Returns false, leaving the file
/// untouched, when there is none.
fn replace_in_file(file: &Path, old_text: &str, new_text: &str) -> std::io::Result<bool> {
    let content = fs::read_to_string(file)?;
    if !content.contains(old_text) {
        return Ok(false);
    }
    let occurrences = content.matches(old_text).count();
    if occurrences > 1 {
        debug!(occurrences, path = %file.display(), "replacing every occurrence");
    }
    fs::write(file, content.replace(old_text, new_text))?;
    Ok(true)
}

fn create_file(file: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file, content)
}

fn required_str<'a>(input: &'a Value, key: &str) -> AgentResult<&'a str> {
    input
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| AgentError::InvalidParameters(format!("'{}' must be a string", key)))
}

fn optional_str<'a>(input: &'a Value, key: &str, default: &'a str) -> AgentResult<&'a str> {
    match input.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(AgentError::InvalidParameters(format!(
            "'{}' must be a string",
            key
        ))),
    }
}

impl ToolExecutor for FileTools {
    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    fn execute(&self, tool_call: &ToolCall) -> String {
        info!(tool = %tool_call.name, input = %tool_call.input, "executing tool");
        match self.dispatch(tool_call) {
            Ok(output) => output,
            Err(AgentError::ToolNotFound(name)) => format!("Unknown tool: {}", name),
            Err(e) => format!("Error executing {}: {}", tool_call.name, e),
        }
    }
}
