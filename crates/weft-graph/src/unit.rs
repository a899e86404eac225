use serde::{Deserialize, Serialize};

use crate::NodeName;

/// Description of one indexing job.
///
/// `arguments` configures the analysis (root message selection, proto search
/// paths); `required_inputs` registers the graph identity of every file the
/// job may reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Paths of the files under analysis; a textproto unit has exactly one.
    pub source_files: Vec<String>,
    pub required_inputs: Vec<RequiredInput>,
    pub arguments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredInput {
    /// Full path of the input file.
    pub path: String,
    /// Graph identity registered for it.
    pub name: NodeName,
}

/// Contents of one input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileData {
    pub path: String,
    pub content: Vec<u8>,
}

impl FileData {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

impl CompilationUnit {
    /// Graph name registered for `path` among the unit's required inputs.
    pub fn name_for_path(&self, path: &str) -> Option<&NodeName> {
        self.required_inputs
            .iter()
            .find(|input| input.path == path)
            .map(|input| &input.name)
    }
}
