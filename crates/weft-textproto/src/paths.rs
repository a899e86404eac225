//! Proto search-path substitutions and the relative-path resolver.

use std::collections::HashMap;

use weft_graph::{CompilationUnit, NodeName};

/// An ordered (virtual directory, real directory) rewrite rule. Schema files
/// under `real_dir` are known to the schema compiler under `virtual_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSubstitution {
    pub virtual_dir: String,
    pub real_dir: String,
}

/// Splits proto search-path flags out of a unit's argument vector.
///
/// Recognizes `-I` and `--proto_path` with attached or detached values; each
/// value is either `real_dir` or `virtual_dir=real_dir`. Everything else is
/// returned untouched, in order.
pub fn parse_substitution_args(args: &[String]) -> (Vec<PathSubstitution>, Vec<String>) {
    let mut substitutions = Vec::new();
    let mut rest = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let value = if let Some(attached) = arg.strip_prefix("--proto_path=") {
            Some(attached.to_string())
        } else if arg == "--proto_path" || arg == "-I" {
            iter.next().cloned()
        } else if let Some(attached) = arg.strip_prefix("-I") {
            Some(attached.to_string())
        } else {
            None
        };

        match value {
            Some(value) => substitutions.push(split_substitution(&value)),
            None => rest.push(arg.clone()),
        }
    }

    (substitutions, rest)
}

fn split_substitution(value: &str) -> PathSubstitution {
    match value.split_once('=') {
        Some((virtual_dir, real_dir)) => PathSubstitution {
            virtual_dir: virtual_dir.to_string(),
            real_dir: real_dir.to_string(),
        },
        None => PathSubstitution {
            virtual_dir: String::new(),
            real_dir: value.to_string(),
        },
    }
}

/// Maps full schema-file paths to search-path-relative paths and relative
/// paths back to graph identities.
///
/// The relative-to-full cache fills lazily as paths are first resolved and
/// is the only mutable state of an analysis run.
pub struct PathResolver<'a> {
    unit: &'a CompilationUnit,
    substitutions: Vec<PathSubstitution>,
    /// relative path -> full path, for entries produced by a substitution.
    cache: HashMap<String, String>,
}

impl<'a> PathResolver<'a> {
    pub fn new(unit: &'a CompilationUnit, substitutions: Vec<PathSubstitution>) -> Self {
        Self {
            unit,
            substitutions,
            cache: HashMap::new(),
        }
    }

    /// Relative form of `full_path` under the first matching substitution.
    ///
    /// Paths no substitution covers come back unchanged. First match wins;
    /// longest match would be safer but would change observed mappings.
    pub fn full_to_relative(&mut self, full_path: &str) -> String {
        if let Some((relative, _)) = self
            .cache
            .iter()
            .find(|(_, full)| full.as_str() == full_path)
        {
            return relative.clone();
        }

        for substitution in &self.substitutions {
            let mut dir = substitution.real_dir.clone();
            if !dir.ends_with('/') {
                dir.push('/');
            }
            if let Some(remainder) = full_path.strip_prefix(dir.as_str()) {
                let relative = if substitution.virtual_dir.is_empty() {
                    remainder.to_string()
                } else {
                    join_path(&substitution.virtual_dir, remainder)
                };
                self.cache.insert(relative.clone(), full_path.to_string());
                return relative;
            }
        }

        full_path.to_string()
    }

    /// Graph name for a search-path-relative file path, resolved through the
    /// cache to a full path (paths never rewritten resolve as themselves)
    /// and then against the unit's required inputs.
    pub fn name_for_relative(&self, relative: &str) -> Option<&NodeName> {
        let full = self
            .cache
            .get(relative)
            .map(String::as_str)
            .unwrap_or(relative);
        self.unit.name_for_path(full)
    }
}

fn join_path(dir: &str, rest: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), rest)
}
