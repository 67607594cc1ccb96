// Author: Dustin Pilgrim
// License: MIT

use std::fmt::Display;

use thiserror::Error;

/// The main error type for YAML loading, addressing and decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum YamlError {
    #[error("[YAML] Syntax Error at {line}:{column}: {message}{}{}", hint_suffix(.hint), code_suffix(.code))]
    SyntaxError {
        message: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a segment is resolved, created or removed against a node that cannot hold it.
    #[error("[YAML] Addressing Error at '{segment}': {message}{}{}", hint_suffix(.hint), code_suffix(.code))]
    AddressError {
        message: String,
        segment: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    #[error("[YAML] Path '{path}' not found{}{}", hint_suffix(.hint), code_suffix(.code))]
    PathNotFound {
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a sub-tree cannot be turned into the requested type.
    #[error("[YAML] Decode Error: {message}{}{}", hint_suffix(.hint), code_suffix(.code))]
    DecodeError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    #[error("[YAML] Encode Error: {message}{}{}", hint_suffix(.hint), code_suffix(.code))]
    EncodeError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    #[error("[YAML] File Error '{path}': {message}{}{}", hint_suffix(.hint), code_suffix(.code))]
    FileError {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised for state problems, such as editing before anything was loaded.
    #[error("[YAML] Runtime Error: {message}{}{}", hint_suffix(.hint), code_suffix(.code))]
    RuntimeError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h))
}

fn code_suffix(code: &Option<u32>) -> String {
    code.map_or(String::new(), |c| format!(" Code: {}", c))
}

impl YamlError {
    /// Keyed access on a scalar.
    pub fn scalar_has_no_children(segment: &str) -> Self {
        YamlError::AddressError {
            message: "A scalar node cannot have a key or index".into(),
            segment: segment.to_string(),
            hint: Some("Set the parent path to a mapping or sequence first".into()),
            code: Some(310),
        }
    }

    pub fn path_not_found(path: &str) -> Self {
        YamlError::PathNotFound {
            path: path.to_string(),
            hint: Some("Check that the path exists in your document".into()),
            code: Some(304),
        }
    }

    pub fn not_loaded(path: &str) -> Self {
        YamlError::RuntimeError {
            message: format!("No document loaded for '{}'", path),
            hint: Some("Call load() first or check the warning it logged".into()),
            code: Some(305),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        YamlError::DecodeError {
            message: message.into(),
            hint: None,
            code: Some(401),
        }
    }

    pub fn encode(message: impl Into<String>) -> Self {
        YamlError::EncodeError {
            message: message.into(),
            hint: None,
            code: Some(420),
        }
    }

    /// Helper for file-related errors when loading or saving documents.
    pub fn file_error(message: String, path: String) -> Self {
        YamlError::FileError {
            message,
            path,
            hint: Some("Check file path and permissions".into()),
            code: Some(300),
        }
    }

    /// Prefix a decode failure with the path it was raised for.
    pub(crate) fn at_path(self, path: &str) -> Self {
        match self {
            YamlError::DecodeError { message, hint, code } => YamlError::DecodeError {
                message: format!("{} (at '{}')", message, path),
                hint: hint.or_else(|| Some("Check the shape of the value at this path".into())),
                code,
            },
            other => other,
        }
    }
}

impl serde::de::Error for YamlError {
    fn custom<T: Display>(msg: T) -> Self {
        YamlError::decode(msg.to_string())
    }
}
