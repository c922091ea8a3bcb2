//! Diagnostic types and message lookup for the transpilation context.
//!
//! Nothing the context reports is fatal: configuration mistakes and
//! cross-cutting conflicts degrade to a warning and the run continues.

use serde::Serialize;

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Message = 2,
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const INVALID_FILTER_PATTERN: u32 = 9001;
    pub const MISSING_FILTER_INCLUDE: u32 = 9002;
    pub const MALFORMED_FILTER_KEY: u32 = 9003;
    pub const MULTIPLE_ROOT_PACKAGES: u32 = 9010;
    pub const CIRCULAR_MODULE_DEPENDENCY: u32 = 9020;
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::INVALID_FILTER_PATTERN,
        category: DiagnosticCategory::Warning,
        message: "invalid pattern '{0}' for {1}.{2}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::MISSING_FILTER_INCLUDE,
        category: DiagnosticCategory::Warning,
        message: "annotation entry {0} does not have a mandatory 'include' entry",
    },
    DiagnosticMessage {
        code: diagnostic_codes::MALFORMED_FILTER_KEY,
        category: DiagnosticCategory::Warning,
        message: "malformed annotation entry '{0}', expected 'name' or 'name(parameter)'",
    },
    DiagnosticMessage {
        code: diagnostic_codes::MULTIPLE_ROOT_PACKAGES,
        category: DiagnosticCategory::Warning,
        message: "multiple root packages found ({0}, {1}); only one root package is allowed per program, using {0}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::CIRCULAR_MODULE_DEPENDENCY,
        category: DiagnosticCategory::Warning,
        message: "circular module dependency: {0}",
    },
];

/// A context diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub message_text: String,
}

impl Diagnostic {
    /// Build a diagnostic from its registered template.
    ///
    /// Unknown codes keep the raw arguments so nothing is lost.
    #[must_use]
    pub fn from_code(code: u32, args: &[&str]) -> Self {
        match get_diagnostic_message(code) {
            Some(msg) => Self {
                category: msg.category,
                code,
                message_text: format_message(msg.message, args),
            },
            None => Self {
                category: DiagnosticCategory::Warning,
                code,
                message_text: args.join(" "),
            },
        }
    }

    pub fn is_warning(&self) -> bool {
        self.category == DiagnosticCategory::Warning
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

#[cfg(test)]
#[path = "../tests/diagnostics.rs"]
mod tests;
