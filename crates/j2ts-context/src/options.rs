use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// Custom deserializer for boolean options that accepts both bool and string values.
/// This handles configuration files containing `"bundleMode": "true"` instead of
/// `"bundleMode": true`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{}'. Expected true, false, 'true', or 'false'",
                s
            ))),
        },
    }
}

const fn default_true() -> bool {
    true
}

/// A single glob pattern or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PatternList {
    One(String),
    Many(Vec<String>),
}

impl PatternList {
    pub fn patterns(&self) -> &[String] {
        match self {
            PatternList::One(pattern) => std::slice::from_ref(pattern),
            PatternList::Many(patterns) => patterns,
        }
    }
}

/// Value of one `attributeKind(parameter)` configuration entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterEntry {
    /// Mandatory; an entry without it never matches.
    #[serde(default)]
    pub include: Option<PatternList>,
    #[serde(default)]
    pub exclude: Option<PatternList>,
}

impl FilterEntry {
    pub fn including(patterns: &[&str]) -> Self {
        Self {
            include: Some(PatternList::Many(
                patterns.iter().map(|p| p.to_string()).collect(),
            )),
            exclude: None,
        }
    }

    #[must_use]
    pub fn excluding(mut self, patterns: &[&str]) -> Self {
        self.exclude = Some(PatternList::Many(
            patterns.iter().map(|p| p.to_string()).collect(),
        ));
        self
    }
}

/// Attribute filter rules in declaration order.
pub type AttributeFilterConfig = IndexMap<String, FilterEntry>;

/// Options for one transpilation run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextOptions {
    /// Attribute filter rules, keyed by `attributeKind` or `attributeKind(parameter)`.
    #[serde(default)]
    pub configuration: AttributeFilterConfig,
    /// Emit one module per package instead of namespaces.
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub use_modules: bool,
    /// Emit a single bundle; names are fully qualified and static fields are
    /// initialized at the end of the bundle.
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub bundle_mode: bool,
    /// The strict core library is on the classpath.
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub strict_mode: bool,
    /// Erase wildcard bounds (`C<? extends String>` becomes `C<any>`) instead
    /// of binding them to synthetic type parameters.
    #[serde(
        default = "default_true",
        deserialize_with = "deserialize_bool_or_string"
    )]
    pub ignore_wildcard_bounds: bool,
    /// Top-level `@Kind` entries, as found in flat configuration files.
    #[serde(flatten)]
    other: IndexMap<String, serde_json::Value>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            configuration: AttributeFilterConfig::default(),
            use_modules: false,
            bundle_mode: false,
            strict_mode: false,
            ignore_wildcard_bounds: true,
            other: IndexMap::new(),
        }
    }
}

impl ContextOptions {
    /// Parse options from JSON text.
    ///
    /// Filter entries may appear either under `configuration` or as top-level
    /// keys starting with `@`; top-level ones are appended after the nested ones.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let mut options: ContextOptions =
            serde_json::from_str(text).context("failed to parse transpiler options")?;

        for (key, value) in std::mem::take(&mut options.other) {
            if !key.starts_with('@') {
                tracing::debug!(key = %key, "ignoring unknown option");
                continue;
            }
            if !value.is_object() {
                bail!("annotation entry {key} must be an object");
            }
            let entry: FilterEntry = serde_json::from_value(value)
                .with_context(|| format!("invalid annotation entry {key}"))?;
            options.configuration.insert(key, entry);
        }

        Ok(options)
    }

    /// Read and parse an options file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Add a filter entry.
    #[must_use]
    pub fn with_filter(mut self, key: &str, entry: FilterEntry) -> Self {
        self.configuration.insert(key.to_string(), entry);
        self
    }
}

#[cfg(test)]
#[path = "../tests/options.rs"]
mod tests;
