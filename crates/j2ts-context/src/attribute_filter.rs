//! Attribute Filter Index
//!
//! Configuration can attach attributes (annotations) to entities that do not
//! carry them in source:
//!
//! ```json
//! {
//!   "@Erased": { "include": "x.y.*", "exclude": ["x.y.Keep", "x.y.Z.f(*)"] },
//!   "@Name('renamed')": { "include": "x.y.Foo" }
//! }
//! ```
//!
//! Each entry compiles into an `AttributeFilterRule` holding glob matchers over
//! entity signatures (see `EntityArena::signature`). Queries combine these rules
//! with the annotations actually written in source.

use crate::options::{AttributeFilterConfig, FilterEntry};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use j2ts_common::conventions::LANG_PACKAGE;
use j2ts_common::diagnostics::{Diagnostic, diagnostic_codes};
use j2ts_common::{EntityArena, EntityId};
use rustc_hash::FxHashMap;
use std::fmt;
use tracing::{info, warn};

/// Rewrites a filter pattern as a glob where `*` is the only wildcard.
///
/// The pieces between stars go through `globset::escape`, which brackets
/// `?`, `[`, `]`, `{` and `}`.
fn to_glob(pattern: &str) -> String {
    pattern
        .split('*')
        .map(globset::escape)
        .collect::<Vec<_>>()
        .join("*")
}

/// One compiled configuration entry.
#[derive(Debug, Clone)]
pub struct AttributeFilterRule {
    includes: GlobSet,
    excludes: GlobSet,
    include_patterns: Vec<String>,
    exclude_patterns: Vec<String>,
    parameter: Option<String>,
}

impl AttributeFilterRule {
    /// Some inclusion matches and no exclusion does.
    pub fn matches(&self, signature: &str) -> bool {
        self.includes.is_match(signature) && !self.excludes.is_match(signature)
    }

    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }

    /// Patterns that compiled successfully.
    pub fn include_patterns(&self) -> &[String] {
        &self.include_patterns
    }

    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    /// The value this rule binds, with quotes and `.class` suffixes removed.
    fn parameter_value(&self) -> Option<String> {
        let parameter = self.parameter.as_deref()?;
        let quoted = ['\'', '"'].into_iter().find_map(|quote| {
            parameter
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        });
        if let Some(literal) = quoted {
            return Some(literal.to_string());
        }
        if let Some(type_name) = parameter.strip_suffix(".class") {
            return Some(type_name.to_string());
        }
        Some(parameter.to_string())
    }
}

impl fmt::Display for AttributeFilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FILTER")?;
        if let Some(parameter) = &self.parameter {
            write!(f, "('{parameter}')")?;
        }
        write!(
            f,
            ": INCLUDES={:?}, EXCLUDES={:?}",
            self.include_patterns, self.exclude_patterns
        )
    }
}

/// `attributeKind(parameter)` split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterKey {
    /// Fully qualified attribute type name.
    pub kind: String,
    pub parameter: Option<String>,
}

impl FilterKey {
    /// Parse a configuration key. A leading `@` is optional, and kinds without
    /// a package are qualified with the language package.
    ///
    /// Returns `None` when the key does not follow the `name` or
    /// `name(parameter)` grammar.
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        let key = key.strip_prefix('@').unwrap_or(key);

        let (name, parameter) = match key.split_once('(') {
            Some((name, rest)) => {
                let parameter = rest.strip_suffix(')')?;
                if parameter.contains(')') {
                    return None;
                }
                (name, Some(parameter.to_string()))
            }
            None => {
                if key.contains(')') {
                    return None;
                }
                (key, None)
            }
        };
        if name.is_empty() {
            return None;
        }

        let kind = if name.contains('.') {
            name.to_string()
        } else {
            format!("{LANG_PACKAGE}.{name}")
        };
        Some(Self { kind, parameter })
    }
}

/// Compiled attribute filters, keyed by attribute kind.
#[derive(Debug, Default)]
pub struct AttributeFilterIndex {
    rules: FxHashMap<String, Vec<AttributeFilterRule>>,
    diagnostics: Vec<Diagnostic>,
}

impl AttributeFilterIndex {
    /// An index with no configured rules; every query falls back to the
    /// annotations written in source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every entry of the configuration, in declaration order.
    ///
    /// Configuration mistakes never fail the build: they are recorded as
    /// warnings and the offending pattern or entry degrades to "never matches".
    pub fn from_config(config: &AttributeFilterConfig) -> Self {
        let mut index = Self::new();
        for (key, entry) in config {
            index.add_entry(key, entry);
        }
        let mut kinds: Vec<&String> = index.rules.keys().collect();
        kinds.sort();
        for kind in kinds {
            let rules: Vec<String> = index.rules[kind].iter().map(|r| r.to_string()).collect();
            info!(kind = %kind, rules = ?rules, "attribute filter");
        }
        index
    }

    /// Compile and register one configuration entry.
    pub fn add_entry(&mut self, key: &str, entry: &FilterEntry) {
        let Some(filter_key) = FilterKey::parse(key) else {
            self.warn(diagnostic_codes::MALFORMED_FILTER_KEY, &[key]);
            return;
        };

        let (includes, include_patterns) = match &entry.include {
            Some(include) => self.compile(key, "include", include.patterns()),
            None => {
                self.warn(diagnostic_codes::MISSING_FILTER_INCLUDE, &[key]);
                (GlobSet::empty(), Vec::new())
            }
        };
        let (excludes, exclude_patterns) = match &entry.exclude {
            Some(exclude) => self.compile(key, "exclude", exclude.patterns()),
            None => (GlobSet::empty(), Vec::new()),
        };

        self.rules
            .entry(filter_key.kind)
            .or_default()
            .push(AttributeFilterRule {
                includes,
                excludes,
                include_patterns,
                exclude_patterns,
                parameter: filter_key.parameter,
            });
    }

    /// Compile patterns into one glob set, skipping the malformed ones.
    ///
    /// `*` matches any substring (dots included) and every other character is
    /// literal. A blank pattern is malformed.
    fn compile(&mut self, key: &str, field: &str, patterns: &[String]) -> (GlobSet, Vec<String>) {
        let mut builder = GlobSetBuilder::new();
        let mut accepted = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            if pattern.trim().is_empty() {
                warn!(key = %key, field = %field, "skipping blank pattern");
                self.warn(
                    diagnostic_codes::INVALID_FILTER_PATTERN,
                    &[pattern.as_str(), key, field],
                );
                continue;
            }
            match GlobBuilder::new(&to_glob(pattern))
                .literal_separator(false)
                .backslash_escape(false)
                .build()
            {
                Ok(glob) => {
                    builder.add(glob);
                    accepted.push(pattern.clone());
                }
                Err(err) => {
                    warn!(pattern = %pattern, error = %err, "skipping malformed pattern");
                    self.warn(
                        diagnostic_codes::INVALID_FILTER_PATTERN,
                        &[pattern.as_str(), key, field],
                    );
                }
            }
        }
        match builder.build() {
            Ok(set) => (set, accepted),
            Err(err) => {
                warn!(key = %key, error = %err, "pattern set failed to compile");
                for pattern in &accepted {
                    self.warn(
                        diagnostic_codes::INVALID_FILTER_PATTERN,
                        &[pattern.as_str(), key, field],
                    );
                }
                (GlobSet::empty(), Vec::new())
            }
        }
    }

    fn warn(&mut self, code: u32, args: &[&str]) {
        let diagnostic = Diagnostic::from_code(code, args);
        warn!(code, "{}", diagnostic.message_text);
        self.diagnostics.push(diagnostic);
    }

    /// Rules registered for an attribute kind, in declaration order.
    pub fn rules(&self, kind: &str) -> &[AttributeFilterRule] {
        self.rules.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of attribute kinds with at least one rule.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule of `kind` matching the signature.
    pub fn matching_rule(&self, kind: &str, signature: &str) -> Option<&AttributeFilterRule> {
        self.rules(kind).iter().find(|rule| rule.matches(signature))
    }

    fn has_rules_for(&self, kinds: &[&str]) -> bool {
        kinds.iter().any(|kind| self.rules.contains_key(*kind))
    }

    /// Whether the entity effectively carries one of the given attributes,
    /// through configuration or through its own annotations.
    pub fn has_attribute(&self, arena: &EntityArena, entity: EntityId, kinds: &[&str]) -> bool {
        if self.has_rules_for(kinds) {
            let signature = arena.signature(entity);
            if kinds
                .iter()
                .any(|kind| self.matching_rule(kind, &signature).is_some())
            {
                return true;
            }
        }
        Self::has_declared_attribute(arena, entity, kinds)
    }

    /// Only the annotations written in source; configuration is ignored.
    pub fn has_declared_attribute(arena: &EntityArena, entity: EntityId, kinds: &[&str]) -> bool {
        arena
            .get(entity)
            .is_some_and(|e| kinds.iter().any(|kind| e.has_annotation(kind)))
    }

    /// Value bound to the attribute on this entity.
    ///
    /// A matching configuration rule wins: its parameter is returned, or `None`
    /// when it has none. Otherwise the first value of the declared annotation is
    /// returned.
    pub fn attribute_value(
        &self,
        arena: &EntityArena,
        entity: EntityId,
        kind: &str,
    ) -> Option<String> {
        if self.has_rules_for(&[kind]) {
            let signature = arena.signature(entity);
            if let Some(rule) = self.matching_rule(kind, &signature) {
                return rule.parameter_value();
            }
        }
        arena
            .get(entity)
            .and_then(|e| e.annotation(kind))
            .and_then(|a| a.first_value())
            .map(str::to_string)
    }

    pub fn attribute_value_or(
        &self,
        arena: &EntityArena,
        entity: EntityId,
        kind: &str,
        default: &str,
    ) -> String {
        self.attribute_value(arena, entity, kind)
            .unwrap_or_else(|| default.to_string())
    }

    /// Warnings produced while compiling the configuration.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
#[path = "../tests/attribute_filter.rs"]
mod tests;
