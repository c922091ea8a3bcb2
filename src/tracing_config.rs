//! Subscriber setup for drivers and tests that embed the context.
//!
//! The context crates only emit events: `info` when filter rules compile,
//! `warn` for configuration problems and root conflicts, `trace` for every
//! registration. Whoever owns the process picks where they go:
//!
//! ```bash
//! # Configuration warnings only (the default directives)
//! J2TS_LOG_FORMAT=tree j2ts src/
//!
//! # Every registration, machine readable
//! J2TS_LOG=j2ts_context=trace J2TS_LOG_FORMAT=json j2ts src/
//! ```
//!
//! A driver calls [`init_tracing`], which stays silent unless `J2TS_LOG` or
//! `RUST_LOG` is set. Integration tests call [`init_test_tracing`], which
//! always installs and routes output through the libtest capture.

use tracing_subscriber::fmt::TestWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Directives used when no filter variable is set.
pub const DEFAULT_DIRECTIVES: &str = "warn,j2ts_context=info";

/// Tracing output format, read from `J2TS_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    /// Indented span tree via `tracing-tree`.
    Tree,
    Json,
}

impl LogFormat {
    /// Anything unknown is `Text`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Where events go and which ones are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub format: LogFormat,
    pub directives: String,
    /// Write through libtest's capture instead of stderr.
    pub capture: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            directives: DEFAULT_DIRECTIVES.to_string(),
            capture: false,
        }
    }
}

impl TracingConfig {
    /// Reads `J2TS_LOG`, then `RUST_LOG`, then `J2TS_LOG_FORMAT`.
    ///
    /// Returns `None` when neither filter variable is set.
    pub fn from_env() -> Option<Self> {
        let directives = std::env::var("J2TS_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()?;
        Some(Self {
            format: format_from_env(),
            directives,
            capture: false,
        })
    }

    /// Environment settings when present, the defaults otherwise, always
    /// captured.
    pub fn for_tests() -> Self {
        let mut config = Self::from_env().unwrap_or_else(|| Self {
            format: format_from_env(),
            ..Self::default()
        });
        config.capture = true;
        config
    }

    /// Invalid directives are dropped rather than rejected.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::builder().parse_lossy(&self.directives)
    }

    fn writer(&self) -> BoxMakeWriter {
        if self.capture {
            BoxMakeWriter::new(TestWriter::new())
        } else {
            BoxMakeWriter::new(std::io::stderr)
        }
    }

    /// Installs the global subscriber.
    ///
    /// Returns `false` when one is already installed, in which case the
    /// existing one keeps receiving events.
    pub fn install(self) -> bool {
        let filter = self.filter();
        let writer = self.writer();
        let result = match self.format {
            LogFormat::Tree => {
                let layer = tracing_tree::HierarchicalLayer::new(2)
                    .with_writer(writer)
                    .with_indent_lines(true)
                    .with_deferred_spans(true)
                    .with_targets(true);
                Registry::default().with(filter).with(layer).try_init()
            }
            LogFormat::Json => {
                let layer = fmt::layer().json().with_writer(writer);
                Registry::default().with(filter).with(layer).try_init()
            }
            LogFormat::Text => {
                let layer = fmt::layer().with_target(true).with_writer(writer);
                Registry::default().with(filter).with(layer).try_init()
            }
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(error = %err, "tracing subscriber already installed");
                false
            }
        }
    }
}

fn format_from_env() -> LogFormat {
    LogFormat::parse(&std::env::var("J2TS_LOG_FORMAT").unwrap_or_default())
}

/// Driver entry point. Output goes to stderr so it never mixes with emitted
/// code on stdout.
pub fn init_tracing() -> bool {
    TracingConfig::from_env().is_some_and(TracingConfig::install)
}

/// Test entry point; safe to call from every test.
pub fn init_test_tracing() {
    TracingConfig::for_tests().install();
}
