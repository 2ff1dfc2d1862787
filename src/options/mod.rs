//! Plugin options and the key/value marshaling layer.
//!
//! Options arrive as flat `key=value` strings from the enclosing build.
//! Malformed values never fail the compilation; the corresponding field
//! is simply left absent and the caller sees a warning.

use std::path::PathBuf;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::debug;
use serde::{Deserialize, Serialize};

/// The single well-known annotation recognized when none are configured.
pub const DEFAULT_FAKE_ANNOTATION: &str = "dev.fakt.annotations.Fake";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Quiet,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QUIET" => Ok(LogLevel::Quiet),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            "TRACE" => Ok(LogLevel::Trace),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Jvm,
    Js,
    Native,
    Wasm,
    Common,
}

/// Source-set context supplied by the build tool, base64-encoded JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSetContext {
    pub compilation_name: String,
    pub target_name: String,
    pub platform_kind: PlatformKind,
    pub is_test: bool,
    pub default_source_set: String,
    #[serde(default)]
    pub parent_chain: Vec<String>,
    pub output_directory: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaktOptions {
    pub enabled: bool,
    pub debug: bool,
    pub log_level: Option<LogLevel>,
    pub output_dir: Option<PathBuf>,
    pub fake_annotations: Vec<String>,
    pub metadata_cache_input: Option<PathBuf>,
    pub metadata_cache_output: Option<PathBuf>,
    pub collect_modules: Vec<String>,
    pub source_set_context: Option<SourceSetContext>,
}

impl Default for FaktOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            debug: false,
            log_level: None,
            output_dir: None,
            fake_annotations: vec![DEFAULT_FAKE_ANNOTATION.to_string()],
            metadata_cache_input: None,
            metadata_cache_output: None,
            collect_modules: Vec::new(),
            source_set_context: None,
        }
    }
}

impl FaktOptions {
    /// Effective report level: explicit level wins, except that
    /// `debug=true` raises anything below DEBUG (TRACE is kept).
    pub fn effective_log_level(&self) -> LogLevel {
        let level = self.log_level.unwrap_or(LogLevel::Info);
        if self.debug && level < LogLevel::Debug {
            LogLevel::Debug
        } else {
            level
        }
    }
}

/// A tolerated marshaling problem, surfaced as a warning by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarshalWarning {
    pub key: String,
    pub reason: String,
}

/// Decode flat `key=value` pairs into options.
///
/// Unknown keys and malformed values are collected as warnings; the
/// compilation itself never fails here.
pub fn marshal_options<I, S>(pairs: I) -> (FaktOptions, Vec<MarshalWarning>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = FaktOptions::default();
    let mut warnings = Vec::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let Some((key, value)) = pair.split_once('=') else {
            warnings.push(MarshalWarning {
                key: pair.to_string(),
                reason: "expected key=value".to_string(),
            });
            continue;
        };
        apply_option(&mut options, &mut warnings, key.trim(), value.trim());
    }
    (options, warnings)
}

fn apply_option(
    options: &mut FaktOptions,
    warnings: &mut Vec<MarshalWarning>,
    key: &str,
    value: &str,
) {
    match key {
        "enabled" => match parse_bool(value) {
            Some(flag) => options.enabled = flag,
            None => warn_invalid(warnings, key, value),
        },
        "debug" => match parse_bool(value) {
            Some(flag) => options.debug = flag,
            None => warn_invalid(warnings, key, value),
        },
        "outputDir" => {
            if value.is_empty() {
                warn_invalid(warnings, key, value);
            } else {
                options.output_dir = Some(PathBuf::from(value));
            }
        }
        "logLevel" => match value.parse::<LogLevel>() {
            Ok(level) => options.log_level = Some(level),
            Err(()) => warn_invalid(warnings, key, value),
        },
        "fakeAnnotations" => {
            let annotations: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if annotations.is_empty() {
                warn_invalid(warnings, key, value);
            } else {
                options.fake_annotations = annotations;
            }
        }
        "metadataCacheInput" => options.metadata_cache_input = Some(PathBuf::from(value)),
        "metadataCacheOutput" => options.metadata_cache_output = Some(PathBuf::from(value)),
        "collectModules" => {
            options.collect_modules = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        "sourceSetContext" => match decode_source_set_context(value) {
            Some(context) => options.source_set_context = Some(context),
            None => warn_invalid(warnings, key, "<base64 json>"),
        },
        _ => warnings.push(MarshalWarning {
            key: key.to_string(),
            reason: "unknown option".to_string(),
        }),
    }
}

fn warn_invalid(warnings: &mut Vec<MarshalWarning>, key: &str, value: &str) {
    warnings.push(MarshalWarning {
        key: key.to_string(),
        reason: format!("invalid value {:?}", value),
    });
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn decode_source_set_context(encoded: &str) -> Option<SourceSetContext> {
    let bytes = match BASE64.decode(encoded) {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!("sourceSetContext is not valid base64: {}", err);
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(context) => Some(context),
        Err(err) => {
            debug!("sourceSetContext payload is not valid JSON: {}", err);
            None
        }
    }
}
