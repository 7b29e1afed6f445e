use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chunking::{ChunkingConfig, EstimatorKind, ExportFormat, SizeUnit};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Environment lookups scoped to a profile: `{PROFILE}_{KEY}` wins over
/// `{KEY}`. Empty values count as unset.
struct ProfiledEnv<'a> {
    profile: &'a str,
}

impl<'a> ProfiledEnv<'a> {
    fn new(profile: &'a str) -> Self {
        Self { profile }
    }

    fn get(&self, key: &str) -> Option<String> {
        let scoped = (!self.profile.is_empty())
            .then(|| format!("{}_{}", self.profile, key))
            .and_then(non_empty_var);
        scoped.or_else(|| non_empty_var(key))
    }

    /// Parse `key`, keeping `default` when unset or invalid.
    fn parse<T: FromStr>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.get(key) else {
            return default;
        };
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(
                key,
                profile = self.profile,
                value = %raw,
                "ignoring unparseable config value"
            );
            default
        })
    }
}

fn non_empty_var(key: impl AsRef<str>) -> Option<String> {
    env::var(key.as_ref()).ok().filter(|s| !s.is_empty())
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub chunking: ChunkingConfig,
    pub estimator: EstimatorKind,
    pub output: OutputConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `RAGCUT_PROFILE` env var. When set (e.g. `DOCS`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = non_empty_var("RAGCUT_PROFILE").unwrap_or_default();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let profile = profile.to_uppercase();
        let env = ProfiledEnv::new(&profile);
        Self {
            chunking: chunking_from_env(&env),
            estimator: env.parse("TOKEN_ESTIMATOR", EstimatorKind::default()),
            output: OutputConfig::from_env(&env),
            profile,
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  chunking:   size={} {}, overlap={} {}",
            self.chunking.chunk_size,
            self.chunking.chunk_size_unit,
            self.chunking.overlap,
            self.chunking.overlap_unit
        );
        tracing::info!("  estimator:  {}", self.estimator);
        tracing::info!(
            "  output:     format={}, dir={}",
            self.output.format,
            self.output
                .dir
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "(stdout)".to_string())
        );
    }

    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "chunking": self.chunking,
            "estimator": self.estimator,
            "output": {
                "format": self.output.format,
                "dir": self.output.dir,
            },
        })
    }
}

fn chunking_from_env(env: &ProfiledEnv<'_>) -> ChunkingConfig {
    let defaults = ChunkingConfig::default();
    ChunkingConfig {
        chunk_size: env.parse("CHUNK_SIZE", defaults.chunk_size),
        chunk_size_unit: env.parse("CHUNK_SIZE_UNIT", SizeUnit::Characters),
        overlap: env.parse("CHUNK_OVERLAP", defaults.overlap),
        overlap_unit: env.parse("CHUNK_OVERLAP_UNIT", SizeUnit::Characters),
    }
}

// ── Output ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: ExportFormat,
    /// Directory for export files; `None` writes to stdout.
    pub dir: Option<PathBuf>,
}

impl OutputConfig {
    fn from_env(env: &ProfiledEnv<'_>) -> Self {
        Self {
            format: env.parse("OUTPUT_FORMAT", ExportFormat::default()),
            dir: env.get("OUTPUT_DIR").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Env vars are process-global; serialize tests that touch them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const KEYS: &[&str] = &[
        "CHUNK_SIZE",
        "CHUNK_SIZE_UNIT",
        "CHUNK_OVERLAP",
        "CHUNK_OVERLAP_UNIT",
        "TOKEN_ESTIMATOR",
        "OUTPUT_FORMAT",
        "OUTPUT_DIR",
        "TESTDOCS_CHUNK_SIZE",
        "TESTDOCS_OUTPUT_FORMAT",
        "TESTDOCS_OUTPUT_DIR",
        "RAGCUT_PROFILE",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let config = Config::for_profile("");
        assert_eq!(config.profile_label(), "default");
        assert_eq!(config.chunking, ChunkingConfig::default());
        assert_eq!(config.estimator, EstimatorKind::Heuristic);
        assert_eq!(config.output.format, ExportFormat::Json);
        assert!(config.output.dir.is_none());
    }

    #[test]
    fn reads_plain_keys() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("CHUNK_SIZE", "256");
        env::set_var("CHUNK_SIZE_UNIT", "tokens");
        env::set_var("CHUNK_OVERLAP", "32");
        env::set_var("TOKEN_ESTIMATOR", "whitespace");
        env::set_var("OUTPUT_DIR", "out");

        let config = Config::for_profile("");
        assert_eq!(config.chunking.chunk_size, 256);
        assert_eq!(config.chunking.chunk_size_unit, SizeUnit::Tokens);
        assert_eq!(config.chunking.overlap, 32);
        assert_eq!(config.chunking.overlap_unit, SizeUnit::Characters);
        assert_eq!(config.estimator, EstimatorKind::Whitespace);
        assert_eq!(config.output.dir, Some(PathBuf::from("out")));
        clear_env();
    }

    #[test]
    fn profile_prefix_wins_over_plain_key() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("CHUNK_SIZE", "256");
        env::set_var("TESTDOCS_CHUNK_SIZE", "1000");
        env::set_var("TESTDOCS_OUTPUT_FORMAT", "md");

        let config = Config::for_profile("testdocs");
        assert_eq!(config.profile, "TESTDOCS");
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.output.format, ExportFormat::Markdown);

        let plain = Config::for_profile("");
        assert_eq!(plain.chunking.chunk_size, 256);
        clear_env();
    }

    #[test]
    fn empty_profiled_value_falls_through_to_plain_key() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("OUTPUT_DIR", "plain");
        env::set_var("TESTDOCS_OUTPUT_DIR", "");
        env::set_var("RAGCUT_PROFILE", "testdocs");

        let config = Config::from_env();
        assert_eq!(config.profile, "TESTDOCS");
        assert_eq!(config.output.dir, Some(PathBuf::from("plain")));
        clear_env();
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("CHUNK_SIZE", "-5");
        env::set_var("CHUNK_OVERLAP_UNIT", "bytes");

        let config = Config::for_profile("");
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.overlap_unit, SizeUnit::Characters);
        clear_env();
    }

    #[test]
    fn summary_is_json() {
        let config = Config {
            profile: String::new(),
            chunking: ChunkingConfig::characters(100, 10),
            estimator: EstimatorKind::Heuristic,
            output: OutputConfig {
                format: ExportFormat::Text,
                dir: None,
            },
        };
        let summary = config.summary();
        assert_eq!(summary["profile"], "default");
        assert_eq!(summary["chunking"]["chunkSize"], 100);
        assert_eq!(summary["output"]["format"], "text");
    }
}
