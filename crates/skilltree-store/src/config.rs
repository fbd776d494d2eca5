//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use skilltree_layout::{
    LayoutConfig, DEFAULT_LEVEL_GAP, DEFAULT_NODE_RADIUS, DEFAULT_SIBLING_GAP,
    DEFAULT_VIEWPORT_PADDING,
};
use skilltree_unlock::UnlockPolicy;

use crate::error::{Error, Result};

/// Default generator timeout
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Configuration for the skill tree tools.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillTreeConfig {
    /// Directory for persistent storage
    pub data_dir: PathBuf,
    /// Node spacing
    pub layout: LayoutConfig,
    /// Canvas padding around the laid-out tree
    pub viewport_padding: f64,
    /// How long to wait for the generator before falling back
    pub generation_timeout: Duration,
    /// Which parents gate an unlock
    pub unlock_policy: UnlockPolicy,
}

impl Default for SkillTreeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./skilltree-data"),
            layout: LayoutConfig::default(),
            viewport_padding: DEFAULT_VIEWPORT_PADDING,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
            unlock_policy: UnlockPolicy::default(),
        }
    }
}

impl SkillTreeConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("SKILLTREE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./skilltree-data"));

        let layout = LayoutConfig::new(
            parse_or(&lookup, "SKILLTREE_NODE_RADIUS", DEFAULT_NODE_RADIUS)?,
            parse_or(&lookup, "SKILLTREE_SIBLING_GAP", DEFAULT_SIBLING_GAP)?,
            parse_or(&lookup, "SKILLTREE_LEVEL_GAP", DEFAULT_LEVEL_GAP)?,
        );
        layout.validate()?;

        let viewport_padding =
            parse_or(&lookup, "SKILLTREE_VIEWPORT_PADDING", DEFAULT_VIEWPORT_PADDING)?;

        let generation_timeout = Duration::from_millis(parse_or(
            &lookup,
            "SKILLTREE_GENERATION_TIMEOUT_MS",
            DEFAULT_GENERATION_TIMEOUT.as_millis() as u64,
        )?);

        let unlock_policy = match lookup("SKILLTREE_UNLOCK_POLICY").as_deref().map(str::trim) {
            None | Some("first") => UnlockPolicy::FirstParent,
            Some("all") => UnlockPolicy::AllParents,
            Some("any") => UnlockPolicy::AnyParent,
            Some(other) => {
                return Err(Error::Config(format!(
                    "Invalid SKILLTREE_UNLOCK_POLICY: {} (expected first, all, or any)",
                    other
                )))
            }
        };

        Ok(Self {
            data_dir,
            layout,
            viewport_padding,
            generation_timeout,
            unlock_policy,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {}: {:?} ({})", name, raw, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<SkillTreeConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SkillTreeConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, SkillTreeConfig::default());
        assert_eq!(config.generation_timeout, Duration::from_secs(15));
        assert_eq!(config.layout.leaf_pitch(), 100.0);
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("SKILLTREE_DATA_DIR", "/tmp/trees"),
            ("SKILLTREE_NODE_RADIUS", "20"),
            ("SKILLTREE_SIBLING_GAP", " 10 "),
            ("SKILLTREE_LEVEL_GAP", "80.5"),
            ("SKILLTREE_VIEWPORT_PADDING", "0"),
            ("SKILLTREE_GENERATION_TIMEOUT_MS", "500"),
            ("SKILLTREE_UNLOCK_POLICY", "all"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/trees"));
        assert_eq!(config.layout, LayoutConfig::new(20.0, 10.0, 80.5));
        assert_eq!(config.viewport_padding, 0.0);
        assert_eq!(config.generation_timeout, Duration::from_millis(500));
        assert_eq!(config.unlock_policy, UnlockPolicy::AllParents);
    }

    #[test]
    fn unparsable_value() {
        let err = config_from(&[("SKILLTREE_LEVEL_GAP", "tall")]).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("SKILLTREE_LEVEL_GAP")));
    }

    #[test]
    fn negative_spacing_rejected() {
        let err = config_from(&[("SKILLTREE_NODE_RADIUS", "-1")]).unwrap_err();
        assert!(matches!(err, Error::Layout(_)));
    }

    #[test]
    fn unknown_policy() {
        assert!(matches!(
            config_from(&[("SKILLTREE_UNLOCK_POLICY", "some")]),
            Err(Error::Config(_))
        ));
    }
}
