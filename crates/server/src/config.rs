//! Engine configuration.

use powertool_bindings::{TokenSet, UNLIMITED};
use powertool_targeting::HitTest;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

/// Radius used by the cylinder hit test.
const CYLINDER_RADIUS: f32 = 0.5;

/// Longest accepted `max-trace-distance`, in blocks.
pub const MAX_TRACE_DISTANCE: f32 = 1024.0;

/// Which actor hit test the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HitTestKind {
    /// Ray vs. the actor's bounding box.
    #[default]
    Aabb,
    /// Two sample points within a fixed radius of the ray.
    Cylinder,
}

impl HitTestKind {
    /// The targeting strategy for this kind.
    pub fn strategy(self) -> HitTest {
        match self {
            Self::Aabb => HitTest::Aabb,
            Self::Cylinder => HitTest::Cylinder {
                radius: CYLINDER_RADIUS,
            },
        }
    }
}

/// A per-group binding quota.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GroupLimit {
    /// Permission group name.
    pub group: String,
    /// Maximum owned bindings; `-1` for unlimited.
    pub limit: i32,
}

/// Binding quotas, most specific group first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Limit for actors in none of the listed groups.
    pub default: i32,
    /// Group limits; the first group an actor belongs to wins.
    pub groups: Vec<GroupLimit>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            default: UNLIMITED,
            groups: Vec::new(),
        }
    }
}

impl LimitsConfig {
    /// Quota for an actor belonging to `groups`.
    pub fn limit_for<S: AsRef<str>>(&self, groups: &[S]) -> i32 {
        self.groups
            .iter()
            .find(|entry| groups.iter().any(|g| g.as_ref() == entry.group))
            .map_or(self.default, |entry| entry.limit)
    }
}

/// Everything the engine reads from `config.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PowerToolConfig {
    /// Replaced by the targeted actor's name.
    pub player_token: String,
    /// Replaced by the targeted block's X.
    pub x_token: String,
    /// Replaced by the targeted block's Y.
    pub y_token: String,
    /// Replaced by the targeted block's Z.
    pub z_token: String,
    /// Replaced by the first open Y above the targeted block.
    pub y_air_token: String,
    /// Treat renamed items as distinct power tools.
    pub use_display_names: bool,
    /// Accept bound commands without a leading slash.
    pub omit_leading_slash: bool,
    /// Describe a power tool when it is selected.
    pub verbose: bool,
    /// Raise log verbosity for this crate.
    pub debug: bool,
    /// How far targeting looks, in blocks.
    pub max_trace_distance: f32,
    /// Bound on the upward scan for the air token.
    pub max_air_steps: u32,
    /// Hits at or below this Y are discarded.
    pub min_y: i32,
    /// Actor hit test.
    pub hit_test: HitTestKind,
    /// Ticks between per-actor reloads after `reload`.
    pub reload_delay_ticks: u64,
    /// Name and aliases of the power tool command itself.
    pub command_names: Vec<String>,
    /// Binding quotas.
    pub limits: LimitsConfig,
}

impl Default for PowerToolConfig {
    fn default() -> Self {
        let tokens = TokenSet::default();
        Self {
            player_token: tokens.actor,
            x_token: tokens.x,
            y_token: tokens.y,
            z_token: tokens.z,
            y_air_token: tokens.air_y,
            use_display_names: true,
            omit_leading_slash: false,
            verbose: true,
            debug: false,
            max_trace_distance: 100.0,
            max_air_steps: 256,
            min_y: 0,
            hit_test: HitTestKind::Aabb,
            reload_delay_ticks: 5,
            command_names: vec!["powertool".to_string(), "pt".to_string()],
            limits: LimitsConfig::default(),
        }
    }
}

impl PowerToolConfig {
    /// Read configuration from `path`, along with anything that forced a
    /// fallback or a correction.
    ///
    /// Never fails: an unreadable or malformed file yields the defaults.
    /// Callers decide how to report the problems.
    pub fn read_from_path(path: &Path) -> (Self, Vec<String>) {
        let mut problems = Vec::new();
        let mut config = match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                problems.push(format!(
                    "Failed to parse {}: {err}. Using defaults",
                    path.display()
                ));
                Self::default()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                problems.push(format!("Config not found at {}. Using defaults", path.display()));
                Self::default()
            }
            Err(err) => {
                problems.push(format!(
                    "Failed to read {}: {err}. Using defaults",
                    path.display()
                ));
                Self::default()
            }
        };
        problems.extend(config.clamp_out_of_range());
        (config, problems)
    }

    /// Load configuration from `path`, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        let (config, problems) = Self::read_from_path(path);
        for problem in problems {
            warn!("{problem}");
        }
        config
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(contents)?;
        if let Some(problem) = config.clamp_out_of_range() {
            warn!("{problem}");
        }
        Ok(config)
    }

    fn clamp_out_of_range(&mut self) -> Option<String> {
        let requested = self.max_trace_distance;
        if requested.is_nan() || requested < 0.0 {
            self.max_trace_distance = Self::default().max_trace_distance;
        } else if requested > MAX_TRACE_DISTANCE {
            self.max_trace_distance = MAX_TRACE_DISTANCE;
        } else {
            return None;
        }
        Some(format!(
            "max-trace-distance {requested} is out of range. Using {}",
            self.max_trace_distance
        ))
    }

    /// Template tokens.
    pub fn tokens(&self) -> TokenSet {
        TokenSet {
            actor: self.player_token.clone(),
            x: self.x_token.clone(),
            y: self.y_token.clone(),
            z: self.z_token.clone(),
            air_y: self.y_air_token.clone(),
        }
    }

    /// Whether `word` names the power tool command itself.
    pub fn is_own_command(&self, word: &str) -> bool {
        self.command_names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(word))
    }
}
