use super::*;

/// Runtime configuration, seeded with literal defaults and overridable by
/// `OCTARAY_*` environment variables.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_depth: u32,
    pub max_spheres_per_node: u32,
    pub num_samples: u32,
    pub max_ray_depth: u32,
    pub scr_width: u32,
    pub scr_height: u32,
    pub debug: bool,
    pub use_octree: bool,
    pub collect_stats: bool,
    pub output_file: String,
    pub scene_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_spheres_per_node: 0,
            num_samples: 16,
            max_ray_depth: 8,
            scr_width: 800,
            scr_height: 600,
            debug: false,
            use_octree: true,
            collect_stats: false,
            output_file: "stats.csv".into(),
            scene_path: PathBuf::from("scenes/default.ron"),
        }
    }
}

impl Config {
    /// Builds the default configuration, then overlays any `OCTARAY_*`
    /// environment variables present in the process environment.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        config.overlay_bool("OCTARAY_DEBUG", |c, v| c.debug = v)?;
        config.overlay_bool("OCTARAY_USE_OCTREE", |c, v| c.use_octree = v)?;
        config.overlay_bool("OCTARAY_COLLECT_STATS", |c, v| c.collect_stats = v)?;
        config.overlay_u32("OCTARAY_MAX_DEPTH", |c, v| c.max_depth = v)?;
        config.overlay_u32("OCTARAY_MAX_SPHERES_PER_NODE", |c, v| {
            c.max_spheres_per_node = v;
        })?;
        config.overlay_u32("OCTARAY_NUM_SAMPLES", |c, v| c.num_samples = v)?;
        config.overlay_u32("OCTARAY_MAX_RAY_DEPTH", |c, v| c.max_ray_depth = v)?;
        config.overlay_u32("OCTARAY_SCR_WIDTH", |c, v| c.scr_width = v)?;
        config.overlay_u32("OCTARAY_SCR_HEIGHT", |c, v| c.scr_height = v)?;

        if let Ok(value) = std::env::var("OCTARAY_OUTPUT_FILE") {
            config.output_file = value;
        }
        if let Ok(value) = std::env::var("OCTARAY_SCENE_PATH") {
            config.scene_path = PathBuf::from(value);
        }

        // The debug build uses a dedicated small scene unless the caller
        // already pointed at a scene of their own choosing.
        if config.debug && std::env::var("OCTARAY_SCENE_PATH").is_err() {
            config.scene_path = PathBuf::from("scenes/debug.ron");
        }

        Ok(config)
    }

    fn overlay_bool(
        &mut self,
        var: &str,
        apply: impl FnOnce(&mut Self, bool),
    ) -> Result<()> {
        if let Ok(value) = std::env::var(var) {
            let parsed = match value.as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => bail!("{var}: expected a boolean, got {other:?}"),
            };
            apply(self, parsed);
        }
        Ok(())
    }

    fn overlay_u32(&mut self, var: &str, apply: impl FnOnce(&mut Self, u32)) -> Result<()> {
        if let Ok(value) = std::env::var(var) {
            let parsed = value
                .parse::<u32>()
                .with_context(|| format!("{var}: expected an integer, got {value:?}"))?;
            apply(self, parsed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = Config::default();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.max_spheres_per_node, 0);
        assert_eq!(config.num_samples, 16);
        assert_eq!(config.max_ray_depth, 8);
        assert_eq!(config.scr_width, 800);
        assert_eq!(config.scr_height, 600);
        assert!(!config.debug);
        assert!(config.use_octree);
        assert!(!config.collect_stats);
        assert_eq!(config.output_file, "stats.csv");
    }
}
