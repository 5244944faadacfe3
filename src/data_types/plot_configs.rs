use eyre::{ensure, Result, WrapErr};
use serde::{Deserialize, Serialize};

/// Coordinate space the spatial index stores its points in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexSpace {
    /// Fractions of each axis' full extent. Zooming never invalidates the index.
    #[default]
    Normalized,
    /// Screen pixels under the current zoom. Every zoom change rebuilds the index.
    Pixel,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoronoiConfig {
    /// `None` enables hit-testing only when the chart holds scatter series.
    pub disable_voronoi: Option<bool>,
    /// Maximum pointer distance to a point, in pixels. `None` is unbounded.
    pub max_radius: Option<f64>,
    pub index_space: IndexSpace,
}

impl Default for VoronoiConfig {
    fn default() -> Self {
        Self {
            disable_voronoi: None,
            max_radius: None,
            index_space: IndexSpace::Normalized,
        }
    }
}

impl VoronoiConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).wrap_err("invalid voronoi configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(r) = self.max_radius {
            ensure!(r >= 0.0 && !r.is_nan(), "max_radius must be >= 0, got {r}");
        }
        Ok(())
    }

    /// Effective enablement for a chart with `has_scatter` scatter series.
    pub fn is_enabled(&self, has_scatter: bool) -> bool {
        match self.disable_voronoi {
            Some(disabled) => !disabled,
            None => has_scatter,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastScatterStyle {
    /// Markers per sealed path fragment.
    pub max_points_per_path: usize,
    pub faded_opacity: f32,
    /// Radius multiplier of highlighted markers.
    pub highlighted_scale: f64,
}

impl Default for FastScatterStyle {
    fn default() -> Self {
        Self {
            max_points_per_path: 1000,
            faded_opacity: 0.3,
            highlighted_scale: 1.2,
        }
    }
}

impl FastScatterStyle {
    pub fn from_json(json: &str) -> Result<Self> {
        let style: Self = serde_json::from_str(json).wrap_err("invalid scatter style")?;
        style.validate()?;
        Ok(style)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.max_points_per_path > 0,
            "max_points_per_path must be positive"
        );
        ensure!(
            (0.0..=1.0).contains(&self.faded_opacity),
            "faded_opacity must be within [0, 1], got {}",
            self.faded_opacity
        );
        ensure!(
            self.highlighted_scale > 0.0,
            "highlighted_scale must be positive, got {}",
            self.highlighted_scale
        );
        Ok(())
    }
}
