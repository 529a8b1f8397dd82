use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::{
    filter::chain::FilterParameters,
    foundation::core::{Canvas, Rgb8},
    foundation::error::{PosterError, PosterResult},
    pattern::tiles::TileGridParameters,
};

/// Every tunable of a poster session, as read from a JSON document.
///
/// Missing fields fall back to [`PosterConfig::default`], so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PosterConfig {
    pub canvas: Canvas,
    /// Paper color behind the image.
    pub background: Rgb8,
    pub filter: FilterParameters,
    pub tiles: TileGridParameters,
    /// Fixed random seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            background: Rgb8::new(0xf6, 0xf2, 0xdf),
            filter: FilterParameters::default(),
            tiles: TileGridParameters::default(),
            seed: None,
        }
    }
}

impl PosterConfig {
    pub fn validate(&self) -> PosterResult<()> {
        self.canvas.validate()?;
        self.filter.validate()?;
        self.tiles.validate()
    }

    pub fn from_json_str(s: &str) -> PosterResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| PosterError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> PosterResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| PosterError::serde(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_pretty(&self) -> PosterResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PosterError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
