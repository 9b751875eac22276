//! Parallax background offsets
//!
//! Layers are ordered back to front. Each layer's `factor` is relative to
//! the primary (ground) layer, which scrolls at the difficulty curve's
//! parallax factor. Rendering is the host's job; this only tracks offsets.

use serde::{Deserialize, Serialize};

/// One background strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallaxLayer {
    /// Texture key the host draws
    pub key: String,
    /// Scroll ratio (lower = further back)
    pub factor: f32,
    /// The layer matching obstacle motion
    #[serde(default)]
    pub primary: bool,
    /// Tile width to wrap the offset at (0 = never wrap)
    #[serde(default)]
    pub wrap_width: f32,
}

impl ParallaxLayer {
    pub fn new(key: &str, factor: f32) -> Self {
        Self {
            key: key.to_string(),
            factor,
            primary: false,
            wrap_width: 0.0,
        }
    }

    fn primary(mut self) -> Self {
        self.primary = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxTuning {
    pub layers: Vec<ParallaxLayer>,
}

impl Default for ParallaxTuning {
    /// Cemetery set, sky first
    fn default() -> Self {
        Self {
            layers: vec![
                ParallaxLayer::new("bg_l9", 0.45),
                ParallaxLayer::new("bg_l8", 0.6),
                ParallaxLayer::new("bg_l7", 0.75),
                ParallaxLayer::new("bg_l6", 0.9),
                ParallaxLayer::new("bg_l5", 2.0).primary(),
                ParallaxLayer::new("bg_l4", 0.6),
                ParallaxLayer::new("bg_l2", 0.2),
            ],
        }
    }
}

/// Scroll offsets for every layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallaxField {
    layers: Vec<ParallaxLayer>,
    offsets: Vec<f32>,
    primary_factor: f32,
}

impl ParallaxField {
    pub fn new(tuning: &ParallaxTuning) -> Self {
        // Last layer flagged primary wins; with none, factors are absolute
        let primary_factor = tuning
            .layers
            .iter()
            .rev()
            .find(|l| l.primary)
            .map(|l| l.factor)
            .filter(|f| *f > 0.0)
            .unwrap_or(1.0);

        Self {
            offsets: vec![0.0; tuning.layers.len()],
            layers: tuning.layers.clone(),
            primary_factor,
        }
    }

    pub fn primary_factor(&self) -> f32 {
        self.primary_factor
    }

    /// Current offset of the layer with `key`
    pub fn offset(&self, key: &str) -> Option<f32> {
        self.layers
            .iter()
            .position(|l| l.key == key)
            .map(|i| self.offsets[i])
    }

    /// Layers paired with their offsets, back to front
    pub fn iter(&self) -> impl Iterator<Item = (&ParallaxLayer, f32)> {
        self.layers.iter().zip(self.offsets.iter().copied())
    }

    /// Scroll by this frame's base distance at the current parallax factor
    pub fn scroll(&mut self, base_distance: f32, parallax_factor: f32) {
        let step = base_distance.max(0.0) * parallax_factor.max(0.0);
        for (layer, offset) in self.layers.iter().zip(self.offsets.iter_mut()) {
            *offset += step * layer.factor / self.primary_factor;
            if layer.wrap_width > 0.0 {
                *offset = offset.rem_euclid(layer.wrap_width);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_moves_at_parallax_factor() {
        let mut field = ParallaxField::new(&ParallaxTuning::default());
        field.scroll(100.0, 0.8);
        assert!((field.offset("bg_l5").unwrap() - 80.0).abs() < 0.001);
        // Far layer: 0.45 / 2.0 of the primary
        assert!((field.offset("bg_l9").unwrap() - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_back_layers_scroll_slower() {
        let mut field = ParallaxField::new(&ParallaxTuning::default());
        field.scroll(50.0, 1.0);
        let sky = field.offset("bg_l9").unwrap();
        let ridge = field.offset("bg_l8").unwrap();
        let ground = field.offset("bg_l5").unwrap();
        assert!(sky < ridge && ridge < ground);
    }

    #[test]
    fn test_wrap_width() {
        let mut layer = ParallaxLayer::new("tile", 1.0).primary();
        layer.wrap_width = 64.0;
        let mut field = ParallaxField::new(&ParallaxTuning {
            layers: vec![layer],
        });
        field.scroll(100.0, 1.0);
        assert!((field.offset("tile").unwrap() - 36.0).abs() < 0.001);
    }

    #[test]
    fn test_no_primary_uses_absolute_factors() {
        let mut field = ParallaxField::new(&ParallaxTuning {
            layers: vec![ParallaxLayer::new("a", 0.5)],
        });
        assert_eq!(field.primary_factor(), 1.0);
        field.scroll(10.0, 2.0);
        assert_eq!(field.offset("a"), Some(10.0));
        assert_eq!(field.offset("missing"), None);
    }
}
