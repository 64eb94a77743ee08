//! Vertical discretization of the soil column.

use crate::cell::Cell;
use crate::error::{ModelError, ModelResult};
use crate::soil::SoilProperties;
use gt_core::ensure_positive;

/// Layer layout of the soil column.
///
/// Cells run from the surface downward: a band of thin surface cells, a
/// centre band whose thickness grows geometrically and then shrinks back, and
/// a thin deep band above the bottom boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshConfig {
    /// m
    pub surface_layer_thickness: f64,
    /// m
    pub surface_cell_thickness: f64,
    pub center_cell_count: usize,
    /// Thickness ratio between consecutive centre cells
    pub center_expansion_ratio: f64,
    /// m
    pub deep_layer_thickness: f64,
    /// m
    pub deep_cell_thickness: f64,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            surface_layer_thickness: 2.0,
            surface_cell_thickness: 0.015,
            center_cell_count: 80,
            center_expansion_ratio: 1.10879,
            deep_layer_thickness: 0.2,
            deep_cell_thickness: 0.015,
        }
    }
}

/// Whole cells that fit in a layer; a ratio a hair below an integer counts
/// as that integer.
fn cells_in_layer(layer: f64, cell: f64) -> usize {
    (layer / cell + 1e-9).floor() as usize
}

impl MeshConfig {
    pub fn validate(&self) -> ModelResult<()> {
        ensure_positive(self.surface_layer_thickness, "surface layer thickness")?;
        ensure_positive(self.surface_cell_thickness, "surface cell thickness")?;
        ensure_positive(self.center_expansion_ratio, "center expansion ratio")?;
        ensure_positive(self.deep_layer_thickness, "deep layer thickness")?;
        ensure_positive(self.deep_cell_thickness, "deep cell thickness")?;
        if self.center_cell_count % 2 != 0 {
            return Err(ModelError::InvalidArg {
                what: "center cell count must be even",
            });
        }
        if self.surface_cell_count() == 0 || self.deep_cell_count() == 0 {
            return Err(ModelError::InvalidArg {
                what: "surface and deep layers must each hold at least one cell",
            });
        }
        if self.total_cells() < 3 {
            return Err(ModelError::InvalidArg {
                what: "mesh needs at least three cells",
            });
        }
        Ok(())
    }

    pub fn surface_cell_count(&self) -> usize {
        cells_in_layer(self.surface_layer_thickness, self.surface_cell_thickness)
    }

    pub fn deep_cell_count(&self) -> usize {
        cells_in_layer(self.deep_layer_thickness, self.deep_cell_thickness)
    }

    pub fn total_cells(&self) -> usize {
        self.surface_cell_count() + self.center_cell_count + self.deep_cell_count()
    }

    /// Thickness of the 1-based centre cell `k`.
    ///
    /// The first half grows as `r^k`; the second half mirrors it back down.
    pub fn center_cell_thickness(&self, k: usize) -> f64 {
        let half = self.center_cell_count / 2;
        let exponent = if k <= half { k } else { 2 * half - k.min(2 * half) };
        self.surface_cell_thickness * self.center_expansion_ratio.powf(exponent as f64)
    }

    /// Total depth of the column (m).
    pub fn total_depth(&self) -> f64 {
        self.surface_cell_count() as f64 * self.surface_cell_thickness
            + (1..=self.center_cell_count)
                .map(|k| self.center_cell_thickness(k))
                .sum::<f64>()
            + self.deep_cell_count() as f64 * self.deep_cell_thickness
    }
}

/// Build the cell array, surface first, with every cell carrying the base
/// soil properties.
pub fn build_mesh(config: &MeshConfig, soil: &SoilProperties) -> Vec<Cell> {
    let surface = config.surface_cell_count();
    let center = config.center_cell_count;
    let total = config.total_cells();

    let mut cells = Vec::with_capacity(total);
    let mut depth = 0.0;
    for index in 0..total {
        let thickness = if index < surface {
            config.surface_cell_thickness
        } else if index < surface + center {
            config.center_cell_thickness(index - surface + 1)
        } else {
            config.deep_cell_thickness
        };
        let cell = Cell::new(index, depth, thickness, soil);
        depth = cell.max_z;
        cells.push(cell);
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_counts() {
        let config = MeshConfig::default();
        assert_eq!(config.surface_cell_count(), 133);
        assert_eq!(config.deep_cell_count(), 13);
        assert_eq!(config.total_cells(), 226);
        config.validate().unwrap();
    }

    #[test]
    fn center_band_is_symmetric() {
        let config = MeshConfig::default();
        let r: f64 = 1.10879;
        assert!((config.center_cell_thickness(1) - 0.015 * r).abs() < 1e-15);
        assert!((config.center_cell_thickness(40) - 0.015 * r.powf(40.0)).abs() < 1e-12);
        assert!((config.center_cell_thickness(41) - 0.015 * r.powf(39.0)).abs() < 1e-12);
        assert!((config.center_cell_thickness(80) - 0.015).abs() < 1e-15);
        for k in 1..40 {
            assert_eq!(
                config.center_cell_thickness(k),
                config.center_cell_thickness(80 - k)
            );
        }
    }

    #[test]
    fn cells_tile_the_column() {
        let config = MeshConfig::default();
        let cells = build_mesh(&config, &SoilProperties::default());
        assert_eq!(cells.len(), 226);
        assert_eq!(cells[0].min_z, 0.0);
        for pair in cells.windows(2) {
            assert_eq!(pair[0].max_z, pair[1].min_z);
        }
        let bottom = cells.last().unwrap().max_z;
        assert!((bottom - config.total_depth()).abs() < 1e-9);
        assert!((bottom - 19.992).abs() < 1e-3, "bottom = {bottom}");
    }

    #[test]
    fn coarse_layout_counts_exact_ratios() {
        let config = MeshConfig {
            surface_layer_thickness: 1.0,
            surface_cell_thickness: 0.1,
            center_cell_count: 6,
            center_expansion_ratio: 1.5,
            deep_layer_thickness: 0.2,
            deep_cell_thickness: 0.1,
        };
        assert_eq!(config.surface_cell_count(), 10);
        assert_eq!(config.deep_cell_count(), 2);
        assert_eq!(config.total_cells(), 18);
    }

    #[test]
    fn odd_center_band_is_rejected() {
        let config = MeshConfig {
            center_cell_count: 5,
            ..MeshConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_surface_layer_is_rejected() {
        let config = MeshConfig {
            surface_layer_thickness: 0.01,
            ..MeshConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
