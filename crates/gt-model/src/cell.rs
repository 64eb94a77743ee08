//! One control volume of the 1-D soil column.

use crate::soil::SoilProperties;
use gt_core::CellId;

/// Thermal properties carried by a cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellProperties {
    /// W/m·K
    pub conductivity: f64,
    /// kg/m³
    pub density: f64,
    /// J/kg·K, rewritten at the start of every day from the active ρ·cp
    pub specific_heat: f64,
    /// m²/s
    pub diffusivity: f64,
}

impl From<&SoilProperties> for CellProperties {
    fn from(soil: &SoilProperties) -> Self {
        Self {
            conductivity: soil.conductivity,
            density: soil.density,
            specific_heat: soil.specific_heat,
            diffusivity: soil.diffusivity(),
        }
    }
}

/// Temperature slots of a cell (°C).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellTemperatures {
    /// Current iterate
    pub current: f64,
    /// Value before the latest sweep
    pub prev_iteration: f64,
    /// Committed value at the end of the previous day
    pub prev_timestep: f64,
    /// Value on the last day of the previous annual pass
    pub prev_year: f64,
}

impl CellTemperatures {
    pub fn uniform(t: f64) -> Self {
        Self {
            current: t,
            prev_iteration: t,
            prev_timestep: t,
            prev_year: t,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub id: CellId,
    /// m
    pub thickness: f64,
    /// Depth of the upper face (m)
    pub min_z: f64,
    /// Depth of the lower face (m)
    pub max_z: f64,
    /// Face area for conduction (m²)
    pub conduction_area: f64,
    /// m³
    pub volume: f64,
    pub props: CellProperties,
    pub temps: CellTemperatures,
    /// Timestep over heat capacity, Δt/(ρ·cp·V) in K/J
    pub beta: f64,
}

impl Cell {
    pub fn new(index: usize, min_z: f64, thickness: f64, soil: &SoilProperties) -> Self {
        let conduction_area = 1.0;
        Self {
            id: CellId::from_index(index),
            thickness,
            min_z,
            max_z: min_z + thickness,
            conduction_area,
            volume: thickness * conduction_area,
            props: CellProperties::from(soil),
            temps: CellTemperatures::default(),
            beta: 0.0,
        }
    }

    /// Depth of the cell centre (m).
    pub fn mid_depth(&self) -> f64 {
        (self.min_z + self.max_z) / 2.0
    }

    /// Conduction resistance from the centre to either face (K/W).
    pub fn half_resistance(&self) -> f64 {
        (self.thickness / 2.0) / (self.props.conductivity * self.conduction_area)
    }

    /// Centre-to-centre resistance to a neighbouring cell (K/W).
    pub fn resistance_to(&self, other: &Cell) -> f64 {
        self.half_resistance() + other.half_resistance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_follows_thickness() {
        let cell = Cell::new(2, 0.3, 0.1, &SoilProperties::default());
        assert_eq!(cell.id.number(), 3);
        assert!((cell.max_z - 0.4).abs() < 1e-12);
        assert!((cell.mid_depth() - 0.35).abs() < 1e-12);
        assert!((cell.volume - 0.1).abs() < 1e-12);
    }

    #[test]
    fn resistance_is_symmetric() {
        let soil = SoilProperties {
            conductivity: 2.0,
            ..SoilProperties::default()
        };
        let a = Cell::new(0, 0.0, 0.1, &soil);
        let b = Cell::new(1, 0.1, 0.3, &soil);
        // 0.05/2 + 0.15/2
        assert!((a.resistance_to(&b) - 0.1).abs() < 1e-12);
        assert_eq!(a.resistance_to(&b), b.resistance_to(&a));
    }
}
