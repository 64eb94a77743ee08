//! Converged annual temperature profile and its depth/time lookup.

use crate::error::{ModelError, ModelResult};
use gt_core::{SECS_IN_DAY, average_days_in_month, interpolate};

/// Daily cell temperatures over one periodic year.
///
/// Row `d` holds day `d + 1`; column `j` holds cell `j` counted from the
/// surface.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundTemperatureTable {
    mid_depths: Vec<f64>,
    days: usize,
    values: Vec<f64>,
}

impl GroundTemperatureTable {
    /// Zero-filled table for cells with the given mid-depths.
    pub fn new(mid_depths: Vec<f64>, days: usize) -> ModelResult<Self> {
        if days == 0 {
            return Err(ModelError::InvalidArg {
                what: "table needs at least one day",
            });
        }
        if mid_depths.len() < 2 {
            return Err(ModelError::InvalidArg {
                what: "table needs at least two cells",
            });
        }
        let increasing = mid_depths
            .windows(2)
            .all(|pair| pair[0].is_finite() && pair[1] > pair[0]);
        if !increasing || mid_depths[mid_depths.len() - 1].is_infinite() {
            return Err(ModelError::InvalidArg {
                what: "cell mid-depths must be finite and strictly increasing",
            });
        }
        let values = vec![0.0; days * mid_depths.len()];
        Ok(Self {
            mid_depths,
            days,
            values,
        })
    }

    /// Table filled from one row of cell temperatures per day.
    pub fn from_rows(mid_depths: Vec<f64>, rows: &[Vec<f64>]) -> ModelResult<Self> {
        let mut table = Self::new(mid_depths, rows.len())?;
        for (day, row) in rows.iter().enumerate() {
            let slot = table.row_mut(day).ok_or(ModelError::InvalidArg {
                what: "row index out of range",
            })?;
            if row.len() != slot.len() {
                return Err(ModelError::InvalidArg {
                    what: "every row needs one value per cell",
                });
            }
            slot.copy_from_slice(row);
        }
        Ok(table)
    }

    pub fn days_in_year(&self) -> usize {
        self.days
    }

    pub fn cell_count(&self) -> usize {
        self.mid_depths.len()
    }

    pub fn mid_depths(&self) -> &[f64] {
        &self.mid_depths
    }

    pub fn row(&self, day_index: usize) -> Option<&[f64]> {
        let n = self.cell_count();
        self.values.get(day_index * n..(day_index + 1) * n)
    }

    pub(crate) fn row_mut(&mut self, day_index: usize) -> Option<&mut [f64]> {
        let n = self.cell_count();
        self.values.get_mut(day_index * n..(day_index + 1) * n)
    }

    /// Stored temperature for a 0-based day and cell.
    pub fn value(&self, day_index: usize, cell_index: usize) -> Option<f64> {
        self.row(day_index)
            .and_then(|row| row.get(cell_index))
            .copied()
    }

    /// Cell pair bracketing `depth_m` (lower index first).
    ///
    /// Depths above the first mid-depth extrapolate from the top two cells;
    /// depths at or below the deepest mid-depth collapse onto the last cell.
    fn depth_bracket(&self, depth_m: f64) -> (usize, usize) {
        let last = self.cell_count() - 1;
        let at_or_above = self.mid_depths.partition_point(|&z| z <= depth_m);
        match at_or_above {
            0 => (0, 1),
            n if n - 1 >= last => (last, last),
            n => (n - 1, n),
        }
    }

    /// Rows bracketing a time of year and the fraction between them.
    ///
    /// `t` is a day-of-year coordinate where integer `d` is day `d`; times
    /// before day 1 fall between the last and first days.
    fn time_bracket(&self, t: f64) -> (usize, usize, f64) {
        let n = self.days as f64;
        let mut t = t.rem_euclid(n);
        if !(t < n) {
            t = 0.0;
        }
        if t < 1.0 {
            return (self.days - 1, 0, t);
        }
        let floor = t.floor();
        // 1 <= day < days, so row `day` is the following day
        let day = floor as usize;
        (day - 1, day, t - floor)
    }

    fn interpolate_in_time(&self, cell: usize, rows: (usize, usize, f64)) -> f64 {
        let (low, high, frac) = rows;
        let y_low = self.values[low * self.cell_count() + cell];
        let y_high = self.values[high * self.cell_count() + cell];
        interpolate(frac, 1.0, 0.0, y_high, y_low)
    }

    /// Temperature (°C) at a depth and a day-of-year coordinate.
    ///
    /// Negative depths clamp to the surface and times wrap onto the stored
    /// year. Interpolates in time first, then in depth.
    pub fn temperature(&self, depth_m: f64, day_of_year: f64) -> f64 {
        let depth = depth_m.max(0.0);
        let rows = self.time_bracket(day_of_year);
        let (upper, lower) = self.depth_bracket(depth);

        let t_upper = self.interpolate_in_time(upper, rows);
        if upper == lower {
            return t_upper;
        }
        let t_lower = self.interpolate_in_time(lower, rows);
        interpolate(
            depth,
            self.mid_depths[lower],
            self.mid_depths[upper],
            t_lower,
            t_upper,
        )
    }

    pub fn temperature_at_seconds(&self, depth_m: f64, seconds: f64) -> f64 {
        self.temperature(depth_m, seconds / SECS_IN_DAY)
    }

    /// Temperature in the middle of a 1-based month, using whole-day months.
    pub fn temperature_at_month(&self, depth_m: f64, month: u32) -> f64 {
        let month_days = average_days_in_month(self.days) as f64;
        self.temperature(depth_m, month_days * (f64::from(month) - 0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two-cell table where temperature = day + 100·cell.
    fn ramp(days: usize) -> GroundTemperatureTable {
        let rows: Vec<Vec<f64>> = (1..=days)
            .map(|d| vec![d as f64, d as f64 + 100.0])
            .collect();
        GroundTemperatureTable::from_rows(vec![0.5, 1.5], &rows).unwrap()
    }

    #[test]
    fn grid_points_are_exact() {
        let table = ramp(365);
        assert_eq!(table.temperature(0.5, 1.0), 1.0);
        assert_eq!(table.temperature(1.5, 200.0), 300.0);
        assert_eq!(table.temperature(0.5, 365.0), 365.0);
    }

    #[test]
    fn interpolates_time_then_depth() {
        let table = ramp(365);
        let t = table.temperature(1.0, 10.5);
        assert!((t - 60.5).abs() < 1e-12, "t = {t}");
    }

    #[test]
    fn early_days_wrap_to_year_end() {
        let table = ramp(365);
        // halfway between day 365 and day 1
        let t = table.temperature(0.5, 0.5);
        assert!((t - 183.0).abs() < 1e-12);
        assert_eq!(table.temperature(0.5, 0.0), 365.0);
    }

    #[test]
    fn times_wrap_by_year_length() {
        let table = ramp(365);
        assert_eq!(table.temperature(0.5, 365.0 + 40.0), 40.0);
        assert_eq!(table.temperature(0.5, -325.0), 40.0);
    }

    #[test]
    fn depth_is_clamped_and_flat_below() {
        let table = ramp(365);
        assert_eq!(table.temperature(-3.0, 5.0), table.temperature(0.0, 5.0));
        assert_eq!(table.temperature(50.0, 5.0), 105.0);
        // above the first mid-depth the top pair extrapolates
        assert!((table.temperature(0.0, 5.0) - (5.0 - 50.0)).abs() < 1e-12);
    }

    #[test]
    fn seconds_and_months_map_to_days() {
        let table = ramp(365);
        assert_eq!(table.temperature_at_seconds(0.5, 40.0 * 86_400.0), 40.0);
        // 30-day months: January centres on day 15
        assert_eq!(table.temperature_at_month(0.5, 1), 15.0);
        assert_eq!(table.temperature_at_month(0.5, 12), 345.0);
    }

    #[test]
    fn rejects_unsorted_depths() {
        assert!(GroundTemperatureTable::new(vec![1.0, 0.5], 10).is_err());
        assert!(GroundTemperatureTable::new(vec![1.0], 10).is_err());
        assert!(GroundTemperatureTable::new(vec![0.5, 1.0], 0).is_err());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(GroundTemperatureTable::from_rows(vec![0.5, 1.0], &rows).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn table() -> GroundTemperatureTable {
        let depths = vec![0.1, 0.3, 0.7, 1.5, 3.0];
        let rows: Vec<Vec<f64>> = (0..365)
            .map(|d| {
                depths
                    .iter()
                    .map(|z| 10.0 + 8.0 * (d as f64 / 58.0 - z).sin())
                    .collect()
            })
            .collect();
        GroundTemperatureTable::from_rows(depths, &rows).unwrap()
    }

    proptest! {
        #[test]
        fn periodic_in_time(depth in 0.0_f64..4.0, t in 0.0_f64..365.0) {
            let table = table();
            let a = table.temperature(depth, t);
            let b = table.temperature(depth, t + 365.0);
            prop_assert!((a - b).abs() < 1e-6, "{a} vs {b}");
        }

        #[test]
        fn flat_below_deepest_cell(eps in 0.0_f64..10.0, t in 0.0_f64..365.0) {
            let table = table();
            prop_assert_eq!(table.temperature(3.0 + eps, t), table.temperature(3.0, t));
        }

        #[test]
        fn exact_at_grid_points(j in 0usize..5, d in 1usize..=365) {
            let table = table();
            let depth = table.mid_depths()[j];
            prop_assert_eq!(table.temperature(depth, d as f64), table.value(d - 1, j).unwrap());
        }
    }
}
