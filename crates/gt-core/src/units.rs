// gt-core/src/units.rs

use uom::si::f64::{
    Length as UomLength, MassDensity as UomMassDensity, Ratio as UomRatio,
    SpecificHeatCapacity as UomSpecificHeatCapacity,
    ThermalConductivity as UomThermalConductivity,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type Length = UomLength;
pub type Ratio = UomRatio;
pub type SpecificHeat = UomSpecificHeatCapacity;
pub type Temperature = UomThermodynamicTemperature;
pub type ThermalConductivity = UomThermalConductivity;
pub type Time = UomTime;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn days(v: f64) -> Time {
    use uom::si::time::day;
    Time::new::<day>(v)
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn w_per_m_k(v: f64) -> ThermalConductivity {
    use uom::si::thermal_conductivity::watt_per_meter_kelvin;
    ThermalConductivity::new::<watt_per_meter_kelvin>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn j_per_kg_k(v: f64) -> SpecificHeat {
    use uom::si::specific_heat_capacity::joule_per_kilogram_kelvin;
    SpecificHeat::new::<joule_per_kilogram_kelvin>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

#[inline]
pub fn percent(v: f64) -> Ratio {
    use uom::si::ratio::percent;
    Ratio::new::<percent>(v)
}

/// Celsius value of a thermodynamic temperature.
#[inline]
pub fn to_degc(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::degree_celsius;
    t.get::<degree_celsius>()
}

pub mod constants {
    /// Offset between the Celsius and Kelvin scales.
    pub const KELVIN_OFFSET: f64 = 273.15;
}
