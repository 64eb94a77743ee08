//! EnergyPlus weather (EPW) file source.
//!
//! Reads the hourly data block of an EPW file and replays it as a full year.
//! Sub-hourly requests are filled by linear interpolation from the previous
//! hour, so the last timestep of each hour carries the file value exactly.

use crate::error::{WeatherError, WeatherResult};
use crate::psychro::{
    STANDARD_PRESSURE_PA, air_density, humidity_ratio_from_dew_point,
    relative_humidity_from_dew_point,
};
use crate::source::{FullYearRequest, SampleStamp, WeatherSample, WeatherSource};
use std::io::BufRead;
use std::path::Path;

const HEADER_LINES: usize = 8;

// Data field positions (0-based)
const FIELD_YEAR: usize = 0;
const FIELD_DRY_BULB: usize = 6;
const FIELD_DEW_POINT: usize = 7;
const FIELD_RELATIVE_HUMIDITY: usize = 8;
const FIELD_PRESSURE: usize = 9;
const FIELD_GLOBAL_HORIZONTAL: usize = 13;
const FIELD_DIFFUSE_HORIZONTAL: usize = 15;
const FIELD_WIND_SPEED: usize = 21;
const MIN_FIELDS: usize = FIELD_WIND_SPEED + 1;

// Missing-value markers
const MISSING_RELATIVE_HUMIDITY: f64 = 999.0;
const MISSING_PRESSURE: f64 = 999_999.0;
const MISSING_RADIATION: f64 = 9_999.0;
const MISSING_WIND_SPEED: f64 = 999.0;

/// One hourly EPW record, reduced to the fields the ground model needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpwRecord {
    pub year: i32,
    pub sample: WeatherSample,
}

/// Weather source backed by a parsed EPW file.
///
/// Besides full-year replays, the source can be stepped hour by hour through
/// [`EpwWeather::next_hour`]; a replay never disturbs that playback position.
#[derive(Clone, Debug)]
pub struct EpwWeather {
    name: String,
    location: Option<String>,
    records: Vec<EpwRecord>,
    cursor: usize,
}

impl EpwWeather {
    pub fn from_file<P: AsRef<Path>>(path: P) -> WeatherResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| WeatherError::Unavailable {
            what: format!("cannot open weather file {}: {e}", path.display()),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "epw".to_string());
        Self::parse(name, std::io::BufReader::new(file))
    }

    pub fn parse<R: BufRead>(name: impl Into<String>, reader: R) -> WeatherResult<Self> {
        let mut location = None;
        let mut records = Vec::with_capacity(gt_core::DAYS_IN_LEAP_YEAR * gt_core::HOURS_IN_DAY);

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            if i < HEADER_LINES {
                if i == 0 {
                    location = parse_location(&line);
                }
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            records.push(parse_record(&line, line_no)?);
        }

        let expected = [
            gt_core::DAYS_IN_COMMON_YEAR * gt_core::HOURS_IN_DAY,
            gt_core::DAYS_IN_LEAP_YEAR * gt_core::HOURS_IN_DAY,
        ];
        if !expected.contains(&records.len()) {
            return Err(WeatherError::Incomplete {
                expected: "8760 or 8784 hourly records".to_string(),
                found: records.len().to_string(),
            });
        }

        Ok(Self {
            name: name.into(),
            location,
            records,
            cursor: 0,
        })
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn records(&self) -> &[EpwRecord] {
        &self.records
    }

    /// Current hourly playback position (0-based hour of year).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Step hourly playback forward, wrapping at year end.
    pub fn next_hour(&mut self) -> &EpwRecord {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.records.len();
        &self.records[index]
    }
}

/// Restores the hourly playback position when a replay ends, however it ends.
struct PlaybackGuard<'a> {
    weather: &'a mut EpwWeather,
    saved_cursor: usize,
}

impl<'a> PlaybackGuard<'a> {
    fn rewind(weather: &'a mut EpwWeather) -> Self {
        let saved_cursor = weather.cursor;
        weather.cursor = 0;
        Self {
            weather,
            saved_cursor,
        }
    }
}

impl Drop for PlaybackGuard<'_> {
    fn drop(&mut self) {
        self.weather.cursor = self.saved_cursor;
    }
}

impl WeatherSource for EpwWeather {
    fn name(&self) -> &str {
        &self.name
    }

    fn days_in_year(&self) -> usize {
        self.records.len() / gt_core::HOURS_IN_DAY
    }

    fn simulate_full_year(
        &mut self,
        request: &FullYearRequest,
        on_sample: &mut dyn FnMut(SampleStamp, &WeatherSample),
    ) -> WeatherResult<()> {
        if request.timesteps_per_hour == 0 {
            return Err(WeatherError::InvalidArg {
                what: "timesteps_per_hour must be positive",
            });
        }

        let mut guard = PlaybackGuard::rewind(self);
        let hours = guard.weather.records.len();
        let n = request.timesteps_per_hour as f64;
        let mut previous = guard.weather.records[hours - 1].sample;

        for hour_of_year in 0..hours {
            let current = guard.weather.next_hour().sample;
            for timestep in 1..=request.timesteps_per_hour {
                let w = timestep as f64 / n;
                let sample = blend(&previous, &current, w);
                on_sample(
                    SampleStamp {
                        day: hour_of_year / gt_core::HOURS_IN_DAY + 1,
                        hour: hour_of_year % gt_core::HOURS_IN_DAY + 1,
                        timestep,
                    },
                    &sample,
                );
            }
            previous = current;
        }

        Ok(())
    }
}

fn blend(previous: &WeatherSample, current: &WeatherSample, w: f64) -> WeatherSample {
    if w >= 1.0 {
        return *current;
    }
    let lerp = |a: f64, b: f64| a + (b - a) * w;
    WeatherSample {
        dry_bulb_c: lerp(previous.dry_bulb_c, current.dry_bulb_c),
        relative_humidity: lerp(previous.relative_humidity, current.relative_humidity),
        wind_speed_m_per_s: lerp(previous.wind_speed_m_per_s, current.wind_speed_m_per_s),
        horizontal_solar_w_per_m2: lerp(
            previous.horizontal_solar_w_per_m2,
            current.horizontal_solar_w_per_m2,
        ),
        air_density_kg_per_m3: lerp(previous.air_density_kg_per_m3, current.air_density_kg_per_m3),
    }
}

fn parse_location(line: &str) -> Option<String> {
    let mut fields = line.split(',');
    if fields.next()?.trim() != "LOCATION" {
        return None;
    }
    let city = fields.next()?.trim();
    let region = fields.next().map(str::trim).unwrap_or_default();
    if region.is_empty() || region == "-" {
        Some(city.to_string())
    } else {
        Some(format!("{city}, {region}"))
    }
}

fn parse_record(line: &str, line_no: usize) -> WeatherResult<EpwRecord> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < MIN_FIELDS {
        return Err(WeatherError::Parse {
            line: line_no,
            what: format!("expected at least {MIN_FIELDS} fields, found {}", fields.len()),
        });
    }

    let number = |index: usize, what: &str| -> WeatherResult<f64> {
        fields[index].parse::<f64>().map_err(|e| WeatherError::Parse {
            line: line_no,
            what: format!("{what} '{}': {e}", fields[index]),
        })
    };

    let year = fields[FIELD_YEAR]
        .parse::<i32>()
        .map_err(|e| WeatherError::Parse {
            line: line_no,
            what: format!("year '{}': {e}", fields[FIELD_YEAR]),
        })?;
    let dry_bulb_c = number(FIELD_DRY_BULB, "dry bulb")?;
    let dew_point_c = number(FIELD_DEW_POINT, "dew point")?;
    let rh_pct = number(FIELD_RELATIVE_HUMIDITY, "relative humidity")?;
    let pressure = number(FIELD_PRESSURE, "pressure")?;
    let global_horizontal = number(FIELD_GLOBAL_HORIZONTAL, "global horizontal radiation")?;
    let diffuse_horizontal = number(FIELD_DIFFUSE_HORIZONTAL, "diffuse horizontal radiation")?;
    let wind_speed = number(FIELD_WIND_SPEED, "wind speed")?;

    let pressure_pa = if pressure >= MISSING_PRESSURE || pressure <= 0.0 {
        STANDARD_PRESSURE_PA
    } else {
        pressure
    };
    let relative_humidity = if rh_pct >= MISSING_RELATIVE_HUMIDITY {
        relative_humidity_from_dew_point(dry_bulb_c, dew_point_c)
    } else {
        (rh_pct / 100.0).clamp(0.0, 1.0)
    };
    let horizontal_solar = if global_horizontal >= MISSING_RADIATION {
        if diffuse_horizontal >= MISSING_RADIATION {
            0.0
        } else {
            diffuse_horizontal
        }
    } else {
        global_horizontal
    };
    let wind_speed_m_per_s = if wind_speed >= MISSING_WIND_SPEED {
        0.0
    } else {
        wind_speed.max(0.0)
    };

    let w = humidity_ratio_from_dew_point(dew_point_c, pressure_pa);
    Ok(EpwRecord {
        year,
        sample: WeatherSample {
            dry_bulb_c,
            relative_humidity,
            wind_speed_m_per_s,
            horizontal_solar_w_per_m2: horizontal_solar.max(0.0),
            air_density_kg_per_m3: air_density(pressure_pa, dry_bulb_c, w),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WeatherAggregator;
    use std::io::Cursor;

    fn header() -> String {
        [
            "LOCATION,Golden,CO,USA,TMY3,724666,39.74,-105.18,-7.0,1829.0",
            "DESIGN CONDITIONS,0",
            "TYPICAL/EXTREME PERIODS,0",
            "GROUND TEMPERATURES,0",
            "HOLIDAYS/DAYLIGHT SAVINGS,No,0,0,0",
            "COMMENTS 1,test",
            "COMMENTS 2,test",
            "DATA PERIODS,1,1,Data,Sunday, 1/ 1,12/31",
        ]
        .join("\n")
    }

    fn data_line(hour_of_year: usize, dry_bulb: f64) -> String {
        let month = 1;
        let day = hour_of_year / 24 + 1;
        let hour = hour_of_year % 24 + 1;
        format!(
            "1999,{month},{day},{hour},60,?,{dry_bulb:.1},-2.0,60,81000,0,0,300,200,400,50,0,0,0,0,180,3.5,5,5,16.1,77777,9,999999999,0,0.1,0,88,0.00,0.0,1.0"
        )
    }

    fn synthetic_file(hours: usize) -> String {
        let mut text = header();
        for h in 0..hours {
            let day = h / 24;
            text.push('\n');
            text.push_str(&data_line(h, if day == 40 { -10.0 } else { 5.0 }));
        }
        text
    }

    #[test]
    fn parses_location_and_fields() {
        let weather = EpwWeather::parse("test.epw", Cursor::new(synthetic_file(8760))).unwrap();
        assert_eq!(weather.location(), Some("Golden, CO"));
        assert_eq!(weather.days_in_year(), 365);
        let first = weather.records()[0];
        assert_eq!(first.year, 1999);
        assert_eq!(first.sample.dry_bulb_c, 5.0);
        assert!((first.sample.relative_humidity - 0.6).abs() < 1e-12);
        assert_eq!(first.sample.horizontal_solar_w_per_m2, 200.0);
        assert_eq!(first.sample.wind_speed_m_per_s, 3.5);
        // thin air at altitude
        assert!(first.sample.air_density_kg_per_m3 < 1.1);
    }

    #[test]
    fn leap_file_has_366_days() {
        let weather = EpwWeather::parse("leap.epw", Cursor::new(synthetic_file(8784))).unwrap();
        assert_eq!(weather.days_in_year(), 366);
    }

    #[test]
    fn truncated_file_is_incomplete() {
        let err = EpwWeather::parse("short.epw", Cursor::new(synthetic_file(100))).unwrap_err();
        assert!(matches!(err, WeatherError::Incomplete { .. }));
    }

    #[test]
    fn bad_number_reports_line() {
        let mut text = synthetic_file(8760);
        text.push_str("\n1999,1,1,1,60,?,abc");
        let err = EpwWeather::parse("bad.epw", Cursor::new(text)).unwrap_err();
        assert!(matches!(err, WeatherError::Parse { .. }));
    }

    #[test]
    fn replay_restores_playback_cursor() {
        let mut weather = EpwWeather::parse("test.epw", Cursor::new(synthetic_file(8760))).unwrap();
        for _ in 0..37 {
            weather.next_hour();
        }
        let annual = WeatherAggregator::new(FullYearRequest {
            timesteps_per_hour: 4,
        })
        .aggregate(&mut weather)
        .unwrap();
        assert_eq!(weather.cursor(), 37);
        assert_eq!(annual.day_of_min(), 41);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let err = EpwWeather::from_file("/nonexistent/in.epw").unwrap_err();
        assert!(matches!(err, WeatherError::Unavailable { .. }));
    }
}
