//! Integration test: every bundled weather source reduces to a full year of
//! daily records through the aggregator.

use gt_weather::{
    ConstantWeather, FullYearRequest, SyntheticWeather, WeatherAggregator, WeatherSample,
    WeatherSource,
};

fn aggregate(source: &mut dyn WeatherSource, timesteps_per_hour: usize) -> gt_weather::AnnualWeather {
    WeatherAggregator::new(FullYearRequest { timesteps_per_hour })
        .aggregate(source)
        .unwrap()
}

#[test]
fn timestep_resolution_does_not_move_constant_means() {
    let sample = WeatherSample {
        dry_bulb_c: 7.5,
        relative_humidity: 0.4,
        wind_speed_m_per_s: 2.0,
        horizontal_solar_w_per_m2: 120.0,
        air_density_kg_per_m3: 1.25,
    };
    let mut source = ConstantWeather::new("steady", sample).unwrap();
    let hourly = aggregate(&mut source, 1);
    let fine = aggregate(&mut source, 6);
    for (a, b) in hourly.days().iter().zip(fine.days()) {
        assert!((a.dry_bulb_c - b.dry_bulb_c).abs() < 1e-12);
        assert!((a.horizontal_solar_w_per_m2 - 120.0).abs() < 1e-9);
    }
}

#[test]
fn synthetic_year_boxed_as_trait_object() {
    let mut source: Box<dyn WeatherSource> = Box::new(SyntheticWeather {
        leap_year: true,
        ..SyntheticWeather::default()
    });
    let annual = aggregate(&mut source, 2);
    assert_eq!(annual.days_in_year(), 366);
    assert!(annual.max_daily_dry_bulb_c() > annual.annual_mean_dry_bulb_c());
    assert!(annual.min_daily_dry_bulb_c() < annual.annual_mean_dry_bulb_c());
    assert!(annual.days().iter().all(|d| d.air_density_kg_per_m3 > 1.0));
}

#[test]
fn zero_timesteps_is_rejected() {
    let mut source = SyntheticWeather::default();
    let result = WeatherAggregator::new(FullYearRequest {
        timesteps_per_hour: 0,
    })
    .aggregate(&mut source);
    assert!(result.is_err());
}
