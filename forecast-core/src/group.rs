use std::collections::HashMap;

use crate::model::WeatherForecast;

/// Forecasts for one `"city, country"` tab, ordered by date.
#[derive(Debug, Clone, PartialEq)]
pub struct CityGroup<'a> {
    pub key: String,
    pub forecasts: Vec<&'a WeatherForecast>,
}

/// Partition forecasts by location key.
///
/// Groups appear in first-seen order. Each group is sorted ascending by date
/// with a stable sort, so records sharing a date keep their input order.
pub fn group_by_city(forecasts: &[WeatherForecast]) -> Vec<CityGroup<'_>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<CityGroup<'_>> = Vec::new();

    for forecast in forecasts {
        let key = forecast.location_key();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(CityGroup {
                key,
                forecasts: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].forecasts.push(forecast);
    }

    for group in &mut groups {
        group.forecasts.sort_by_key(|f| f.date);
    }

    groups
}
