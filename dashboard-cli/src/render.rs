//! Terminal rendering of the dashboard panels. Every function turns already
//! derived data into text; nothing here touches the network or the store.

use chrono::{DateTime, Local, Utc};
use dashboard_core::{
    CitySearchResult, WeatherState,
    cities::CitySummary,
    condition::compass_point,
    views::{DailySummary, Overview, RainSlot, weekday_name},
};

fn clock(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

fn long_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%A, %-d %B").to_string()
}

pub fn header(state: &WeatherState) -> String {
    let place = state
        .selected_location
        .as_ref()
        .map(|loc| loc.label())
        .unwrap_or_else(|| "Choose a city".to_string());
    format!("📍 {place}")
}

pub fn overview(title: &str, card: &Overview) -> String {
    let mut lines = vec![
        format!("{title}  ({})", long_date(card.at)),
        format!("  {} {}°C  {}", card.glyph, card.temp, card.description),
        format!("  High       {}°C", card.high),
        format!("  Low        {}°C", card.low),
        format!("  Wind       {} m/s", card.wind_speed),
        format!("  Direction  {}° {}", card.wind_deg, compass_point(card.wind_deg)),
        format!("  Humidity   {}%", card.humidity),
        format!("  Rain       {}%", card.pop_pct),
    ];

    if let Some(km) = card.visibility_km {
        lines.push(format!("  Visibility {km} km"));
    }
    lines.push(format!("  Clouds     {}%", card.clouds_pct));
    if let (Some(rise), Some(set)) = (card.sunrise, card.sunset) {
        lines.push(format!("  Sunrise    {}", clock(rise)));
        lines.push(format!("  Sunset     {}", clock(set)));
    }

    lines.join("\n")
}

pub fn weekly(days: &[DailySummary]) -> String {
    if days.is_empty() {
        return "No forecast available".to_string();
    }

    let mut lines = vec!["Weekly forecast".to_string()];
    for day in days {
        lines.push(format!(
            "  {:<10} {} {:>3}°C  {:>3}°/{:<3}°  wind {} m/s  humidity {}%  rain {}%  {}",
            weekday_name(day.weekday),
            day.glyph,
            day.temp,
            day.high,
            day.low,
            day.wind,
            day.humidity,
            day.pop_pct,
            day.description,
        ));
    }
    lines.join("\n")
}

pub fn rain(slots: &[RainSlot]) -> String {
    let mut lines = vec!["Chance of rain".to_string()];
    for slot in slots {
        let filled = (slot.pop.clamp(0.0, 1.0) * 10.0).round() as usize;
        lines.push(format!(
            "  {} {}  [{:<10}]  {}",
            slot.band.glyph(),
            clock(slot.at),
            "#".repeat(filled),
            slot.band.label(),
        ));
    }
    lines.join("\n")
}

pub fn cities(summaries: &[CitySummary]) -> String {
    let mut lines = vec!["Other cities".to_string()];
    for city in summaries {
        match &city.reading {
            Some(r) => lines.push(format!(
                "  {:<18} {} {:>3}°C  {}",
                city.location.name, r.glyph, r.temp, r.description
            )),
            None => lines.push(format!("  {:<18} unavailable", city.location.name)),
        }
    }
    lines.join("\n")
}

pub fn search_results(query: &str, results: &[CitySearchResult]) -> String {
    if results.is_empty() {
        return format!("No results for \"{query}\"");
    }

    results
        .iter()
        .map(|city| format!("  {}  ({:.2}, {:.2})", city.full_name, city.lat, city.lon))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn error(message: &str) -> String {
    format!("⚠️  {message}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use dashboard_core::{Location, cities::CityReading, condition::RainBand};

    #[test]
    fn header_falls_back_to_prompt() {
        let mut state = WeatherState::default();
        assert_eq!(header(&state), "📍 Choose a city");

        state.selected_location = Some(Location::new("Cairo", "EG", 30.0, 31.2));
        assert_eq!(header(&state), "📍 Cairo, EG");
    }

    #[test]
    fn overview_omits_sun_times_for_forecast_cards() {
        let card = Overview {
            at: Utc::now(),
            temp: 21,
            description: "scattered clouds".into(),
            glyph: "☁️",
            high: 23,
            low: 19,
            wind_speed: 3.4,
            wind_deg: 90,
            humidity: 55,
            pop_pct: 20,
            visibility_km: Some(10.0),
            clouds_pct: 40,
            sunrise: None,
            sunset: None,
        };

        let text = overview("Tomorrow", &card);

        assert!(text.starts_with("Tomorrow"));
        assert!(text.contains("21°C  scattered clouds"));
        assert!(text.contains("90° E"));
        assert!(!text.contains("Sunrise"));
    }

    #[test]
    fn weekly_lists_one_line_per_day() {
        let day = DailySummary {
            at: Utc::now(),
            weekday: Weekday::Fri,
            temp: 30,
            description: "clear sky".into(),
            glyph: "☀️",
            high: 32,
            low: 27,
            wind: 5.1,
            humidity: 20,
            pop_pct: 0,
        };

        let text = weekly(&[day.clone(), DailySummary { weekday: Weekday::Sat, ..day }]);

        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("Friday"));
        assert!(text.contains("Saturday"));
        assert_eq!(weekly(&[]), "No forecast available");
    }

    #[test]
    fn rain_bar_scales_with_probability() {
        let slot = RainSlot {
            at: Utc::now(),
            pop: 0.7,
            rain_mm: 1.2,
            band: RainBand::High,
        };

        let text = rain(&[slot]);

        assert!(text.contains("[#######   ]"));
        assert!(text.contains("High chance"));
    }

    #[test]
    fn cities_mark_missing_readings() {
        let summaries = vec![
            CitySummary {
                location: Location::new("Luxor", "EG", 25.7, 32.6),
                reading: Some(CityReading {
                    temp: 33,
                    description: "clear sky".into(),
                    glyph: "☀️",
                }),
            },
            CitySummary {
                location: Location::new("Aswan", "EG", 24.1, 32.9),
                reading: None,
            },
        ];

        let text = cities(&summaries);

        assert!(text.contains("33°C"));
        assert!(text.contains("Aswan") && text.contains("unavailable"));
    }

    #[test]
    fn empty_search_says_so() {
        assert_eq!(search_results("zz", &[]), "No results for \"zz\"");
    }
}
