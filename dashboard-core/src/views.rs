//! Derivations computed by the views from a store snapshot.
//!
//! Nothing here is persisted; every function is a pure read of the forecast
//! series and/or the current snapshot.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};

use crate::{
    condition::{self, RainBand},
    model::{CurrentWeather, ForecastEntry, ForecastSeries, Reading, unix_to_utc},
};

/// Number of leading forecast entries shown as "next hours".
pub const LEAD_WINDOW: usize = 4;

/// Representative sample of one weekday in the forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub at: DateTime<Utc>,
    pub weekday: Weekday,
    pub temp: i64,
    pub description: String,
    pub glyph: &'static str,
    pub high: i64,
    pub low: i64,
    pub wind: f64,
    pub humidity: u8,
    pub pop_pct: u8,
}

/// Buckets forecast entries by weekday in `tz`.
///
/// The first entry seen for a weekday is that day's sample; later entries of
/// the same weekday are dropped, even when they belong to a different date.
/// Buckets come out in order of first appearance.
pub fn daily_summaries<Tz: TimeZone>(series: &ForecastSeries, tz: &Tz) -> Vec<DailySummary> {
    let mut days: Vec<DailySummary> = Vec::new();

    for entry in &series.list {
        let at = entry.observed_at();
        let weekday = at.with_timezone(tz).weekday();
        if days.iter().any(|d| d.weekday == weekday) {
            continue;
        }

        days.push(DailySummary {
            at,
            weekday,
            temp: round_half_up(entry.main.temp),
            description: description(entry),
            glyph: glyph(entry),
            high: round_half_up(entry.main.temp_max),
            low: round_half_up(entry.main.temp_min),
            wind: entry.wind.speed,
            humidity: entry.main.humidity,
            pop_pct: pop_percent(Some(entry.pop)),
        });
    }

    days
}

/// The first [`LEAD_WINDOW`] entries, whatever their timestamps.
pub fn next_hours(series: &ForecastSeries) -> &[ForecastEntry] {
    let end = series.list.len().min(LEAD_WINDOW);
    &series.list[..end]
}

#[derive(Debug, Clone, PartialEq)]
pub struct RainSlot {
    pub at: DateTime<Utc>,
    pub pop: f64,
    pub rain_mm: f64,
    pub band: RainBand,
}

/// Precipitation outlook for the lead window.
pub fn rain_outlook(series: &ForecastSeries) -> Vec<RainSlot> {
    next_hours(series)
        .iter()
        .map(|entry| RainSlot {
            at: entry.observed_at(),
            pop: entry.pop,
            rain_mm: entry.rain_mm(),
            band: RainBand::from_pop(entry.pop),
        })
        .collect()
}

/// What the "tomorrow" view shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DayReading<'a> {
    Forecast(&'a ForecastEntry),
    /// No forecast entry fell on tomorrow's day of month.
    Current(&'a CurrentWeather),
}

impl DayReading<'_> {
    pub fn reading(&self) -> &dyn Reading {
        match self {
            DayReading::Forecast(entry) => *entry,
            DayReading::Current(current) => *current,
        }
    }
}

/// First forecast entry whose day of month equals that of `now + 1 day`,
/// falling back to the current snapshot.
///
/// Only the day of month is compared, not the full date.
pub fn tomorrow<'a, Tz: TimeZone>(
    series: &'a ForecastSeries,
    current: &'a CurrentWeather,
    now: &DateTime<Tz>,
) -> DayReading<'a> {
    let tz = now.timezone();
    let target = (now.clone() + Duration::days(1)).day();

    series
        .list
        .iter()
        .find(|entry| unix_to_utc(entry.dt).with_timezone(&tz).day() == target)
        .map(DayReading::Forecast)
        .unwrap_or(DayReading::Current(current))
}

/// Card data for the today/tomorrow overview.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub at: DateTime<Utc>,
    pub temp: i64,
    pub description: String,
    pub glyph: &'static str,
    pub high: i64,
    pub low: i64,
    pub wind_speed: f64,
    pub wind_deg: u16,
    pub humidity: u8,
    pub pop_pct: u8,
    pub visibility_km: Option<f64>,
    pub clouds_pct: u8,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

pub fn overview<R: Reading + ?Sized>(reading: &R) -> Overview {
    let main = reading.main();
    let sun = reading.sun();

    Overview {
        at: reading.observed_at(),
        temp: round_half_up(main.temp),
        description: description(reading),
        glyph: glyph(reading),
        high: round_half_up(main.temp_max),
        low: round_half_up(main.temp_min),
        wind_speed: reading.wind().speed,
        wind_deg: reading.wind().deg,
        humidity: main.humidity,
        pop_pct: pop_percent(reading.pop()),
        visibility_km: reading.visibility().map(|m| f64::from(m) / 1000.0),
        clouds_pct: reading.clouds().all,
        sunrise: sun.map(|s| unix_to_utc(s.sunrise)),
        sunset: sun.map(|s| unix_to_utc(s.sunset)),
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub(crate) fn description<R: Reading + ?Sized>(reading: &R) -> String {
    reading.condition().map(|c| c.description.clone()).unwrap_or_default()
}

pub(crate) fn glyph<R: Reading + ?Sized>(reading: &R) -> &'static str {
    reading
        .condition()
        .map(|c| condition::glyph(&c.main))
        .unwrap_or(condition::UNKNOWN_GLYPH)
}

fn pop_percent(pop: Option<f64>) -> u8 {
    match pop {
        Some(p) if p > 0.0 => round_half_up(p * 100.0).clamp(0, 100) as u8,
        _ => 0,
    }
}

/// Rounds halves towards positive infinity, so `-2.5` becomes `-2`.
pub(crate) fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
