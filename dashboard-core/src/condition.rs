//! Condition glyphs shared by every dashboard view.

pub const UNKNOWN_GLYPH: &str = "❓";

/// Glyph for a provider condition group (`weather[0].main`).
pub fn glyph(condition_main: &str) -> &'static str {
    match condition_main {
        "Clear" => "☀️",
        "Clouds" => "☁️",
        "Rain" => "🌧️",
        "Snow" => "🌨️",
        "Thunderstorm" => "⛈️",
        "Drizzle" => "🌦️",
        "Mist" | "Smoke" | "Haze" | "Dust" | "Fog" | "Sand" | "Ash" => "🌫️",
        "Squall" | "Tornado" => "🌪️",
        _ => UNKNOWN_GLYPH,
    }
}

/// Likelihood band of a precipitation probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainBand {
    None,
    Low,
    Medium,
    High,
}

impl RainBand {
    pub fn from_pop(pop: f64) -> Self {
        if pop <= 0.0 || pop.is_nan() {
            RainBand::None
        } else if pop <= 0.3 {
            RainBand::Low
        } else if pop <= 0.6 {
            RainBand::Medium
        } else {
            RainBand::High
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            RainBand::None => "☀️",
            RainBand::Low => "🌤️",
            RainBand::Medium => "🌦️",
            RainBand::High => "🌧️",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RainBand::None => "No rain",
            RainBand::Low => "Low chance",
            RainBand::Medium => "Medium chance",
            RainBand::High => "High chance",
        }
    }
}

/// 16-point compass name for a wind direction in degrees.
pub fn compass_point(deg: u16) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let idx = ((f64::from(deg % 360) / 22.5) + 0.5) as usize % 16;
    POINTS[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obscuring_conditions_share_a_glyph() {
        for main in ["Mist", "Smoke", "Haze", "Dust", "Fog", "Sand", "Ash"] {
            assert_eq!(glyph(main), "🌫️", "{main}");
        }
    }

    #[test]
    fn unknown_condition_gets_question_mark() {
        assert_eq!(glyph("Volcano"), UNKNOWN_GLYPH);
        assert_eq!(glyph(""), UNKNOWN_GLYPH);
    }

    #[test]
    fn rain_band_boundaries() {
        assert_eq!(RainBand::from_pop(0.0), RainBand::None);
        assert_eq!(RainBand::from_pop(0.01), RainBand::Low);
        assert_eq!(RainBand::from_pop(0.3), RainBand::Low);
        assert_eq!(RainBand::from_pop(0.31), RainBand::Medium);
        assert_eq!(RainBand::from_pop(0.6), RainBand::Medium);
        assert_eq!(RainBand::from_pop(0.61), RainBand::High);
        assert_eq!(RainBand::from_pop(1.0), RainBand::High);
    }

    #[test]
    fn compass_points() {
        assert_eq!(compass_point(0), "N");
        assert_eq!(compass_point(359), "N");
        assert_eq!(compass_point(90), "E");
        assert_eq!(compass_point(140), "SE");
        assert_eq!(compass_point(250), "WSW");
    }
}
