//! Seven-day trip-planning outlook from a fixture table.

use serde::Serialize;
use strum::{Display, EnumString};
use time::{Date, Duration};

/// Sky condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Condition {
    /// Clear skies.
    Sunny,
    /// Broken cloud.
    PartlyCloudy,
    /// Rain likely.
    Rain,
    /// Burning-season haze.
    Haze,
}

/// One day of the outlook.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastDay {
    /// Calendar date.
    pub date: Date,
    /// Sky condition.
    pub condition: Condition,
    /// Daily high in Celsius.
    pub high_c: i32,
    /// Daily low in Celsius.
    pub low_c: i32,
    /// Air quality index (US AQI).
    pub aqi: u16,
    /// Trip-planning advice derived from condition and AQI.
    pub advice: String,
}

/// Repeating weekly pattern: (condition, high, low, aqi).
const WEEK_PATTERN: [(Condition, i32, i32, u16); 7] = [
    (Condition::Sunny, 33, 21, 42),
    (Condition::Sunny, 34, 22, 55),
    (Condition::PartlyCloudy, 32, 22, 61),
    (Condition::Rain, 29, 21, 38),
    (Condition::Rain, 28, 20, 35),
    (Condition::PartlyCloudy, 31, 21, 72),
    (Condition::Haze, 33, 22, 134),
];

fn advice_for(condition: Condition, aqi: u16) -> String {
    match condition {
        Condition::Rain => "Carry a poncho; songthaews stay dry and beat cycling today.".to_string(),
        _ if aqi > 100 => {
            "Air quality is unhealthy; prefer indoor stories over outdoor routes.".to_string()
        }
        _ if aqi > 50 => {
            "Air quality is moderate; shorter walking routes are a good pick.".to_string()
        }
        _ => "Great day to walk or cycle the old city.".to_string(),
    }
}

/// Seven-day outlook starting at `start`.
pub fn seven_day(start: Date) -> Vec<ForecastDay> {
    WEEK_PATTERN
        .iter()
        .enumerate()
        .map(|(i, &(condition, high_c, low_c, aqi))| ForecastDay {
            date: start + Duration::days(i as i64),
            condition,
            high_c,
            low_c,
            aqi,
            advice: advice_for(condition, aqi),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn outlook_covers_seven_consecutive_days() {
        let days = seven_day(date!(2026 - 08 - 06));

        assert_eq!(days.len(), 7);
        for (i, day) in days.iter().enumerate() {
            assert_eq!(day.date, date!(2026 - 08 - 06) + Duration::days(i as i64));
        }
    }

    #[test]
    fn rain_advice_overrides_aqi_bands() {
        let advice = advice_for(Condition::Rain, 150);
        assert!(advice.contains("poncho"));
    }

    #[test]
    fn hazy_days_warn_about_air_quality() {
        let days = seven_day(date!(2026 - 03 - 01));
        let hazy = days.iter().find(|d| d.condition == Condition::Haze).unwrap();

        assert!(hazy.aqi > 100);
        assert!(hazy.advice.contains("unhealthy"));
    }

    #[test]
    fn clear_low_aqi_days_encourage_walking() {
        let days = seven_day(date!(2026 - 08 - 06));
        assert!(days[0].advice.contains("walk or cycle"));
    }
}
