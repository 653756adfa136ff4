//! Maps weather data onto presentation directives.
//!
//! Every lookup goes through a fixed table and falls back to the `Clear`
//! entry when a condition has no row. The tables are uneven:
//! mist and partly-cloudy have their own glyphs but reuse Clear's animation
//! class and background.

use serde::Serialize;

use crate::model::{CurrentWeather, ForecastList, ViewModel, WeatherCondition};

const ICONS: &[(WeatherCondition, &str)] = &[
    (WeatherCondition::Clear, "sun"),
    (WeatherCondition::Clouds, "cloud"),
    (WeatherCondition::Rain, "cloud-rain"),
    (WeatherCondition::Thunderstorm, "bolt"),
    (WeatherCondition::Snow, "snowflake"),
    (WeatherCondition::Mist, "smog"),
    (WeatherCondition::PartlyCloudy, "cloud-sun"),
];

/// Animation classes. The widget stylesheet only ever defined the first four;
/// `stormy` for thunderstorms is a deliberate addition so every core
/// condition has its own class.
const ANIMATIONS: &[(WeatherCondition, &str)] = &[
    (WeatherCondition::Clear, "sunny"),
    (WeatherCondition::Rain, "rainy"),
    (WeatherCondition::Clouds, "cloudy"),
    (WeatherCondition::Snow, "snowy"),
    (WeatherCondition::Thunderstorm, "stormy"),
];

const BACKGROUNDS: &[(WeatherCondition, &str)] = &[
    (WeatherCondition::Clear, "clear"),
    (WeatherCondition::Clouds, "clouds"),
    (WeatherCondition::Rain, "rain"),
    (WeatherCondition::Snow, "snow"),
    (WeatherCondition::Thunderstorm, "thunderstorm"),
];

const GRADIENTS: &[(&str, &str)] = &[
    ("clear", "linear-gradient(135deg, #667eea 0%, #764ba2 100%)"),
    ("clouds", "linear-gradient(135deg, #757F9A 0%, #D7DDE8 100%)"),
    ("rain", "linear-gradient(135deg, #4B79A1 0%, #283E51 100%)"),
    ("snow", "linear-gradient(135deg, #E6DEDD 0%, #D79922 100%)"),
    ("thunderstorm", "linear-gradient(135deg, #2C3E50 0%, #4A6741 100%)"),
];

type Table = &'static [(WeatherCondition, &'static str)];

fn lookup(table: Table, condition: WeatherCondition) -> &'static str {
    let row = |wanted: WeatherCondition| {
        table.iter().find(|(c, _)| *c == wanted).map(|(_, v)| *v)
    };
    row(condition)
        .or_else(|| row(WeatherCondition::Clear))
        .unwrap_or_default()
}

pub fn icon_for(condition: WeatherCondition) -> &'static str {
    lookup(ICONS, condition)
}

pub fn animation_class_for(condition: WeatherCondition) -> &'static str {
    lookup(ANIMATIONS, condition)
}

pub fn background_for(condition: WeatherCondition) -> &'static str {
    lookup(BACKGROUNDS, condition)
}

/// CSS gradient for a background id; unknown ids get the clear-sky gradient.
pub fn background_css(gradient_id: &str) -> &'static str {
    GRADIENTS
        .iter()
        .find(|(id, _)| *id == gradient_id)
        .or_else(|| GRADIENTS.first())
        .map(|(_, css)| *css)
        .unwrap_or_default()
}

/// One cell of the forecast strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastTile {
    pub day: String,
    pub icon_glyph_id: &'static str,
    pub temperature_c: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherPresenter;

impl WeatherPresenter {
    pub fn present(&self, weather: &CurrentWeather) -> ViewModel {
        ViewModel {
            icon_glyph_id: icon_for(weather.condition),
            animation_class: animation_class_for(weather.condition),
            background_gradient_id: background_for(weather.condition),
        }
    }

    pub fn present_forecast_icon(&self, condition: WeatherCondition) -> &'static str {
        icon_for(condition)
    }

    /// Icon for a raw condition code as it arrives from a data source.
    pub fn present_forecast_icon_code(&self, code: &str) -> &'static str {
        icon_for(WeatherCondition::from_code_or_default(code))
    }

    pub fn present_forecast(&self, forecast: &ForecastList) -> Vec<ForecastTile> {
        forecast
            .iter()
            .map(|entry| ForecastTile {
                day: entry.day.clone(),
                icon_glyph_id: icon_for(entry.condition),
                temperature_c: entry.temperature_c,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn has_row(table: Table, condition: WeatherCondition) -> bool {
        table.iter().any(|(c, _)| *c == condition)
    }

    fn weather(condition: WeatherCondition) -> CurrentWeather {
        CurrentWeather {
            city: "Paris".into(),
            country: "FR".into(),
            temperature_c: 18,
            description: "whatever".into(),
            condition,
            visibility: "10 km".into(),
            humidity_pct: 50,
            wind_speed_kmh: 10,
            feels_like_c: 17,
        }
    }

    #[test]
    fn rain_maps_to_rain_directives() {
        let vm = WeatherPresenter.present(&weather(WeatherCondition::Rain));
        assert_eq!(vm.icon_glyph_id, "cloud-rain");
        assert_eq!(vm.animation_class, "rainy");
        assert_eq!(vm.background_gradient_id, "rain");
    }

    #[test]
    fn thunderstorm_gets_stormy_animation() {
        let vm = WeatherPresenter.present(&weather(WeatherCondition::Thunderstorm));
        assert_eq!(vm.icon_glyph_id, "bolt");
        assert_eq!(vm.animation_class, "stormy");
        assert_eq!(vm.background_gradient_id, "thunderstorm");
    }

    #[test]
    fn every_condition_has_its_own_icon() {
        let mut icons: Vec<_> = WeatherCondition::all().iter().map(|c| icon_for(*c)).collect();
        icons.sort_unstable();
        icons.dedup();
        assert_eq!(icons.len(), WeatherCondition::all().len());
    }

    #[test]
    fn mist_and_partly_cloudy_keep_glyph_but_borrow_clear_theme() {
        for c in [WeatherCondition::Mist, WeatherCondition::PartlyCloudy] {
            let vm = WeatherPresenter.present(&weather(c));
            assert_ne!(vm.icon_glyph_id, "sun");
            assert_eq!(vm.animation_class, "sunny");
            assert_eq!(vm.background_gradient_id, "clear");
        }
        assert_eq!(icon_for(WeatherCondition::Mist), "smog");
        assert_eq!(icon_for(WeatherCondition::PartlyCloudy), "cloud-sun");
    }

    #[test]
    fn core_conditions_have_explicit_theme_rows() {
        for c in [
            WeatherCondition::Clear,
            WeatherCondition::Clouds,
            WeatherCondition::Rain,
            WeatherCondition::Snow,
            WeatherCondition::Thunderstorm,
        ] {
            assert!(has_row(ANIMATIONS, c), "{c} missing animation");
            assert!(has_row(BACKGROUNDS, c), "{c} missing background");
            assert_eq!(background_for(c), c.as_str());
        }
    }

    #[test]
    fn unknown_codes_get_the_clear_glyph() {
        for code in ["hail", "", "RAINBOW", "partly cloudy"] {
            assert_eq!(WeatherPresenter.present_forecast_icon_code(code), "sun");
        }
        assert_eq!(WeatherPresenter.present_forecast_icon_code("snow"), "snowflake");
    }

    #[test]
    fn present_is_deterministic() {
        for c in WeatherCondition::all() {
            let w = weather(*c);
            assert_eq!(WeatherPresenter.present(&w), WeatherPresenter.present(&w));
        }
    }

    #[test]
    fn every_background_has_a_gradient() {
        for c in WeatherCondition::all() {
            let id = background_for(*c);
            assert!(GRADIENTS.iter().any(|(g, _)| *g == id));
        }
        assert_eq!(background_css("nope"), background_css("clear"));
        assert!(background_css("rain").contains("#4B79A1"));
    }

    #[test]
    fn forecast_tiles_keep_order() {
        let list = ForecastList::from_days(
            NaiveDate::from_ymd_opt(2024, 1, 17).unwrap(),
            [(WeatherCondition::Snow, -1), (WeatherCondition::Mist, 4)],
        );
        let tiles = WeatherPresenter.present_forecast(&list);
        assert_eq!(
            tiles,
            vec![
                ForecastTile { day: "Today".into(), icon_glyph_id: "snowflake", temperature_c: -1 },
                ForecastTile { day: "Tomorrow".into(), icon_glyph_id: "smog", temperature_c: 4 },
            ]
        );
    }
}
