use std::fmt::Write;

use chrono::Local;
use weather_core::{DisplayState, presenter};

/// Plain-text rendering of the current weather card and forecast strip.
pub fn display(state: &DisplayState) -> String {
    let current = &state.current;
    let view = &state.view;
    let mut out = String::new();

    let _ = writeln!(out, "{}, {}", current.city, current.country);
    let _ = writeln!(
        out,
        "  {}°C  {}  [{} | {}]",
        current.temperature_c, current.description, view.icon_glyph_id, view.animation_class
    );
    let _ = writeln!(
        out,
        "  Visibility {} · Humidity {}% · Wind {} km/h · Feels like {}°C",
        current.visibility, current.humidity_pct, current.wind_speed_kmh, current.feels_like_c
    );
    let _ = writeln!(
        out,
        "  Background {}: {}",
        view.background_gradient_id,
        presenter::background_css(view.background_gradient_id)
    );
    let _ = writeln!(
        out,
        "  Updated {}",
        state.observed_at.with_timezone(&Local).format("%H:%M")
    );

    if !state.forecast.is_empty() {
        let _ = writeln!(out, "Forecast:");
        for tile in &state.forecast {
            let _ = writeln!(
                out,
                "  {:<9} {:<11} {}°",
                tile.day, tile.icon_glyph_id, tile.temperature_c
            );
        }
    }

    out
}
