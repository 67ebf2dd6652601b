use serde::Deserialize;
use timetable_layout::{Config, Theme, layout_json_with_config, render_with_config};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimetableOptions {
    theme: Option<String>,
    px_per_minute: Option<f32>,
    start_hour: Option<u8>,
    end_hour: Option<u8>,
    day_width: Option<f32>,
    mobile: Option<bool>,
    show_header: Option<bool>,
    show_label: Option<bool>,
    show_room: Option<bool>,
}

fn build_config(options: TimetableOptions) -> Result<Config, String> {
    let mut config = if options.mobile == Some(true) {
        Config::default().mobile()
    } else {
        Config::default()
    };

    if let Some(name) = options.theme.as_deref() {
        config.theme = Theme::by_name(name).ok_or_else(|| format!("unknown theme: {name}"))?;
    }
    if let Some(px) = options.px_per_minute {
        config.layout.px_per_minute = px;
    }
    if let Some(hour) = options.start_hour {
        config.layout.start_hour = hour;
    }
    if let Some(hour) = options.end_hour {
        config.layout.end_hour = hour;
    }
    if let Some(width) = options.day_width {
        config.layout.container_width_per_day = width;
    }
    if let Some(show) = options.show_header {
        config.render.show_header = show;
    }
    if let Some(show) = options.show_label {
        config.render.show_label = show;
    }
    if let Some(show) = options.show_room {
        config.render.show_room = show;
    }
    Ok(config)
}

fn parse_options(options_json: Option<String>) -> Result<Config, JsValue> {
    let options = match options_json {
        Some(raw) => serde_json::from_str::<TimetableOptions>(&raw)
            .map_err(|error| JsValue::from_str(&error.to_string()))?,
        None => TimetableOptions::default(),
    };
    build_config(options).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn render_schedule_svg(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = parse_options(options_json)?;
    render_with_config(input, &config).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[wasm_bindgen]
pub fn layout_schedule_json(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = parse_options(options_json)?;
    layout_json_with_config(input, &config).map_err(|error| JsValue::from_str(&error.to_string()))
}
