use crate::layout::LayoutError;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DESKTOP_PX_PER_MINUTE: f32 = 0.9;
pub const MOBILE_PX_PER_MINUTE: f32 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub px_per_minute: f32,
    pub start_hour: u8,
    pub end_hour: u8,
    pub container_width_per_day: f32,
    pub day_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            px_per_minute: DESKTOP_PX_PER_MINUTE,
            start_hour: 7,
            end_hour: 21,
            container_width_per_day: 160.0,
            day_gap: 0.0,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.px_per_minute.is_finite() || self.px_per_minute <= 0.0 {
            return Err(LayoutError::invalid_config(format!(
                "px_per_minute must be positive, got {}",
                self.px_per_minute
            )));
        }
        if self.end_hour <= self.start_hour {
            return Err(LayoutError::invalid_config(format!(
                "end_hour ({}) must be after start_hour ({})",
                self.end_hour, self.start_hour
            )));
        }
        if self.end_hour > 24 {
            return Err(LayoutError::invalid_config(format!(
                "end_hour must be at most 24, got {}",
                self.end_hour
            )));
        }
        if !self.container_width_per_day.is_finite() || self.container_width_per_day <= 0.0 {
            return Err(LayoutError::invalid_config(format!(
                "container_width_per_day must be positive, got {}",
                self.container_width_per_day
            )));
        }
        if !self.day_gap.is_finite() || self.day_gap < 0.0 {
            return Err(LayoutError::invalid_config(format!(
                "day_gap must not be negative, got {}",
                self.day_gap
            )));
        }
        Ok(())
    }

    pub fn window_start_minute(&self) -> u32 {
        self.start_hour as u32 * 60
    }

    pub fn window_end_minute(&self) -> u32 {
        self.end_hour as u32 * 60
    }

    /// Pixel height of the visible `[start_hour, end_hour)` window.
    pub fn window_height(&self) -> f32 {
        self.window_end_minute().saturating_sub(self.window_start_minute()) as f32
            * self.px_per_minute
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayLabelStyle {
    Short,
    #[default]
    Long,
    Indonesian,
}

impl DayLabelStyle {
    pub fn label(self, day: crate::ir::Day) -> &'static str {
        match self {
            Self::Short => day.short_name(),
            Self::Long => day.long_name(),
            Self::Indonesian => day.indonesian_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub show_header: bool,
    pub show_label: bool,
    pub show_room: bool,
    pub day_labels: DayLabelStyle,
    pub title_height: f32,
    pub header_height: f32,
    pub gutter_width: f32,
    pub padding: f32,
    pub block_padding: f32,
    pub block_radius: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            show_header: true,
            show_label: true,
            show_room: true,
            day_labels: DayLabelStyle::Long,
            title_height: 44.0,
            header_height: 32.0,
            gutter_width: 48.0,
            padding: 16.0,
            block_padding: 4.0,
            block_radius: 6.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Config {
    /// Switches to the narrower time scale used on small screens.
    pub fn mobile(mut self) -> Self {
        self.layout.px_per_minute = MOBILE_PX_PER_MINUTE;
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    pub(crate) fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val as f32),
            NumberOrString::String(val) => val.trim().parse::<f32>().ok(),
        }
    }

    pub(crate) fn as_u32(&self) -> Option<u32> {
        match self {
            NumberOrString::Number(val) if *val >= 0.0 && val.fract() == 0.0 => Some(*val as u32),
            NumberOrString::Number(_) => None,
            NumberOrString::String(val) => val.trim().parse::<u32>().ok(),
        }
    }

    pub(crate) fn as_string(&self) -> String {
        match self {
            NumberOrString::Number(val) => format!("{}", val),
            NumberOrString::String(val) => val.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    background: Option<String>,
    text_color: Option<String>,
    muted_text_color: Option<String>,
    grid_line_color: Option<String>,
    header_background: Option<String>,
    session_text_color: Option<String>,
    session_border_color: Option<String>,
    session_palette: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TimetableConfigFile {
    px_per_minute: Option<NumberOrString>,
    start_hour: Option<NumberOrString>,
    end_hour: Option<NumberOrString>,
    #[serde(alias = "dayWidth")]
    container_width_per_day: Option<NumberOrString>,
    day_gap: Option<NumberOrString>,
    mobile: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct DisplayConfigFile {
    width: Option<NumberOrString>,
    height: Option<NumberOrString>,
    show_header: Option<bool>,
    show_label: Option<bool>,
    show_room: Option<bool>,
    day_labels: Option<DayLabelStyle>,
    header_height: Option<NumberOrString>,
    gutter_width: Option<NumberOrString>,
    block_padding: Option<NumberOrString>,
    block_radius: Option<NumberOrString>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    timetable: Option<TimetableConfigFile>,
    display: Option<DisplayConfigFile>,
}

/// Loads a JSON5 config file over the built-in defaults. Without a path the
/// defaults are returned unchanged.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let value = json5::from_str::<serde_json::Value>(contents)?;
    let parsed: ConfigFile = serde_json::from_value(value)?;
    let config = apply_config_file(Config::default(), parsed)?;
    config.layout.validate()?;
    Ok(config)
}

fn apply_config_file(mut config: Config, parsed: ConfigFile) -> anyhow::Result<Config> {
    if let Some(name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme: {name}"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.muted_text_color {
            config.theme.muted_text_color = v;
        }
        if let Some(v) = vars.grid_line_color {
            config.theme.grid_line_color = v;
        }
        if let Some(v) = vars.header_background {
            config.theme.header_background = v;
        }
        if let Some(v) = vars.session_text_color {
            config.theme.session_text_color = v;
        }
        if let Some(v) = vars.session_border_color {
            config.theme.session_border_color = v;
        }
        if let Some(v) = vars.session_palette.filter(|palette| !palette.is_empty()) {
            config.theme.session_palette = v;
        }
    }

    if let Some(timetable) = parsed.timetable {
        if timetable.mobile == Some(true) {
            config = config.mobile();
        }
        if let Some(v) = timetable.px_per_minute.as_ref().and_then(NumberOrString::as_f32) {
            config.layout.px_per_minute = v;
        }
        if let Some(v) = timetable.start_hour.as_ref() {
            config.layout.start_hour = hour_value(v, "startHour")?;
        }
        if let Some(v) = timetable.end_hour.as_ref() {
            config.layout.end_hour = hour_value(v, "endHour")?;
        }
        if let Some(v) = timetable
            .container_width_per_day
            .as_ref()
            .and_then(NumberOrString::as_f32)
        {
            config.layout.container_width_per_day = v;
        }
        if let Some(v) = timetable.day_gap.as_ref().and_then(NumberOrString::as_f32) {
            config.layout.day_gap = v;
        }
    }

    if let Some(display) = parsed.display {
        if let Some(v) = display.width.as_ref().and_then(NumberOrString::as_f32) {
            config.render.width = v;
        }
        if let Some(v) = display.height.as_ref().and_then(NumberOrString::as_f32) {
            config.render.height = v;
        }
        if let Some(v) = display.show_header {
            config.render.show_header = v;
        }
        if let Some(v) = display.show_label {
            config.render.show_label = v;
        }
        if let Some(v) = display.show_room {
            config.render.show_room = v;
        }
        if let Some(v) = display.day_labels {
            config.render.day_labels = v;
        }
        if let Some(v) = display.header_height.as_ref().and_then(NumberOrString::as_f32) {
            config.render.header_height = v;
        }
        if let Some(v) = display.gutter_width.as_ref().and_then(NumberOrString::as_f32) {
            config.render.gutter_width = v;
        }
        if let Some(v) = display.block_padding.as_ref().and_then(NumberOrString::as_f32) {
            config.render.block_padding = v;
        }
        if let Some(v) = display.block_radius.as_ref().and_then(NumberOrString::as_f32) {
            config.render.block_radius = v;
        }
    }

    Ok(config)
}

fn hour_value(value: &NumberOrString, field: &str) -> anyhow::Result<u8> {
    value
        .as_u32()
        .and_then(|hour| u8::try_from(hour).ok())
        .ok_or_else(|| anyhow::anyhow!("{field} must be a whole hour, got {}", value.as_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_desktop_view() {
        let config = Config::default();
        assert_eq!(config.layout.start_hour, 7);
        assert_eq!(config.layout.end_hour, 21);
        assert_eq!(config.layout.px_per_minute, DESKTOP_PX_PER_MINUTE);
        assert!(config.layout.validate().is_ok());
        assert_eq!(Config::default().mobile().layout.px_per_minute, MOBILE_PX_PER_MINUTE);
    }

    #[test]
    fn window_height_uses_scale() {
        let config = LayoutConfig {
            px_per_minute: 0.5,
            start_hour: 8,
            end_hour: 10,
            ..Default::default()
        };
        assert_eq!(config.window_height(), 60.0);
    }

    #[test]
    fn parses_json5_with_comments_and_string_numbers() {
        let config = parse_config(
            r##"{
                // narrow phone view
                theme: "dark",
                timetable: { startHour: "8", endHour: 18, pxPerMinute: "1.5", dayWidth: 90, },
                display: { showRoom: false, dayLabels: "indonesian" },
                themeVariables: { fontSize: 14, sessionPalette: ["#111111"] },
            }"##,
        )
        .unwrap();
        assert_eq!(config.layout.start_hour, 8);
        assert_eq!(config.layout.end_hour, 18);
        assert_eq!(config.layout.px_per_minute, 1.5);
        assert_eq!(config.layout.container_width_per_day, 90.0);
        assert!(!config.render.show_room);
        assert_eq!(config.render.day_labels, DayLabelStyle::Indonesian);
        assert_eq!(config.theme.font_size, 14.0);
        assert_eq!(config.theme.background, Theme::dark().background);
        assert_eq!(config.theme.session_palette, vec!["#111111".to_string()]);
    }

    #[test]
    fn mobile_flag_applies_before_explicit_scale() {
        let config = parse_config(r#"{ timetable: { mobile: true } }"#).unwrap();
        assert_eq!(config.layout.px_per_minute, MOBILE_PX_PER_MINUTE);
        let config = parse_config(r#"{ timetable: { mobile: true, pxPerMinute: 2 } }"#).unwrap();
        assert_eq!(config.layout.px_per_minute, 2.0);
    }

    #[test]
    fn rejects_invalid_window() {
        let err = parse_config(r#"{ timetable: { startHour: 12, endHour: 9 } }"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LayoutError>(),
            Some(LayoutError::InvalidConfig(_))
        ));
        assert!(parse_config(r#"{ timetable: { startHour: 7.5 } }"#).is_err());
        assert!(parse_config(r#"{ theme: "neon" }"#).is_err());
    }
}
