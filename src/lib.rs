#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
#[cfg(feature = "cli")]
pub mod logging;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use ir::{Day, Schedule, Session};
pub use layout::{
    ColumnAssignment, LayoutError, LayoutRect, OverlapCluster, TimetableLayout, assign_columns,
    compute_layout, group, resolve,
};
pub use parser::parse_schedule;
pub use render::render_svg;
pub use theme::Theme;

/// Parses `input` and renders it to SVG in one call.
pub fn render_with_config(input: &str, config: &Config) -> anyhow::Result<String> {
    let schedule = parse_schedule(input)?.schedule;
    let layout = compute_layout(&schedule.sessions, &config.layout)?;
    Ok(render_svg(&layout, &schedule, &config.theme, &config.render))
}

/// Parses `input` and returns the layout dump as pretty JSON.
pub fn layout_json_with_config(input: &str, config: &Config) -> anyhow::Result<String> {
    let schedule = parse_schedule(input)?.schedule;
    let layout = compute_layout(&schedule.sessions, &config.layout)?;
    layout_dump::layout_dump_json(&layout, &schedule)
}
