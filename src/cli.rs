use crate::config::{Config, MOBILE_PX_PER_MINUTE, load_config};
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_schedule;
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "ttlay", version, about = "Weekly timetable layout and renderer")]
pub struct Args {
    /// Input schedule (.json/.json5 or line format) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file (timetable, display, theme, themeVariables)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Vertical scale in pixels per minute
    #[arg(long = "px-per-minute")]
    pub px_per_minute: Option<f32>,

    /// First visible hour
    #[arg(long = "start-hour")]
    pub start_hour: Option<u8>,

    /// Hour at which the visible window ends
    #[arg(long = "end-hour")]
    pub end_hour: Option<u8>,

    /// Width of one day column in pixels
    #[arg(long = "day-width")]
    pub day_width: Option<f32>,

    /// Use the compact mobile time scale
    #[arg(long = "mobile")]
    pub mobile: bool,

    /// Hide the title and day header
    #[arg(long = "no-header")]
    pub no_header: bool,

    /// Hide course labels inside blocks
    #[arg(long = "no-label")]
    pub no_label: bool,

    /// Hide room names inside blocks
    #[arg(long = "no-room")]
    pub no_room: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    if !crate::logging::init(args.verbose) {
        tracing::debug!("log subscriber already installed, keeping it");
    }

    let config = apply_args(load_config(args.config.as_deref())?, &args);
    let input = read_input(args.input.as_deref())?;
    let parsed = parse_schedule(&input)?;
    let schedule = parsed.schedule;

    let layout = compute_layout(&schedule.sessions, &config.layout)?;
    tracing::info!(
        sessions = schedule.sessions.len(),
        clusters = layout.clusters.len(),
        format = ?args.output_format,
        "layout ready"
    );

    match args.output_format {
        OutputFormat::Json => write_layout_dump(args.output.as_deref(), &layout, &schedule)?,
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &schedule, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => write_png(&args, &layout, &schedule, &config)?,
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(
    args: &Args,
    layout: &crate::layout::TimetableLayout,
    schedule: &crate::ir::Schedule,
    config: &Config,
) -> Result<()> {
    let output = ensure_output(&args.output, "png")?;
    let svg = render_svg(layout, schedule, &config.theme, &config.render);
    crate::render::write_output_png(&svg, &output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(
    _args: &Args,
    _layout: &crate::layout::TimetableLayout,
    _schedule: &crate::ir::Schedule,
    _config: &Config,
) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the 'png' feature"))
}

/// Command-line flags win over the config file; `--mobile` only sets the
/// scale when no explicit `--px-per-minute` is given.
fn apply_args(mut config: Config, args: &Args) -> Config {
    if args.mobile {
        config.layout.px_per_minute = MOBILE_PX_PER_MINUTE;
    }
    if let Some(v) = args.px_per_minute {
        config.layout.px_per_minute = v;
    }
    if let Some(v) = args.start_hour {
        config.layout.start_hour = v;
    }
    if let Some(v) = args.end_hour {
        config.layout.end_hour = v;
    }
    if let Some(v) = args.day_width {
        config.layout.container_width_per_day = v;
    }
    if args.no_header {
        config.render.show_header = false;
    }
    if args.no_label {
        config.render.show_label = false;
    }
    if args.no_room {
        config.render.show_room = false;
    }
    config
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg_attr(not(feature = "png"), allow(dead_code))]
fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
