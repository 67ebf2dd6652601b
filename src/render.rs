use crate::config::{DayLabelStyle, RenderConfig};
use crate::ir::{Schedule, Session, format_clock};
use crate::layout::{LayoutRect, TimetableLayout};
use crate::text_metrics::fit_text;
use crate::theme::Theme;
use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::path::Path;

const ROOM_FONT_SCALE: f32 = 0.85;

struct Frame {
    body_x: f32,
    body_y: f32,
    header_y: f32,
    width: f32,
    height: f32,
    /// Pixels per minute recovered from the layout.
    scale: f32,
}

impl Frame {
    fn new(layout: &TimetableLayout, config: &RenderConfig) -> Self {
        let pad = config.padding;
        let chrome = if config.show_header {
            config.title_height + config.header_height
        } else {
            0.0
        };
        let body_x = pad + config.gutter_width;
        let body_y = pad + chrome;
        let minutes = layout.end_minute.saturating_sub(layout.start_minute).max(1) as f32;
        Self {
            body_x,
            body_y,
            header_y: pad + config.title_height,
            width: body_x + layout.width + pad,
            height: body_y + layout.height + pad,
            scale: layout.height / minutes,
        }
    }

    fn minute_y(&self, layout: &TimetableLayout, minute: u32) -> f32 {
        self.body_y + minute.saturating_sub(layout.start_minute) as f32 * self.scale
    }
}

/// Renders the timetable as a standalone SVG document. Labels and rooms are
/// looked up in `schedule` by session id; the geometry comes only from `layout`.
pub fn render_svg(
    layout: &TimetableLayout,
    schedule: &Schedule,
    theme: &Theme,
    config: &RenderConfig,
) -> String {
    let frame = Frame::new(layout, config);
    let sessions: HashMap<&str, &Session> = schedule
        .sessions
        .iter()
        .map(|session| (session.id.as_str(), session))
        .collect();

    let mut svg = String::new();
    let (width, height) = (frame.width, frame.height);
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">"
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    if config.show_header {
        push_title(&mut svg, schedule, theme, config);
        push_day_header(&mut svg, layout, &frame, theme, config);
    }
    push_grid(&mut svg, layout, &frame, theme);

    for rect in &layout.rects {
        let session = sessions.get(rect.session_id.as_str()).copied();
        push_block(&mut svg, layout, rect, session, &frame, theme, config);
    }

    svg.push_str("</svg>");
    svg
}

fn push_title(svg: &mut String, schedule: &Schedule, theme: &Theme, config: &RenderConfig) {
    let x = config.padding;
    let title_size = theme.font_size * 1.6;
    svg.push_str(&format!(
        "<text x=\"{x:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{title_size:.2}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
        config.padding + title_size,
        escape_xml(&theme.font_family),
        theme.text_color,
        escape_xml(&schedule.display_name())
    ));
    if let Some(created) = schedule.created_at.as_deref().and_then(format_created_at) {
        let prefix = match config.day_labels {
            DayLabelStyle::Indonesian => "Dibuat pada",
            _ => "Created",
        };
        svg.push_str(&format!(
            "<text x=\"{x:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{prefix} {created}</text>",
            config.padding + config.title_height - 4.0,
            escape_xml(&theme.font_family),
            theme.font_size,
            theme.muted_text_color
        ));
    }
}

fn push_day_header(
    svg: &mut String,
    layout: &TimetableLayout,
    frame: &Frame,
    theme: &Theme,
    config: &RenderConfig,
) {
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
        frame.body_x,
        frame.header_y,
        layout.width,
        config.header_height,
        theme.header_background
    ));
    let text_y = frame.header_y + config.header_height / 2.0 + theme.font_size * 0.35;
    for column in &layout.days {
        let label = fit_text(
            config.day_labels.label(column.day),
            column.width - 4.0,
            theme.font_size,
            &theme.font_family,
        );
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{text_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
            frame.body_x + column.left + column.width / 2.0,
            escape_xml(&theme.font_family),
            theme.font_size,
            theme.text_color,
            escape_xml(&label)
        ));
    }
}

fn push_grid(svg: &mut String, layout: &TimetableLayout, frame: &Frame, theme: &Theme) {
    let right = frame.body_x + layout.width;
    let first_hour = layout.start_minute.div_ceil(60);
    let last_hour = layout.end_minute / 60;
    for hour in first_hour..=last_hour {
        let minute = hour * 60;
        let y = frame.minute_y(layout, minute);
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{right:.2}\" y2=\"{y:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
            frame.body_x,
            theme.grid_line_color
        ));
        if minute < layout.end_minute {
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\">{}</text>",
                frame.body_x - 6.0,
                y + theme.font_size * 0.35,
                escape_xml(&theme.font_family),
                theme.font_size * ROOM_FONT_SCALE,
                theme.muted_text_color,
                format_clock(minute)
            ));
        }
    }
    for column in &layout.days {
        let x = frame.body_x + column.left;
        svg.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
            frame.body_y,
            column.width,
            layout.height,
            theme.grid_line_color
        ));
    }
}

fn push_block(
    svg: &mut String,
    layout: &TimetableLayout,
    rect: &LayoutRect,
    session: Option<&Session>,
    frame: &Frame,
    theme: &Theme,
    config: &RenderConfig,
) {
    let x = frame.body_x + layout.absolute_left(rect) + 1.0;
    let y = frame.body_y + rect.top;
    let w = (rect.width - 2.0).max(0.0);
    let h = rect.height;
    let label = session.map(|s| s.label.as_str()).unwrap_or("");
    let room = session.map(|s| s.room.as_str()).unwrap_or("");
    let radius = config.block_radius.min(w / 2.0).min(h / 2.0);

    svg.push_str(&format!(
        "<g data-session-id=\"{}\"><rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" rx=\"{radius:.2}\" ry=\"{radius:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
        escape_xml(&rect.session_id),
        theme.session_color(label),
        theme.session_border_color
    ));

    let pad = config.block_padding;
    let inner_width = w - pad * 2.0;
    let mut cursor = y + pad;
    if config.show_label && !label.is_empty() && cursor + theme.font_size <= y + h {
        let text = fit_text(label, inner_width, theme.font_size, &theme.font_family);
        cursor += theme.font_size;
        if !text.is_empty() {
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{cursor:.2}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
                x + pad,
                escape_xml(&theme.font_family),
                theme.font_size,
                theme.session_text_color,
                escape_xml(&text)
            ));
        }
        cursor += 2.0;
    }
    let room_size = theme.font_size * ROOM_FONT_SCALE;
    if config.show_room && !room.is_empty() && cursor + room_size <= y + h {
        let text = fit_text(room, inner_width, room_size, &theme.font_family);
        if !text.is_empty() {
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{room_size:.2}\" fill=\"{}\" fill-opacity=\"0.85\">{}</text>",
                x + pad,
                cursor + room_size,
                escape_xml(&theme.font_family),
                theme.session_text_color,
                escape_xml(&text)
            ));
        }
    }
    svg.push_str("</g>");
}

/// Formats the schedule's creation timestamp as `d/m/yyyy`, using the date
/// in the timestamp's own offset. Accepts RFC 3339, RFC 2822 and bare
/// `YYYY-MM-DD[ HH:MM:SS]` values; impossible dates yield `None`.
pub fn format_created_at(value: &str) -> Option<String> {
    let value = value.trim();
    let date = DateTime::parse_from_rfc3339(value)
        .map(|stamp| stamp.date_naive())
        .or_else(|_| DateTime::parse_from_rfc2822(value).map(|stamp| stamp.date_naive()))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|stamp| stamp.date())
        })
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()?;
    Some(format!("{}/{}/{}", date.day(), date.month(), date.year()))
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|family| family.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "sans-serif".to_string());
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
