use super::*;

const MIN_RECT_HEIGHT: f32 = 1.0;

/// Maps one column assignment to a pixel rect local to the session's day.
pub fn resolve(
    assignment: &ColumnAssignment,
    session: &Session,
    config: &LayoutConfig,
) -> Result<LayoutRect, LayoutError> {
    config.validate()?;
    Ok(place(assignment, session, config))
}

/// `resolve` without the config check; callers validate once up front.
pub(super) fn place(
    assignment: &ColumnAssignment,
    session: &Session,
    config: &LayoutConfig,
) -> LayoutRect {
    let window_start = config.window_start_minute() as f32;
    let window_height = config.window_height();
    let scale = config.px_per_minute;

    let raw_top = (session.start_minute as f32 - window_start) * scale;
    let raw_bottom = (session.end_minute as f32 - window_start) * scale;
    let clipped_top = raw_top < 0.0;
    let clipped_bottom = raw_bottom > window_height;

    let top = raw_top.clamp(0.0, window_height);
    let bottom = raw_bottom.clamp(0.0, window_height);
    let height = (bottom - top).max(MIN_RECT_HEIGHT);
    // Keep the minimum-height sliver inside the window too.
    let top = if top + height > window_height {
        (window_height - height).max(0.0)
    } else {
        top
    };

    let total_columns = assignment.total_columns.max(1);
    let width = config.container_width_per_day / total_columns as f32;
    let left = assignment.column as f32 * width;

    LayoutRect {
        session_id: session.id.clone(),
        day: session.day,
        top,
        height,
        left,
        width,
        column: assignment.column,
        total_columns,
        clipped_top,
        clipped_bottom,
    }
}

/// Stable day → horizontal offset table for multi-day rendering.
pub fn day_columns(config: &LayoutConfig) -> Vec<DayColumn> {
    let stride = config.container_width_per_day + config.day_gap;
    Day::ALL
        .iter()
        .map(|&day| DayColumn {
            day,
            index: day.index(),
            left: day.index() as f32 * stride,
            width: config.container_width_per_day,
        })
        .collect()
}
