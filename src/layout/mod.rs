mod columns;
mod error;
mod geometry;
mod group;
pub(crate) mod types;
pub use columns::{assign_columns, max_overlap_depth};
pub use error::LayoutError;
pub use geometry::{day_columns, resolve};
pub use group::{clusters_for, group};
pub use types::*;
use geometry::place;
use group::session_order;

use crate::config::LayoutConfig;
use crate::ir::{Day, Session};
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet};

/// Full pipeline: validate config, group, assign columns, resolve rects.
///
/// Rects come back in input order. Any invalid session, duplicate id or bad
/// config fails the whole call.
pub fn compute_layout(
    sessions: &[Session],
    config: &LayoutConfig,
) -> Result<TimetableLayout, LayoutError> {
    config.validate()?;
    let clusters = group(sessions)?;

    let by_id: HashMap<&str, &Session> = sessions.iter().map(|s| (s.id.as_str(), s)).collect();
    let mut rects_by_id: HashMap<&str, LayoutRect> = HashMap::with_capacity(sessions.len());
    let mut summaries: Vec<ClusterSummary> = Vec::new();

    for day_clusters in clusters.values() {
        for cluster in day_clusters {
            let assignments = assign_columns(cluster);
            let total_columns = assignments.first().map(|a| a.total_columns).unwrap_or(1);
            for assignment in &assignments {
                let Some(session) = by_id.get(assignment.session_id.as_str()) else {
                    continue;
                };
                rects_by_id.insert(session.id.as_str(), place(assignment, session, config));
            }
            summaries.push(ClusterSummary {
                day: cluster.day,
                start_minute: cluster.start_minute,
                end_minute: cluster.end_minute,
                total_columns,
                session_ids: cluster.session_ids(),
            });
        }
    }

    let rects: Vec<LayoutRect> = sessions
        .iter()
        .filter_map(|session| rects_by_id.remove(session.id.as_str()))
        .collect();

    let days = day_columns(config);
    let width = days.last().map(|col| col.left + col.width).unwrap_or(0.0);
    tracing::debug!(
        sessions = sessions.len(),
        clusters = summaries.len(),
        "computed timetable layout"
    );

    Ok(TimetableLayout {
        rects,
        days,
        clusters: summaries,
        start_minute: config.window_start_minute(),
        end_minute: config.window_end_minute(),
        width,
        height: config.window_height(),
    })
}
