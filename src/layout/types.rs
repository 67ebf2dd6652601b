use std::collections::BTreeMap;

use serde::Serialize;

use crate::ir::{Day, Session};

/// A maximal run of same-day sessions connected by time overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapCluster<'a> {
    pub day: Day,
    pub start_minute: u32,
    pub end_minute: u32,
    /// Sorted by start, then end, then id.
    pub sessions: Vec<&'a Session>,
}

impl<'a> OverlapCluster<'a> {
    pub(crate) fn open(session: &'a Session) -> Self {
        Self {
            day: session.day,
            start_minute: session.start_minute,
            end_minute: session.end_minute,
            sessions: vec![session],
        }
    }

    pub(crate) fn push(&mut self, session: &'a Session) {
        self.end_minute = self.end_minute.max(session.end_minute);
        self.sessions.push(session);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|s| s.id.clone()).collect()
    }
}

pub type DayClusters<'a> = BTreeMap<Day, Vec<OverlapCluster<'a>>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnAssignment {
    pub session_id: String,
    pub column: usize,
    pub total_columns: usize,
}

/// Pixel rectangle for one session, in coordinates local to its day column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRect {
    pub session_id: String,
    pub day: Day,
    pub top: f32,
    pub height: f32,
    pub left: f32,
    pub width: f32,
    pub column: usize,
    pub total_columns: usize,
    pub clipped_top: bool,
    pub clipped_bottom: bool,
}

impl LayoutRect {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}

/// Horizontal slot of a day inside the full timetable body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayColumn {
    pub day: Day,
    pub index: usize,
    pub left: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub day: Day,
    pub start_minute: u32,
    pub end_minute: u32,
    pub total_columns: usize,
    pub session_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableLayout {
    /// One rect per input session, in input order.
    pub rects: Vec<LayoutRect>,
    pub days: Vec<DayColumn>,
    pub clusters: Vec<ClusterSummary>,
    pub start_minute: u32,
    pub end_minute: u32,
    pub width: f32,
    pub height: f32,
}

impl TimetableLayout {
    pub fn rect(&self, session_id: &str) -> Option<&LayoutRect> {
        self.rects.iter().find(|rect| rect.session_id == session_id)
    }

    pub fn day_column(&self, day: Day) -> Option<&DayColumn> {
        self.days.iter().find(|column| column.day == day)
    }

    /// Left edge of `rect` in body coordinates.
    pub fn absolute_left(&self, rect: &LayoutRect) -> f32 {
        self.day_column(rect.day)
            .map(|column| column.left)
            .unwrap_or(0.0)
            + rect.left
    }
}
