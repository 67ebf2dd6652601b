use crate::ir::Schedule;
use crate::layout::{ClusterSummary, DayColumn, TimetableLayout};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub schedule: ScheduleDump,
    pub start_minute: u32,
    pub end_minute: u32,
    pub width: f32,
    pub height: f32,
    pub days: Vec<DayColumn>,
    pub rects: Vec<RectDump>,
    pub clusters: Vec<ClusterSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDump {
    pub id: Option<String>,
    pub name: String,
    pub created_at: Option<String>,
    pub has_edit_access: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RectDump {
    pub session_id: String,
    pub day: String,
    pub label: String,
    pub room: String,
    pub start_minute: u32,
    pub end_minute: u32,
    pub top: f32,
    pub height: f32,
    pub left: f32,
    pub width: f32,
    /// `left` plus the day column offset.
    pub absolute_left: f32,
    pub column: usize,
    pub total_columns: usize,
    pub clipped_top: bool,
    pub clipped_bottom: bool,
}

impl LayoutDump {
    pub fn from_layout(layout: &TimetableLayout, schedule: &Schedule) -> Self {
        let sessions: HashMap<&str, _> = schedule
            .sessions
            .iter()
            .map(|session| (session.id.as_str(), session))
            .collect();

        let rects = layout
            .rects
            .iter()
            .map(|rect| {
                let session = sessions.get(rect.session_id.as_str());
                RectDump {
                    session_id: rect.session_id.clone(),
                    day: rect.day.to_string(),
                    label: session.map(|s| s.label.clone()).unwrap_or_default(),
                    room: session.map(|s| s.room.clone()).unwrap_or_default(),
                    start_minute: session.map(|s| s.start_minute).unwrap_or_default(),
                    end_minute: session.map(|s| s.end_minute).unwrap_or_default(),
                    top: rect.top,
                    height: rect.height,
                    left: rect.left,
                    width: rect.width,
                    absolute_left: layout.absolute_left(rect),
                    column: rect.column,
                    total_columns: rect.total_columns,
                    clipped_top: rect.clipped_top,
                    clipped_bottom: rect.clipped_bottom,
                }
            })
            .collect();

        LayoutDump {
            schedule: ScheduleDump {
                id: schedule.id.clone(),
                name: schedule.display_name(),
                created_at: schedule.created_at.clone(),
                has_edit_access: schedule.has_edit_access,
            },
            start_minute: layout.start_minute,
            end_minute: layout.end_minute,
            width: layout.width,
            height: layout.height,
            days: layout.days.clone(),
            rects,
            clusters: layout.clusters.clone(),
        }
    }
}

pub fn layout_dump_json(layout: &TimetableLayout, schedule: &Schedule) -> anyhow::Result<String> {
    let dump = LayoutDump::from_layout(layout, schedule);
    Ok(serde_json::to_string_pretty(&dump)?)
}

pub fn write_layout_dump(
    path: Option<&Path>,
    layout: &TimetableLayout,
    schedule: &Schedule,
) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout, schedule);
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
    }
    Ok(())
}
