use crate::config::NumberOrString;
use crate::ir::{Day, Schedule, Session, parse_clock};
use crate::layout::LayoutError;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

static SESSION_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:\[(?P<id>[^\]]+)\]\s*)?(?P<day>[A-Za-z']+)\s+(?P<start>\d{1,2}[:.]\d{2})\s*-\s*(?P<end>\d{1,2}[:.]\d{2})(?:\s+(?P<rest>.*))?$",
    )
    .unwrap()
});
static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<key>[A-Za-z_]+)\s*:\s*(?P<value>.*)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Text,
}

#[derive(Debug)]
pub struct ParseOutput {
    pub schedule: Schedule,
    pub format: InputFormat,
}

/// Parses a schedule from either a JSON/JSON5 document or the line format
/// (`Mon 09:00-10:00 Calculus @ A1.01`). The format is sniffed from the first
/// meaningful character.
pub fn parse_schedule(input: &str) -> Result<ParseOutput> {
    let first = input
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("//"))
        .and_then(|line| line.chars().next());
    let output = match first {
        Some('{') | Some('[') => ParseOutput {
            schedule: parse_json_schedule(input)?,
            format: InputFormat::Json,
        },
        _ => ParseOutput {
            schedule: parse_text_schedule(input)?,
            format: InputFormat::Text,
        },
    };
    tracing::debug!(
        format = ?output.format,
        sessions = output.schedule.sessions.len(),
        "parsed schedule"
    );
    Ok(output)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SessionRecord {
    id: Option<NumberOrString>,
    day: Option<NumberOrString>,
    start_minute: Option<NumberOrString>,
    end_minute: Option<NumberOrString>,
    #[serde(alias = "start_time", alias = "startTime")]
    start: Option<NumberOrString>,
    #[serde(alias = "end_time", alias = "endTime")]
    end: Option<NumberOrString>,
    #[serde(alias = "name", alias = "course", alias = "title")]
    label: Option<String>,
    #[serde(alias = "location")]
    room: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ScheduleRecord {
    id: Option<NumberOrString>,
    name: Option<String>,
    #[serde(alias = "created_at")]
    created_at: Option<String>,
    #[serde(alias = "has_edit_access")]
    has_edit_access: bool,
    #[serde(alias = "schedule_items", alias = "items")]
    sessions: Vec<SessionRecord>,
}

const SESSION_LIST_KEYS: [&str; 3] = ["sessions", "schedule_items", "items"];

/// Accepts a bare session list, a `{"user_schedule": {...}}` envelope, or a
/// schedule object carrying one of `SESSION_LIST_KEYS`. Anything else is an
/// error rather than an empty schedule.
fn decode_document(value: Value) -> Result<ScheduleRecord> {
    match value {
        Value::Array(_) => Ok(ScheduleRecord {
            sessions: serde_json::from_value(value).context("invalid session list")?,
            ..Default::default()
        }),
        Value::Object(mut map) => {
            if let Some(inner) = map.remove("user_schedule") {
                return serde_json::from_value(inner).context("invalid user_schedule");
            }
            if !SESSION_LIST_KEYS.iter().any(|key| map.contains_key(*key)) {
                let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                return Err(anyhow::anyhow!(
                    "unrecognized schedule document (keys: {}); expected a session list, \
                     'user_schedule', or one of: {}",
                    keys.join(", "),
                    SESSION_LIST_KEYS.join(", ")
                ));
            }
            serde_json::from_value(Value::Object(map)).context("invalid schedule")
        }
        other => Err(anyhow::anyhow!(
            "expected a schedule object or session list, got {}",
            json_kind(&other)
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn parse_json_schedule(input: &str) -> Result<Schedule> {
    let value = json5::from_str::<Value>(input)?;
    let record = decode_document(value)?;

    let mut sessions = Vec::with_capacity(record.sessions.len());
    let mut invalid = Vec::new();
    for (idx, raw) in record.sessions.into_iter().enumerate() {
        let id = raw
            .id
            .as_ref()
            .map(NumberOrString::as_string)
            .unwrap_or_else(|| generated_id(idx));
        match decode_session(id.clone(), raw) {
            Some(session) => sessions.push(session),
            None => invalid.push(id),
        }
    }
    if !invalid.is_empty() {
        return Err(LayoutError::InvalidSession { ids: invalid }.into());
    }

    Ok(Schedule {
        id: record.id.as_ref().map(NumberOrString::as_string),
        name: record.name.unwrap_or_default(),
        created_at: record.created_at,
        has_edit_access: record.has_edit_access,
        sessions,
    })
}

fn decode_session(id: String, raw: SessionRecord) -> Option<Session> {
    let day = match raw.day.as_ref()? {
        NumberOrString::String(name) => Day::from_token(name)?,
        index => Day::from_index(index.as_u32()? as usize)?,
    };
    let start = time_field(raw.start_minute.as_ref(), raw.start.as_ref())?;
    let end = time_field(raw.end_minute.as_ref(), raw.end.as_ref())?;
    Some(Session {
        id,
        day,
        start_minute: start,
        end_minute: end,
        label: raw.label.unwrap_or_default().trim().to_string(),
        room: raw.room.unwrap_or_default().trim().to_string(),
    })
}

/// Prefers explicit minutes; otherwise a clock string, or a bare number of minutes.
fn time_field(minutes: Option<&NumberOrString>, clock: Option<&NumberOrString>) -> Option<u32> {
    if let Some(value) = minutes {
        return value.as_u32();
    }
    match clock? {
        NumberOrString::String(text) => parse_clock(text),
        number => number.as_u32(),
    }
}

fn generated_id(idx: usize) -> String {
    format!("s{}", idx + 1)
}

pub fn parse_text_schedule(input: &str) -> Result<Schedule> {
    let mut schedule = Schedule::default();
    let mut invalid = Vec::new();
    let mut count = 0usize;

    for (line_no, raw_line) in input.lines().enumerate() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = SESSION_LINE_RE.captures(line) {
            let id = caps
                .name("id")
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_else(|| generated_id(count));
            count += 1;
            let day = Day::from_token(&caps["day"]);
            let start = parse_clock(&caps["start"]);
            let end = parse_clock(&caps["end"]);
            let (Some(day), Some(start), Some(end)) = (day, start, end) else {
                invalid.push(id);
                continue;
            };
            let rest = caps.name("rest").map(|m| m.as_str()).unwrap_or("");
            let (label, room) = match rest.split_once(" @ ") {
                Some((label, room)) => (label.trim(), room.trim()),
                None => (rest.trim(), ""),
            };
            schedule.sessions.push(
                Session::new(id, day, start, end)
                    .with_label(label)
                    .with_room(room),
            );
            continue;
        }
        if let Some(caps) = HEADER_RE.captures(line) {
            let value = caps["value"].trim().to_string();
            match caps["key"].to_ascii_lowercase().as_str() {
                "name" | "title" => schedule.name = value,
                "id" => schedule.id = Some(value),
                "created" | "created_at" => schedule.created_at = Some(value),
                "edit" | "has_edit_access" => {
                    schedule.has_edit_access = matches!(value.as_str(), "true" | "yes" | "1")
                }
                other => {
                    return Err(anyhow::anyhow!(
                        "line {}: unknown header '{}'",
                        line_no + 1,
                        other
                    ));
                }
            }
            continue;
        }
        return Err(anyhow::anyhow!(
            "line {}: expected '<day> HH:MM-HH:MM <label> [@ room]', got '{}'",
            line_no + 1,
            line
        ));
    }

    if !invalid.is_empty() {
        return Err(LayoutError::InvalidSession { ids: invalid }.into());
    }
    Ok(schedule)
}

fn strip_comment(line: &str) -> &str {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') || trimmed.starts_with("//") {
        ""
    } else {
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_api_envelope_with_clock_strings() {
        let input = r#"{
            "user_schedule": {
                "id": 42,
                "name": "Semester 3 &amp; Lab",
                "created_at": "2021-08-17T10:00:00Z",
                "has_edit_access": true,
                "schedule_items": [
                    {"day": "Senin", "start": "08:00", "end": "09:40", "name": "Kalkulus", "room": "2.2301"},
                    {"day": "Rabu", "start_time": "13.00", "end_time": "14.40", "name": "SDA"}
                ]
            }
        }"#;
        let parsed = parse_schedule(input).unwrap();
        assert_eq!(parsed.format, InputFormat::Json);
        let schedule = parsed.schedule;
        assert_eq!(schedule.id.as_deref(), Some("42"));
        assert!(schedule.has_edit_access);
        assert_eq!(schedule.display_name(), "Semester 3 & Lab");
        assert_eq!(schedule.sessions.len(), 2);
        assert_eq!(schedule.sessions[0].id, "s1");
        assert_eq!(schedule.sessions[0].day, Day::Mon);
        assert_eq!(schedule.sessions[0].start_minute, 480);
        assert_eq!(schedule.sessions[0].end_minute, 580);
        assert_eq!(schedule.sessions[1].day, Day::Wed);
        assert_eq!(schedule.sessions[1].label, "SDA");
    }

    #[test]
    fn parses_bare_session_list_with_minutes() {
        let input = r#"[
            // JSON5 comment
            {id: "a", day: 0, startMinute: 540, endMinute: 600, label: "A"},
            {id: 7, day: "fri", startMinute: "600", endMinute: 660},
        ]"#;
        let schedule = parse_schedule(input).unwrap().schedule;
        assert_eq!(schedule.sessions.len(), 2);
        assert_eq!(schedule.sessions[0].day, Day::Mon);
        assert_eq!(schedule.sessions[1].id, "7");
        assert_eq!(schedule.sessions[1].day, Day::Fri);
        assert_eq!(schedule.sessions[1].start_minute, 600);
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let input = r#"{"sessions": [
            {"id": "ok", "day": "Mon", "start": "09:00", "end": "10:00"},
            {"id": "no-day", "start": "09:00", "end": "10:00"},
            {"day": "Sunday", "start": "09:00", "end": "10:00"},
            {"id": "no-end", "day": "Tue", "start": "09:00"}
        ]}"#;
        let err = parse_schedule(input).unwrap_err();
        let layout_err = err.downcast_ref::<LayoutError>().unwrap();
        assert_eq!(
            layout_err,
            &LayoutError::InvalidSession {
                ids: vec!["no-day".into(), "s3".into(), "no-end".into()]
            }
        );
    }

    #[test]
    fn malformed_envelope_item_is_an_error() {
        let input = r#"{"user_schedule": {
            "name": "Gasal",
            "schedule_items": [
                {"day": "Senin", "start": "08:00", "end": "09:40", "name": "Kalkulus", "room": 2301}
            ]
        }}"#;
        let err = parse_schedule(input).unwrap_err();
        assert!(err.to_string().contains("user_schedule"), "{err:#}");
    }

    #[test]
    fn unknown_document_shapes_are_rejected() {
        let err = parse_schedule(r#"{"user_schedul": {"schedule_items": []}}"#).unwrap_err();
        assert!(err.to_string().contains("user_schedul"), "{err:#}");
        assert!(parse_schedule("{}").is_err());
        assert!(parse_json_schedule("42").is_err());
    }

    #[test]
    fn trailing_garbage_in_clock_is_an_invalid_session() {
        let input = r#"[
            {"id": "ok", "day": "Mon", "start": "09:00", "end": "10:00"},
            {"id": "typo", "day": "Mon", "start": "10:305", "end": "11:00"},
            {"id": "suffix", "day": "Tue", "start": "10:30abc", "end": "11:00"}
        ]"#;
        let err = parse_schedule(input).unwrap_err();
        assert_eq!(
            err.downcast_ref::<LayoutError>(),
            Some(&LayoutError::InvalidSession {
                ids: vec!["typo".into(), "suffix".into()]
            })
        );
    }

    #[test]
    fn empty_session_list_is_still_a_schedule() {
        let schedule = parse_schedule(r#"{"name": "Kosong", "sessions": []}"#)
            .unwrap()
            .schedule;
        assert_eq!(schedule.name, "Kosong");
        assert!(schedule.sessions.is_empty());
    }

    #[test]
    fn parses_text_format() {
        let input = "\
# my week
name: Genap 2021
created: 2021-02-01
Mon 09:00-10:00 Calculus @ A1.01
[lab] Senin 9.30 - 11.00 Basis Data
Fri 13:00-14:40 Statistika @ Auditorium B
";
        let parsed = parse_schedule(input).unwrap();
        assert_eq!(parsed.format, InputFormat::Text);
        let schedule = parsed.schedule;
        assert_eq!(schedule.name, "Genap 2021");
        assert_eq!(schedule.created_at.as_deref(), Some("2021-02-01"));
        let ids: Vec<&str> = schedule.sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "lab", "s3"]);
        assert_eq!(schedule.sessions[0].room, "A1.01");
        assert_eq!(schedule.sessions[1].label, "Basis Data");
        assert_eq!(schedule.sessions[1].room, "");
        assert_eq!(schedule.sessions[2].room, "Auditorium B");
    }

    #[test]
    fn text_format_rejects_garbage_with_line_number() {
        let err = parse_schedule("Mon 09:00-10:00 A\nthis is not a session").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn text_format_flags_unknown_days() {
        let err = parse_schedule("Sun 09:00-10:00 Rest").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LayoutError>(),
            Some(LayoutError::InvalidSession { .. })
        ));
    }
}
