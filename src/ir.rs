use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "DayToken")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    pub const ALL: [Day; 6] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri, Day::Sat];

    /// Accepts English short/long names and Indonesian names, case-insensitively.
    /// Sunday is not modelled and yields `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        let lower = token.trim().to_ascii_lowercase();
        match lower.as_str() {
            "mon" | "monday" | "senin" => Some(Self::Mon),
            "tue" | "tues" | "tuesday" | "selasa" => Some(Self::Tue),
            "wed" | "wednesday" | "rabu" => Some(Self::Wed),
            "thu" | "thur" | "thurs" | "thursday" | "kamis" => Some(Self::Thu),
            "fri" | "friday" | "jumat" | "jum'at" => Some(Self::Fri),
            "sat" | "saturday" | "sabtu" => Some(Self::Sat),
            _ => None,
        }
    }

    /// 0 = Monday.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Self::Mon => "Mon",
            Self::Tue => "Tue",
            Self::Wed => "Wed",
            Self::Thu => "Thu",
            Self::Fri => "Fri",
            Self::Sat => "Sat",
        }
    }

    pub fn long_name(self) -> &'static str {
        match self {
            Self::Mon => "Monday",
            Self::Tue => "Tuesday",
            Self::Wed => "Wednesday",
            Self::Thu => "Thursday",
            Self::Fri => "Friday",
            Self::Sat => "Saturday",
        }
    }

    pub fn indonesian_name(self) -> &'static str {
        match self {
            Self::Mon => "Senin",
            Self::Tue => "Selasa",
            Self::Wed => "Rabu",
            Self::Thu => "Kamis",
            Self::Fri => "Jumat",
            Self::Sat => "Sabtu",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.short_name())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DayToken {
    Index(usize),
    Name(String),
}

impl TryFrom<DayToken> for Day {
    type Error = String;

    fn try_from(token: DayToken) -> Result<Self, Self::Error> {
        match token {
            DayToken::Index(idx) => {
                Day::from_index(idx).ok_or_else(|| format!("day index out of range: {idx}"))
            }
            DayToken::Name(name) => {
                Day::from_token(&name).ok_or_else(|| format!("unknown day: {name}"))
            }
        }
    }
}

/// One scheduled meeting of a course. Times are minutes since midnight,
/// half-open: `[start_minute, end_minute)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub day: Day,
    pub start_minute: u32,
    pub end_minute: u32,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub room: String,
}

impl Session {
    pub fn new(id: impl Into<String>, day: Day, start_minute: u32, end_minute: u32) -> Self {
        Self {
            id: id.into(),
            day,
            start_minute,
            end_minute,
            label: String::new(),
            room: String::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = room.into();
        self
    }

    pub fn is_well_formed(&self) -> bool {
        self.start_minute < self.end_minute
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_minute.saturating_sub(self.start_minute)
    }

    /// Half-open overlap; touching intervals do not overlap.
    pub fn overlaps(&self, other: &Session) -> bool {
        self.day == other.day
            && self.start_minute < other.end_minute
            && other.start_minute < self.end_minute
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: Option<String>,
    pub name: String,
    pub created_at: Option<String>,
    pub has_edit_access: bool,
    pub sessions: Vec<Session>,
}

impl Schedule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn display_name(&self) -> String {
        let decoded = decode_html_entities(self.name.trim());
        if decoded.is_empty() {
            "Untitled".to_string()
        } else {
            decoded
        }
    }
}

/// Parses `HH:MM` or `HH.MM` into minutes since midnight. `24:00` is accepted
/// as the end of the day. A trailing `:SS` is allowed and dropped.
pub fn parse_clock(value: &str) -> Option<u32> {
    let value = value.trim();
    let (hours, minutes) = value.split_once([':', '.'])?;
    let hours = hours.trim();
    let all_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
    if !(1..=2).contains(&hours.len()) || !all_digits(hours) {
        return None;
    }
    let (minutes, seconds) = match minutes.split_once(':') {
        Some((minutes, seconds)) => (minutes, Some(seconds)),
        None => (minutes, None),
    };
    if minutes.len() != 2 || !all_digits(minutes) {
        return None;
    }
    if let Some(seconds) = seconds
        && (seconds.len() != 2 || !all_digits(seconds) || seconds > "59")
    {
        return None;
    }
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if minutes >= 60 || hours > 24 || (hours == 24 && minutes > 0) {
        return None;
    }
    Some(hours * 60 + minutes)
}

pub fn format_clock(minute: u32) -> String {
    format!("{:02}.{:02}", minute / 60, minute % 60)
}

/// Schedule names come back from the API HTML-escaped.
pub fn decode_html_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let Some(end) = rest.find(';').filter(|end| *end <= 10) else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let entity = &rest[1..end];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ => decode_numeric_entity(entity),
        };
        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix(['x', 'X']) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse().ok()?
    };
    char::from_u32(code)
}
