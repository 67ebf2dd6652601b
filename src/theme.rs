use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub text_color: String,
    pub muted_text_color: String,
    pub grid_line_color: String,
    pub header_background: String,
    pub session_text_color: String,
    pub session_border_color: String,
    pub session_palette: Vec<String>,
}

impl Theme {
    pub fn timetable_default() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            background: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            muted_text_color: "#6B7A90".to_string(),
            grid_line_color: "#E3E8F0".to_string(),
            header_background: "#F7F8FC".to_string(),
            session_text_color: "#FFFFFF".to_string(),
            session_border_color: "#FFFFFF".to_string(),
            session_palette: [
                "#5038BC", "#0EA5E9", "#10B981", "#F97316", "#E11D48", "#6366F1", "#0D9488",
                "#CA8A04",
            ]
            .iter()
            .map(|color| color.to_string())
            .collect(),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#1A1D2E".to_string(),
            text_color: "#F1F3F9".to_string(),
            muted_text_color: "#9AA3B8".to_string(),
            grid_line_color: "#2C3148".to_string(),
            header_background: "#22263A".to_string(),
            session_border_color: "#1A1D2E".to_string(),
            ..Self::timetable_default()
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" | "light" | "base" => Some(Self::timetable_default()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }

    /// Stable colour for a course label, so every meeting of one course shares it.
    pub fn session_color(&self, label: &str) -> &str {
        if self.session_palette.is_empty() {
            return "#5038BC";
        }
        // FNV-1a; std's hasher is not stable across releases.
        let mut hash: u32 = 0x811c_9dc5;
        for byte in label.trim().to_lowercase().bytes() {
            hash ^= byte as u32;
            hash = hash.wrapping_mul(0x0100_0193);
        }
        &self.session_palette[hash as usize % self.session_palette.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::timetable_default()
    }
}
