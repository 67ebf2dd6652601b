use std::path::Path;

use timetable_layout::layout::max_overlap_depth;
use timetable_layout::layout_dump::layout_dump_json;
use timetable_layout::{
    Config, Day, LayoutConfig, LayoutError, Session, Theme, compute_layout, group,
    layout_json_with_config, parse_schedule, render_svg, render_with_config,
};

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).expect("fixture read failed")
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = ["envelope.json", "sessions.json5", "week.txt"];
    let config = Config::default();
    for name in candidates {
        let svg = render_with_config(&fixture(name), &config)
            .unwrap_or_else(|err| panic!("{name}: {err}"));
        assert!(svg.contains("<svg"), "{name}: missing <svg tag");
        assert!(svg.contains("</svg>"), "{name}: missing </svg tag");
    }
}

#[test]
fn api_envelope_lays_out_monday_cluster() {
    let schedule = parse_schedule(&fixture("envelope.json")).unwrap().schedule;
    let layout = compute_layout(&schedule.sessions, &LayoutConfig::default()).unwrap();
    assert_eq!(layout.rects.len(), schedule.sessions.len());

    let columns: Vec<(usize, usize)> = ["1", "2", "3", "4"]
        .iter()
        .map(|id| {
            let rect = layout.rect(id).unwrap();
            (rect.column, rect.total_columns)
        })
        .collect();
    assert_eq!(columns, vec![(0, 3), (1, 3), (2, 3), (0, 1)]);

    let third = layout.rect("3").unwrap();
    assert!(close(third.width, 160.0 / 3.0));
    assert!(close(third.left, 2.0 * 160.0 / 3.0));
    assert!(close(layout.rect("4").unwrap().width, 160.0));
}

#[test]
fn sessions_outside_the_day_window_are_clipped() {
    let schedule = parse_schedule(&fixture("envelope.json")).unwrap().schedule;
    let layout = compute_layout(&schedule.sessions, &LayoutConfig::default()).unwrap();
    assert!(close(layout.height, 14.0 * 60.0 * 0.9));

    let early = layout.rect("6").unwrap();
    assert!(early.clipped_top && !early.clipped_bottom);
    assert_eq!(early.top, 0.0);
    assert!(close(early.height, 54.0));

    let late = layout.rect("7").unwrap();
    assert!(late.clipped_bottom && !late.clipped_top);
    assert!(close(late.bottom(), layout.height));
    assert!(close(late.height, 54.0));
}

#[test]
fn line_format_matches_json_semantics() {
    let schedule = parse_schedule(&fixture("week.txt")).unwrap().schedule;
    assert_eq!(schedule.name, "Minggu Contoh");
    let ids: Vec<&str> = schedule.sessions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["os", "net", "ai", "s4", "s5"]);
    assert_eq!(schedule.sessions[4].day, Day::Sat);

    let layout = compute_layout(&schedule.sessions, &LayoutConfig::default()).unwrap();
    for id in ["os", "net", "ai"] {
        assert_eq!(layout.rect(id).unwrap().total_columns, 3, "{id}");
    }
    let saturday = layout.rect("s5").unwrap();
    assert_eq!(layout.absolute_left(saturday), 5.0 * 160.0);
}

#[test]
fn touching_sessions_form_separate_clusters() {
    let schedule = parse_schedule(&fixture("sessions.json5")).unwrap().schedule;
    let clusters = group(&schedule.sessions).unwrap();
    let monday: Vec<Vec<String>> = clusters[&Day::Mon]
        .iter()
        .map(|cluster| cluster.session_ids())
        .collect();
    assert_eq!(monday, vec![vec!["a", "b", "c"]]);
    assert_eq!(clusters[&Day::Tue].len(), 2);
    assert!(!clusters.contains_key(&Day::Wed));
}

#[test]
fn column_count_equals_overlap_depth() {
    let schedule = parse_schedule(&fixture("sessions.json5")).unwrap().schedule;
    let clusters = group(&schedule.sessions).unwrap();
    let layout = compute_layout(&schedule.sessions, &LayoutConfig::default()).unwrap();
    for cluster in clusters.values().flatten() {
        let depth = max_overlap_depth(&cluster.sessions);
        for session in &cluster.sessions {
            assert_eq!(layout.rect(&session.id).unwrap().total_columns, depth);
        }
    }
    // a/c touch, so they can share column 0 while b sits beside both.
    assert_eq!(layout.rect("a").unwrap().column, 0);
    assert_eq!(layout.rect("b").unwrap().column, 1);
    assert_eq!(layout.rect("c").unwrap().column, 0);
}

#[test]
fn invalid_fixture_fails_without_partial_output() {
    let schedule = parse_schedule(&fixture("invalid.json")).unwrap().schedule;
    let err = compute_layout(&schedule.sessions, &LayoutConfig::default()).unwrap_err();
    assert_eq!(
        err,
        LayoutError::InvalidSession {
            ids: vec!["backwards".to_string()]
        }
    );

    let err = layout_json_with_config(&fixture("invalid.json"), &Config::default()).unwrap_err();
    assert!(err.downcast_ref::<LayoutError>().is_some());
}

#[test]
fn duplicate_ids_are_rejected() {
    let sessions = vec![
        Session::new("x", Day::Mon, 540, 600),
        Session::new("x", Day::Tue, 540, 600),
    ];
    let err = compute_layout(&sessions, &LayoutConfig::default()).unwrap_err();
    assert_eq!(
        err,
        LayoutError::DuplicateSessionId {
            ids: vec!["x".to_string()]
        }
    );
}

#[test]
fn layout_dump_is_stable_json() {
    let input = fixture("sessions.json5");
    let first = layout_json_with_config(&input, &Config::default()).unwrap();
    let second = layout_json_with_config(&input, &Config::default()).unwrap();
    assert_eq!(first, second);

    let value: serde_json::Value = serde_json::from_str(&first).unwrap();
    let rects = value["rects"].as_array().unwrap();
    assert_eq!(rects.len(), 5);
    assert_eq!(rects[3]["sessionId"], "d");
    assert_eq!(rects[3]["room"], "B-204");
    assert_eq!(rects[3]["absoluteLeft"].as_f64().unwrap(), 160.0);
}

#[test]
fn rendered_svg_carries_one_block_per_session() {
    let schedule = parse_schedule(&fixture("envelope.json")).unwrap().schedule;
    let layout = compute_layout(&schedule.sessions, &LayoutConfig::default()).unwrap();
    let config = Config::default();
    let svg = render_svg(&layout, &schedule, &Theme::default(), &config.render);
    assert_eq!(svg.matches("data-session-id=").count(), 7);
    assert!(svg.contains("Jadwal Semester Gasal &amp; Praktikum"));

    let dump = layout_dump_json(&layout, &schedule).unwrap();
    assert!(dump.contains("\"hasEditAccess\": true"));
}
