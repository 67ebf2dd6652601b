use super::*;

/// Rejects the whole input if any session is malformed or any id repeats.
pub(super) fn validate_sessions(sessions: &[Session]) -> Result<(), LayoutError> {
    let invalid: Vec<String> = sessions
        .iter()
        .filter(|session| !session.is_well_formed())
        .map(|session| session.id.clone())
        .collect();
    if !invalid.is_empty() {
        return Err(LayoutError::InvalidSession { ids: invalid });
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(sessions.len());
    let mut duplicates: BTreeSet<String> = BTreeSet::new();
    for session in sessions {
        if !seen.insert(session.id.as_str()) {
            duplicates.insert(session.id.clone());
        }
    }
    if !duplicates.is_empty() {
        return Err(LayoutError::DuplicateSessionId {
            ids: duplicates.into_iter().collect(),
        });
    }
    Ok(())
}

pub(super) fn session_order(a: &Session, b: &Session) -> Ordering {
    a.start_minute
        .cmp(&b.start_minute)
        .then(a.end_minute.cmp(&b.end_minute))
        .then_with(|| a.id.cmp(&b.id))
}

/// Partitions sessions by day, then into connected overlap clusters.
pub fn group(sessions: &[Session]) -> Result<DayClusters<'_>, LayoutError> {
    validate_sessions(sessions)?;

    let mut by_day: BTreeMap<Day, Vec<&Session>> = BTreeMap::new();
    for session in sessions {
        by_day.entry(session.day).or_default().push(session);
    }

    let mut clusters: DayClusters<'_> = BTreeMap::new();
    for (day, mut day_sessions) in by_day {
        day_sessions.sort_by(|a, b| session_order(a, b));
        let day_clusters = sweep_day(&day_sessions);
        tracing::trace!(
            day = %day,
            sessions = day_sessions.len(),
            clusters = day_clusters.len(),
            "grouped day"
        );
        clusters.insert(day, day_clusters);
    }
    Ok(clusters)
}

fn sweep_day<'a>(sorted: &[&'a Session]) -> Vec<OverlapCluster<'a>> {
    let mut out: Vec<OverlapCluster<'a>> = Vec::new();
    for &session in sorted {
        match out.last_mut() {
            Some(current) if session.start_minute < current.end_minute => current.push(session),
            _ => out.push(OverlapCluster::open(session)),
        }
    }
    out
}

/// Clusters of `day`, empty when the day has no sessions.
pub fn clusters_for<'m, 'a>(clusters: &'m DayClusters<'a>, day: Day) -> &'m [OverlapCluster<'a>] {
    clusters.get(&day).map(Vec::as_slice).unwrap_or(&[])
}
