use super::*;

/// Greedy interval colouring of one cluster.
///
/// Members are visited in start order (ties by end, then id). A column is
/// released once its occupant ends at or before the next start, and the
/// lowest free column is always reused first, so the column count equals the
/// deepest instantaneous overlap in the cluster.
pub fn assign_columns(cluster: &OverlapCluster<'_>) -> Vec<ColumnAssignment> {
    let mut ordered: Vec<&Session> = cluster.sessions.clone();
    ordered.sort_by(|a, b| session_order(a, b));

    let mut active: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();
    let mut free: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
    let mut total_columns = 0usize;
    let mut assignments: Vec<ColumnAssignment> = Vec::with_capacity(ordered.len());

    for session in ordered {
        while let Some(&Reverse((end, column))) = active.peek() {
            if end > session.start_minute {
                break;
            }
            active.pop();
            free.push(Reverse(column));
        }
        let column = match free.pop() {
            Some(Reverse(column)) => column,
            None => {
                total_columns += 1;
                total_columns - 1
            }
        };
        active.push(Reverse((session.end_minute, column)));
        assignments.push(ColumnAssignment {
            session_id: session.id.clone(),
            column,
            total_columns,
        });
    }

    for assignment in &mut assignments {
        assignment.total_columns = total_columns;
    }
    tracing::trace!(
        day = %cluster.day,
        sessions = assignments.len(),
        total_columns,
        "assigned columns"
    );
    assignments
}

/// Largest number of sessions active at a single instant, by sweep line.
pub fn max_overlap_depth(sessions: &[&Session]) -> usize {
    let mut events: Vec<(u32, i32)> = Vec::with_capacity(sessions.len() * 2);
    for session in sessions {
        events.push((session.start_minute, 1));
        events.push((session.end_minute, -1));
    }
    // Ends sort before starts at the same minute: touching is not overlapping.
    events.sort();
    let mut depth = 0i32;
    let mut max_depth = 0i32;
    for (_, delta) in events {
        depth += delta;
        max_depth = max_depth.max(depth);
    }
    max_depth.max(0) as usize
}
