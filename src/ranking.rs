//! Cohort ranking: scoring, deterministic ordering, the windowed
//! leaderboard view, and display-name masking.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::model::{RankingEntry, RawRecord, Role, Scalar, UnitRange};
use crate::normalize;

/// Lesson keys that contribute to the headteacher total score. Lessons
/// outside this set are silently excluded from the sum.
pub const RANKED_LESSONS: [i64; 6] = [0, 1, 2, 3, 4, 5];

/// Entries returned on each side of the target in the leaderboard window.
pub const WINDOW_RADIUS: usize = 5;

struct Bucket {
    name: String,
    user_id: Option<Scalar>,
    /// Keyed by lesson; `None` collects rows whose lesson key does not
    /// parse. Later rows overwrite earlier ones per key.
    accuracies: BTreeMap<Option<i64>, f64>,
    row_count: usize,
    finished_count: usize,
}

/// Orders the whole cohort and assigns 1-based ranks.
///
/// Row inclusion is role-dependent: headteacher mode keeps only rows of
/// unit `range.max`; counselor mode keeps the full `[min, max]` range.
/// Grouping preserves first-appearance order and the sorts are stable, so
/// identical input always yields identical ranks. Ties stay in input
/// order except for the counselor rule that places the target student
/// first among completion-rate ties.
pub fn rank(
    rows: &[RawRecord],
    range: UnitRange,
    role: Role,
    current_student: &str,
) -> (Vec<RankingEntry>, usize) {
    let mut order: Vec<Bucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for r in rows {
        let unit = r.unit();
        match role {
            Role::Headteacher => {
                if unit != Some(range.max) {
                    continue;
                }
            }
            Role::Counselor => match unit {
                Some(u) if u >= range.min && u <= range.max => {}
                _ => continue,
            },
        }

        let slot = *index.entry(r.real_name.clone()).or_insert_with(|| {
            order.push(Bucket {
                name: r.real_name.clone(),
                user_id: r.user_id.clone(),
                accuracies: BTreeMap::new(),
                row_count: 0,
                finished_count: 0,
            });
            order.len() - 1
        });
        let bucket = &mut order[slot];
        bucket.accuracies.insert(r.lesson(), r.accuracy());
        bucket.row_count += 1;
        if r.is_finished() {
            bucket.finished_count += 1;
        }
    }

    let mut entries: Vec<RankingEntry> = order
        .into_iter()
        .map(|b| {
            let total_score: f64 = RANKED_LESSONS
                .iter()
                .filter_map(|l| b.accuracies.get(&Some(*l)))
                .sum();
            let avg_accuracy = if b.accuracies.is_empty() {
                0.0
            } else {
                b.accuracies.values().sum::<f64>() / b.accuracies.len() as f64
            };
            let completion_rate = if b.row_count > 0 {
                b.finished_count as f64 / b.row_count as f64 * 100.0
            } else {
                0.0
            };
            RankingEntry {
                name: b.name,
                user_id: b.user_id,
                accuracies: b
                    .accuracies
                    .into_iter()
                    .filter_map(|(k, v)| k.map(|lesson| (lesson, v)))
                    .collect(),
                total_score: normalize::round_off_whole(total_score),
                avg_accuracy,
                completion_rate,
                rank: 0,
            }
        })
        .collect();

    match role {
        Role::Headteacher => {
            entries.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        }
        Role::Counselor => {
            entries.sort_by(|a, b| {
                b.completion_rate
                    .partial_cmp(&a.completion_rate)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| {
                        if a.name == current_student {
                            std::cmp::Ordering::Less
                        } else if b.name == current_student {
                            std::cmp::Ordering::Greater
                        } else {
                            b.avg_accuracy
                                .partial_cmp(&a.avg_accuracy)
                                .unwrap_or(std::cmp::Ordering::Equal)
                        }
                    })
            });
        }
    }

    for (i, e) in entries.iter_mut().enumerate() {
        e.rank = i + 1;
    }
    let total = entries.len();
    (entries, total)
}

/// The leaderboard slice centered on the target: up to `WINDOW_RADIUS`
/// entries each side, clipped at both ends. Empty when the target is not
/// in the cohort.
pub fn window<'a>(entries: &'a [RankingEntry], current_student: &str) -> &'a [RankingEntry] {
    let Some(idx) = entries.iter().position(|e| e.name == current_student) else {
        return &[];
    };
    let start = idx.saturating_sub(WINDOW_RADIUS);
    let end = (idx + WINDOW_RADIUS + 1).min(entries.len());
    &entries[start..end]
}

/// Visual privacy mask for non-target names: first character plus a single
/// placeholder. Not a security control; the full entry still carries the
/// real name and id.
pub fn mask_name(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.next().is_some() {
        format!("{}x", first)
    } else {
        first.to_string()
    }
}
