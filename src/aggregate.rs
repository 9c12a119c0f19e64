//! The report aggregation engine.
//!
//! `aggregate` is a pure function of (rows, student, role, unit range): it
//! never mutates the input rows and identical inputs produce identical
//! reports. A student with no rows yields `None`; the not-found case is
//! the caller's to message, not an error here.

use crate::badges;
use crate::labels;
use crate::model::{MonthlySummary, RawRecord, Report, Role, UnitMetric, UnitRange};
use crate::trend;

const ANALYSIS_MASTERY: &str = "掌握扎实，超越平均";
const ANALYSIS_REINFORCE: &str = "态度认真，请巩固错题";

const COUNSELOR_TIME_COMMENT: &str = "学习效率很高，表现出色。";
const HEADTEACHER_TIME_COMMENT: &str = "一节课20分钟，短时高效，每天练出效果！";

pub fn aggregate(
    rows: &[RawRecord],
    student: &str,
    role: Role,
    range: Option<UnitRange>,
) -> Option<Report> {
    let student_rows: Vec<&RawRecord> = rows.iter().filter(|r| r.real_name == student).collect();
    if student_rows.is_empty() {
        return None;
    }

    let units = match role {
        Role::Headteacher => lesson_metrics(rows, &student_rows, range),
        Role::Counselor => unit_metrics(rows, &student_rows, range),
    };

    let total_time: i64 = units.iter().map(|u| u.time_spent_seconds).sum();
    let avg_time = total_time as f64 / units.len().max(1) as f64;
    let completed_count = units.iter().filter(|u| u.completed).count();

    let first = student_rows[0];
    let grade = labels::translate_grade(&first.package_grade);
    let teacher = if first.counselor_name.is_empty() {
        labels::DEFAULT_TEACHER.to_string()
    } else {
        first.counselor_name.clone()
    };

    let report = match role {
        Role::Headteacher => Report {
            student_name: student.to_string(),
            grade,
            teacher,
            role,
            total_time_seconds: total_time,
            avg_time_per_session: avg_time,
            time_comment: HEADTEACHER_TIME_COMMENT.to_string(),
            // Placeholders in this mode; the star badges carry the signal.
            completion_badge: badges::completion_badge(0),
            accuracy_badge: badges::accuracy_badge(0.0),
            ht_badges: Some(badges::headteacher_badges(&units)),
            completed_units_count: completed_count,
            trend_analysis: trend::headteacher_accuracy_trend(&units),
            error_analysis: Some(trend::headteacher_error_trend(&units)),
            units,
            monthly_summary: MonthlySummary::default(),
        },
        Role::Counselor => {
            let avg_accuracy =
                units.iter().map(|u| u.accuracy).sum::<f64>() / units.len().max(1) as f64;
            Report {
                student_name: student.to_string(),
                grade,
                teacher,
                role,
                total_time_seconds: total_time,
                avg_time_per_session: avg_time,
                time_comment: COUNSELOR_TIME_COMMENT.to_string(),
                completion_badge: badges::completion_badge(completed_count),
                accuracy_badge: badges::accuracy_badge(avg_accuracy),
                ht_badges: None,
                completed_units_count: completed_count,
                trend_analysis: trend::counselor_trend(&units),
                error_analysis: None,
                units,
                monthly_summary: MonthlySummary::default(),
            }
        }
    };

    Some(report)
}

/// Headteacher mode: one metric per lesson of the target unit.
///
/// The target unit is `range.max` when a range is given, else the highest
/// unit the student has a parseable row for. Cohort baselines are averaged
/// per (unit, lesson) key over strictly positive values only: a zero
/// reading counts as missing, not as a true zero.
fn lesson_metrics(
    rows: &[RawRecord],
    student_rows: &[&RawRecord],
    range: Option<UnitRange>,
) -> Vec<UnitMetric> {
    let target = match range {
        Some(r) => Some(r.max),
        None => student_rows.iter().filter_map(|r| r.unit()).max(),
    };
    let Some(target) = target else {
        return Vec::new();
    };

    let mut lessons = Vec::new();
    for r in student_rows {
        if r.unit() != Some(target) {
            continue;
        }
        let Some(seq) = r.lesson() else {
            continue;
        };

        let cohort: Vec<&RawRecord> = rows
            .iter()
            .filter(|row| row.unit() == Some(target) && row.lesson() == Some(seq))
            .collect();
        let class_accuracy = positive_mean(cohort.iter().map(|row| row.accuracy()));
        let class_pass_rate = positive_mean(cohort.iter().map(|row| row.pass_rate()));
        let class_time = positive_mean(cohort.iter().map(|row| row.elapsed_seconds() as f64));

        let completed = r.is_finished();
        lessons.push(UnitMetric {
            unit_number: seq,
            unit_name: labels::lesson_title(seq),
            time_spent_seconds: r.elapsed_seconds(),
            class_time_spent_seconds: class_time,
            completed,
            status_label: if completed {
                labels::STATUS_DONE.to_string()
            } else {
                labels::STATUS_IN_PROGRESS.to_string()
            },
            accuracy: r.accuracy(),
            class_accuracy,
            pass_rate: r.pass_rate(),
            class_pass_rate,
            wrong_count: r.wrong_count(),
            analysis: String::new(),
        });
    }
    lessons.sort_by_key(|l| l.unit_number);
    lessons
}

/// Counselor mode: rows merge into unit buckets across the whole range.
///
/// Rates merge by the recency-weighted pairwise average `(old + new) / 2`
/// seeded at zero; elapsed time sums; completion is OR-accumulated. The
/// cohort baseline for a unit averages every row of that unit across the
/// whole dataset, positive values only.
fn unit_metrics(
    rows: &[RawRecord],
    student_rows: &[&RawRecord],
    range: Option<UnitRange>,
) -> Vec<UnitMetric> {
    let mut buckets: std::collections::BTreeMap<i64, UnitMetric> = std::collections::BTreeMap::new();
    for r in student_rows {
        let Some(unit) = r.unit() else {
            continue;
        };
        if let Some(range) = range {
            if unit < range.min || unit > range.max {
                continue;
            }
        }
        let m = buckets.entry(unit).or_insert_with(|| UnitMetric {
            unit_number: unit,
            unit_name: labels::unit_title(unit),
            time_spent_seconds: 0,
            class_time_spent_seconds: 0.0,
            completed: false,
            status_label: labels::STATUS_IN_PROGRESS.to_string(),
            accuracy: 0.0,
            class_accuracy: 0.0,
            pass_rate: 0.0,
            class_pass_rate: 0.0,
            wrong_count: 0,
            analysis: String::new(),
        });
        m.time_spent_seconds += r.elapsed_seconds();
        m.accuracy = (m.accuracy + r.accuracy()) / 2.0;
        m.pass_rate = (m.pass_rate + r.pass_rate()) / 2.0;
        if r.is_finished() {
            m.completed = true;
            m.status_label = labels::STATUS_DONE.to_string();
        }
    }

    let mut units: Vec<UnitMetric> = buckets.into_values().collect();
    for m in &mut units {
        let cohort: Vec<&RawRecord> = rows
            .iter()
            .filter(|row| row.unit() == Some(m.unit_number))
            .collect();
        m.class_accuracy = positive_mean(cohort.iter().map(|row| row.accuracy()));
        m.class_pass_rate = positive_mean(cohort.iter().map(|row| row.pass_rate()));
        if m.completed {
            m.analysis = if m.accuracy >= m.class_accuracy {
                ANALYSIS_MASTERY.to_string()
            } else {
                ANALYSIS_REINFORCE.to_string()
            };
        }
    }
    units
}

/// Mean of the strictly positive values, 0 when none qualify.
fn positive_mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        if v > 0.0 {
            sum += v;
            count += 1;
        }
    }
    if count > 0 {
        sum / count as f64
    } else {
        0.0
    }
}
