use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::labels;
use crate::normalize;

/// A cell from the upstream spreadsheet export. Depending on how the sheet
/// was authored, the same column arrives as a number in one file and a
/// string in the next, so every outcome field is decoded through this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

/// One row of the export: one student x unit x lesson attempt.
///
/// Column names match the export headers verbatim. Presence of the required
/// columns is checked once at load time (`records.load`); individual cells
/// may still be absent or malformed, which the normalizers map to zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub user_id: Option<Scalar>,
    #[serde(default)]
    pub real_name: String,
    #[serde(default)]
    pub package_grade: String,
    #[serde(default)]
    pub counselor_name: String,
    /// Unit number (the export calls units "levels").
    #[serde(default)]
    pub level_sequence: Option<Scalar>,
    /// Lesson number within the unit; lesson 0 is the pre-test.
    #[serde(default)]
    pub unit_sequence: Option<Scalar>,
    #[serde(default)]
    pub unit_finish_status: String,
    #[serde(default)]
    pub first_cost_seconds: Option<Scalar>,
    #[serde(default)]
    pub answer_right_rate: Option<Scalar>,
    #[serde(default)]
    pub pass_rate: Option<Scalar>,
    #[serde(default)]
    pub wrong_answer_count: Option<Scalar>,
    /// Step-level failure count; preferred over `wrong_answer_count` when both exist.
    #[serde(default)]
    pub first_finish_answer_step_fail_cnt: Option<Scalar>,
}

impl RawRecord {
    pub fn unit(&self) -> Option<i64> {
        normalize::parse_sequence(self.level_sequence.as_ref())
    }

    pub fn lesson(&self) -> Option<i64> {
        normalize::parse_sequence(self.unit_sequence.as_ref())
    }

    pub fn accuracy(&self) -> f64 {
        normalize::parse_rate(self.answer_right_rate.as_ref())
    }

    pub fn pass_rate(&self) -> f64 {
        normalize::parse_rate(self.pass_rate.as_ref())
    }

    pub fn elapsed_seconds(&self) -> i64 {
        normalize::parse_seconds(self.first_cost_seconds.as_ref())
    }

    pub fn wrong_count(&self) -> i64 {
        let field = self
            .first_finish_answer_step_fail_cnt
            .as_ref()
            .or(self.wrong_answer_count.as_ref());
        normalize::parse_sequence(field).unwrap_or(0)
    }

    pub fn is_finished(&self) -> bool {
        self.unit_finish_status == labels::FINISHED_STATUS
    }
}

/// Selects the aggregation, ranking, and narrative strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructor-of-record: aggregates whole units across a unit range.
    Counselor,
    /// Head-of-class: aggregates the lessons of a single unit.
    Headteacher,
}

/// Inclusive unit range, both ends drawn from the student's observed units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRange {
    pub min: i64,
    pub max: i64,
}

/// One aggregated row of the report: a unit in counselor mode, a lesson of
/// the target unit in headteacher mode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitMetric {
    pub unit_number: i64,
    pub unit_name: String,
    pub time_spent_seconds: i64,
    /// Cohort average elapsed time for the same key (headteacher mode only).
    pub class_time_spent_seconds: f64,
    pub completed: bool,
    pub status_label: String,
    pub accuracy: f64,
    pub class_accuracy: f64,
    pub pass_rate: f64,
    pub class_pass_rate: f64,
    pub wrong_count: i64,
    pub analysis: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Completion,
    Accuracy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    Gold,
    Star,
    Model,
    Master,
    Progress,
    Growth,
    Potential,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub name: String,
    pub category: BadgeCategory,
    pub tier: BadgeTier,
    pub description: String,
    /// Qualifying-lesson count clamped to 0..=5; headteacher badges only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStatus {
    Rising,
    Improving,
    Potential,
    Stable,
    Success,
    Extension,
    Above,
}

/// A classified trend plus the rendered sentence the frontend shows verbatim.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendNarrative {
    pub status: TrendStatus,
    pub title: String,
    pub content: String,
}

/// Upstream fills this editor-side; the engine only carries the shape.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub milestone: String,
    pub highlights: Vec<String>,
    pub improvements: Vec<String>,
}

/// The full per-student report. Built fresh on every call; a pure function
/// of (rows, student, role, range).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub student_name: String,
    pub grade: String,
    pub teacher: String,
    pub role: Role,

    pub total_time_seconds: i64,
    pub avg_time_per_session: f64,
    pub time_comment: String,

    pub completion_badge: Badge,
    pub accuracy_badge: Badge,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ht_badges: Option<Vec<Badge>>,

    pub completed_units_count: usize,
    pub units: Vec<UnitMetric>,

    pub trend_analysis: TrendNarrative,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_analysis: Option<TrendNarrative>,
    pub monthly_summary: MonthlySummary,
}

/// One cohort member after scoring and ranking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub name: String,
    pub user_id: Option<Scalar>,
    /// lesson number -> accuracy, last write wins per lesson key.
    pub accuracies: BTreeMap<i64, f64>,
    /// Headteacher score: rounded accuracy sum over the fixed lesson set.
    pub total_score: i64,
    /// Counselor score pair.
    pub avg_accuracy: f64,
    pub completion_rate: f64,
    /// 1-based, assigned after the full sort.
    pub rank: usize,
}
