//! Report formatting configuration.
//!
//! Caller-supplied label overrides and per-unit counters live in an
//! explicit config object passed per request. They decorate the finished
//! report; the aggregation core never sees them.

use serde::{Deserialize, Serialize};

use crate::labels;
use crate::model::UnitMetric;
use crate::normalize;

/// Read-only display overrides, all indexed by unit position (not unit
/// number). Empty strings count as absent so a sparse override list can
/// skip rows.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayConfig {
    /// Curriculum key selecting the default unit titles, e.g. "一年级".
    pub curriculum: Option<String>,
    pub unit_names: Vec<String>,
    /// Per-unit knowledge association tags.
    pub associations: Vec<String>,
    pub knowledge_point_counts: Vec<String>,
    pub error_counts: Vec<String>,
}

/// One decorated row for the report table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDisplay {
    pub unit_number: i64,
    pub label: String,
    pub time_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_point_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_count: Option<String>,
}

/// Resolves each unit's display row. Label precedence: caller override,
/// then the curriculum title for that position, then the aggregated name.
pub fn resolve_units(units: &[UnitMetric], cfg: &DisplayConfig) -> Vec<UnitDisplay> {
    let curriculum = cfg
        .curriculum
        .as_deref()
        .and_then(labels::curriculum_units);
    units
        .iter()
        .enumerate()
        .map(|(i, u)| {
            let label = override_at(&cfg.unit_names, i)
                .or_else(|| curriculum.and_then(|c| c.get(i)).map(|s| s.to_string()))
                .unwrap_or_else(|| u.unit_name.clone());
            UnitDisplay {
                unit_number: u.unit_number,
                label,
                time_label: normalize::format_duration(u.time_spent_seconds),
                association: override_at(&cfg.associations, i),
                knowledge_point_count: override_at(&cfg.knowledge_point_counts, i),
                error_count: override_at(&cfg.error_counts, i),
            }
        })
        .collect()
}

fn override_at(values: &[String], i: usize) -> Option<String> {
    values
        .get(i)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Leaderboard banner comment tiers, keyed on rank position in the cohort.
pub fn rank_comment(rank: Option<usize>, total: usize) -> String {
    let Some(rank) = rank else {
        return "继续努力，争取更好的成绩！".to_string();
    };
    let ratio = rank as f64 / total.max(1) as f64;
    if rank == 1 {
        "独占鳌头！你是全班最闪亮的学习明星，展现了非凡的掌握力！".to_string()
    } else if rank <= 3 {
        "名列前茅！优秀的学习习惯是你成功的基石，保持这份冲劲！".to_string()
    } else if ratio <= 0.2 {
        "表现优异！已进入班级第一梯队，继续保持稳健的步伐，冲刺巅峰！".to_string()
    } else if ratio <= 0.5 {
        "进步显著！你正走在稳步提升的阶梯上，离尖子生行列仅一步之遥！".to_string()
    } else {
        "潜力无限！保持专注与耐心，每一份汗水都会在未来的考试中开出灿烂之花！".to_string()
    }
}
