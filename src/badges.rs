//! Achievement badge derivation.
//!
//! Thresholds live here as named constants so policy changes never touch
//! the aggregation walk.

use crate::model::{Badge, BadgeCategory, BadgeTier, UnitMetric};

/// Star counters cap here regardless of how many lessons qualify.
pub const MAX_BADGE_STARS: usize = 5;
/// Completed units needed for the gold completion badge (counselor mode).
pub const GOLD_COMPLETION_UNITS: usize = 4;
/// Mean accuracy needed for the model accuracy badge (counselor mode).
pub const MODEL_ACCURACY_PCT: f64 = 90.0;
/// Per-lesson accuracy that counts toward the mastery-sprint stars.
pub const SPRINT_ACCURACY_PCT: f64 = 50.0;

pub fn completion_badge(completed_units: usize) -> Badge {
    if completed_units >= GOLD_COMPLETION_UNITS {
        Badge {
            name: "金牌完课王".to_string(),
            category: BadgeCategory::Completion,
            tier: BadgeTier::Gold,
            description: "金牌成就达成！全课程通关，你就是学习王者！".to_string(),
            stars: None,
        }
    } else {
        Badge {
            name: "学习之星".to_string(),
            category: BadgeCategory::Completion,
            tier: BadgeTier::Star,
            description: "学习之星已点亮！表现非常亮眼，加油向前冲！".to_string(),
            stars: None,
        }
    }
}

pub fn accuracy_badge(avg_accuracy: f64) -> Badge {
    if avg_accuracy >= MODEL_ACCURACY_PCT {
        Badge {
            name: "学习典范".to_string(),
            category: BadgeCategory::Accuracy,
            tier: BadgeTier::Model,
            description: "你的学习质量极高，展现典范级的掌握力。".to_string(),
            stars: None,
        }
    } else {
        Badge {
            name: "稳定高手".to_string(),
            category: BadgeCategory::Accuracy,
            tier: BadgeTier::Master,
            description: "稳定且扎实，保持这个节奏！".to_string(),
            stars: None,
        }
    }
}

/// Walks the lesson sequence (pre-test excluded) and counts qualifying
/// lessons per badge predicate. The progress predicate compares against
/// the pre-test baseline, so without a pre-test that counter stays zero.
pub fn headteacher_badges(lessons: &[UnitMetric]) -> Vec<Badge> {
    let pre_test = lessons.iter().find(|l| l.unit_number == 0);
    let mut progress = 0usize;
    let mut persistence = 0usize;
    let mut time_efficiency = 0usize;
    let mut sprint = 0usize;

    for l in lessons {
        if l.unit_number == 0 {
            continue;
        }
        if let Some(pre) = pre_test {
            if l.accuracy > pre.accuracy {
                progress += 1;
            }
        }
        if l.completed {
            persistence += 1;
        }
        if l.time_spent_seconds > 0 && (l.time_spent_seconds as f64) < l.class_time_spent_seconds {
            time_efficiency += 1;
        }
        if l.accuracy >= SPRINT_ACCURACY_PCT {
            sprint += 1;
        }
    }

    vec![
        star_badge(
            "学习进步徽章",
            BadgeCategory::Accuracy,
            BadgeTier::Progress,
            "每一次突破，都是对自我的超越，你是最棒的进步小达人！",
            progress,
        ),
        star_badge(
            "坚持小达人",
            BadgeCategory::Completion,
            BadgeTier::Growth,
            "滴水穿石，你的每一份坚持都在为成功的未来铺路，继续保持！",
            persistence,
        ),
        star_badge(
            "时间小飞侠",
            BadgeCategory::Accuracy,
            BadgeTier::Potential,
            "灵动如闪电，你的高效思维让学习变得如此轻松，为你点赞！",
            time_efficiency,
        ),
        star_badge(
            "满分冲刺星",
            BadgeCategory::Accuracy,
            BadgeTier::Master,
            "瞄准目标，全力以赴，你的专注让每一个关卡都变得简单！",
            sprint,
        ),
    ]
}

fn star_badge(
    name: &str,
    category: BadgeCategory,
    tier: BadgeTier,
    description: &str,
    count: usize,
) -> Badge {
    Badge {
        name: name.to_string(),
        category,
        tier,
        description: description.to_string(),
        stars: Some(count.min(MAX_BADGE_STARS) as u8),
    }
}
