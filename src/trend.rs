//! Trend narrative classification.
//!
//! Pure, total classifiers over the ordered metric sequence: every
//! reachable input maps to exactly one category, with a stable fallback
//! guaranteeing totality. Rule-set choices for the historically divergent
//! variants are recorded in DESIGN.md: the accuracy streak requires strict
//! increase, the error streak allows ties (non-increasing), and the
//! counselor classifier uses the three-category rules.

use crate::model::{TrendNarrative, TrendStatus, UnitMetric};
use crate::normalize::round_off_whole;

fn narrative(status: TrendStatus, title: &str, content: String) -> TrendNarrative {
    TrendNarrative {
        status,
        title: title.to_string(),
        content,
    }
}

/// Pre-test (lesson 0) and the ascending active lessons.
fn split_pre_test(lessons: &[UnitMetric]) -> (Option<&UnitMetric>, Vec<&UnitMetric>) {
    let pre_test = lessons.iter().find(|l| l.unit_number == 0);
    let mut active: Vec<&UnitMetric> = lessons.iter().filter(|l| l.unit_number > 0).collect();
    active.sort_by_key(|l| l.unit_number);
    (pre_test, active)
}

/// Headteacher accuracy trend. Priority: monotonic rise (strict, needs at
/// least two active lessons) -> pre-test comparison -> stable.
pub fn headteacher_accuracy_trend(lessons: &[UnitMetric]) -> TrendNarrative {
    let (pre_test, active) = split_pre_test(lessons);
    if active.is_empty() {
        return narrative(
            TrendStatus::Stable,
            "开启挑战",
            "宝贝已准备就绪，期待开启精彩的思维闯关之旅！".to_string(),
        );
    }

    let latest = active[active.len() - 1];
    let rising = active.len() >= 2
        && active
            .windows(2)
            .all(|pair| pair[1].accuracy > pair[0].accuracy);
    if rising {
        return narrative(
            TrendStatus::Rising,
            "完美的阶梯式成长",
            format!(
                "完美的阶梯式成长！课程设计的每一步挑战，孩子都步步为营，正确率从{}%一路稳定升至{}%。这正是科学学习路径与孩子努力同频共振的证明。",
                round_off_whole(active[0].accuracy),
                round_off_whole(latest.accuracy)
            ),
        );
    }

    if let Some(pre) = pre_test {
        let x = round_off_whole(pre.accuracy);
        let y = round_off_whole(latest.accuracy);
        let z = round_off_whole((latest.accuracy - pre.accuracy).abs());
        let n = latest.unit_number;
        if latest.accuracy > pre.accuracy {
            return narrative(
                TrendStatus::Improving,
                "进步跨越，表现亮眼",
                format!(
                    "太棒了！对比课前测（正确率{}%），宝贝在第{}课的正确率已提升至 {}%，{}个百分点的跨越清晰展现了进步！",
                    x, n, y, z
                ),
            );
        }
        return narrative(
            TrendStatus::Potential,
            "坚持思考，潜力无限",
            format!(
                "值得点赞！从课前到第{}节课的全程学习，宝贝展现了出色的坚持与思考习惯。面对不断升级的挑战仍兴趣盎然，这份专注力是未来突破的最大潜力。",
                n
            ),
        );
    }

    narrative(
        TrendStatus::Stable,
        "保持状态",
        "展现了出色的学习习惯，面对挑战毫不退缩。保持这份专注力，下一次突破就在眼前！".to_string(),
    )
}

/// Headteacher error-count trend. Same structure over wrong-answer counts;
/// the streak check allows ties (non-increasing), then the pre-test
/// comparison (fewer errors reads as success, more as extension work),
/// then the stable fallback.
pub fn headteacher_error_trend(lessons: &[UnitMetric]) -> TrendNarrative {
    let (pre_test, active) = split_pre_test(lessons);
    if active.is_empty() {
        return narrative(
            TrendStatus::Stable,
            "学习足迹",
            "暂无记录，期待宝贝精彩表现。".to_string(),
        );
    }

    let latest = active[active.len() - 1];
    let decreasing = active.len() >= 2
        && active
            .windows(2)
            .all(|pair| pair[1].wrong_count <= pair[0].wrong_count);
    if decreasing {
        return narrative(
            TrendStatus::Success,
            "步步为营，飞速进步",
            "步步为营，错题持续减少，学习习惯与效果俱佳，进步飞速！".to_string(),
        );
    }

    if let Some(pre) = pre_test {
        if latest.wrong_count < pre.wrong_count {
            return narrative(
                TrendStatus::Improving,
                "成效显著",
                "错题日益减少，可见知识掌握越发扎实牢固！".to_string(),
            );
        }
        if latest.wrong_count > pre.wrong_count {
            return narrative(
                TrendStatus::Extension,
                "思维拓展",
                "挑战升级，敢于尝试复杂题目，正是思维深入拓展的表现！".to_string(),
            );
        }
    }

    narrative(
        TrendStatus::Stable,
        "专注攻克",
        "每一道错题的订正都是一次思维的重塑，保持这种认真的学习态度。".to_string(),
    )
}

/// Counselor trend over the unit sequence: always at or above the cohort
/// baseline and finishing higher than it started reads as leading-and-
/// rising, always-above alone as leading, anything else as tracking.
pub fn counselor_trend(units: &[UnitMetric]) -> TrendNarrative {
    if units.is_empty() {
        return narrative(
            TrendStatus::Stable,
            "稳步提升",
            "继续保持良好的学习状态！".to_string(),
        );
    }
    let first = &units[0];
    let last = &units[units.len() - 1];
    let always_above = units.iter().all(|u| u.accuracy >= u.class_accuracy);
    let rising = last.accuracy > first.accuracy;

    if always_above && rising {
        return narrative(
            TrendStatus::Rising,
            "持续领先且上升",
            "表现优秀且持续进步！各单元正确率均高于班级平均水平并稳步上升。".to_string(),
        );
    }
    if always_above {
        return narrative(
            TrendStatus::Above,
            "整体领先",
            "整体表现稳定领先！基础扎实，保持这个节奏。".to_string(),
        );
    }
    narrative(
        TrendStatus::Stable,
        "紧跟步伐",
        "表现稳定，跟紧班级步伐，突破薄弱环节有望实现领先。".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(seq: i64, accuracy: f64, wrong: i64) -> UnitMetric {
        UnitMetric {
            unit_number: seq,
            unit_name: String::new(),
            time_spent_seconds: 0,
            class_time_spent_seconds: 0.0,
            completed: true,
            status_label: String::new(),
            accuracy,
            class_accuracy: 0.0,
            pass_rate: 0.0,
            class_pass_rate: 0.0,
            wrong_count: wrong,
            analysis: String::new(),
        }
    }

    fn unit(seq: i64, accuracy: f64, class_accuracy: f64) -> UnitMetric {
        UnitMetric {
            class_accuracy,
            ..lesson(seq, accuracy, 0)
        }
    }

    #[test]
    fn strictly_increasing_accuracy_reads_as_rising() {
        let lessons = vec![lesson(1, 60.0, 0), lesson(2, 70.0, 0), lesson(3, 85.0, 0)];
        let t = headteacher_accuracy_trend(&lessons);
        assert_eq!(t.status, TrendStatus::Rising);
        assert!(t.content.contains("60%"));
        assert!(t.content.contains("85%"));
    }

    #[test]
    fn a_dip_breaks_the_rise() {
        let lessons = vec![lesson(1, 60.0, 0), lesson(2, 55.0, 0), lesson(3, 85.0, 0)];
        let t = headteacher_accuracy_trend(&lessons);
        assert_ne!(t.status, TrendStatus::Rising);
        assert_eq!(t.status, TrendStatus::Stable, "no pre-test to compare against");
    }

    #[test]
    fn pre_test_comparison_wins_when_not_monotonic() {
        // 55 -> 60 -> 58 is not a rise; 58 against the pre-test's 40 is.
        let lessons = vec![
            lesson(0, 40.0, 0),
            lesson(1, 55.0, 0),
            lesson(2, 60.0, 0),
            lesson(3, 58.0, 0),
        ];
        let t = headteacher_accuracy_trend(&lessons);
        assert_eq!(t.status, TrendStatus::Improving);
        assert!(t.content.contains("40%"), "pre-test value: {}", t.content);
        assert!(t.content.contains("58%"), "latest value: {}", t.content);
        assert!(t.content.contains("18个百分点"), "gap: {}", t.content);
    }

    #[test]
    fn latest_at_or_below_pre_test_reads_as_potential() {
        let lessons = vec![lesson(0, 70.0, 0), lesson(1, 80.0, 0), lesson(2, 65.0, 0)];
        let t = headteacher_accuracy_trend(&lessons);
        assert_eq!(t.status, TrendStatus::Potential);
    }

    #[test]
    fn empty_sequence_is_the_not_started_case() {
        let t = headteacher_accuracy_trend(&[lesson(0, 40.0, 0)]);
        assert_eq!(t.status, TrendStatus::Stable);
        assert_eq!(t.title, "开启挑战");
    }

    #[test]
    fn error_streak_allows_ties() {
        let lessons = vec![lesson(1, 0.0, 5), lesson(2, 0.0, 5), lesson(3, 0.0, 3)];
        let t = headteacher_error_trend(&lessons);
        assert_eq!(t.status, TrendStatus::Success);
    }

    #[test]
    fn error_rebound_defers_to_pre_test_comparison() {
        let lessons = vec![
            lesson(0, 0.0, 6),
            lesson(1, 0.0, 2),
            lesson(2, 0.0, 4),
        ];
        let t = headteacher_error_trend(&lessons);
        assert_eq!(t.status, TrendStatus::Improving, "4 errors beats the pre-test's 6");

        let worse = vec![lesson(0, 0.0, 1), lesson(1, 0.0, 0), lesson(2, 0.0, 3)];
        let t = headteacher_error_trend(&worse);
        assert_eq!(t.status, TrendStatus::Extension);

        let equal = vec![lesson(0, 0.0, 3), lesson(1, 0.0, 1), lesson(2, 0.0, 3)];
        let t = headteacher_error_trend(&equal);
        assert_eq!(t.status, TrendStatus::Stable);
    }

    #[test]
    fn counselor_categories() {
        let leading_rising = vec![unit(1, 80.0, 70.0), unit(2, 90.0, 75.0)];
        assert_eq!(counselor_trend(&leading_rising).status, TrendStatus::Rising);

        let leading_flat = vec![unit(1, 90.0, 70.0), unit(2, 85.0, 75.0)];
        assert_eq!(counselor_trend(&leading_flat).status, TrendStatus::Above);

        let tracking = vec![unit(1, 60.0, 70.0), unit(2, 90.0, 75.0)];
        assert_eq!(counselor_trend(&tracking).status, TrendStatus::Stable);

        assert_eq!(counselor_trend(&[]).status, TrendStatus::Stable);
    }
}
