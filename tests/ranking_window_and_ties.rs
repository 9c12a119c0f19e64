
use serde_json::json;
use test_support::{load_rows, record, request_ok, spawn_sidecar};

#[test]
fn window_is_eleven_entries_around_a_mid_cohort_target() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    // 20 students with strictly decreasing accuracy; s10 lands at rank 11.
    let rows: Vec<serde_json::Value> = (0..20)
        .map(|i| {
            record(
                &format!("s{:02}", i),
                1,
                1,
                "完课",
                json!(0.99 - i as f64 * 0.01),
                json!(600),
            )
        })
        .collect();
    load_rows(&mut stdin, &mut reader, "1", rows);

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "ranking.query",
        json!({
            "student": "s10",
            "role": "headteacher",
            "unitRange": { "min": 1, "max": 1 }
        }),
    );
    assert_eq!(result["total"], 20);
    assert_eq!(result["myRank"], 11);

    let entries = result["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 11);
    assert_eq!(entries[0]["rank"], 6);
    assert_eq!(entries[10]["rank"], 16);
}

#[test]
fn masking_spares_only_the_target() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    load_rows(
        &mut stdin,
        &mut reader,
        "1",
        vec![
            record("张小明", 1, 1, "完课", json!(0.9), json!(600)),
            record("李雷", 1, 1, "完课", json!(0.8), json!(600)),
            record("王", 1, 1, "完课", json!(0.7), json!(600)),
        ],
    );

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "ranking.query",
        json!({
            "student": "李雷",
            "role": "headteacher",
            "unitRange": { "min": 1, "max": 1 }
        }),
    );
    let entries = result["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["maskedName"], "张x");
    assert_eq!(entries[1]["maskedName"], "李雷", "the target keeps the full name");
    assert_eq!(entries[2]["maskedName"], "王", "single-character names have nothing to mask");
    // The underlying entries still carry the full identity.
    assert_eq!(entries[0]["name"], "张小明");
    assert_eq!(entries[0]["userId"], "u-张小明");
}

#[test]
fn counselor_tie_puts_the_target_first_regardless_of_accuracy() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    load_rows(
        &mut stdin,
        &mut reader,
        "1",
        vec![
            record("李雷", 1, 1, "完课", json!(0.95), json!(600)),
            record("张小明", 1, 1, "完课", json!(0.60), json!(600)),
        ],
    );

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "ranking.query",
        json!({
            "student": "张小明",
            "role": "counselor",
            "unitRange": { "min": 1, "max": 1 }
        }),
    );
    assert_eq!(result["myRank"], 1);
    let entries = result["entries"].as_array().expect("entries");
    assert_eq!(entries[0]["name"], "张小明");
    assert_eq!(entries[1]["name"], "李雷");
}

#[test]
fn headteacher_ranking_ignores_other_units_and_lesson_six() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    load_rows(
        &mut stdin,
        &mut reader,
        "1",
        vec![
            record("张小明", 2, 0, "完课", json!(0.5), json!(600)),
            record("张小明", 2, 5, "完课", json!(0.5), json!(600)),
            record("张小明", 2, 6, "完课", json!(0.9), json!(600)),
            record("李雷", 1, 1, "完课", json!(1.0), json!(600)),
        ],
    );

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "ranking.query",
        json!({
            "student": "张小明",
            "role": "headteacher",
            "unitRange": { "min": 1, "max": 2 }
        }),
    );
    assert_eq!(result["total"], 1, "unit 1 rows are outside the target unit");
    let entries = result["entries"].as_array().expect("entries");
    assert_eq!(entries[0]["totalScore"], 100, "lesson 6 never contributes");
}

#[test]
fn rank_comment_reflects_position() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let rows: Vec<serde_json::Value> = (0..10)
        .map(|i| {
            record(
                &format!("s{}", i),
                1,
                1,
                "完课",
                json!(0.9 - i as f64 * 0.05),
                json!(600),
            )
        })
        .collect();
    load_rows(&mut stdin, &mut reader, "1", rows);

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "ranking.query",
        json!({ "student": "s0", "role": "headteacher", "unitRange": { "min": 1, "max": 1 } }),
    );
    assert_eq!(result["myRank"], 1);
    assert!(result["comment"].as_str().expect("comment").contains("独占鳌头"));
}
