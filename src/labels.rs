//! Coded-identifier translation and the fixed display copy the report uses.

/// Finish-status marker the export writes for a completed lesson.
pub const FINISHED_STATUS: &str = "完课";

pub const STATUS_DONE: &str = "已完成";
pub const STATUS_IN_PROGRESS: &str = "学习中";

/// Fallback instructor display name when the export column is blank.
pub const DEFAULT_TEACHER: &str = "老师";

const GRADE_CODES: [(&str, &str); 8] = [
    ("pk", "幼儿园小班"),
    ("k", "幼儿园大班"),
    ("one", "一年级"),
    ("two", "二年级"),
    ("three", "三年级"),
    ("four", "四年级"),
    ("five", "五年级"),
    ("six", "六年级"),
];

/// Maps an export grade code to its display grade.
///
/// Exact match first, then first code contained in the value (exports
/// sometimes carry decorated codes like "grade_one"). Unknown codes pass
/// through unchanged so the report still renders something.
pub fn translate_grade(grade: &str) -> String {
    if grade.is_empty() {
        return "未知年级".to_string();
    }
    let lower = grade.trim().to_lowercase();
    for (code, display) in GRADE_CODES {
        if lower == code {
            return display.to_string();
        }
    }
    for (code, display) in GRADE_CODES {
        if lower.contains(code) {
            return display.to_string();
        }
    }
    grade.to_string()
}

/// Default unit titles per grade curriculum, indexed by unit position.
/// The report formatting step falls back to these when the caller supplies
/// no per-unit name overrides.
pub const CURRICULA: [(&str, [&str; 5]); 7] = [
    (
        "一年级",
        [
            "应用题——比较多少初步",
            "应用题——比较多少进阶",
            "逻辑推理——顺序",
            "逻辑推理——不等",
            "逻辑推理——相等",
        ],
    ),
    (
        "一年级弹窗",
        [
            "空间想象——正方体计数",
            "空间想象——数数看不见",
            "逻辑推理——顺序",
            "逻辑推理——不等",
            "逻辑推理——相等",
        ],
    ),
    (
        "二年级",
        [
            "应用题——复杂的排队问题初步",
            "应用题——复杂的排队问题进阶",
            "应用题——还原倒推",
            "数感——横式数字谜初步",
            "数感——横式数字谜进阶",
        ],
    ),
    (
        "三年级",
        [
            "应用题——年龄问题初步",
            "应用题——年龄问题进阶",
            "转化思想—巧求最短路线",
            "计算——巧填算符",
            "计算——巧解整数计算",
        ],
    ),
    (
        "四年级",
        [
            "盈亏问题",
            "生活中的计数原理",
            "图形中的计数原理",
            "长方形中的倍数关系",
            "数形结合",
        ],
    ),
    (
        "五年级",
        [
            "基础行程问题",
            "环形路线问题",
            "火车行程问题",
            "小数乘除法巧算",
            "小数提取公因数",
        ],
    ),
    (
        "六年级",
        [
            "间隔发车问题",
            "特殊法比较分数大小",
            "操作与规律",
            "不定方程",
            "短除模型",
        ],
    ),
];

pub fn curriculum_units(key: &str) -> Option<&'static [&'static str; 5]> {
    CURRICULA
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, units)| units)
}

/// Display title for a counselor-mode unit row.
pub fn unit_title(unit_number: i64) -> String {
    format!("第{}单元", unit_number)
}

/// Display title for a headteacher-mode lesson row; lesson 0 is the pre-test.
pub fn lesson_title(lesson_number: i64) -> String {
    if lesson_number == 0 {
        "课前测".to_string()
    } else {
        format!("第{}讲", lesson_number)
    }
}
