use once_cell::sync::Lazy;
use regex::Regex;

static GRADEABLE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]*$").expect("Invalid gradeable id regex"));

pub fn validate_gradeable_id(id: &str) -> Result<(), &'static str> {
    // 作业 ID 格式校验：只能包含字母、数字、下划线或连字符
    if !GRADEABLE_ID_RE.is_match(id) {
        return Err("Gradeable id must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_submitter_id(id: &str) -> Result<(), &'static str> {
    // 提交者 ID 会拼接进提交目录路径，不允许路径分隔符与 `..`
    if id.is_empty() || !GRADEABLE_ID_RE.is_match(id) {
        return Err("Submitter id must be non-empty and contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), &'static str> {
    if title.is_empty() {
        return Err("Title must not be empty");
    }
    Ok(())
}

pub fn validate_min_grading_group(group: i64) -> Result<(), &'static str> {
    // 0 会导致没有人能编辑该作业
    if !(1..=4).contains(&group) {
        return Err("Minimum grading group must be between 1 and 4");
    }
    Ok(())
}

pub fn validate_precision(precision: f64) -> Result<(), &'static str> {
    if !precision.is_finite() || precision < 0.0 {
        return Err("Precision must be a non-negative number");
    }
    Ok(())
}
