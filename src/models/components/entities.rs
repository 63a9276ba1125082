use serde::{Deserialize, Serialize};

/// 评分项能力约定
///
/// 作业只通过该 trait 使用评分项；`validate` 失败的评分项不能加入作业。
pub trait Component: std::fmt::Debug + Send + Sync {
    fn id(&self) -> i64;
    fn title(&self) -> &str;
    fn lower_clamp(&self) -> f64;
    fn default_value(&self) -> f64;
    fn max_value(&self) -> f64;
    fn upper_clamp(&self) -> f64;

    /// 校验评分项自身是否合法
    fn validate(&self) -> Result<(), String> {
        if self.title().trim().is_empty() {
            return Err(format!("Component {} must have a title", self.id()));
        }
        let points = [
            self.lower_clamp(),
            self.default_value(),
            self.max_value(),
            self.upper_clamp(),
        ];
        if points.iter().any(|p| !p.is_finite()) {
            return Err(format!("Component {} has non-finite points", self.id()));
        }
        // lower_clamp <= default <= max_value <= upper_clamp
        if !(self.lower_clamp() <= self.default_value()
            && self.default_value() <= self.max_value()
            && self.max_value() <= self.upper_clamp())
        {
            return Err(format!(
                "Component {} points must satisfy lower_clamp <= default <= max_value <= upper_clamp",
                self.id()
            ));
        }
        Ok(())
    }
}

/// 作业评分项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeableComponent {
    // 评分项 ID
    pub id: i64,
    // 标题
    pub title: String,
    // 助教可见备注
    #[serde(default)]
    pub ta_comment: String,
    // 学生可见备注
    #[serde(default)]
    pub student_comment: String,
    pub lower_clamp: f64,
    pub default: f64,
    pub max_value: f64,
    pub upper_clamp: f64,
    // 是否为文本项（不计分）
    #[serde(default)]
    pub text: bool,
    // 是否同伴互评项
    #[serde(default)]
    pub peer: bool,
    // 显示顺序
    #[serde(default)]
    pub order: i64,
}

impl Component for GradeableComponent {
    fn id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn lower_clamp(&self) -> f64 {
        self.lower_clamp
    }

    fn default_value(&self) -> f64 {
        self.default
    }

    fn max_value(&self) -> f64 {
        self.max_value
    }

    fn upper_clamp(&self) -> f64 {
        self.upper_clamp
    }
}
