use serde::{Deserialize, Serialize};

/// 课程用户（学生或评分人）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    // 注册分组
    #[serde(default)]
    pub registration_section: Option<String>,
    // 轮换分组
    #[serde(default)]
    pub rotating_section: Option<i64>,
}

impl User {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            registration_section: None,
            rotating_section: None,
        }
    }
}

/// 作业队伍
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub member_ids: Vec<String>,
    #[serde(default)]
    pub registration_section: Option<String>,
    #[serde(default)]
    pub rotating_section: Option<i64>,
}

impl Team {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            member_ids: Vec::new(),
            registration_section: None,
            rotating_section: None,
        }
    }
}

/// 提交者：个人作业为用户，组队作业为队伍
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Submitter {
    User(User),
    Team(Team),
}

impl Submitter {
    pub fn id(&self) -> &str {
        match self {
            Submitter::User(user) => &user.id,
            Submitter::Team(team) => &team.id,
        }
    }

    pub fn is_team(&self) -> bool {
        matches!(self, Submitter::Team(_))
    }

    pub fn registration_section(&self) -> Option<&str> {
        match self {
            Submitter::User(user) => user.registration_section.as_deref(),
            Submitter::Team(team) => team.registration_section.as_deref(),
        }
    }

    pub fn rotating_section(&self) -> Option<i64> {
        match self {
            Submitter::User(user) => user.rotating_section,
            Submitter::Team(team) => team.rotating_section,
        }
    }

    /// 按分组依据取得所属分组名
    pub fn section(&self, key: SectionKey) -> Option<String> {
        match key {
            SectionKey::Registration => self.registration_section().map(str::to_string),
            SectionKey::Rotating => self.rotating_section().map(|s| s.to_string()),
        }
    }
}

impl From<User> for Submitter {
    fn from(user: User) -> Self {
        Submitter::User(user)
    }
}

impl From<Team> for Submitter {
    fn from(team: Team) -> Self {
        Submitter::Team(team)
    }
}

/// 分组依据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Registration,
    Rotating,
}

impl SectionKey {
    pub const REGISTRATION: &'static str = "registration";
    pub const ROTATING: &'static str = "rotating";

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Registration => Self::REGISTRATION,
            SectionKey::Rotating => Self::ROTATING,
        }
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 评分分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingSection {
    pub name: String,
    #[serde(default)]
    pub submitters: Vec<Submitter>,
    #[serde(default)]
    pub graders: Vec<User>,
}

impl GradingSection {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            submitters: Vec::new(),
            graders: Vec::new(),
        }
    }

    pub fn with_submitter<S: Into<Submitter>>(mut self, submitter: S) -> Self {
        self.submitters.push(submitter.into());
        self
    }

    pub fn with_grader(mut self, grader: User) -> Self {
        self.graders.push(grader);
        self
    }

    pub fn has_grader(&self, grader_id: &str) -> bool {
        self.graders.iter().any(|g| g.id == grader_id)
    }
}
