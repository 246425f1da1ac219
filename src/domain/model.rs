use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{parse_leading_integer, validate_non_empty_string};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 個人資料表單的欄位，依表單顯示順序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Age,
    WorkGroup,
    WorkRole,
    WorkResume,
    HobbiesInterests,
}

impl ProfileField {
    pub const ALL: [ProfileField; 5] = [
        ProfileField::Age,
        ProfileField::WorkGroup,
        ProfileField::WorkRole,
        ProfileField::WorkResume,
        ProfileField::HobbiesInterests,
    ];

    /// Wire name of the field, also accepted by `FromStr`.
    pub fn key(self) -> &'static str {
        match self {
            ProfileField::Age => "age",
            ProfileField::WorkGroup => "work_group",
            ProfileField::WorkRole => "work_role",
            ProfileField::WorkResume => "work_resume",
            ProfileField::HobbiesInterests => "hobbies_interests",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Age => "Age",
            ProfileField::WorkGroup => "Work Group/Industry",
            ProfileField::WorkRole => "Work Role",
            ProfileField::WorkResume => "Work Experience Summary",
            ProfileField::HobbiesInterests => "Hobbies & Interests",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            ProfileField::Age => "Enter your age",
            ProfileField::WorkGroup => "e.g., Technology, Finance, Healthcare",
            ProfileField::WorkRole => "e.g., Software Engineer, Product Manager",
            ProfileField::WorkResume => "Brief summary of your work experience and achievements",
            ProfileField::HobbiesInterests => "What do you enjoy doing in your free time?",
        }
    }

    /// Free-text answers that may span several lines.
    pub fn is_multiline(self) -> bool {
        matches!(self, ProfileField::WorkResume | ProfileField::HobbiesInterests)
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProfileField {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        ProfileField::ALL
            .into_iter()
            .find(|field| field.key() == s.trim())
            .ok_or_else(|| ClientError::ValidationError {
                field: s.to_string(),
                message: format!(
                    "Unknown profile field. Valid fields: {}",
                    ProfileField::ALL.map(ProfileField::key).join(", ")
                ),
            })
    }
}

/// Editable form state. Every value is kept as typed text until submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub age: String,
    pub work_group: String,
    pub work_role: String,
    pub work_resume: String,
    pub hobbies_interests: String,
}

impl ProfileDraft {
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Age => &self.age,
            ProfileField::WorkGroup => &self.work_group,
            ProfileField::WorkRole => &self.work_role,
            ProfileField::WorkResume => &self.work_resume,
            ProfileField::HobbiesInterests => &self.hobbies_interests,
        }
    }

    /// Overwrites exactly one field; no other field is touched.
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let slot = match field {
            ProfileField::Age => &mut self.age,
            ProfileField::WorkGroup => &mut self.work_group,
            ProfileField::WorkRole => &mut self.work_role,
            ProfileField::WorkResume => &mut self.work_resume,
            ProfileField::HobbiesInterests => &mut self.hobbies_interests,
        };
        *slot = value.into();
    }

    pub fn is_empty(&self) -> bool {
        ProfileField::ALL
            .into_iter()
            .all(|field| self.get(field).is_empty())
    }

    /// 送出前的表單檢查：所有欄位必填，年齡需能解析為整數
    pub fn to_payload(&self) -> Result<ProfilePayload> {
        for field in ProfileField::ALL {
            validate_non_empty_string(field.key(), self.get(field))?;
        }

        Ok(ProfilePayload {
            age: parse_leading_integer(ProfileField::Age.key(), &self.age)?,
            work_group: self.work_group.clone(),
            work_role: self.work_role.clone(),
            work_resume: self.work_resume.clone(),
            hobbies_interests: self.hobbies_interests.clone(),
        })
    }
}

/// Body of `POST /api/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePayload {
    pub age: i64,
    pub work_group: String,
    pub work_role: String,
    pub work_resume: String,
    pub hobbies_interests: String,
}

/// Opaque session handle issued by the service (`user_id` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileCreated {
    pub user_id: SessionId,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub reasoning: String,
}

/// Response of `GET /api/next-recommendation/{user_id}`.
///
/// Any object carrying a `message` field means the stream is exhausted, so that
/// variant is tried first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NextRecommendation {
    Exhausted { message: String },
    Item(Recommendation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Liked,
    Disliked,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Liked => "liked",
            Decision::Disliked => "disliked",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/interaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub user_id: SessionId,
    pub experience_id: String,
    pub action: Decision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
