use crate::utils::error::Result;
use crate::utils::validation::{validate_required_argument, Validate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One job candidate. Fields the registry does not interpret are kept in
/// `profile` and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub current_role: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub spoken_languages: Vec<String>,
    #[serde(flatten)]
    pub profile: BTreeMap<String, Value>,
}

impl Candidate {
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.current_role = role.to_string();
        self
    }

    pub fn with_skill(mut self, skill: &str) -> Self {
        self.skills.push(skill.to_string());
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.spoken_languages.push(language.to_string());
        self
    }

    pub fn with_profile_field(mut self, key: &str, value: Value) -> Self {
        self.profile.insert(key.to_string(), value);
        self
    }

    /// Stored full name, or "first last" when none was given.
    pub fn full_name(&self) -> String {
        match &self.full_name {
            Some(name) => name.clone(),
            None => format!("{} {}", self.first_name, self.last_name)
                .trim()
                .to_string(),
        }
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }

    /// `needle` must already be trimmed and lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        let contains = |field: &str| field.to_lowercase().contains(needle);

        contains(self.first_name.as_str())
            || contains(self.last_name.as_str())
            || contains(self.full_name().as_str())
            || contains(self.email.as_str())
            || contains(self.current_role.as_str())
            || self.skills.iter().any(|s| contains(s.as_str()))
            || self.spoken_languages.iter().any(|l| contains(l.as_str()))
    }
}

impl Validate for Candidate {
    fn validate(&self) -> Result<()> {
        validate_required_argument("candidate.email", &self.email)
    }
}

/// Field changes applied by `CandidateRegistry::update`.
///
/// `None` leaves a field alone. A `null` entry in `profile` removes that extra
/// field from the candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoken_languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profile: BTreeMap<String, Value>,
}

impl CandidatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, value: &str) -> Self {
        self.first_name = Some(value.to_string());
        self
    }

    pub fn last_name(mut self, value: &str) -> Self {
        self.last_name = Some(value.to_string());
        self
    }

    pub fn full_name(mut self, value: &str) -> Self {
        self.full_name = Some(value.to_string());
        self
    }

    pub fn email(mut self, value: &str) -> Self {
        self.email = Some(value.to_string());
        self
    }

    pub fn current_role(mut self, value: &str) -> Self {
        self.current_role = Some(value.to_string());
        self
    }

    pub fn skills(mut self, values: Vec<String>) -> Self {
        self.skills = Some(values);
        self
    }

    pub fn spoken_languages(mut self, values: Vec<String>) -> Self {
        self.spoken_languages = Some(values);
        self
    }

    pub fn profile_field(mut self, key: &str, value: Value) -> Self {
        self.profile.insert(key.to_string(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(&self, candidate: &mut Candidate) {
        if let Some(v) = &self.first_name {
            candidate.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            candidate.last_name = v.clone();
        }
        if let Some(v) = &self.full_name {
            candidate.full_name = Some(v.clone());
        }
        if let Some(v) = &self.email {
            candidate.email = v.clone();
        }
        if let Some(v) = &self.current_role {
            candidate.current_role = v.clone();
        }
        if let Some(v) = &self.skills {
            candidate.skills = v.clone();
        }
        if let Some(v) = &self.spoken_languages {
            candidate.spoken_languages = v.clone();
        }
        for (key, value) in &self.profile {
            if value.is_null() {
                candidate.profile.remove(key);
            } else {
                candidate.profile.insert(key.clone(), value.clone());
            }
        }
    }
}
