use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one client conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A supported clinical condition keyword gating protocol queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Membership comparison ignores case and surrounding whitespace
    pub fn matches(&self, candidate: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(candidate.trim())
    }
}

/// An authoritative body that issues treatment protocols for a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: String,
    pub name: String,
    /// The tag this publisher was listed under
    #[serde(default)]
    pub tag: String,
}

impl Publisher {
    pub fn matches(&self, candidate: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(candidate.trim())
    }
}

/// A drug record from the medication corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drug {
    pub name: String,
    pub generic_composition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
}

/// Drug-interaction risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    X,
    A,
    B,
    C,
    D,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Severity::X => "X",
            Severity::A => "A",
            Severity::B => "B",
            Severity::C => "C",
            Severity::D => "D",
        };
        write!(f, "{}", code)
    }
}

/// An interaction between two generic compositions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub drug_a: String,
    pub drug_b: String,
    pub severity: Severity,
}

/// Wire shape of one protocol search; field names follow the upstream API
/// (`condition` carries the confirmed tag)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolQuery {
    pub query: String,
    pub condition: String,
    pub publisher_name: String,
}

/// One protocol search hit; `url` points at a rendered guideline page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolDocument {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub publisher: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_match_ignores_case_and_whitespace() {
        let tag = Tag::new("Diabetes", "Type 2 diabetes mellitus");
        assert!(tag.matches("diabetes"));
        assert!(tag.matches("  DIABETES "));
        assert!(!tag.matches("hypertension"));
    }

    #[test]
    fn publisher_match_is_case_insensitive() {
        let publisher = Publisher {
            id: "pub-1".to_string(),
            name: "RSSDI".to_string(),
            tag: "diabetes".to_string(),
        };
        assert!(publisher.matches("rssdi"));
        assert!(!publisher.matches("ICMR"));
    }

    #[test]
    fn severity_serializes_as_letter_code() {
        let json = serde_json::to_string(&Severity::X).unwrap();
        assert_eq!(json, "\"X\"");
        let parsed: Severity = serde_json::from_str("\"D\"").unwrap();
        assert_eq!(parsed, Severity::D);
    }

    #[test]
    fn drug_tolerates_missing_optional_fields() {
        let drug: Drug = serde_json::from_str(
            r#"{"name": "Dolo 650", "generic_composition": "Paracetamol"}"#,
        )
        .unwrap();
        assert_eq!(drug.generic_composition, "Paracetamol");
        assert!(drug.manufacturer.is_none());
    }
}
