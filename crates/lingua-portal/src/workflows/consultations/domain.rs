use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsultationId(pub String);

impl fmt::Display for ConsultationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationKind {
    Individual,
    Corporate,
}

impl ConsultationKind {
    pub const fn label(self) -> &'static str {
        match self {
            ConsultationKind::Individual => "individual",
            ConsultationKind::Corporate => "corporate",
        }
    }
}

/// Sales pipeline stage of a consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationStatus {
    New,
    Contacted,
    Scheduled,
    Converted,
    Closed,
}

impl ConsultationStatus {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::New,
            Self::Contacted,
            Self::Scheduled,
            Self::Converted,
            Self::Closed,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Scheduled => "scheduled",
            Self::Converted => "converted",
            Self::Closed => "closed",
        }
    }

    fn stage(self) -> u8 {
        match self {
            Self::New => 0,
            Self::Contacted => 1,
            Self::Scheduled => 2,
            Self::Converted => 3,
            Self::Closed => 4,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Converted | Self::Closed)
    }

    /// The pipeline only moves forward; any open lead may be closed.
    pub fn can_move_to(self, next: Self) -> bool {
        if self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        next == Self::Closed || next.stage() > self.stage()
    }
}

impl fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sales lead tracked by the admin CRM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub id: ConsultationId,
    pub kind: ConsultationKind,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default)]
    pub training_needs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    pub status: ConsultationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Consultation {
    /// Case-insensitive match over the contact fields admins search by.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            Some(self.name.as_str()),
            Some(self.email.as_str()),
            Some(self.phone.as_str()),
            self.company.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConsultation {
    pub kind: ConsultationKind,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub training_needs: Vec<String>,
    #[serde(default)]
    pub participants: Option<u32>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub preferred_language: Option<String>,
}

/// Partial update accepted by `PUT /api/consultations/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationUpdate {
    #[serde(default)]
    pub status: Option<ConsultationStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationSort {
    #[default]
    Newest,
    Oldest,
    Name,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsultationQuery {
    pub status: Option<ConsultationStatus>,
    pub kind: Option<ConsultationKind>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort: ConsultationSort,
}

/// Per-status counts for the CRM dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ConsultationStatus,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_moves_forward_or_closes() {
        use ConsultationStatus::*;
        assert!(New.can_move_to(Contacted));
        assert!(New.can_move_to(Scheduled));
        assert!(Scheduled.can_move_to(Closed));
        assert!(Contacted.can_move_to(Contacted));
        assert!(!Scheduled.can_move_to(Contacted));
        assert!(!Converted.can_move_to(Closed));
        assert!(!Closed.can_move_to(New));
    }
}
