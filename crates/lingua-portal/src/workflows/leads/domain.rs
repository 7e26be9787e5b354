use serde::{Deserialize, Serialize};

use crate::workflows::consultations::{ConsultationKind, NewConsultation};

/// Lead-capture form payload. Field names are the webhook's fixed contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: String,
    pub phone: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub primary_training_needs: Vec<String>,
    #[serde(default)]
    pub number_of_participants: Option<u32>,
    #[serde(default)]
    pub requirements: String,
}

impl LeadSubmission {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err("a valid email is required".to_string());
        }
        if self.phone.trim().is_empty() {
            return Err("phone is required".to_string());
        }
        if self.number_of_participants == Some(0) {
            return Err("numberOfParticipants must be at least 1".to_string());
        }
        Ok(())
    }

    /// Leads naming a company are tracked as corporate consultations.
    pub fn to_consultation(&self) -> NewConsultation {
        let optional = |value: &str| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        let company = optional(&self.company);
        NewConsultation {
            kind: if company.is_some() {
                ConsultationKind::Corporate
            } else {
                ConsultationKind::Individual
            },
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            company,
            job_title: optional(&self.job_title),
            training_needs: self.primary_training_needs.clone(),
            participants: self.number_of_participants,
            requirements: optional(&self.requirements),
            preferred_language: None,
        }
    }
}

/// Result returned to the form after a lead is captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadReceipt {
    pub consultation_id: String,
    pub forwarded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead() -> LeadSubmission {
        LeadSubmission {
            name: "Grace Ho".to_string(),
            email: "grace@acme.example".to_string(),
            company: "Acme Trading".to_string(),
            phone: "0912-345-678".to_string(),
            job_title: "HR Manager".to_string(),
            primary_training_needs: vec!["Business English".to_string()],
            number_of_participants: Some(15),
            requirements: "Evening classes".to_string(),
        }
    }

    #[test]
    fn serializes_with_webhook_field_names() {
        let value = serde_json::to_value(lead()).unwrap();
        for field in [
            "name",
            "email",
            "company",
            "phone",
            "jobTitle",
            "primaryTrainingNeeds",
            "numberOfParticipants",
            "requirements",
        ] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
    }

    #[test]
    fn company_decides_consultation_kind() {
        assert_eq!(lead().to_consultation().kind, ConsultationKind::Corporate);

        let mut individual = lead();
        individual.company = "  ".to_string();
        let consultation = individual.to_consultation();
        assert_eq!(consultation.kind, ConsultationKind::Individual);
        assert!(consultation.company.is_none());
    }

    #[test]
    fn validation_requires_contact_details() {
        let mut missing_phone = lead();
        missing_phone.phone.clear();
        assert!(missing_phone.validate().is_err());

        let mut zero = lead();
        zero.number_of_participants = Some(0);
        assert!(zero.validate().is_err());

        assert!(lead().validate().is_ok());
    }
}
