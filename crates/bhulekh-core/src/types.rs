use crate::workflow::ReviewAction;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Reviewing parties that act on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Citizen,
    Supervisor,
    EstateOfficer,
    #[serde(rename = "CEO")]
    Ceo,
    FinanceOfficer,
}

impl Role {
    pub fn token(self) -> &'static str {
        match self {
            Self::Citizen => "Citizen",
            Self::Supervisor => "Supervisor",
            Self::EstateOfficer => "EstateOfficer",
            Self::Ceo => "CEO",
            Self::FinanceOfficer => "FinanceOfficer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Party expected to act next on an application record.
///
/// The token set matches the stored records; `EstateManager` is accepted on
/// decode as an alias of the canonical `EstateOfficer` so records written
/// before the rename remain readable. It is never written back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assignee {
    #[default]
    #[serde(rename = "Not_Assigned")]
    NotAssigned,
    Supervisor,
    Citizen,
    #[serde(alias = "EstateManager")]
    EstateOfficer,
    #[serde(rename = "CEO")]
    Ceo,
    FinanceOfficer,
    /// Rejection sink: nobody may act on the record again.
    #[serde(rename = "")]
    Cleared,
}

impl Assignee {
    pub fn token(self) -> &'static str {
        match self {
            Self::NotAssigned => "Not_Assigned",
            Self::Supervisor => "Supervisor",
            Self::Citizen => "Citizen",
            Self::EstateOfficer => "EstateOfficer",
            Self::Ceo => "CEO",
            Self::FinanceOfficer => "FinanceOfficer",
            Self::Cleared => "",
        }
    }

    /// Whether `role` may act while this assignee is current.
    ///
    /// The supervisor may also claim a record still `Not_Assigned`, the
    /// state of a freshly submitted application.
    pub fn accepts(self, role: Role) -> bool {
        matches!(
            (self, role),
            (Self::NotAssigned, Role::Supervisor)
                | (Self::Supervisor, Role::Supervisor)
                | (Self::Citizen, Role::Citizen)
                | (Self::EstateOfficer, Role::EstateOfficer)
                | (Self::Ceo, Role::Ceo)
                | (Self::FinanceOfficer, Role::FinanceOfficer)
        )
    }
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Application lifecycle token.
///
/// `In_Progress`, the spelling used on submission, decodes to the canonical
/// in-progress variant; records re-serialize canonically after their first
/// transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "Inprogress", alias = "In_Progress")]
    InProgress,
    Complete,
    Rejected,
}

impl Status {
    pub fn token(self) -> &'static str {
        match self {
            Self::InProgress => "Inprogress",
            Self::Complete => "Complete",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Registered applicant.
///
/// The credential secret is stored and returned as given; hardening that
/// scheme belongs to the surrounding platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citizen {
    pub id: String,
    pub username: String,
    pub password: String,
    pub last_name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
}

/// Land-mutation application record as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Assigned by the submitting party. Older stored records may omit it,
    /// in which case listings recover it from the key's trailing segment.
    #[serde(default)]
    pub application_id: String,
    pub aadhar_id: String,
    pub user_name: String,
    pub plot_number: String,
    pub date_of_application: String,
    #[serde(default)]
    pub assign_to: Assignee,
    #[serde(default)]
    pub status: Status,
    /// Extended form fields (applicant info, address, property detail,
    /// purpose, declarations) carried verbatim across transitions.
    #[serde(flatten)]
    pub form: BTreeMap<String, Value>,
}

/// Identifier echo returned when a citizen create hits an existing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitizenRef {
    pub id: String,
}

/// Identifier echo returned when an application create hits an existing
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRef {
    pub application_id: String,
}

/// `query_citizen` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CitizenQuery {
    pub id: String,
}

/// `query_lma` payload. An absent or empty identifier means no filter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFilter {
    #[serde(default)]
    pub application_id: Option<String>,
}

impl ApplicationFilter {
    pub fn identifier(&self) -> Option<&str> {
        self.application_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// `accept_citizen` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HearingResponse {
    pub application_id: String,
    pub accept_hearing_date: bool,
}

/// Payload shared by the comment-only role actions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewNote {
    pub application_id: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// `poa_estate_manager` payload. The hearing date accompanies the
/// `SetHearingDate` action and travels in the citizen notice; it is not part
/// of the stored record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstateReview {
    pub application_id: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub action: ReviewAction,
    #[serde(default)]
    pub date_of_hearing: Option<String>,
}

/// `poa_finance_officer` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub application_id: String,
    pub confirm_payment: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignee_tokens_roundtrip() {
        for assignee in [
            Assignee::NotAssigned,
            Assignee::Supervisor,
            Assignee::Citizen,
            Assignee::EstateOfficer,
            Assignee::Ceo,
            Assignee::FinanceOfficer,
            Assignee::Cleared,
        ] {
            let encoded = serde_json::to_string(&assignee).unwrap();
            assert_eq!(encoded, format!("\"{}\"", assignee.token()));
            let decoded: Assignee = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, assignee);
        }
    }

    #[test]
    fn legacy_estate_manager_token_decodes_to_estate_officer() {
        let decoded: Assignee = serde_json::from_str("\"EstateManager\"").unwrap();
        assert_eq!(decoded, Assignee::EstateOfficer);
    }

    #[test]
    fn submission_status_spelling_decodes_to_canonical_variant() {
        let decoded: Status = serde_json::from_str("\"In_Progress\"").unwrap();
        assert_eq!(decoded, Status::InProgress);
        assert_eq!(serde_json::to_string(&decoded).unwrap(), "\"Inprogress\"");
    }

    #[test]
    fn application_preserves_extended_form_fields() {
        let raw = serde_json::json!({
            "applicationId": "0000",
            "aadharId": "a100",
            "userName": "Asha",
            "plotNumber": "p0",
            "dateOfApplication": "01/01/18",
            "assignTo": "Supervisor",
            "status": "In_Progress",
            "purposeOfMutation": "inheritance",
            "declarationAccepted": true
        });
        let application: Application = serde_json::from_value(raw).unwrap();
        assert_eq!(application.form.len(), 2);

        let rendered = serde_json::to_value(&application).unwrap();
        assert_eq!(rendered["purposeOfMutation"], "inheritance");
        assert_eq!(rendered["declarationAccepted"], true);
    }

    #[test]
    fn application_defaults_assignment_and_status_when_omitted() {
        let raw = serde_json::json!({
            "applicationId": "0000",
            "aadharId": "a100",
            "userName": "Asha",
            "plotNumber": "p0",
            "dateOfApplication": "01/01/18"
        });
        let application: Application = serde_json::from_value(raw).unwrap();
        assert_eq!(application.assign_to, Assignee::NotAssigned);
        assert_eq!(application.status, Status::InProgress);
    }
}
