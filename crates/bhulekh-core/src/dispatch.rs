//! Typed invoke dispatch.
//!
//! The wire entrypoint is an operation name plus a list of string arguments,
//! each argument a JSON object. Routing is a closed enum and an explicit
//! match; there is no runtime handler map.

use crate::engine::WorkflowEngine;
use crate::error::WorkflowError;
use crate::store::StateStore;
use crate::types::{
    Application, ApplicationFilter, Citizen, CitizenQuery, EstateReview, HearingResponse,
    PaymentConfirmation, ReviewNote,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

/// One invoke operation, decoded from its wire name and argument list.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Platform initialization hook; nothing to do.
    Init,
    /// Seed the demo citizens and applications.
    InitLedger,
    CreateCitizen(Citizen),
    QueryCitizen(CitizenQuery),
    CreateApplication(Application),
    ListApplications(ApplicationFilter),
    AcceptHearingDate(HearingResponse),
    SupervisorReview(ReviewNote),
    EstateOfficerReview(EstateReview),
    HearingHeld(ReviewNote),
    CeoReview(ReviewNote),
    ConfirmPayment(PaymentConfirmation),
}

impl Operation {
    /// Decode an operation from its wire name and argument list.
    ///
    /// Payload-carrying operations take exactly one argument; `query_lma`
    /// also accepts zero (no filter), and `init`/`init_ledger` take none.
    pub fn parse(function: &str, args: &[String]) -> Result<Self, WorkflowError> {
        match function {
            "init" => {
                require_no_args(args)?;
                Ok(Self::Init)
            }
            "init_ledger" => {
                require_no_args(args)?;
                Ok(Self::InitLedger)
            }
            "citizen_create" => Ok(Self::CreateCitizen(decode(args)?)),
            "query_citizen" => Ok(Self::QueryCitizen(decode(args)?)),
            "lma_create" => Ok(Self::CreateApplication(decode(args)?)),
            "query_lma" => {
                if args.is_empty() {
                    Ok(Self::ListApplications(ApplicationFilter::default()))
                } else {
                    Ok(Self::ListApplications(decode(args)?))
                }
            }
            "accept_citizen" => Ok(Self::AcceptHearingDate(decode(args)?)),
            "poa_supervisor" => Ok(Self::SupervisorReview(decode(args)?)),
            "poa_estate_manager" => Ok(Self::EstateOfficerReview(decode(args)?)),
            "estate_manager_hearing" => Ok(Self::HearingHeld(decode(args)?)),
            "poa_ceo" => Ok(Self::CeoReview(decode(args)?)),
            "poa_finance_officer" => Ok(Self::ConfirmPayment(decode(args)?)),
            _ => Err(WorkflowError::UnknownOperation),
        }
    }

    /// Wire name of this operation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::InitLedger => "init_ledger",
            Self::CreateCitizen(_) => "citizen_create",
            Self::QueryCitizen(_) => "query_citizen",
            Self::CreateApplication(_) => "lma_create",
            Self::ListApplications(_) => "query_lma",
            Self::AcceptHearingDate(_) => "accept_citizen",
            Self::SupervisorReview(_) => "poa_supervisor",
            Self::EstateOfficerReview(_) => "poa_estate_manager",
            Self::HearingHeld(_) => "estate_manager_hearing",
            Self::CeoReview(_) => "poa_ceo",
            Self::ConfirmPayment(_) => "poa_finance_officer",
        }
    }
}

fn require_no_args(args: &[String]) -> Result<(), WorkflowError> {
    if !args.is_empty() {
        return Err(WorkflowError::ArgumentCount);
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(args: &[String]) -> Result<T, WorkflowError> {
    let [payload] = args else {
        return Err(WorkflowError::ArgumentCount);
    };
    Ok(serde_json::from_str(payload)?)
}

fn optional_payload<T: Serialize>(value: Option<T>) -> Result<Value, WorkflowError> {
    match value {
        Some(value) => Ok(serde_json::to_value(value)?),
        None => Ok(json!({})),
    }
}

impl<S: StateStore> WorkflowEngine<S> {
    /// Execute one decoded operation and serialize its success payload.
    ///
    /// Payloads mirror the wire contract: `{}` for empty success, an
    /// identifier echo when an idempotent create hits an existing record,
    /// the full record for point queries, and an array for listings.
    pub async fn invoke(&self, operation: Operation) -> Result<Value, WorkflowError> {
        match operation {
            Operation::Init => Ok(json!({})),
            Operation::InitLedger => {
                self.seed_demo_records().await?;
                Ok(json!({}))
            }
            Operation::CreateCitizen(citizen) => {
                optional_payload(self.create_citizen(citizen).await?)
            }
            Operation::QueryCitizen(query) => optional_payload(self.get_citizen(&query.id).await?),
            Operation::CreateApplication(application) => {
                optional_payload(self.create_application(application).await?)
            }
            Operation::ListApplications(filter) => {
                let records = self.list_applications(filter.identifier()).await?;
                Ok(serde_json::to_value(records)?)
            }
            Operation::AcceptHearingDate(request) => {
                self.citizen_hearing_response(request).await?;
                Ok(json!({}))
            }
            Operation::SupervisorReview(request) => {
                self.supervisor_review(request).await?;
                Ok(json!({}))
            }
            Operation::EstateOfficerReview(request) => {
                self.estate_officer_review(request).await?;
                Ok(json!({}))
            }
            Operation::HearingHeld(request) => {
                self.hearing_held(request).await?;
                Ok(json!({}))
            }
            Operation::CeoReview(request) => {
                self.ceo_review(request).await?;
                Ok(json!({}))
            }
            Operation::ConfirmPayment(request) => {
                self.confirm_payment(request).await?;
                Ok(json!({}))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn engine() -> WorkflowEngine<MemoryStore> {
        WorkflowEngine::new(MemoryStore::new())
    }

    fn arg(value: Value) -> Vec<String> {
        vec![value.to_string()]
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = Operation::parse("poa_registrar", &[]).unwrap_err();
        assert_eq!(err.to_string(), "invalid invoke function.");
    }

    #[test]
    fn argument_counts_are_enforced() {
        let payload = json!({"id": "a100"}).to_string();

        let err = Operation::parse("query_citizen", &[]).unwrap_err();
        assert_eq!(err.to_string(), "invalid argument(s) count.");

        let err =
            Operation::parse("query_citizen", &[payload.clone(), payload.clone()]).unwrap_err();
        assert_eq!(err.to_string(), "invalid argument(s) count.");

        let err = Operation::parse("init_ledger", &[payload]).unwrap_err();
        assert_eq!(err.to_string(), "invalid argument(s) count.");
    }

    #[test]
    fn query_lma_accepts_zero_or_one_argument() {
        assert!(matches!(
            Operation::parse("query_lma", &[]).unwrap(),
            Operation::ListApplications(_)
        ));

        let filtered =
            Operation::parse("query_lma", &arg(json!({"applicationId": "0002"}))).unwrap();
        match filtered {
            Operation::ListApplications(filter) => assert_eq!(filter.identifier(), Some("0002")),
            other => panic!("expected listing, got {other:?}"),
        }
    }

    #[test]
    fn malformed_payloads_fail_to_decode() {
        let err = Operation::parse("accept_citizen", &["not json".to_string()]).unwrap_err();
        assert!(matches!(err, WorkflowError::Decode(_)));
    }

    #[tokio::test]
    async fn invoke_returns_the_wire_payload_shapes() {
        let engine = engine();

        let created = engine
            .invoke(
                Operation::parse(
                    "citizen_create",
                    &arg(json!({
                        "id": "a100",
                        "username": "Asha",
                        "password": "secret",
                        "lastName": "Rao",
                        "address": "12 Canal Road"
                    })),
                )
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(created, json!({}));

        let echoed = engine
            .invoke(
                Operation::parse(
                    "citizen_create",
                    &arg(json!({
                        "id": "a100",
                        "username": "Asha",
                        "password": "secret",
                        "lastName": "Rao",
                        "address": "12 Canal Road"
                    })),
                )
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(echoed, json!({"id": "a100"}));

        let fetched = engine
            .invoke(Operation::parse("query_citizen", &arg(json!({"id": "a100"}))).unwrap())
            .await
            .unwrap();
        assert_eq!(fetched["username"], "Asha");
        assert_eq!(fetched["password"], "secret");

        let absent = engine
            .invoke(Operation::parse("query_citizen", &arg(json!({"id": "a999"}))).unwrap())
            .await
            .unwrap();
        assert_eq!(absent, json!({}));
    }

    #[tokio::test]
    async fn invoke_lists_seeded_applications() {
        let engine = engine();
        engine.invoke(Operation::InitLedger).await.unwrap();

        let all = engine
            .invoke(Operation::parse("query_lma", &[]).unwrap())
            .await
            .unwrap();
        assert_eq!(all.as_array().unwrap().len(), 5);

        let one = engine
            .invoke(Operation::parse("query_lma", &arg(json!({"applicationId": "0002"}))).unwrap())
            .await
            .unwrap();
        let records = one.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["applicationId"], "0002");

        // An empty filter means no filter at all.
        let unfiltered = engine
            .invoke(Operation::parse("query_lma", &arg(json!({"applicationId": ""}))).unwrap())
            .await
            .unwrap();
        assert_eq!(unfiltered.as_array().unwrap().len(), 5);
    }
}
