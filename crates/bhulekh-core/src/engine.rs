use crate::error::WorkflowError;
use crate::keys;
use crate::store::StateStore;
use crate::types::{
    Application, ApplicationRef, Citizen, CitizenRef, EstateReview, HearingResponse,
    PaymentConfirmation, ReviewNote,
};
use crate::workflow::{self, WorkflowEvent};
use futures::StreamExt;
use tracing::{debug, info};

/// Key prefix for citizen records.
pub const CITIZEN_PREFIX: &str = "citizen";
/// Key prefix for application records.
pub const APPLICATION_PREFIX: &str = "application";

/// Role-gated workflow engine over a [`StateStore`].
///
/// The engine holds no record state across calls: every operation re-reads
/// current state before deciding the next state, and the hosting platform
/// serializes conflicting writes to the same key. Validation runs before
/// the single write, so a failed call leaves the ledger untouched.
pub struct WorkflowEngine<S> {
    store: S,
}

impl<S: StateStore> WorkflowEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a citizen. Idempotent create-or-fetch: a repeat registration
    /// returns the existing identifier instead of failing, and the stored
    /// record is left unchanged.
    pub async fn create_citizen(
        &self,
        citizen: Citizen,
    ) -> Result<Option<CitizenRef>, WorkflowError> {
        let key = keys::composite_key(CITIZEN_PREFIX, &[&citizen.id])?;
        if let Some(stored) = self.store.get(&key).await? {
            let existing: Citizen = serde_json::from_slice(&stored)?;
            debug!(id = %existing.id, "citizen already registered");
            return Ok(Some(CitizenRef { id: existing.id }));
        }

        self.store.put(&key, serde_json::to_vec(&citizen)?).await?;
        info!(id = %citizen.id, "citizen registered");
        Ok(None)
    }

    /// Point lookup. An unknown identifier yields `None`, not an error; the
    /// stored record is returned verbatim, credential secret included.
    pub async fn get_citizen(&self, id: &str) -> Result<Option<Citizen>, WorkflowError> {
        let key = keys::composite_key(CITIZEN_PREFIX, &[id])?;
        match self.store.get(&key).await? {
            Some(stored) => Ok(Some(serde_json::from_slice(&stored)?)),
            None => Ok(None),
        }
    }

    /// Submit an application on behalf of a registered citizen.
    ///
    /// Fails when the referenced citizen is unknown; a repeat submission
    /// with an already-used identifier returns the existing identifier and
    /// writes nothing.
    pub async fn create_application(
        &self,
        application: Application,
    ) -> Result<Option<ApplicationRef>, WorkflowError> {
        let citizen_key = keys::composite_key(CITIZEN_PREFIX, &[&application.aadhar_id])?;
        if self.store.get(&citizen_key).await?.is_none() {
            return Err(WorkflowError::CitizenNotFound);
        }

        let key = keys::composite_key(APPLICATION_PREFIX, &[&application.application_id])?;
        if let Some(stored) = self.store.get(&key).await? {
            let existing: Application = serde_json::from_slice(&stored)?;
            let application_id = if existing.application_id.is_empty() {
                application.application_id
            } else {
                existing.application_id
            };
            debug!(%application_id, "application already submitted");
            return Ok(Some(ApplicationRef { application_id }));
        }

        self.store
            .put(&key, serde_json::to_vec(&application)?)
            .await?;
        info!(
            application_id = %application.application_id,
            aadhar_id = %application.aadhar_id,
            assign_to = %application.assign_to,
            "application submitted"
        );
        Ok(None)
    }

    /// List applications in store iteration order, optionally narrowed to a
    /// single identifier.
    pub async fn list_applications(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<Application>, WorkflowError> {
        let prefix = match filter {
            Some(id) => keys::scan_prefix(APPLICATION_PREFIX, &[id])?,
            None => keys::scan_prefix(APPLICATION_PREFIX, &[])?,
        };

        let mut scan = self.store.scan(&prefix).await?;
        let mut results = Vec::new();
        while let Some(entry) = scan.next().await {
            let (key, stored) = entry?;
            let mut application: Application = serde_json::from_slice(&stored)?;
            if application.application_id.is_empty() {
                // Older records omit the identifier; recover it from the
                // key's trailing segment.
                let (_, segments) = keys::split_key(&key)?;
                if let Some(id) = segments.last() {
                    application.application_id = id.clone();
                }
            }
            results.push(application);
        }
        Ok(results)
    }

    /// `poa_supervisor`: forward a fresh application to the estate office.
    pub async fn supervisor_review(&self, request: ReviewNote) -> Result<(), WorkflowError> {
        self.transition(
            &request.application_id,
            WorkflowEvent::SupervisorForward,
            request.comment.as_deref(),
        )
        .await
    }

    /// `poa_estate_manager`: act on the application per the selected action.
    pub async fn estate_officer_review(&self, request: EstateReview) -> Result<(), WorkflowError> {
        if let Some(date_of_hearing) = request.date_of_hearing.as_deref() {
            debug!(
                application_id = %request.application_id,
                date_of_hearing,
                "hearing date proposed"
            );
        }
        self.transition(
            &request.application_id,
            WorkflowEvent::EstateReview(request.action),
            request.comment.as_deref(),
        )
        .await
    }

    /// `accept_citizen`: the citizen answers a proposed hearing date.
    pub async fn citizen_hearing_response(
        &self,
        request: HearingResponse,
    ) -> Result<(), WorkflowError> {
        self.transition(
            &request.application_id,
            WorkflowEvent::HearingResponse {
                accepted: request.accept_hearing_date,
            },
            None,
        )
        .await
    }

    /// `estate_manager_hearing`: the hearing took place; escalate to the CEO.
    pub async fn hearing_held(&self, request: ReviewNote) -> Result<(), WorkflowError> {
        self.transition(
            &request.application_id,
            WorkflowEvent::HearingHeld,
            request.comment.as_deref(),
        )
        .await
    }

    /// `poa_ceo`: clear the application for payment collection.
    pub async fn ceo_review(&self, request: ReviewNote) -> Result<(), WorkflowError> {
        self.transition(
            &request.application_id,
            WorkflowEvent::CeoClearance,
            request.comment.as_deref(),
        )
        .await
    }

    /// `poa_finance_officer`: record the payment outcome.
    pub async fn confirm_payment(
        &self,
        request: PaymentConfirmation,
    ) -> Result<(), WorkflowError> {
        self.transition(
            &request.application_id,
            WorkflowEvent::PaymentConfirmation {
                confirmed: request.confirm_payment,
            },
            None,
        )
        .await
    }

    async fn transition(
        &self,
        application_id: &str,
        event: WorkflowEvent,
        comment: Option<&str>,
    ) -> Result<(), WorkflowError> {
        let key = keys::composite_key(APPLICATION_PREFIX, &[application_id])?;
        let stored = self
            .store
            .get(&key)
            .await?
            .ok_or(WorkflowError::ApplicationNotFound)?;
        let mut application: Application = serde_json::from_slice(&stored)?;

        let next = workflow::apply(application.assign_to, application.status, event)?;
        if let Some(comment) = comment {
            debug!(application_id, role = %event.role(), comment, "review note recorded");
        }

        application.assign_to = next.assign_to;
        application.status = next.status;
        self.store
            .put(&key, serde_json::to_vec(&application)?)
            .await?;
        info!(
            application_id,
            role = %event.role(),
            assign_to = %application.assign_to,
            status = %application.status,
            "application transitioned"
        );
        Ok(())
    }

    /// Seed the demo citizens and applications shipped with the platform's
    /// ledger bootstrap. Idempotent thanks to create-or-fetch semantics.
    pub async fn seed_demo_records(&self) -> Result<(), WorkflowError> {
        for citizen in demo_citizens() {
            self.create_citizen(citizen).await?;
        }
        for application in demo_applications() {
            self.create_application(application).await?;
        }
        info!("demo ledger seeded");
        Ok(())
    }
}

fn demo_citizens() -> Vec<Citizen> {
    let rows = [
        ("a100", "Asha", "pass0", "Rao", "pwc0"),
        ("a101", "Ravi", "pass1", "Iyer", "pwc1"),
        ("a102", "Meera", "pass2", "Desai", "pwc2"),
        ("a103", "Arjun", "pass3", "Nair", "pwc3"),
        ("a104", "Divya", "pass4", "Kulkarni", "pwc4"),
    ];
    rows.into_iter()
        .map(|(id, username, password, last_name, address)| Citizen {
            id: id.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            last_name: last_name.to_string(),
            address: address.to_string(),
            father_name: None,
        })
        .collect()
}

fn demo_applications() -> Vec<Application> {
    let rows = [
        ("0000", "a100", "Asha", "p0", "01/01/18"),
        ("0001", "a101", "Ravi", "p1", "02/01/18"),
        ("0002", "a102", "Meera", "p2", "03/01/18"),
        ("0003", "a103", "Arjun", "p3", "04/01/18"),
        ("0004", "a104", "Divya", "p4", "05/01/18"),
    ];
    rows.into_iter()
        .map(
            |(application_id, aadhar_id, user_name, plot_number, date_of_application)| {
                Application {
                    application_id: application_id.to_string(),
                    aadhar_id: aadhar_id.to_string(),
                    user_name: user_name.to_string(),
                    plot_number: plot_number.to_string(),
                    date_of_application: date_of_application.to_string(),
                    assign_to: Default::default(),
                    status: Default::default(),
                    form: Default::default(),
                }
            },
        )
        .collect()
}
