use std::sync::Arc;

use models::Table;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::store::DraftStore;
use super::wizard::{FormPatch, QuoteWizard, WizardView, MSG_SERVICES_UNAVAILABLE, SUBMIT_NOTICE};
use crate::backend::{insert_row, Caller, TableRepository};
use crate::content::ContentService;
use crate::errors::ServiceError;
use crate::metrics::{LEADS_SUBMITTED_TOTAL, WIZARD_REJECTIONS_TOTAL};

/// Result of a forward move.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Advance {
    Moved { view: WizardView },
    Rejected { view: WizardView },
}

/// Result of a submit attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Submission {
    /// Lead stored; the draft is gone.
    Accepted { notice: &'static str },
    /// Required data missing; nothing was sent.
    Rejected { view: WizardView },
    /// Backend refused the insert; the draft is kept for retry.
    Failed { view: WizardView },
}

/// Drives server-side wizard drafts against the backend.
#[derive(Clone)]
pub struct QuoteService {
    repo: Arc<dyn TableRepository>,
    content: ContentService,
    drafts: DraftStore,
}

impl QuoteService {
    pub fn new(repo: Arc<dyn TableRepository>, drafts: DraftStore) -> Self {
        let content = ContentService::new(repo.clone());
        Self { repo, content, drafts }
    }

    async fn load(&self, id: Uuid) -> Result<QuoteWizard, ServiceError> {
        self.drafts.get(id).await.ok_or_else(|| ServiceError::not_found("quote draft"))
    }

    async fn refresh_services(&self, wizard: &mut QuoteWizard) {
        match self.content.active_services().await {
            Ok(items) => wizard.services_loaded(items),
            Err(e) => {
                warn!(error = %e, "loading services for quote wizard failed");
                wizard.services_failed(MSG_SERVICES_UNAVAILABLE);
            }
        }
    }

    /// Open a new draft and load the service list into it.
    #[instrument(skip(self))]
    pub async fn open(&self, preselected: Option<Uuid>) -> WizardView {
        let mut wizard = QuoteWizard::open(preselected);
        self.refresh_services(&mut wizard).await;
        let id = self.drafts.create(wizard.clone()).await;
        info!(draft_id = %id, "quote_opened");
        wizard.view(id)
    }

    pub async fn view(&self, id: Uuid) -> Result<WizardView, ServiceError> {
        Ok(self.load(id).await?.view(id))
    }

    /// Manual retry after the service list failed to load.
    #[instrument(skip(self))]
    pub async fn retry_services(&self, id: Uuid) -> Result<WizardView, ServiceError> {
        let mut wizard = self.load(id).await?;
        self.refresh_services(&mut wizard).await;
        self.drafts.put(id, wizard.clone()).await;
        Ok(wizard.view(id))
    }

    pub async fn update(&self, id: Uuid, patch: FormPatch) -> Result<WizardView, ServiceError> {
        let mut wizard = self.load(id).await?;
        wizard.apply(patch);
        self.drafts.put(id, wizard.clone()).await;
        Ok(wizard.view(id))
    }

    #[instrument(skip(self))]
    pub async fn next(&self, id: Uuid) -> Result<Advance, ServiceError> {
        let mut wizard = self.load(id).await?;
        let step = wizard.step();
        let moved = wizard.next().is_ok();
        self.drafts.put(id, wizard.clone()).await;
        if moved {
            Ok(Advance::Moved { view: wizard.view(id) })
        } else {
            WIZARD_REJECTIONS_TOTAL.with_label_values(&[step.as_str()]).inc();
            Ok(Advance::Rejected { view: wizard.view(id) })
        }
    }

    pub async fn back(&self, id: Uuid) -> Result<WizardView, ServiceError> {
        let mut wizard = self.load(id).await?;
        wizard.back();
        self.drafts.put(id, wizard.clone()).await;
        Ok(wizard.view(id))
    }

    /// Insert exactly one lead. On success the form resets and the draft is discarded.
    #[instrument(skip(self))]
    pub async fn submit(&self, id: Uuid) -> Result<Submission, ServiceError> {
        let mut wizard = self.load(id).await?;
        let lead = match wizard.lead_payload() {
            Ok(lead) => lead,
            Err(msg) => {
                wizard.submit_failed(msg);
                self.drafts.put(id, wizard.clone()).await;
                return Ok(Submission::Rejected { view: wizard.view(id) });
            }
        };

        match insert_row(self.repo.as_ref(), &Caller::Anonymous, Table::Leads, &lead).await {
            Ok(()) => {
                LEADS_SUBMITTED_TOTAL.inc();
                wizard.reset();
                self.drafts.remove(id).await;
                info!(draft_id = %id, service_id = %lead.service_id, "lead_submitted");
                Ok(Submission::Accepted { notice: SUBMIT_NOTICE })
            }
            Err(e) => {
                wizard.submit_failed(e.to_string());
                self.drafts.put(id, wizard.clone()).await;
                Ok(Submission::Failed { view: wizard.view(id) })
            }
        }
    }

    /// Close the wizard; the draft is discarded.
    pub async fn close(&self, id: Uuid) -> Result<(), ServiceError> {
        if self.drafts.remove(id).await {
            Ok(())
        } else {
            Err(ServiceError::not_found("quote draft"))
        }
    }
}
