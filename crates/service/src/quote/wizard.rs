//! Quote wizard state machine: `service -> info -> details -> payment`.
//!
//! Forward moves are gated by the current step's required fields; back moves
//! are always allowed and never touch field values.

use models::lead::{LeadStatus, NewLead, PaymentStatus};
use models::service::Service;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MSG_SELECT_SERVICE: &str = "Please select a service package";
pub const MSG_REQUIRED_FIELDS: &str = "Please fill in all required fields";
pub const MSG_COMPANY_NAME: &str = "Please enter your company name";
pub const MSG_SERVICES_UNAVAILABLE: &str = "Failed to load service packages. Please try again.";
pub const SUBMIT_NOTICE: &str =
    "Thank you! We will contact you shortly to process your payment and get started on your project.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Service,
    Info,
    Details,
    Payment,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Service, Step::Info, Step::Details, Step::Payment];

    fn index(self) -> usize {
        match self {
            Step::Service => 0,
            Step::Info => 1,
            Step::Details => 2,
            Step::Payment => 3,
        }
    }

    pub fn next(self) -> Option<Step> {
        Step::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Step::ALL[i])
    }

    /// Progress indicator percentage.
    pub fn progress(self) -> u8 {
        (self.index() as u8 + 1) * 25
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Service => "service",
            Step::Info => "info",
            Step::Details => "details",
            Step::Payment => "payment",
        }
    }
}

/// Field values collected across the steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteForm {
    pub service_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub business_type: String,
    pub current_website: String,
    pub message: String,
}

/// Partial update from the client; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormPatch {
    pub service_id: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub business_type: Option<String>,
    pub current_website: Option<String>,
    pub message: Option<String>,
}

fn blank(s: &str) -> bool {
    s.is_empty()
}

impl QuoteForm {
    pub fn apply(&mut self, patch: FormPatch) {
        if let Some(v) = patch.service_id { self.service_id = Some(v); }
        if let Some(v) = patch.name { self.name = v; }
        if let Some(v) = patch.email { self.email = v; }
        if let Some(v) = patch.phone { self.phone = v; }
        if let Some(v) = patch.company_name { self.company_name = v; }
        if let Some(v) = patch.business_type { self.business_type = v; }
        if let Some(v) = patch.current_website { self.current_website = v; }
        if let Some(v) = patch.message { self.message = v; }
    }

    /// Required-field check for one step; the error is the user-facing message.
    /// Presence only: any non-empty value counts.
    pub fn check(&self, step: Step) -> Result<(), &'static str> {
        match step {
            Step::Service if self.service_id.is_none() => Err(MSG_SELECT_SERVICE),
            Step::Info if blank(&self.name) || blank(&self.email) || blank(&self.phone) => Err(MSG_REQUIRED_FIELDS),
            Step::Details if blank(&self.company_name) => Err(MSG_COMPANY_NAME),
            _ => Ok(()),
        }
    }
}

/// The wizard's copy of the active service list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ServiceOptions {
    #[default]
    NotLoaded,
    Loaded { items: Vec<Service> },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub service_name: String,
    pub price: f64,
    pub form: QuoteForm,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardView {
    pub id: Uuid,
    pub step: Step,
    pub progress: u8,
    pub form: QuoteForm,
    pub services: ServiceOptions,
    pub selected_service: Option<Service>,
    pub error: Option<String>,
    pub can_retry_services: bool,
    pub review: Option<Review>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteWizard {
    step: Step,
    form: QuoteForm,
    services: ServiceOptions,
    error: Option<String>,
}

impl QuoteWizard {
    /// Fresh wizard, optionally with a service already chosen.
    pub fn open(preselected: Option<Uuid>) -> Self {
        Self {
            step: Step::Service,
            form: QuoteForm { service_id: preselected, ..QuoteForm::default() },
            services: ServiceOptions::NotLoaded,
            error: None,
        }
    }

    pub fn step(&self) -> Step { self.step }

    pub fn form(&self) -> &QuoteForm { &self.form }

    pub fn error(&self) -> Option<&str> { self.error.as_deref() }

    pub fn services(&self) -> &ServiceOptions { &self.services }

    pub fn needs_services(&self) -> bool {
        !matches!(self.services, ServiceOptions::Loaded { .. })
    }

    pub fn services_loaded(&mut self, items: Vec<Service>) {
        self.services = ServiceOptions::Loaded { items };
    }

    pub fn services_failed(&mut self, error: impl Into<String>) {
        self.services = ServiceOptions::Failed { error: error.into() };
    }

    pub fn apply(&mut self, patch: FormPatch) {
        self.form.apply(patch);
    }

    /// Field check for the current step. The service step also needs the chosen id
    /// to be one of the loaded active services.
    fn check_step(&self, step: Step) -> Result<(), &'static str> {
        self.form.check(step)?;
        if step == Step::Service && self.selected_service().is_none() {
            return Err(MSG_SELECT_SERVICE);
        }
        Ok(())
    }

    /// Advance one step. On a missing field only the error message changes.
    pub fn next(&mut self) -> Result<Step, &'static str> {
        if let Err(msg) = self.check_step(self.step) {
            self.error = Some(msg.to_string());
            return Err(msg);
        }
        self.error = None;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Return to the previous step; a no-op on the first one.
    pub fn back(&mut self) -> Step {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    pub fn selected_service(&self) -> Option<&Service> {
        let id = self.form.service_id?;
        match &self.services {
            ServiceOptions::Loaded { items } => items.iter().find(|s| s.id == id),
            _ => None,
        }
    }

    /// Only shown on the payment step, and only for a resolved service.
    pub fn review(&self) -> Option<Review> {
        if self.step != Step::Payment {
            return None;
        }
        let service = self.selected_service()?;
        Some(Review { service_name: service.name.clone(), price: service.price, form: self.form.clone() })
    }

    /// The row to insert. Only available from the payment step with every required field present.
    pub fn lead_payload(&self) -> Result<NewLead, &'static str> {
        for step in [Step::Service, Step::Info, Step::Details] {
            self.check_step(step)?;
        }
        if self.step != Step::Payment {
            return Err(MSG_REQUIRED_FIELDS);
        }
        let service_id = self.selected_service().map(|s| s.id).ok_or(MSG_SELECT_SERVICE)?;
        Ok(NewLead {
            service_id,
            name: self.form.name.clone(),
            email: self.form.email.clone(),
            phone: self.form.phone.clone(),
            company_name: self.form.company_name.clone(),
            business_type: self.form.business_type.clone(),
            current_website: self.form.current_website.clone(),
            message: self.form.message.clone(),
            status: LeadStatus::New,
            payment_status: PaymentStatus::Pending,
        })
    }

    pub fn submit_failed(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    /// Back to the initial state. The loaded service list is kept.
    pub fn reset(&mut self) {
        self.step = Step::Service;
        self.form = QuoteForm::default();
        self.error = None;
    }

    pub fn view(&self, id: Uuid) -> WizardView {
        WizardView {
            id,
            step: self.step,
            progress: self.step.progress(),
            form: self.form.clone(),
            services: self.services.clone(),
            selected_service: self.selected_service().cloned(),
            error: self.error.clone(),
            can_retry_services: matches!(self.services, ServiceOptions::Failed { .. }),
            review: self.review(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use models::service::FeatureList;

    fn basic() -> Service {
        Service {
            id: Uuid::new_v4(),
            name: "Basic".into(),
            price: 499.0,
            description: String::new(),
            features: FeatureList::default(),
            is_active: true,
            sort_order: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn filled(service: &Service) -> QuoteWizard {
        let mut w = QuoteWizard::open(Some(service.id));
        w.services_loaded(vec![service.clone()]);
        w.apply(FormPatch {
            name: Some("John Smith".into()),
            email: Some("john@example.com".into()),
            phone: Some("555-123-4567".into()),
            company_name: Some("Smith Plumbing".into()),
            ..FormPatch::default()
        });
        w
    }

    #[test]
    fn progress_per_step() {
        let p: Vec<u8> = Step::ALL.iter().map(|s| s.progress()).collect();
        assert_eq!(p, [25, 50, 75, 100]);
        assert_eq!(Step::Payment.next(), None);
        assert_eq!(Step::Service.prev(), None);
    }

    #[test]
    fn missing_fields_only_change_the_message() {
        let cases = [
            (Step::Service, FormPatch::default(), MSG_SELECT_SERVICE),
            (Step::Info, FormPatch { name: Some("A".into()), email: Some("a@b.c".into()), ..FormPatch::default() }, MSG_REQUIRED_FIELDS),
            (Step::Details, FormPatch { business_type: Some("plumbing".into()), ..FormPatch::default() }, MSG_COMPANY_NAME),
        ];
        for (step, patch, expected) in cases {
            let mut w = QuoteWizard::open(None);
            w.step = step;
            if step != Step::Service {
                w.form.service_id = Some(Uuid::new_v4());
            }
            if step == Step::Details {
                w.form.name = "A".into();
                w.form.email = "a@b.c".into();
                w.form.phone = "1".into();
            }
            w.apply(patch);
            let before = w.clone();
            assert_eq!(w.next(), Err(expected));
            assert_eq!(w.step, before.step);
            assert_eq!(w.form, before.form);
            assert_eq!(w.error(), Some(expected));
        }
    }

    #[test]
    fn presence_is_all_that_is_checked() {
        let s = basic();
        let mut w = QuoteWizard::open(Some(s.id));
        w.services_loaded(vec![s]);
        w.next().unwrap();
        w.apply(FormPatch { name: Some(String::new()), email: Some("x".into()), phone: Some("y".into()), ..FormPatch::default() });
        assert_eq!(w.next(), Err(MSG_REQUIRED_FIELDS));
        w.apply(FormPatch { name: Some(" ".into()), ..FormPatch::default() });
        assert_eq!(w.next(), Ok(Step::Details));
    }

    #[test]
    fn service_must_be_one_of_the_loaded_active_ones() {
        let s = basic();
        let inactive_id = Uuid::new_v4();
        for preselected in [Uuid::new_v4(), inactive_id] {
            let mut w = QuoteWizard::open(Some(preselected));
            w.services_loaded(vec![s.clone()]);
            w.apply(FormPatch {
                name: Some("A".into()),
                email: Some("a@b.c".into()),
                phone: Some("1".into()),
                company_name: Some("Co".into()),
                ..FormPatch::default()
            });
            assert_eq!(w.next(), Err(MSG_SELECT_SERVICE));
            assert_eq!(w.step(), Step::Service);
            assert!(w.selected_service().is_none());

            // even if the step is forced, nothing is reviewed or submitted
            w.step = Step::Payment;
            assert!(w.review().is_none());
            assert_eq!(w.lead_payload().map(|l| l.service_id), Err(MSG_SELECT_SERVICE));
        }

        // an id is not enough before the list has loaded
        let mut w = QuoteWizard::open(Some(s.id));
        assert_eq!(w.next(), Err(MSG_SELECT_SERVICE));
        w.services_loaded(vec![s]);
        assert_eq!(w.next(), Ok(Step::Info));
    }

    #[test]
    fn back_returns_to_previous_step_keeping_values() {
        let s = basic();
        let mut w = filled(&s);
        assert_eq!(w.next(), Ok(Step::Info));
        assert_eq!(w.next(), Ok(Step::Details));
        assert_eq!(w.next(), Ok(Step::Payment));
        let form = w.form.clone();
        assert_eq!(w.back(), Step::Details);
        assert_eq!(w.back(), Step::Info);
        assert_eq!(w.back(), Step::Service);
        assert_eq!(w.back(), Step::Service);
        assert_eq!(w.form, form);
    }

    #[test]
    fn next_clears_a_previous_error() {
        let s = basic();
        let mut w = QuoteWizard::open(None);
        w.services_loaded(vec![s.clone()]);
        assert!(w.next().is_err());
        w.apply(FormPatch { service_id: Some(s.id), ..FormPatch::default() });
        assert_eq!(w.next(), Ok(Step::Info));
        assert_eq!(w.error(), None);
    }

    #[test]
    fn payment_review_and_payload() {
        let s = basic();
        let mut w = filled(&s);
        assert!(w.lead_payload().is_err());
        for _ in 0..3 {
            w.next().unwrap();
        }
        let review = w.review().unwrap();
        assert_eq!(review.service_name, "Basic");
        assert_eq!(review.price, 499.0);

        let lead = w.lead_payload().unwrap();
        assert_eq!(lead.service_id, s.id);
        assert_eq!(lead.name, "John Smith");
        assert_eq!(lead.email, "john@example.com");
        assert_eq!(lead.phone, "555-123-4567");
        assert_eq!(lead.company_name, "Smith Plumbing");
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.payment_status, PaymentStatus::Pending);

        w.reset();
        assert_eq!(w.step(), Step::Service);
        assert_eq!(w.form(), &QuoteForm::default());
    }

    #[test]
    fn view_exposes_retry_after_failed_load() {
        let mut w = QuoteWizard::open(None);
        w.services_failed(MSG_SERVICES_UNAVAILABLE);
        let v = w.view(Uuid::nil());
        assert!(v.can_retry_services);
        assert_eq!(v.progress, 25);
        assert!(w.needs_services());
    }
}
