//! Lead capture: a four-step wizard held as a server-side draft until submit.

pub mod service;
pub mod store;
pub mod wizard;

pub use service::{Advance, QuoteService, Submission};
pub use store::DraftStore;
pub use wizard::{FormPatch, QuoteWizard, Step, WizardView};
