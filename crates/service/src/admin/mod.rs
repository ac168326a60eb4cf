//! Back-office panels. State lives in a per-admin workspace; every backend
//! call is made with the admin's own session.

pub mod editor;
pub mod leads;
pub mod managed;
pub mod panel;
pub mod workspace;

pub use editor::EditMode;
pub use leads::{LeadFilter, LeadTriage};
pub use managed::Managed;
pub use panel::{Panel, PanelView};
pub use workspace::{AdminWorkspace, SharedWorkspace, Workspaces};
