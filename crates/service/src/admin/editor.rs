use serde::Serialize;
use uuid::Uuid;

use crate::errors::ServiceError;

/// What the panel's single form is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    Idle,
    Adding,
    Editing { id: Uuid },
}

/// One draft per panel. Starting a new add or edit replaces the current draft.
#[derive(Debug, Clone)]
pub struct Editor<D> {
    mode: EditMode,
    draft: Option<D>,
}

impl<D> Default for Editor<D> {
    fn default() -> Self {
        Self { mode: EditMode::Idle, draft: None }
    }
}

impl<D> Editor<D> {
    pub fn mode(&self) -> EditMode { self.mode }

    pub fn draft(&self) -> Option<&D> { self.draft.as_ref() }

    pub fn draft_mut(&mut self) -> Result<&mut D, ServiceError> {
        self.draft
            .as_mut()
            .ok_or_else(|| ServiceError::Validation("nothing is being edited".into()))
    }

    pub fn start_add(&mut self, blank: D) {
        self.mode = EditMode::Adding;
        self.draft = Some(blank);
    }

    pub fn start_edit(&mut self, id: Uuid, draft: D) {
        self.mode = EditMode::Editing { id };
        self.draft = Some(draft);
    }

    pub fn cancel(&mut self) {
        self.mode = EditMode::Idle;
        self.draft = None;
    }

    pub fn is_editing(&self, id: Uuid) -> bool {
        self.mode == EditMode::Editing { id }
    }
}
