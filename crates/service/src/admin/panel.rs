//! Generic CRUD panel over one managed table.
//!
//! Every mutation is a single backend call followed by a full re-fetch; there
//! is no optimistic update and no conflict detection.

use models::portfolio::PortfolioItem;
use models::service::Service;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::editor::{EditMode, Editor};
use super::managed::Managed;
use crate::backend::{delete_row, insert_row, select_as, update_as, Caller, TableRepository};
use crate::errors::ServiceError;

pub struct Panel<T: Managed> {
    items: Vec<T>,
    load_error: Option<String>,
    editor: Editor<T::Draft>,
}

impl<T: Managed> Default for Panel<T> {
    fn default() -> Self {
        Self { items: Vec::new(), load_error: None, editor: Editor::default() }
    }
}

#[derive(Serialize)]
#[serde(bound(serialize = "T: Managed"))]
pub struct PanelView<T: Managed> {
    pub items: Vec<T>,
    pub error: Option<String>,
    pub mode: EditMode,
    pub draft: Option<T::Draft>,
    pub can_add: bool,
    pub can_delete: bool,
}

impl<T: Managed> Panel<T> {
    pub fn items(&self) -> &[T] { &self.items }

    pub fn mode(&self) -> EditMode { self.editor.mode() }

    pub fn draft(&self) -> Option<&T::Draft> { self.editor.draft() }

    /// Re-fetch the whole collection. A failure keeps the previous rows and is shown inline.
    #[instrument(skip_all, fields(table = %T::TABLE))]
    pub async fn refresh(&mut self, repo: &dyn TableRepository, caller: &Caller) {
        match select_as::<T>(repo, caller, &T::list_query()).await {
            Ok(items) => {
                self.items = items;
                self.load_error = None;
            }
            Err(e) => {
                warn!(error = %e, "panel refresh failed");
                self.load_error = Some(e.to_string());
            }
        }
    }

    pub fn start_add(&mut self) -> Result<(), ServiceError> {
        let blank = T::blank()
            .ok_or_else(|| ServiceError::Validation(format!("a {} cannot be added here", T::LABEL)))?;
        self.editor.start_add(blank);
        Ok(())
    }

    pub fn start_edit(&mut self, id: Uuid) -> Result<(), ServiceError> {
        let item = self.find(id)?;
        let draft = item.to_draft();
        self.editor.start_edit(id, draft);
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.editor.cancel();
    }

    pub fn draft_mut(&mut self) -> Result<&mut T::Draft, ServiceError> {
        self.editor.draft_mut()
    }

    /// Merge top-level fields into the draft. Unknown fields and wrong types are rejected
    /// and leave the draft untouched.
    pub fn patch_draft(&mut self, patch: Value) -> Result<(), ServiceError> {
        let draft = self.editor.draft_mut()?;
        let Value::Object(patch) = patch else {
            return Err(ServiceError::Validation("draft patch must be a JSON object".into()));
        };
        let mut merged = serde_json::to_value(&*draft).map_err(|e| ServiceError::Validation(e.to_string()))?;
        if let Value::Object(target) = &mut merged {
            for (k, v) in patch {
                target.insert(k, v);
            }
        }
        *draft = serde_json::from_value(merged)
            .map_err(|e| ServiceError::Validation(format!("invalid {} field: {}", T::LABEL, e)))?;
        Ok(())
    }

    /// Insert (adding) or update with a fresh `updated_at` (editing), then re-fetch and leave edit mode.
    #[instrument(skip_all, fields(table = %T::TABLE))]
    pub async fn save(&mut self, repo: &dyn TableRepository, caller: &Caller) -> Result<(), ServiceError> {
        let mode = self.editor.mode();
        let draft = self
            .editor
            .draft()
            .cloned()
            .ok_or_else(|| ServiceError::Validation("nothing to save".into()))?;
        T::validate(&draft)?;
        match mode {
            EditMode::Adding => insert_row(repo, caller, T::TABLE, &draft).await?,
            EditMode::Editing { id } => {
                let patch = serde_json::to_value(&draft).map_err(|e| ServiceError::Validation(e.to_string()))?;
                update_as::<T>(repo, caller, id, patch).await?;
            }
            EditMode::Idle => return Err(ServiceError::Validation("nothing to save".into())),
        }
        info!(?mode, "panel_saved");
        self.refresh(repo, caller).await;
        self.editor.cancel();
        Ok(())
    }

    #[instrument(skip(self, repo, caller), fields(table = %T::TABLE))]
    pub async fn delete(&mut self, repo: &dyn TableRepository, caller: &Caller, id: Uuid) -> Result<(), ServiceError> {
        if !T::CAN_DELETE {
            return Err(ServiceError::Validation(format!("a {} cannot be deleted", T::LABEL)));
        }
        if !delete_row(repo, caller, T::TABLE, id).await? {
            return Err(ServiceError::not_found(T::LABEL));
        }
        if self.editor.is_editing(id) {
            self.editor.cancel();
        }
        self.refresh(repo, caller).await;
        Ok(())
    }

    /// Flip the panel's boolean flag. Only that field and `updated_at` are written.
    #[instrument(skip(self, repo, caller), fields(table = %T::TABLE))]
    pub async fn toggle(&mut self, repo: &dyn TableRepository, caller: &Caller, id: Uuid) -> Result<(), ServiceError> {
        let current = self.find(id)?.flag();
        let mut patch = serde_json::Map::new();
        patch.insert(T::FLAG.to_string(), json!(!current));
        update_as::<T>(repo, caller, id, Value::Object(patch)).await?;
        self.refresh(repo, caller).await;
        Ok(())
    }

    pub fn view(&self) -> PanelView<T> {
        PanelView {
            items: self.items.clone(),
            error: self.load_error.clone(),
            mode: self.editor.mode(),
            draft: self.editor.draft().cloned(),
            can_add: T::blank().is_some(),
            can_delete: T::CAN_DELETE,
        }
    }

    fn find(&self, id: Uuid) -> Result<&T, ServiceError> {
        self.items
            .iter()
            .find(|item| item.id() == id)
            .ok_or_else(|| ServiceError::not_found(T::LABEL))
    }
}

/// Feature-list editing on the service draft.
impl Panel<Service> {
    pub fn add_feature(&mut self) -> Result<(), ServiceError> {
        self.draft_mut()?.features.add();
        Ok(())
    }

    pub fn update_feature(&mut self, index: usize, value: String) -> Result<(), ServiceError> {
        self.draft_mut()?.features.update(index, value)?;
        Ok(())
    }

    pub fn remove_feature(&mut self, index: usize) -> Result<(), ServiceError> {
        self.draft_mut()?.features.remove(index)?;
        Ok(())
    }
}

/// Result-metric editing on the portfolio draft.
impl Panel<PortfolioItem> {
    pub fn add_result(&mut self, key: &str, value: String) -> Result<(), ServiceError> {
        self.draft_mut()?.results.add(key, value)?;
        Ok(())
    }

    pub fn rename_result(&mut self, from: &str, to: &str) -> Result<(), ServiceError> {
        self.draft_mut()?.results.rename(from, to)?;
        Ok(())
    }

    pub fn set_result(&mut self, key: &str, value: String) -> Result<(), ServiceError> {
        self.draft_mut()?.results.set_value(key, value)?;
        Ok(())
    }

    pub fn remove_result(&mut self, key: &str) -> Result<(), ServiceError> {
        self.draft_mut()?.results.remove(key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use models::testimonial::Testimonial;
    use models::Table;
    use std::sync::Arc;

    async fn signed_in(db: &MemoryBackend) -> Caller {
        use crate::auth::repository::AuthRepository;
        let s = db.sign_in("admin@example.com", "pw").await.unwrap();
        Caller::Bearer(s.access_token)
    }

    fn db() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::new().with_admin("admin@example.com", "pw"))
    }

    fn testimonial(name: &str, featured: bool, at: &str) -> Value {
        json!({
            "client_name": name, "client_company": "Co", "client_role": "Owner",
            "testimonial_text": "Great", "rating": 4, "image_url": null,
            "is_featured": featured, "created_at": at, "updated_at": at
        })
    }

    #[tokio::test]
    async fn admins_see_unfeatured_rows_newest_first() {
        let db = db();
        let caller = signed_in(&db).await;
        db.seed(
            Table::Testimonials,
            vec![testimonial("Old", true, "2024-01-01T00:00:00Z"), testimonial("New", false, "2024-02-01T00:00:00Z")],
        );
        let mut panel: Panel<Testimonial> = Panel::default();
        panel.refresh(db.as_ref(), &caller).await;
        let names: Vec<&str> = panel.items().iter().map(|t| t.client_name.as_str()).collect();
        assert_eq!(names, ["New", "Old"]);
    }

    #[tokio::test]
    async fn toggle_flips_only_the_flag() -> anyhow::Result<()> {
        let db = db();
        let caller = signed_in(&db).await;
        let ids = db.seed(Table::Testimonials, vec![testimonial("A", true, "2024-01-01T00:00:00Z")]);
        let before = db.rows(Table::Testimonials)[0].clone();

        let mut panel: Panel<Testimonial> = Panel::default();
        panel.refresh(db.as_ref(), &caller).await;
        panel.toggle(db.as_ref(), &caller, ids[0]).await?;

        let after = db.rows(Table::Testimonials)[0].clone();
        assert_eq!(after["is_featured"], false);
        assert_ne!(after["updated_at"], before["updated_at"]);
        let (b, a) = (before.as_object().unwrap(), after.as_object().unwrap());
        assert_eq!(a.len(), b.len());
        for (k, v) in b {
            if k != "is_featured" && k != "updated_at" {
                assert_eq!(&a[k], v, "field {} changed", k);
            }
        }
        assert!(!panel.items()[0].is_featured);
        Ok(())
    }

    #[tokio::test]
    async fn add_save_then_delete() -> anyhow::Result<()> {
        let db = db();
        let caller = signed_in(&db).await;
        let mut panel: Panel<Testimonial> = Panel::default();
        panel.start_add()?;
        assert_eq!(panel.draft().map(|d| d.rating), Some(5));

        // blank draft does not validate
        assert!(panel.save(db.as_ref(), &caller).await.is_err());
        panel.patch_draft(json!({"client_name": "Mike", "testimonial_text": "Phones ringing"}))?;
        assert!(panel.patch_draft(json!({"bogus": 1})).is_err());
        assert!(panel.patch_draft(json!({"rating": "five"})).is_err());
        panel.save(db.as_ref(), &caller).await?;

        assert_eq!(panel.mode(), EditMode::Idle);
        assert_eq!(panel.items().len(), 1);
        let id = panel.items()[0].id;
        panel.delete(db.as_ref(), &caller, id).await?;
        assert!(panel.items().is_empty());
        assert!(matches!(panel.delete(db.as_ref(), &caller, id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn services_edit_features_and_cannot_add_or_delete() -> anyhow::Result<()> {
        let db = db();
        let caller = signed_in(&db).await;
        let ids = db.seed(
            Table::Services,
            vec![json!({"name": "Basic", "price": 499, "description": "d", "features": ["5 pages"], "is_active": true, "sort_order": 1})],
        );
        let mut panel: Panel<Service> = Panel::default();
        panel.refresh(db.as_ref(), &caller).await;
        assert!(panel.start_add().is_err());
        assert!(panel.delete(db.as_ref(), &caller, ids[0]).await.is_err());

        panel.start_edit(ids[0])?;
        panel.add_feature()?;
        panel.update_feature(1, "Hosting".into())?;
        assert!(panel.remove_feature(7).is_err());
        panel.patch_draft(json!({"price": 549.0}))?;
        panel.save(db.as_ref(), &caller).await?;

        let row = &db.rows(Table::Services)[0];
        assert_eq!(row["features"], json!(["5 pages", "Hosting"]));
        assert_eq!(row["price"], 549.0);
        assert_eq!(row["sort_order"], 1);
        Ok(())
    }

    #[tokio::test]
    async fn portfolio_results_editor() -> anyhow::Result<()> {
        let mut panel: Panel<PortfolioItem> = Panel::default();
        assert!(panel.add_result("Leads", "+1".into()).is_err());
        panel.start_add()?;
        panel.add_result("Leads", "+150%".into())?;
        assert!(panel.add_result("Leads", "dup".into()).is_err());
        assert!(panel.add_result(" ", "x".into()).is_err());
        panel.rename_result("Leads", "Qualified leads")?;
        panel.set_result("Qualified leads", "+160%".into())?;
        assert!(panel.set_result("Leads", "x".into()).is_err());
        let draft = panel.draft().unwrap();
        assert_eq!(draft.results.get("Qualified leads"), Some("+160%"));
        assert_eq!(draft.service_type, "Basic");
        panel.remove_result("Qualified leads")?;
        assert!(panel.draft().unwrap().results.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn refresh_failure_is_shown_inline() {
        let db = db();
        let caller = signed_in(&db).await;
        db.fail(Table::Portfolio);
        let mut panel: Panel<PortfolioItem> = Panel::default();
        panel.refresh(db.as_ref(), &caller).await;
        assert!(panel.view().error.is_some());
        assert!(panel.view().can_add);
    }
}
