use models::portfolio::PortfolioItem;
use models::service::Service;
use models::testimonial::Testimonial;
use service::admin::Managed;
use utoipa::openapi::path::{OperationBuilder, ParameterBuilder, ParameterIn, PathItem, PathItemType};
use utoipa::openapi::{Required, ResponseBuilder};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct OpenQuoteRequest { pub service_id: Option<Uuid> }

/// Any subset of the wizard's form fields.
#[derive(ToSchema)]
pub struct FormPatchRequest {
    pub service_id: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub business_type: Option<String>,
    pub current_website: Option<String>,
    pub message: Option<String>,
}

#[derive(ToSchema)]
pub struct StatusChangeRequest {
    /// new | contacted | qualified | converted | lost
    pub status: String,
}

#[derive(ToSchema)]
pub struct FeatureTextRequest { pub value: String }

#[derive(ToSchema)]
pub struct NewResultRequest { pub key: String, pub value: String }

/// Rename, revalue, or both.
#[derive(ToSchema)]
pub struct ResultEditRequest { pub key: Option<String>, pub value: Option<String> }

/// Documents the generic panel routes, with the same add/delete rules the router applies.
pub struct AdminPanels;

impl Modify for AdminPanels {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        panel_paths::<Service>(openapi, "/admin/services");
        panel_paths::<Testimonial>(openapi, "/admin/testimonials");
        panel_paths::<PortfolioItem>(openapi, "/admin/portfolio");
    }
}

fn panel_paths<T: Managed>(openapi: &mut utoipa::openapi::OpenApi, base: &str) {
    let noun = T::LABEL;
    let id = format!("{base}/{{id}}");
    add_path(openapi, base.to_string(), PathItemType::Get, &format!("Re-fetch and list every {noun}"), false);
    add_path(openapi, format!("{id}/edit"), PathItemType::Post, &format!("Open an edit draft for a {noun}"), true);
    add_path(openapi, format!("{id}/toggle"), PathItemType::Post, &format!("Flip the {noun}'s visibility flag"), true);
    add_path(openapi, format!("{base}/draft"), PathItemType::Patch, "Patch fields of the open draft", false);
    add_path(openapi, format!("{base}/draft/save"), PathItemType::Post, "Validate and write the open draft", false);
    add_path(openapi, format!("{base}/draft/cancel"), PathItemType::Post, "Discard the open draft", false);
    if T::blank().is_some() {
        add_path(openapi, format!("{base}/add"), PathItemType::Post, &format!("Open a blank {noun} draft"), false);
    }
    if T::CAN_DELETE {
        add_path(openapi, id, PathItemType::Delete, &format!("Delete a {noun}"), true);
    }
}

fn add_path(openapi: &mut utoipa::openapi::OpenApi, path: String, method: PathItemType, summary: &str, with_id: bool) {
    let mut op = OperationBuilder::new()
        .tag("admin")
        .summary(Some(summary))
        .response("200", ResponseBuilder::new().description("Panel view").build())
        .response("401", ResponseBuilder::new().description("Not signed in").build());
    if with_id {
        op = op
            .parameter(
                ParameterBuilder::new()
                    .name("id")
                    .parameter_in(ParameterIn::Path)
                    .required(Required::True)
                    .description(Some("Row id")),
            )
            .response("404", ResponseBuilder::new().description("Unknown row").build());
    }
    let op = op.build();
    match openapi.paths.paths.get_mut(&path) {
        Some(item) => {
            item.operations.insert(method, op);
        }
        None => {
            openapi.paths.paths.insert(path, PathItem::new(method, op));
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::public::health,
        crate::routes::public::metrics,
        crate::routes::public::view,
        crate::routes::public::site,
        crate::routes::public::services,
        crate::routes::public::testimonials,
        crate::routes::public::portfolio,
        crate::routes::quote::open,
        crate::routes::quote::view,
        crate::routes::quote::update,
        crate::routes::quote::next,
        crate::routes::quote::back,
        crate::routes::quote::retry_services,
        crate::routes::quote::submit,
        crate::routes::quote::close,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::leads::list,
        crate::routes::leads::set_status,
        crate::routes::admin::add_feature,
        crate::routes::admin::update_feature,
        crate::routes::admin::remove_feature,
        crate::routes::admin::add_result,
        crate::routes::admin::edit_result,
        crate::routes::admin::remove_result,
    ),
    modifiers(&AdminPanels),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            OpenQuoteRequest,
            FormPatchRequest,
            StatusChangeRequest,
            FeatureTextRequest,
            NewResultRequest,
            ResultEditRequest,
        )
    ),
    tags(
        (name = "public"),
        (name = "quote"),
        (name = "auth"),
        (name = "admin")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_quote_and_lead_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/quote/{id}/submit"));
        assert!(paths.iter().any(|p| p.as_str() == "/admin/leads/{id}/status"));
    }

    #[test]
    fn document_lists_admin_panels_with_their_rules() {
        let doc = ApiDoc::openapi();
        let has = |path: &str, method: PathItemType| {
            doc.paths.paths.get(path).is_some_and(|item| item.operations.contains_key(&method))
        };
        assert!(has("/admin/testimonials", PathItemType::Get));
        assert!(has("/admin/testimonials/{id}/toggle", PathItemType::Post));
        assert!(has("/admin/testimonials/add", PathItemType::Post));
        assert!(has("/admin/testimonials/{id}", PathItemType::Delete));
        assert!(has("/admin/portfolio/draft", PathItemType::Patch));
        assert!(has("/admin/services/draft/save", PathItemType::Post));
        assert!(has("/admin/services/draft/features/{index}", PathItemType::Put));
        assert!(has("/admin/portfolio/draft/results/{key}", PathItemType::Delete));
        // 服务只能编辑，不能新增或删除
        assert!(!has("/admin/services/add", PathItemType::Post));
        assert!(!has("/admin/services/{id}", PathItemType::Delete));
    }
}
