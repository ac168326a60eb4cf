use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use configs::AppConfig;
use models::Table;
use serde_json::{json, Value};
use service::backend::MemoryBackend;
use service::runtime::Backends;
use tower::ServiceExt;
use uuid::Uuid;

use server::startup::build_app;

const ADMIN_EMAIL: &str = "admin@azcontractorpro.com";
const ADMIN_PASSWORD: &str = "S3curePass!";

fn seeded() -> (Arc<MemoryBackend>, Vec<Uuid>) {
    let db = Arc::new(MemoryBackend::new().with_admin(ADMIN_EMAIL, ADMIN_PASSWORD));
    let services = db.seed(
        Table::Services,
        vec![
            json!({"name": "Pro", "price": 999, "description": "", "features": ["10 pages"], "is_active": true, "sort_order": 2}),
            json!({"name": "Basic", "price": 499, "description": "", "features": ["5 pages"], "is_active": true, "sort_order": 1}),
            json!({"name": "Legacy", "price": 99, "description": "", "features": [], "is_active": false, "sort_order": 0}),
        ],
    );
    db.seed(
        Table::Testimonials,
        vec![
            json!({"client_name": "Mike", "client_company": "Mike's Plumbing", "client_role": "Owner",
                   "testimonial_text": "Phone has not stopped ringing", "rating": 5, "image_url": null, "is_featured": true}),
            json!({"client_name": "Hidden", "client_company": "Co", "client_role": "Owner",
                   "testimonial_text": "Meh", "rating": 3, "image_url": null, "is_featured": false}),
        ],
    );
    (db, services)
}

fn app(db: &Arc<MemoryBackend>) -> Router {
    build_app(Backends::memory(db.clone()), &AppConfig::default())
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    let req = match body {
        Some(b) => req.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
        None => req.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

async fn login(app: &Router) -> anyhow::Result<String> {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(body["token"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn public_sections_load_independently() -> anyhow::Result<()> {
    let (db, _) = seeded();
    let app = app(&db);

    let (status, body) = send(&app, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (_, services) = send(&app, "GET", "/api/services", None, None).await?;
    let names: Vec<&str> = services.as_array().unwrap().iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Basic", "Pro"]);

    db.fail(Table::Portfolio);
    let (status, site) = send(&app, "GET", "/api/site", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(site["services"]["state"], "loaded");
    assert_eq!(site["testimonials"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(site["portfolio"]["state"], "failed");
    assert_eq!(site["copy"]["contact"]["phone"], "(520) 461-3937");

    let (status, _) = send(&app, "GET", "/api/portfolio", None, None).await?;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    Ok(())
}

#[tokio::test]
async fn quote_wizard_submits_one_lead() -> anyhow::Result<()> {
    let (db, services) = seeded();
    let app = app(&db);

    let (status, view) = send(&app, "POST", "/api/quote", None, Some(json!({}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["step"], "service");
    assert_eq!(view["progress"], 25);
    let id = view["id"].as_str().unwrap().to_string();

    let (status, rejected) = send(&app, "POST", &format!("/api/quote/{id}/next"), None, None).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(rejected["outcome"], "rejected");
    assert_eq!(rejected["view"]["error"], "Please select a service package");

    let patch = json!({"service_id": services[1], "name": "John Smith", "email": "john@example.com",
                       "phone": "555-123-4567", "company_name": "Smith Plumbing", "business_type": "plumbing"});
    let (status, _) = send(&app, "PATCH", &format!("/api/quote/{id}"), None, Some(patch)).await?;
    assert_eq!(status, StatusCode::OK);
    for _ in 0..3 {
        let (status, _) = send(&app, "POST", &format!("/api/quote/{id}/next"), None, None).await?;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, review) = send(&app, "GET", &format!("/api/quote/{id}"), None, None).await?;
    assert_eq!(review["step"], "payment");
    assert_eq!(review["review"]["service_name"], "Basic");
    assert_eq!(review["review"]["price"], 499.0);

    let (status, done) = send(&app, "POST", &format!("/api/quote/{id}/submit"), None, None).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(done["outcome"], "accepted");

    let leads = db.rows(Table::Leads);
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0]["status"], "new");
    assert_eq!(leads[0]["payment_status"], "pending");
    assert_eq!(leads[0]["company_name"], "Smith Plumbing");

    // draft is gone after a successful submit
    let (status, _) = send(&app, "GET", &format!("/api/quote/{id}"), None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn quote_rejects_inactive_preselected_service() -> anyhow::Result<()> {
    let (db, services) = seeded();
    let app = app(&db);
    let (_, view) = send(&app, "POST", "/api/quote", None, Some(json!({"service_id": services[2]}))).await?;
    let id = view["id"].as_str().unwrap().to_string();
    assert!(view["selected_service"].is_null());

    let (status, rejected) = send(&app, "POST", &format!("/api/quote/{id}/next"), None, None).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(rejected["view"]["step"], "service");
    Ok(())
}

#[tokio::test]
async fn quote_submit_failure_keeps_draft() -> anyhow::Result<()> {
    let (db, services) = seeded();
    let app = app(&db);
    let (_, view) = send(&app, "POST", "/api/quote", None, Some(json!({"service_id": services[0]}))).await?;
    let id = view["id"].as_str().unwrap().to_string();
    assert_eq!(view["form"]["service_id"], services[0].to_string());

    let patch = json!({"name": "A", "email": "a@b.co", "phone": "1", "company_name": "Co"});
    send(&app, "PATCH", &format!("/api/quote/{id}"), None, Some(patch)).await?;
    for _ in 0..3 {
        send(&app, "POST", &format!("/api/quote/{id}/next"), None, None).await?;
    }
    db.fail(Table::Leads);
    let (status, failed) = send(&app, "POST", &format!("/api/quote/{id}/submit"), None, None).await?;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(failed["view"]["step"], "payment");
    assert!(db.rows(Table::Leads).is_empty());

    let (status, _) = send(&app, "DELETE", &format!("/api/quote/{id}"), None, None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn admin_routes_require_a_live_session() -> anyhow::Result<()> {
    let (db, _) = seeded();
    let app = app(&db);

    let (status, _) = send(&app, "GET", "/admin/leads", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, "GET", "/admin/leads", Some("stale"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "POST", "/auth/login", None, Some(json!({"email": ADMIN_EMAIL, "password": "nope"}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, view) = send(&app, "GET", "/api/view?path=/admin", None, None).await?;
    assert_eq!(view["view"], "admin_login");

    let token = login(&app).await?;
    let (_, view) = send(&app, "GET", "/api/view?path=/admin", Some(&token), None).await?;
    assert_eq!(view["view"], "admin_dashboard");
    assert_eq!(view["email"], ADMIN_EMAIL);
    let (_, view) = send(&app, "GET", "/api/view?path=/", Some(&token), None).await?;
    assert_eq!(view["view"], "public");

    let (status, _) = send(&app, "POST", "/auth/logout", Some(&token), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", "/auth/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn session_cookie_authorizes_admin_routes() -> anyhow::Result<()> {
    let (db, _) = seeded();
    let app = app(&db);
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}))?))?;
    let resp = app.clone().oneshot(req).await?;
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("HttpOnly"));

    let pair = cookie.split(';').next().unwrap_or_default().to_string();
    let req = Request::builder().uri("/auth/me").header(header::COOKIE, pair).body(Body::empty())?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn testimonial_panel_add_toggle_delete() -> anyhow::Result<()> {
    let (db, _) = seeded();
    let app = app(&db);
    let token = login(&app).await?;
    let t = Some(token.as_str());

    let (status, panel) = send(&app, "GET", "/admin/testimonials", t, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(panel["items"].as_array().unwrap().len(), 2);
    assert_eq!(panel["can_delete"], true);

    let (_, panel) = send(&app, "POST", "/admin/testimonials/add", t, None).await?;
    assert_eq!(panel["mode"]["mode"], "adding");
    assert_eq!(panel["draft"]["rating"], 5);

    let (status, _) = send(&app, "POST", "/admin/testimonials/draft/save", t, None).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let fields = json!({"client_name": "Sara", "client_company": "Sara's HVAC", "testimonial_text": "Booked solid"});
    send(&app, "PATCH", "/admin/testimonials/draft", t, Some(fields)).await?;
    let (status, panel) = send(&app, "POST", "/admin/testimonials/draft/save", t, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(panel["mode"]["mode"], "idle");
    assert_eq!(panel["items"].as_array().unwrap().len(), 3);

    let sara = db.rows(Table::Testimonials).into_iter().find(|r| r["client_name"] == "Sara").unwrap();
    let id = sara["id"].as_str().unwrap().to_string();
    send(&app, "POST", &format!("/admin/testimonials/{id}/toggle"), t, None).await?;
    let (_, featured) = send(&app, "GET", "/api/testimonials", None, None).await?;
    assert!(featured.as_array().unwrap().iter().all(|r| r["client_name"] != "Sara"));

    let (status, _) = send(&app, "DELETE", &format!("/admin/testimonials/{id}"), t, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(db.rows(Table::Testimonials).len(), 2);
    Ok(())
}

#[tokio::test]
async fn services_panel_edits_features_but_never_deletes() -> anyhow::Result<()> {
    let (db, services) = seeded();
    let app = app(&db);
    let token = login(&app).await?;
    let t = Some(token.as_str());

    send(&app, "GET", "/admin/services", t, None).await?;
    // no add or delete routes exist for services
    let (status, _) = send(&app, "POST", "/admin/services/add", t, None).await?;
    assert!(!status.is_success());
    let (status, _) = send(&app, "DELETE", &format!("/admin/services/{}", services[0]), t, None).await?;
    assert!(!status.is_success());

    send(&app, "POST", &format!("/admin/services/{}/edit", services[0]), t, None).await?;
    send(&app, "POST", "/admin/services/draft/features", t, None).await?;
    let (status, panel) = send(&app, "PUT", "/admin/services/draft/features/1", t, Some(json!({"value": "SEO"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(panel["draft"]["features"], json!(["10 pages", "SEO"]));
    let (status, _) = send(&app, "DELETE", "/admin/services/draft/features/9", t, None).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    send(&app, "POST", "/admin/services/draft/save", t, None).await?;
    let pro = db.rows(Table::Services).into_iter().find(|r| r["name"] == "Pro").unwrap();
    assert_eq!(pro["features"], json!(["10 pages", "SEO"]));
    Ok(())
}

#[tokio::test]
async fn lead_triage_filters_and_moves_status() -> anyhow::Result<()> {
    let (db, services) = seeded();
    let leads = db.seed(
        Table::Leads,
        vec![
            json!({"name": "A", "email": "a@x.com", "phone": "1", "company_name": "A Co", "service_id": services[2],
                   "business_type": "", "current_website": null, "message": "", "status": "new", "payment_status": "pending",
                   "created_at": "2024-01-01T00:00:00Z"}),
            json!({"name": "B", "email": "b@x.com", "phone": "2", "company_name": "B Co", "service_id": null,
                   "business_type": "", "current_website": null, "message": "", "status": "contacted", "payment_status": "pending",
                   "created_at": "2024-02-01T00:00:00Z"}),
        ],
    );
    let app = app(&db);
    let token = login(&app).await?;
    let t = Some(token.as_str());

    let (_, view) = send(&app, "GET", "/admin/leads", t, None).await?;
    assert_eq!(view["total"], 2);
    assert_eq!(view["leads"][0]["name"], "B");
    assert_eq!(view["leads"][0]["service_name"], "Unknown");
    assert_eq!(view["leads"][1]["service_name"], "Legacy");

    let (_, view) = send(&app, "GET", "/admin/leads?status=new", t, None).await?;
    assert_eq!(view["filter"], "new");
    assert_eq!(view["leads"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "GET", "/admin/leads?status=bogus", t, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, view) =
        send(&app, "PUT", &format!("/admin/leads/{}/status", leads[0]), t, Some(json!({"status": "converted"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["leads"].as_array().unwrap().len(), 0);
    assert_eq!(db.rows(Table::Leads)[0]["status"], "converted");

    let (status, _) =
        send(&app, "PUT", &format!("/admin/leads/{}/status", Uuid::new_v4()), t, Some(json!({"status": "lost"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
