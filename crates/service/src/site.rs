//! Marketing page composition and the app shell's view selection.

use common::types::{ContactInfo, CONTACT};
use models::portfolio::PortfolioItem;
use models::service::Service;
use models::testimonial::Testimonial;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::domain::AdminUser;
use crate::content::ContentService;
use crate::errors::ServiceError;

/// Reserved path that switches the shell into the back office.
pub const ADMIN_PATH: &str = "/admin";

/// Load state of one independently fetched page section.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Section<T> {
    Loaded { items: Vec<T> },
    Failed { error: String },
}

impl<T> Section<T> {
    fn from_result(name: &str, result: Result<Vec<T>, ServiceError>) -> Self {
        match result {
            Ok(items) => Section::Loaded { items },
            Err(e) => {
                warn!(section = name, error = %e, "section fetch failed");
                Section::Failed { error: e.to_string() }
            }
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Section::Loaded { items } => items,
            Section::Failed { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Hero {
    pub badge: &'static str,
    pub headline: &'static str,
    pub subheadline: &'static str,
    pub call_to_action: &'static str,
}

/// Copy that never comes from the backend.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StaticCopy {
    pub hero: Hero,
    pub about: [Feature; 4],
    pub contact: ContactInfo,
}

pub const STATIC_COPY: StaticCopy = StaticCopy {
    hero: Hero {
        badge: "Trusted by Arizona Contractors",
        headline: "Get More Customers With Your Own Website",
        subheadline: "Professional website design and social media marketing built specifically for contractors. \
                      Stop losing jobs to competitors with better online presence.",
        call_to_action: "Get Started Now",
    },
    about: [
        Feature {
            title: "Contractor-Focused",
            description: "We specialize exclusively in helping contractors grow their businesses online. We understand your industry and your customers.",
        },
        Feature {
            title: "Fast Turnaround",
            description: "Your website can be live in as little as 2 weeks. We know you need to start generating leads quickly.",
        },
        Feature {
            title: "Proven Results",
            description: "Our clients see an average increase of 40% in qualified leads within the first 3 months of launching.",
        },
        Feature {
            title: "All-Inclusive",
            description: "No hidden fees or surprise charges. Everything you need to succeed online is included in your package.",
        },
    ],
    contact: CONTACT,
};

/// The whole public page.
#[derive(Debug, Clone, Serialize)]
pub struct SitePage {
    pub copy: StaticCopy,
    pub services: Section<Service>,
    pub testimonials: Section<Testimonial>,
    pub portfolio: Section<PortfolioItem>,
}

impl SitePage {
    /// Fetch the three dynamic sections concurrently; one failing leaves the others intact.
    pub async fn load(content: &ContentService) -> Self {
        let (services, testimonials, portfolio) = tokio::join!(
            content.active_services(),
            content.featured_testimonials(),
            content.featured_portfolio(),
        );
        SitePage {
            copy: STATIC_COPY,
            services: Section::from_result("services", services),
            testimonials: Section::from_result("testimonials", testimonials),
            portfolio: Section::from_result("portfolio", portfolio),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminTab {
    #[default]
    Leads,
    Services,
    Testimonials,
    Portfolio,
}

impl AdminTab {
    pub const ALL: [AdminTab; 4] = [AdminTab::Leads, AdminTab::Services, AdminTab::Testimonials, AdminTab::Portfolio];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ShellView {
    Public,
    AdminLogin,
    AdminDashboard { email: String, tabs: [AdminTab; 4], active: AdminTab },
}

/// Decide what the shell shows for a path and the current session.
pub fn resolve_view(path: &str, user: Option<&AdminUser>) -> ShellView {
    let path = path.trim_end_matches('/');
    let is_admin = path == ADMIN_PATH
        || path.strip_prefix(ADMIN_PATH).map_or(false, |rest| rest.starts_with('/'));
    if !is_admin {
        return ShellView::Public;
    }
    match user {
        Some(u) => ShellView::AdminDashboard { email: u.email.clone(), tabs: AdminTab::ALL, active: AdminTab::default() },
        None => ShellView::AdminLogin,
    }
}
