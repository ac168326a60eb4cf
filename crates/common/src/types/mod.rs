use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Static contact details shared by the marketing footer and the about section.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct ContactInfo {
    pub business_name: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub location: &'static str,
}

pub const CONTACT: ContactInfo = ContactInfo {
    business_name: "Az Contractor Pro",
    phone: "(520) 461-3937",
    email: "info@azcontractorpro.com",
    location: "Phoenix, Arizona",
};
