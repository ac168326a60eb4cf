use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

/// The four collections exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Services,
    Leads,
    Testimonials,
    Portfolio,
}

impl Table {
    pub const ALL: [Table; 4] = [Table::Services, Table::Leads, Table::Testimonials, Table::Portfolio];

    /// Wire name used in the REST path.
    pub fn name(self) -> &'static str {
        match self {
            Table::Services => "services",
            Table::Leads => "leads",
            Table::Testimonials => "testimonials",
            Table::Portfolio => "portfolio",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A row type stored in one backend table.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: Table;
    fn id(&self) -> Uuid;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_serde() {
        for t in Table::ALL {
            let json = serde_json::to_value(t).unwrap();
            assert_eq!(json, serde_json::Value::String(t.name().to_string()));
        }
    }
}
