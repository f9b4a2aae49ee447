//! Contact record schema, shared by the CSV store and the HTTP layer.

use serde::{Deserialize, Serialize};

/// Column order of the backing CSV file. Rows are always written in this order and
/// the header row is checked against it on every read.
pub const CONTACT_COLUMNS: [&str; 6] = [
    "id",
    "first_name",
    "first_surname",
    "second_surname",
    "email",
    "phone",
];

/// A single contact.
///
/// `id` is the intended key but uniqueness is not enforced anywhere; the store keeps
/// duplicates and `update`/`delete` act on every matching row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Contact {
    pub id: i64,
    pub first_name: String,
    pub first_surname: String,
    pub second_surname: String,
    pub email: String,
    pub phone: String,
}

impl Contact {
    /// Case-insensitive substring match against `first_name` only.
    pub fn first_name_contains(&self, needle_lower: &str) -> bool {
        self.first_name.to_lowercase().contains(needle_lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> Contact {
        Contact {
            id: 1,
            first_name: "Ana".to_string(),
            first_surname: "Ruiz".to_string(),
            second_surname: "Li".to_string(),
            email: "a@x.com".to_string(),
            phone: "555".to_string(),
        }
    }

    #[test]
    fn first_name_match_is_case_insensitive() {
        let c = ana();
        for q in ["ana", "ANA", "An", "", "n"] {
            assert!(c.first_name_contains(&q.to_lowercase()), "query {q:?}");
        }
        assert!(!c.first_name_contains("ruiz"));
    }

    #[test]
    fn json_rejects_unknown_and_missing_fields() {
        let ok = r#"{"id":1,"first_name":"Ana","first_surname":"Ruiz","second_surname":"Li","email":"a@x.com","phone":"555"}"#;
        assert_eq!(serde_json::from_str::<Contact>(ok).unwrap(), ana());

        let extra = r#"{"id":1,"first_name":"Ana","first_surname":"Ruiz","second_surname":"Li","email":"a@x.com","phone":"555","age":3}"#;
        assert!(serde_json::from_str::<Contact>(extra).is_err());

        let missing = r#"{"id":1,"first_name":"Ana"}"#;
        assert!(serde_json::from_str::<Contact>(missing).is_err());

        let string_id = r#"{"id":"x","first_name":"Ana","first_surname":"Ruiz","second_surname":"Li","email":"a@x.com","phone":"555"}"#;
        assert!(serde_json::from_str::<Contact>(string_id).is_err());
    }
}
