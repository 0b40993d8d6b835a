//! Test builders — ergonomic constructors for client and user records.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// ClientBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for client documents.
///
/// # Example
///
/// ```rust
/// let client = ClientBuilder::new("Jane", "Doe")
///     .address("12 Elm St NW")
///     .ward(5)
///     .tag("Senior")
///     .build();
/// ```
pub struct ClientBuilder {
    fields: Map<String, Value>,
    tags: Vec<String>,
}

impl ClientBuilder {
    pub fn new(first: &str, last: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("firstName".into(), json!(first));
        fields.insert("lastName".into(), json!(last));
        Self {
            fields,
            tags: Vec::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn uid(self, uid: &str) -> Self {
        self.field("uid", uid)
    }

    pub fn address(self, address: &str) -> Self {
        self.field("address", address)
    }

    pub fn phone(self, phone: &str) -> Self {
        self.field("phone", phone)
    }

    pub fn ward(self, ward: u32) -> Self {
        self.field("ward", ward)
    }

    pub fn zip(self, zip: &str) -> Self {
        self.field("zipCode", zip)
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn coordinates(self, coordinates: Value) -> Self {
        self.field("coordinates", coordinates)
    }

    pub fn referral(self, name: &str, organization: &str) -> Self {
        self.field("referralEntity", json!({ "name": name, "organization": organization }))
    }

    pub fn diet(self, restrictions: Value) -> Self {
        self.delivery_detail("dietaryRestrictions", restrictions)
    }

    pub fn instructions(self, text: &str) -> Self {
        self.delivery_detail("deliveryInstructions", json!(text))
    }

    fn delivery_detail(self, key: &str, value: Value) -> Self {
        let mut details = match self.fields.get("deliveryDetails") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        details.insert(key.to_string(), value);
        self.field("deliveryDetails", Value::Object(details))
    }

    pub fn build(mut self) -> Value {
        self.fields.insert("tags".into(), json!(self.tags));
        Value::Object(self.fields)
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// Build a user-management row.
pub fn user(name: &str, role: &str, email: &str) -> Value {
    json!({ "name": name, "role": role, "email": email, "phone": "" })
}

/// First names of a client result set, in order.
pub fn first_names(records: &[&Value]) -> Vec<String> {
    records
        .iter()
        .map(|r| r["firstName"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// Build a corpus of `n` clients spread across wards 1–8.
pub fn build_corpus(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            ClientBuilder::new(&format!("Client{i}"), &format!("Family{}", i % 17))
                .address(&format!("{} Main St NW", 100 + i))
                .ward((i % 8 + 1) as u32)
                .zip(&format!("200{:02}", i % 20))
                .tag(if i % 3 == 0 { "Senior" } else { "Family" })
                .build()
        })
        .collect()
}
