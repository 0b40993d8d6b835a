//! Static record corpora used across harnesses.

use serde_json::{json, Value};

use super::builders::{user, ClientBuilder};

/// A small client roster covering the searchable columns.
pub fn client_roster() -> Vec<Value> {
    vec![
        ClientBuilder::new("Jane", "Doe")
            .uid("c-001")
            .address("12 Elm St NW")
            .phone("202-555-0101")
            .ward(5)
            .zip("20001")
            .tag("Senior")
            .referral("Ward 5 Mutual Aid", "DC Central Kitchen")
            .diet(json!({ "halal": true, "lowSodium": true, "foodAllergens": ["peanuts"] }))
            .instructions("Leave at side door")
            .coordinates(json!([38.9, -77.0]))
            .build(),
        ClientBuilder::new("Ali", "Khan")
            .uid("c-002")
            .address("4 Oak Ave SE")
            .phone("202-555-0144")
            .ward(8)
            .zip("20032")
            .tag("Wheelchair")
            .diet(json!({ "vegan": true, "otherText": "no mushrooms" }))
            .coordinates(json!({ "lat": "38.84", "lng": "-76.99" }))
            .build(),
        ClientBuilder::new("Maria", "Lopez")
            .uid("c-003")
            .address("780 Columbia Rd NW")
            .phone("202-555-0199")
            .ward(1)
            .zip("20009")
            .tag("Senior")
            .tag("Spanish")
            .field("language", "Spanish")
            .referral("Community of Hope", "CoH")
            .coordinates(json!({ "latitude": 91, "longitude": 0 }))
            .build(),
        ClientBuilder::new("John", "Smith")
            .uid("c-004")
            .address("55 Driver Way NE")
            .ward(5)
            .zip("20002")
            .field("notes", "Prefers morning delivery")
            .build(),
    ]
}

/// Users shown in the user-management table.
pub fn user_roster() -> Vec<Value> {
    vec![
        user("Pat Admin", "Admin", "pat@example.org"),
        user("Sam Okafor", "ClientIntake", "sam@example.org"),
        user("Lee Driver", "Driver", "lee@example.org"),
    ]
}

/// Coordinate payloads in every shape seen in stored documents, paired with
/// whether they should normalize.
pub const COORDINATE_PAYLOADS: &[(&str, bool)] = &[
    ("[38.9, -77.0]", true),
    ("[38.9, -77.0, 0]", true),
    (r#"["38.9", "-77.0"]"#, true),
    (r#"{"lat": 38.9, "lng": -77.0}"#, true),
    (r#"{"latitude": 38.9, "longitude": -77.0}"#, true),
    (r#"{"lat": "38.9 ", "longitude": " -77"}"#, true),
    ("null", false),
    ("[]", false),
    ("[38.9]", false),
    (r#"{"latitude": "91", "longitude": "0"}"#, false),
    (r#"{"lat": "not-a-number", "lng": 10}"#, false),
    (r#"{"lat": {"value": 1}, "lng": 10}"#, false),
    (r#""38.9, -77.0""#, false),
];
