//! Field schema — which record paths a search keyword refers to.
//!
//! Each spreadsheet view has its own schema. Keywords typed before a colon
//! (`zip:20001`, `referral entity:food bank`) are looked up in a static alias
//! table and resolved to a [`SearchField`]. Custom columns added by staff are
//! appended at runtime from configuration.

use std::str::FromStr;

use phf::phf_map;
use serde::Deserialize;
use serde_json::Value;

use crate::error::UnknownSchema;
use crate::search::{check_string_contains, global_search_match, lookup_path};

// ---------------------------------------------------------------------------
// Static keyword tables
// ---------------------------------------------------------------------------

/// Client spreadsheet keyword → canonical field key.
static CLIENT_KEYWORDS: phf::Map<&'static str, &'static str> = phf_map! {
    "name" => "name",
    "address" => "address",
    "phone" => "phone",
    "dietary" => "dietary",
    "dietary restrictions" => "dietary",
    "instructions" => "instructions",
    "delivery instructions" => "instructions",
    "ethnicity" => "ethnicity",
    "adults" => "adults",
    "children" => "children",
    "gender" => "gender",
    "notes" => "notes",
    "referral" => "referral",
    "referral entity" => "referral",
    "referral entity name" => "referral entity name",
    "referral entity organization" => "referral entity organization",
    "tags" => "tags",
    "tag" => "tags",
    "dob" => "dob",
    "ward" => "ward",
    "client id" => "client id",
    "clientid" => "client id",
    "delivery freq" => "delivery freq",
    "delivery frequency" => "delivery freq",
    "language" => "language",
    "tefap" => "tefap",
    "tefap cert" => "tefap",
    "zip" => "zip",
    "zipcode" => "zip",
    "zip code" => "zip",
    "house number" => "house number",
    "coordinates" => "coordinates",
};

/// User management keyword → canonical field key.
static USER_KEYWORDS: phf::Map<&'static str, &'static str> = phf_map! {
    "name" => "name",
    "role" => "role",
    "phone" => "phone",
    "email" => "email",
};

/// Dietary flags and their column labels, in display order.
const DIETARY_FLAGS: &[(&str, &str)] = &[
    ("halal", "Halal"),
    ("kidneyFriendly", "Kidney Friendly"),
    ("lowSodium", "Low Sodium"),
    ("lowSugar", "Low Sugar"),
    ("microwaveOnly", "Microwave Only"),
    ("noCookingEquipment", "No Cooking Equipment"),
    ("softFood", "Soft Food"),
    ("vegan", "Vegan"),
    ("vegetarian", "Vegetarian"),
    ("heartFriendly", "Heart Friendly"),
];

/// Placeholder a column shows for a missing value.
const NONE_LABEL: &str = "None";

// ---------------------------------------------------------------------------
// SearchField
// ---------------------------------------------------------------------------

/// How a field's value is compared against a search value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Display string of the value at each path.
    Text,
    /// Like `Text`, but array values match on any element.
    ValueOrArray,
    /// `firstName lastName` joined, or either part alone.
    FullName,
    /// Like `Text`, but a missing, null or empty value reads as `None`.
    TextOrNone,
    /// Summary of a `dietaryRestrictions` object: the flags that are set,
    /// allergens, and free text; `None` when nothing is set.
    DietSummary,
    /// Stored user role shown by its label (`ClientIntake` is
    /// `Client Intake`).
    RoleName,
}

/// A searchable column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchField {
    /// Canonical key, e.g. `zip`.
    pub key: String,
    /// Dotted record paths searched for this field.
    pub paths: Vec<String>,
    pub mode: MatchMode,
    /// Whether bare (keyword-less) terms search this field.
    pub global: bool,
}

impl SearchField {
    pub fn new(key: &str, paths: &[&str], mode: MatchMode) -> Self {
        Self {
            key: key.to_string(),
            paths: paths.iter().map(|p| p.to_string()).collect(),
            mode,
            global: true,
        }
    }

    /// Exclude this field from bare-term search.
    pub fn keyword_only(mut self) -> Self {
        self.global = false;
        self
    }

    /// Whether `record` matches `value` on this field.
    pub fn matches(&self, record: &Value, value: &str) -> bool {
        match self.mode {
            MatchMode::Text => self.values(record).any(|v| check_string_contains(v, value)),
            MatchMode::ValueOrArray => global_search_match(record, value, &self.paths),
            MatchMode::TextOrNone => {
                let present: Vec<&Value> = self.values(record).filter(|v| !is_blank(v)).collect();
                if present.is_empty() {
                    check_string_contains(&Value::String(NONE_LABEL.to_string()), value)
                } else {
                    present.into_iter().any(|v| check_string_contains(v, value))
                }
            }
            MatchMode::FullName => {
                let parts: Vec<_> = self
                    .values(record)
                    .filter_map(|v| crate::search::display_string(v).map(|s| s.into_owned()))
                    .collect();
                let joined = Value::String(parts.join(" "));
                check_string_contains(&joined, value) || self.values(record).any(|v| check_string_contains(v, value))
            }
            MatchMode::DietSummary => self.paths.iter().any(|path| {
                let restrictions = lookup_path(record, path).unwrap_or(&Value::Null);
                check_string_contains(&Value::String(diet_summary(restrictions)), value)
            }),
            MatchMode::RoleName => self.paths.iter().any(|path| {
                let role = lookup_path(record, path).unwrap_or(&Value::Null);
                check_string_contains(&Value::String(role_display_name(role).to_string()), value)
            }),
        }
    }

    fn values<'a>(&'a self, record: &'a Value) -> impl Iterator<Item = &'a Value> + 'a {
        self.paths.iter().filter_map(move |path| lookup_path(record, path))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Label for a stored user role. Unrecognised roles read as `Unknown`.
pub fn role_display_name(role: &Value) -> &'static str {
    match role.as_str() {
        Some("Admin") => "Admin",
        Some("Manager") => "Manager",
        Some("ClientIntake") => "Client Intake",
        Some("Driver") => "Driver",
        _ => "Unknown",
    }
}

/// Render a `dietaryRestrictions` object the way the spreadsheet column
/// shows it.
pub fn diet_summary(restrictions: &Value) -> String {
    let Value::Object(map) = restrictions else {
        return NONE_LABEL.to_string();
    };

    let mut items: Vec<String> = DIETARY_FLAGS
        .iter()
        .filter(|(flag, _)| map.get(*flag).and_then(Value::as_bool).unwrap_or(false))
        .map(|(_, label)| label.to_string())
        .collect();

    for list in ["foodAllergens", "other"] {
        if let Some(Value::Array(entries)) = map.get(list) {
            items.extend(entries.iter().filter_map(Value::as_str).map(str::to_string));
        }
    }
    if let Some(other) = map.get("otherText").and_then(Value::as_str) {
        let other = other.trim();
        if !other.is_empty() {
            items.push(other.to_string());
        }
    }

    if items.is_empty() {
        NONE_LABEL.to_string()
    } else {
        items.join(", ")
    }
}

// ---------------------------------------------------------------------------
// FieldSchema
// ---------------------------------------------------------------------------

/// Which built-in schema a view uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Clients,
    Users,
}

impl FromStr for SchemaKind {
    type Err = UnknownSchema;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clients" | "client" => Ok(SchemaKind::Clients),
            "users" | "user" => Ok(SchemaKind::Users),
            other => Err(UnknownSchema(other.to_string())),
        }
    }
}

/// What to do with `keyword:value` terms whose keyword names no field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeyword {
    /// The term matches nothing.
    Reject,
    /// The term is skipped.
    Ignore,
}

/// A custom spreadsheet column bound to a record property.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomColumn {
    pub key: String,
    /// Dotted record path; defaults to `key`.
    #[serde(default)]
    pub path: Option<String>,
    /// Defaults to [`MatchMode::ValueOrArray`].
    #[serde(default)]
    pub mode: Option<MatchMode>,
}

/// Keyword → field resolution for one view.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    kind: SchemaKind,
    keywords: &'static phf::Map<&'static str, &'static str>,
    fields: Vec<SearchField>,
    custom: Vec<SearchField>,
}

impl FieldSchema {
    pub fn for_kind(kind: SchemaKind) -> Self {
        match kind {
            SchemaKind::Clients => Self::clients(),
            SchemaKind::Users => Self::users(),
        }
    }

    /// The client spreadsheet.
    pub fn clients() -> Self {
        use MatchMode::*;
        let fields = vec![
            SearchField::new("name", &["firstName", "lastName"], FullName),
            SearchField::new("address", &["address"], Text),
            SearchField::new("phone", &["phone"], Text),
            SearchField::new("dietary", &["deliveryDetails.dietaryRestrictions"], DietSummary),
            SearchField::new("instructions", &["deliveryDetails.deliveryInstructions"], TextOrNone),
            SearchField::new("ethnicity", &["ethnicity"], Text),
            SearchField::new("adults", &["adults"], ValueOrArray),
            SearchField::new("children", &["children"], ValueOrArray),
            SearchField::new("gender", &["gender"], Text),
            SearchField::new("notes", &["notes"], Text),
            SearchField::new("referral", &["referralEntity.name", "referralEntity.organization"], Text),
            SearchField::new("referral entity name", &["referralEntity.name"], Text).keyword_only(),
            SearchField::new("referral entity organization", &["referralEntity.organization"], Text)
                .keyword_only(),
            SearchField::new("tags", &["tags"], ValueOrArray),
            SearchField::new("dob", &["dob"], ValueOrArray),
            SearchField::new("ward", &["ward"], ValueOrArray),
            SearchField::new("client id", &["clientid", "uid"], ValueOrArray),
            SearchField::new("delivery freq", &["deliveryFreq"], Text),
            SearchField::new("language", &["language"], Text),
            SearchField::new("tefap", &["tefapCert"], Text),
            SearchField::new("zip", &["zipCode"], Text),
            SearchField::new("house number", &["houseNumber"], ValueOrArray),
            SearchField::new("coordinates", &["coordinates"], Text),
        ];
        Self {
            kind: SchemaKind::Clients,
            keywords: &CLIENT_KEYWORDS,
            fields,
            custom: Vec::new(),
        }
    }

    /// The user management table.
    pub fn users() -> Self {
        use MatchMode::*;
        let fields = vec![
            SearchField::new("name", &["name"], Text),
            SearchField::new("role", &["role"], RoleName),
            SearchField::new("phone", &["phone"], Text),
            SearchField::new("email", &["email"], Text),
        ];
        Self {
            kind: SchemaKind::Users,
            keywords: &USER_KEYWORDS,
            fields,
            custom: Vec::new(),
        }
    }

    /// Append custom columns. Each is searchable by keyword and globally.
    pub fn with_custom_columns(mut self, columns: &[CustomColumn]) -> Self {
        for column in columns {
            let path = column.path.as_deref().unwrap_or(&column.key);
            let mode = column.mode.unwrap_or(MatchMode::ValueOrArray);
            self.custom.push(SearchField::new(&column.key, &[path], mode));
        }
        self
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// Policy for unresolved keywords when configuration does not set one.
    /// The client spreadsheet rejects them; the user table skips them.
    pub fn default_unknown_keyword(&self) -> UnknownKeyword {
        match self.kind {
            SchemaKind::Clients => UnknownKeyword::Reject,
            SchemaKind::Users => UnknownKeyword::Ignore,
        }
    }

    /// Resolve a keyword (any alias, case-insensitive) to a built-in field.
    pub fn resolve(&self, keyword: &str) -> Option<&SearchField> {
        let keyword = keyword.trim().to_lowercase();
        let key = self.keywords.get(keyword.as_str())?;
        self.fields.iter().find(|field| field.key == *key)
    }

    /// Custom columns whose key contains `keyword`.
    pub fn custom_matching<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a SearchField> + 'a {
        let keyword = keyword.to_lowercase();
        self.custom
            .iter()
            .filter(move |field| field.key.to_lowercase().contains(&keyword))
    }

    /// Fields searched by bare terms, built-in first, then custom columns.
    pub fn global_fields(&self) -> impl Iterator<Item = &SearchField> {
        self.fields.iter().chain(self.custom.iter()).filter(|field| field.global)
    }

    /// Every keyword a user can type before a colon, sorted.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .keywords
            .keys()
            .map(|k| k.to_string())
            .chain(self.custom.iter().map(|field| field.key.to_lowercase()))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
