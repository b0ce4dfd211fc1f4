use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Key under which a reference-preserving serializer nests list elements:
/// `{"$id": "1", "$values": [...]}`.
pub const REF_VALUES_KEY: &str = "$values";

/// One uploaded statement file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bank_name: String,
    #[serde(default, deserialize_with = "ref_list")]
    pub accounts: Vec<AccountRecord>,
}

/// One ledger line: balances at period start/end and period turnover.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_class: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub opening_active: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub opening_passive: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub debit: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub credit: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub closing_active: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub closing_passive: f64,
}

impl AccountRecord {
    /// The six amount columns in report order.
    pub fn amounts(&self) -> [f64; 6] {
        [
            self.opening_active,
            self.opening_passive,
            self.debit,
            self.credit,
            self.closing_active,
            self.closing_passive,
        ]
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// serde adapter for fields that hold a list in either shape.
pub fn ref_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_list(value))
}

/// Map a plain JSON array or a `$values` wrapper onto one sequence.
/// Any other shape is an empty list. Elements that fail to deserialize are
/// skipped.
pub fn normalize_list<T: DeserializeOwned>(value: Value) -> Vec<T> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(REF_VALUES_KEY) {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed list element");
                None
            }
        })
        .collect()
}
