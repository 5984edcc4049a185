use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Keep any scalar as display text: `"A1"`, `90210` and `true` all render
/// verbatim, `null` and structured values render empty.
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// A JSON number or numeric string; anything else is no amount.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn deserialize_items<'de, D>(deserializer: D) -> Result<Vec<LineItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

/// One completed purchase as returned by the Order Service. Every field is
/// optional on the wire; a missing or unusable field decodes to its empty
/// value so the rest of the record still displays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    #[serde(deserialize_with = "deserialize_text")]
    pub order_id: String,
    /// Timestamp text as sent; parsed only for display.
    #[serde(deserialize_with = "deserialize_text")]
    pub created_at: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub total_amount: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_text")]
    pub status: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub delivery_address: String,
    #[serde(deserialize_with = "deserialize_items")]
    pub items: Vec<LineItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    #[serde(deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub price: Option<Decimal>,
}

/// Body of a successful order history response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderPayload {
    Orders(Vec<Order>),
    /// The server answered 2xx but the body was not an array.
    Malformed { reason: String },
}

impl OrderPayload {
    /// Array shape alone decides: every element of an array becomes an
    /// order, however incomplete.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(records) => Self::Orders(
                records
                    .into_iter()
                    .enumerate()
                    .map(|(index, record)| decode_order(index, record))
                    .collect(),
            ),
            other => Self::Malformed {
                reason: format!("expected an array of orders, got {}", json_kind(&other)),
            },
        }
    }

    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(value),
            Err(e) => Self::Malformed {
                reason: format!("response body is not JSON: {e}"),
            },
        }
    }
}

fn decode_order(index: usize, record: Value) -> Order {
    match serde_json::from_value(record) {
        Ok(order) => order,
        Err(e) => {
            warn!("Order record {index} is not an object, showing it empty: {e}");
            Order::default()
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
