use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use uuid::Uuid;

use crate::gateway::Record;
use crate::validation::{check_length, Validate};

/// Body of `POST /products` and `PUT /products/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: Number,
    pub category: String,
    pub quantity: Number,
}

impl ProductInput {
    /// `quantity` as a whole number; `3.0` counts, `3.5` does not.
    pub fn whole_quantity(&self) -> Option<i64> {
        if let Some(q) = self.quantity.as_i64() {
            return Some(q);
        }
        self.quantity
            .as_f64()
            .filter(|q| q.fract() == 0.0 && q.abs() < i64::MAX as f64)
            .map(|q| q as i64)
    }
}

impl Validate for ProductInput {
    fn validate(&self) -> Result<(), String> {
        check_length("Name", &self.name, 1, 100)?;
        check_length("Category", &self.category, 1, 100)?;
        if self.whole_quantity().is_none() {
            return Err("\"Quantity\" must be an integer".into());
        }
        Ok(())
    }
}

/// Public shape of a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

impl From<&Record> for ProductView {
    fn from(r: &Record) -> Self {
        Self {
            id: r.id,
            name: r.str_field("name").map(str::to_string),
            price: match r.get("price") {
                Some(Value::Number(n)) => Some(n.clone()),
                _ => None,
            },
            category: r.str_field("category").map(str::to_string),
            quantity: r.i64_field("quantity"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductUpdated {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ProductDeleted {
    pub id: Uuid,
}
