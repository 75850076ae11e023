//! Invoice data model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Round to two decimal places (paise precision)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A party to the invoice, either the supplier or the customer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    #[serde(default)]
    pub address: String,
    /// GST registration number; stored verbatim, no format validation
    #[serde(default)]
    pub gstin: Option<String>,
    /// State name used for the intra/inter-state tax split
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// One billed line on the invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    #[serde(rename = "hsnSac", default)]
    pub hsn_sac: String,
    pub quantity: f64,
    pub rate: f64,
    /// GST rate in percent, e.g. 18.0
    #[serde(rename = "taxRate", default)]
    pub tax_rate: f64,
}

impl LineItem {
    /// Pre-tax amount: quantity x rate
    pub fn amount(&self) -> f64 {
        self.quantity * self.rate
    }

    /// Tax on this line, rounded to paise
    pub fn tax(&self) -> f64 {
        round2(self.amount() * self.tax_rate / 100.0)
    }

    /// Line total including tax
    pub fn total(&self) -> f64 {
        self.amount() + self.tax()
    }
}

/// A complete invoice document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub number: String,
    pub date: NaiveDate,
    #[serde(rename = "dueDate", default)]
    pub due_date: Option<NaiveDate>,
    pub company: Party,
    pub customer: Party,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub terms: Option<String>,
}
