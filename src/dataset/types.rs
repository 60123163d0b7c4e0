use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub customer_group: Option<String>,
    #[serde(default)]
    pub territory: Option<String>,
    pub created: NaiveDate,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "Renewal")]
    Renewal,
    #[serde(rename = "Extension Private")]
    ExtensionPrivate,
    #[serde(rename = "Extension Business")]
    ExtensionBusiness,
    #[serde(rename = "New Order Private")]
    NewOrderPrivate,
    #[serde(rename = "New Order Business")]
    NewOrderBusiness,
    #[serde(other)]
    Other,
}

impl OrderType {
    /// Renewals and extensions both keep an existing customer.
    pub fn is_renewal(&self) -> bool {
        matches!(
            self,
            OrderType::Renewal | OrderType::ExtensionPrivate | OrderType::ExtensionBusiness
        )
    }

    pub fn is_new(&self) -> bool {
        matches!(self, OrderType::NewOrderPrivate | OrderType::NewOrderBusiness)
    }

    pub fn is_private_tier(&self) -> bool {
        matches!(self, OrderType::NewOrderPrivate | OrderType::ExtensionPrivate)
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderType::Renewal => "Renewal",
            OrderType::ExtensionPrivate => "Extension Private",
            OrderType::ExtensionBusiness => "Extension Business",
            OrderType::NewOrderPrivate => "New Order Private",
            OrderType::NewOrderBusiness => "New Order Business",
            OrderType::Other => "Other",
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrder {
    pub id: String,
    pub customer_id: String,
    pub transaction_date: NaiveDate,
    pub grand_total: Decimal,
    /// Draft and cancelled orders are exported with `submitted: false`.
    #[serde(default = "default_true")]
    pub submitted: bool,
    #[serde(default)]
    pub order_type: Option<OrderType>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub seats: Option<u32>,
    #[serde(default)]
    pub salesperson: Option<String>,
}

impl SalesOrder {
    pub fn is_renewal(&self) -> bool {
        self.order_type.is_some_and(|t| t.is_renewal())
    }

    pub fn is_new(&self) -> bool {
        self.order_type.is_some_and(|t| t.is_new())
    }

    /// Product name, treating blank values as absent
    pub fn product_name(&self) -> Option<&str> {
        self.product
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    #[serde(rename = "Active")]
    Active,
    #[serde(rename = "Past Due Date")]
    PastDueDate,
    #[serde(rename = "Unpaid")]
    Unpaid,
    #[serde(rename = "Cancelled")]
    Cancelled,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(other)]
    Other,
}

impl SubscriptionStatus {
    /// Subscriptions still awaiting renewal.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Active | SubscriptionStatus::PastDueDate | SubscriptionStatus::Unpaid
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "Active",
            SubscriptionStatus::PastDueDate => "Past Due Date",
            SubscriptionStatus::Unpaid => "Unpaid",
            SubscriptionStatus::Cancelled => "Cancelled",
            SubscriptionStatus::Completed => "Completed",
            SubscriptionStatus::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub customer_id: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    pub end_date: NaiveDate,
    pub status: SubscriptionStatus,
}
