//! Order Model
//!
//! Orders are created atomically with all line items priced and totals
//! computed, then mutated only through defined transitions. They are never
//! deleted. The table is named `order_record` because `ORDER` is a reserved
//! word in SurrealQL.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::user::Address;

pub type OrderId = RecordId;

// =============================================================================
// Status enums
// =============================================================================

/// Order status lifecycle
///
/// `pending → confirmed → processing → shipped → delivered`, with `cancelled`
/// reachable from the first three and `refunded` set only by the external
/// payment collaborator (admin surface).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

/// Payment status, mirrors the external payment collaborator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

/// Shipping method; unknown method strings deserialize to standard
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    Express,
    Overnight,
    Pickup,
    #[default]
    #[serde(other)]
    Standard,
}

/// How a tax or discount value is interpreted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AmountType {
    Percentage,
    Fixed,
}

// =============================================================================
// Embedded value objects
// =============================================================================

/// One product+quantity+price entry; `price` is a snapshot taken at order time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Record link to product (non-owning)
    pub product: RecordId,
    /// Product name snapshot for display
    pub name: String,
    pub quantity: i64,
    /// Unit price at order time, decoupled from the live product price
    pub price: f64,
    /// price * quantity
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxInfo {
    pub rate: f64,
    pub amount: f64,
    #[serde(rename = "type")]
    pub tax_type: AmountType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountInfo {
    pub value: f64,
    pub amount: f64,
    #[serde(rename = "type")]
    pub discount_type: AmountType,
}

impl Default for DiscountInfo {
    fn default() -> Self {
        Self {
            value: 0.0,
            amount: 0.0,
            discount_type: AmountType::Fixed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub method: ShippingMethod,
    pub cost: f64,
    pub address: Address,
    pub tracking_number: Option<String>,
    /// Millisecond timestamps
    pub estimated_delivery: Option<i64>,
    pub actual_delivery: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub method: String,
    pub status: PaymentStatus,
    /// Always equals the order total
    pub amount: f64,
}

// =============================================================================
// Order
// =============================================================================

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    /// Human-readable unique number: prefix + 8 timestamp digits + 3 random
    pub order_number: String,
    /// Record link to the owning user
    pub user: RecordId,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub tax: TaxInfo,
    #[serde(default)]
    pub discount: DiscountInfo,
    pub shipping: ShippingInfo,
    /// subtotal + tax.amount + shipping.cost - discount.amount
    pub total: f64,
    pub payment: PaymentInfo,
    pub status: OrderStatus,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_gift: bool,
    pub gift_message: Option<String>,
    pub cancel_reason: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Order {
    /// Total units across all line items
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Cancellable while not yet shipped
    pub fn can_cancel(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Processing
        )
    }

    /// Refundable once shipped/delivered and the payment completed
    pub fn can_refund(&self) -> bool {
        matches!(self.status, OrderStatus::Shipped | OrderStatus::Delivered)
            && self.payment.status == PaymentStatus::Completed
    }
}

// =============================================================================
// API Request Types
// =============================================================================

/// One requested cart line
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRequest {
    pub product: String,
    pub quantity: i64,
}

/// Place order payload
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    pub shipping_method: Option<ShippingMethod>,
    pub payment_method: String,
    pub shipping_address: Address,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_gift: bool,
    pub gift_message: Option<String>,
}
