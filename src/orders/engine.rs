//! Order Fulfillment Engine
//!
//! Turns a requested cart into a priced, inventory-adjusted, persisted order
//! and manages the order's status lifecycle afterwards.
//!
//! Stock is claimed per line item, in request order, through the product
//! repository's conditional decrement. An earlier line can therefore exhaust
//! stock that a later line of the same request wanted; that later line then
//! fails the whole request with InsufficientStock. The configuration (tax
//! rate, shipping table, number prefix) is injected at construction.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::models::{
    AmountType, Order, OrderItem, OrderStatus, PaymentInfo, PaymentStatus, PlaceOrderRequest,
    ShippingInfo, ShippingMethod, TaxInfo,
};
use crate::db::repository::{OrderRepository, ProductRepository, make_record_id};
use crate::orders::{number, totals};
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct OrderFulfillmentEngine {
    products: ProductRepository,
    orders: OrderRepository,
    config: Config,
}

impl OrderFulfillmentEngine {
    pub fn new(db: Surreal<Db>, config: Config) -> Self {
        Self {
            products: ProductRepository::new(db.clone()),
            orders: OrderRepository::new(db),
            config,
        }
    }

    // =========================================================================
    // Placement
    // =========================================================================

    /// Validate a cart, claim inventory and persist a pending order
    pub async fn place_order(&self, user_id: &str, req: PlaceOrderRequest) -> AppResult<Order> {
        if req.items.is_empty() {
            return Err(AppError::Validation(
                "order must contain at least one item".to_string(),
            ));
        }

        let mut items: Vec<OrderItem> = Vec::with_capacity(req.items.len());
        for requested in &req.items {
            if requested.quantity < 1 {
                return Err(AppError::Validation(format!(
                    "quantity for {} must be at least 1",
                    requested.product
                )));
            }

            let product = self
                .products
                .find_by_id(&requested.product)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Product {} not found", requested.product))
                })?;

            if !product.is_available() {
                return Err(AppError::Unavailable(format!(
                    "Product '{}' is not available",
                    product.name
                )));
            }

            let product_id = product
                .id
                .clone()
                .ok_or_else(|| AppError::Database("Product has no id".to_string()))?;

            // Conditional decrement; None means stock moved under us or was
            // already short.
            let claimed = self
                .products
                .try_decrement_stock(&product_id, requested.quantity)
                .await?;
            if claimed.is_none() {
                return Err(AppError::InsufficientStock(format!(
                    "Insufficient stock for '{}'",
                    product.name
                )));
            }

            // Snapshot the unit price at order time
            let price = product.price.current;
            items.push(OrderItem {
                product: product_id,
                name: product.name,
                quantity: requested.quantity,
                price,
                total: totals::line_total(price, requested.quantity),
            });
        }

        let shipping_method = req.shipping_method.unwrap_or_default();
        let order = self
            .build_order(
                user_id,
                items,
                shipping_method,
                req.payment_method,
                req.shipping_address,
                req.notes,
                req.is_gift,
                req.gift_message,
            )
            .await?;

        tracing::info!(
            target: "orders",
            order_number = %order.order_number,
            total = order.total,
            "Order placed"
        );
        Ok(order)
    }

    /// Re-place a previous order against current availability and pricing
    ///
    /// Items that are gone, unpublished or out of stock are silently dropped;
    /// the rest are re-priced at the current product price. Shipping is always
    /// standard regardless of the original order.
    pub async fn reorder(&self, order_id: &str, user_id: &str) -> AppResult<Order> {
        let original = self.find_owned(order_id, user_id).await?;

        let mut items: Vec<OrderItem> = Vec::new();
        for old_item in &original.items {
            let product = match self.products.find_by_id(&old_item.product.to_string()).await? {
                Some(p) if p.is_available() => p,
                _ => continue,
            };
            let product_id = match product.id.clone() {
                Some(id) => id,
                None => continue,
            };
            if self
                .products
                .try_decrement_stock(&product_id, old_item.quantity)
                .await?
                .is_none()
            {
                continue;
            }

            let price = product.price.current;
            items.push(OrderItem {
                product: product_id,
                name: product.name,
                quantity: old_item.quantity,
                price,
                total: totals::line_total(price, old_item.quantity),
            });
        }

        if items.is_empty() {
            return Err(AppError::Validation(
                "no items from the original order are still available".to_string(),
            ));
        }

        self.build_order(
            user_id,
            items,
            ShippingMethod::Standard,
            original.payment.method.clone(),
            original.shipping.address.clone(),
            None,
            false,
            None,
        )
        .await
    }

    /// Compute the breakdown and persist a pending order
    #[allow(clippy::too_many_arguments)]
    async fn build_order(
        &self,
        user_id: &str,
        items: Vec<OrderItem>,
        shipping_method: ShippingMethod,
        payment_method: String,
        shipping_address: crate::db::models::Address,
        notes: Option<String>,
        is_gift: bool,
        gift_message: Option<String>,
    ) -> AppResult<Order> {
        let subtotal = totals::subtotal(&items);
        let shipping_cost = self.config.shipping.cost_for(shipping_method);
        let breakdown = totals::breakdown(
            subtotal,
            self.config.tax_rate_percent,
            shipping_cost,
            AmountType::Fixed,
            0.0,
        );

        let now = now_millis();
        let order = Order {
            id: None,
            order_number: number::generate(&self.config.order_number_prefix),
            user: make_record_id("user", user_id),
            items,
            subtotal: breakdown.subtotal,
            tax: TaxInfo {
                rate: self.config.tax_rate_percent,
                amount: breakdown.tax_amount,
                tax_type: AmountType::Percentage,
            },
            discount: Default::default(),
            shipping: ShippingInfo {
                method: shipping_method,
                cost: breakdown.shipping_cost,
                address: shipping_address,
                tracking_number: None,
                estimated_delivery: None,
                actual_delivery: None,
            },
            total: breakdown.total,
            payment: PaymentInfo {
                method: payment_method,
                status: PaymentStatus::Pending,
                amount: breakdown.total,
            },
            status: OrderStatus::Pending,
            notes,
            is_gift,
            gift_message,
            cancel_reason: None,
            created_at: now,
            updated_at: now,
        };

        Ok(self.orders.create(order).await?)
    }

    // =========================================================================
    // Lifecycle transitions
    // =========================================================================

    /// Cancel an order while it has not shipped
    pub async fn cancel_order(
        &self,
        order_id: &str,
        user_id: &str,
        reason: Option<String>,
    ) -> AppResult<Order> {
        let mut order = self.find_owned(order_id, user_id).await?;

        if !order.can_cancel() {
            return Err(AppError::Conflict(format!(
                "Order {} cannot be cancelled in status {:?}",
                order.order_number, order.status
            )));
        }

        order.status = OrderStatus::Cancelled;
        order.cancel_reason = reason;
        order.updated_at = now_millis();
        Ok(self.orders.save(order).await?)
    }

    /// Attach tracking details; forces the order into `shipped`
    pub async fn add_tracking(
        &self,
        order_id: &str,
        tracking_number: String,
        estimated_delivery: Option<i64>,
    ) -> AppResult<Order> {
        let mut order = self.find(order_id).await?;

        order.status = OrderStatus::Shipped;
        order.shipping.tracking_number = Some(tracking_number);
        order.shipping.estimated_delivery = estimated_delivery;
        order.updated_at = now_millis();
        Ok(self.orders.save(order).await?)
    }

    /// Mark an order delivered; idempotent, the first delivery timestamp wins
    pub async fn mark_delivered(&self, order_id: &str) -> AppResult<Order> {
        let mut order = self.find(order_id).await?;

        order.status = OrderStatus::Delivered;
        if order.shipping.actual_delivery.is_none() {
            order.shipping.actual_delivery = Some(now_millis());
        }
        order.updated_at = now_millis();
        Ok(self.orders.save(order).await?)
    }

    /// Admin status override
    ///
    /// `refunded` reflects the external payment collaborator and is only
    /// accepted when the refund guard holds.
    pub async fn update_status(&self, order_id: &str, status: OrderStatus) -> AppResult<Order> {
        let mut order = self.find(order_id).await?;

        if status == OrderStatus::Refunded && !order.can_refund() {
            return Err(AppError::Conflict(format!(
                "Order {} is not refundable (status {:?}, payment {:?})",
                order.order_number, order.status, order.payment.status
            )));
        }

        order.status = status;
        order.updated_at = now_millis();
        Ok(self.orders.save(order).await?)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    async fn find(&self, order_id: &str) -> AppResult<Order> {
        Ok(self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?)
    }

    /// Fetch an order, verifying ownership
    pub async fn find_owned(&self, order_id: &str, user_id: &str) -> AppResult<Order> {
        let order = self.find(order_id).await?;
        if order.user != make_record_id("user", user_id) {
            return Err(AppError::Forbidden(
                "Order belongs to another user".to_string(),
            ));
        }
        Ok(order)
    }
}
