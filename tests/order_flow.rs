//! Order fulfillment flow against a full in-memory state
//!
//! Covers placement pricing, inventory claims, the status lifecycle guards
//! and reorder behavior.

use storefront_server::auth::JwtConfig;
use storefront_server::core::ShippingRates;
use storefront_server::db::models::{
    Address, Order, OrderItemRequest, OrderStatus, PaymentStatus, PlaceOrderRequest, Product,
    ProductCreate, ShippingMethod,
};
use storefront_server::db::repository::{OrderRepository, ProductRepository};
use storefront_server::{AppError, AppState, Config, OrderFulfillmentEngine};

fn test_config() -> Config {
    Config {
        data_dir: ".".to_string(),
        http_port: 0,
        jwt: JwtConfig {
            secret: "test-secret-test-secret-test-secret".to_string(),
            expiration_minutes: 60,
            issuer: "storefront-server".to_string(),
            audience: "storefront-clients".to_string(),
        },
        environment: "test".to_string(),
        tax_rate_percent: 8.0,
        shipping: ShippingRates::default(),
        order_number_prefix: "ORD".to_string(),
    }
}

async fn setup() -> (AppState, OrderFulfillmentEngine, ProductRepository) {
    let config = test_config();
    let state = AppState::initialize_in_memory(&config).await;
    let engine = OrderFulfillmentEngine::new(state.db.clone(), config);
    let products = ProductRepository::new(state.db.clone());
    (state, engine, products)
}

async fn seed_product(products: &ProductRepository, name: &str, price: f64, stock: i64) -> Product {
    products
        .create(ProductCreate {
            name: name.to_string(),
            slug: None,
            description: None,
            brand: None,
            category: None,
            price,
            original_price: None,
            stock,
            images: Vec::new(),
            is_published: Some(true),
            is_featured: None,
        })
        .await
        .expect("seed product")
}

fn cart(lines: &[(&Product, i64)]) -> PlaceOrderRequest {
    PlaceOrderRequest {
        items: lines
            .iter()
            .map(|(p, qty)| OrderItemRequest {
                product: p.id.as_ref().unwrap().to_string(),
                quantity: *qty,
            })
            .collect(),
        shipping_method: None,
        payment_method: "card".to_string(),
        shipping_address: Address::default(),
        notes: None,
        is_gift: false,
        gift_message: None,
    }
}

async fn stock_of(products: &ProductRepository, product: &Product) -> i64 {
    products
        .find_by_id(&product.id.as_ref().unwrap().to_string())
        .await
        .expect("find product")
        .expect("product exists")
        .inventory
        .stock
}

#[tokio::test]
async fn test_placement_pricing_breakdown() {
    let (_state, engine, products) = setup().await;
    let product = seed_product(&products, "Widget", 50.0, 10).await;

    let order = engine
        .place_order("u1", cart(&[(&product, 2)]))
        .await
        .expect("place order");

    // 100 subtotal + 8% tax + 5.99 standard shipping
    assert_eq!(order.subtotal, 100.0);
    assert_eq!(order.tax.rate, 8.0);
    assert_eq!(order.tax.amount, 8.0);
    assert_eq!(order.shipping.cost, 5.99);
    assert_eq!(order.shipping.method, ShippingMethod::Standard);
    assert_eq!(order.discount.amount, 0.0);
    assert_eq!(order.total, 113.99);
    assert_eq!(order.payment.amount, order.total);
    assert_eq!(order.payment.status, PaymentStatus::Pending);
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.order_number.starts_with("ORD"));

    // Line snapshot
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].name, "Widget");
    assert_eq!(order.items[0].price, 50.0);
    assert_eq!(order.items[0].total, 100.0);
    assert_eq!(order.item_count(), 2);

    // Stock was claimed
    assert_eq!(stock_of(&products, &product).await, 8);
}

#[tokio::test]
async fn test_express_shipping_rate() {
    let (_state, engine, products) = setup().await;
    let product = seed_product(&products, "Widget", 10.0, 5).await;

    let mut request = cart(&[(&product, 1)]);
    request.shipping_method = Some(ShippingMethod::Express);

    let order = engine.place_order("u1", request).await.expect("place");
    assert_eq!(order.shipping.cost, 12.99);
    assert_eq!(order.shipping.method, ShippingMethod::Express);
}

#[tokio::test]
async fn test_empty_cart_rejected() {
    let (_state, engine, _products) = setup().await;

    let err = engine
        .place_order(
            "u1",
            PlaceOrderRequest {
                items: Vec::new(),
                shipping_method: None,
                payment_method: "card".to_string(),
                shipping_address: Address::default(),
                notes: None,
                is_gift: false,
                gift_message: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_insufficient_stock_leaves_inventory_untouched() {
    let (_state, engine, products) = setup().await;
    let product = seed_product(&products, "Scarce", 10.0, 5).await;

    engine
        .place_order("u1", cart(&[(&product, 3)]))
        .await
        .expect("first order fits");

    let err = engine
        .place_order("u2", cart(&[(&product, 3)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock(_)));

    // The failed order claimed nothing
    assert_eq!(stock_of(&products, &product).await, 2);
}

#[tokio::test]
async fn test_unpublished_product_rejected() {
    let (_state, engine, products) = setup().await;
    let mut product = seed_product(&products, "Hidden", 10.0, 5).await;
    product = products
        .update(
            &product.id.as_ref().unwrap().to_string(),
            storefront_server::db::models::ProductUpdate {
                name: None,
                description: None,
                brand: None,
                category: None,
                price: None,
                original_price: None,
                stock: None,
                images: None,
                is_published: Some(false),
                is_active: None,
                is_featured: None,
            },
        )
        .await
        .expect("unpublish");
    assert!(!product.is_available());

    let err = engine
        .place_order("u1", cart(&[(&product, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));
}

#[tokio::test]
async fn test_cancel_guard() {
    let (_state, engine, products) = setup().await;
    let product = seed_product(&products, "Widget", 20.0, 10).await;

    let order = engine
        .place_order("u1", cart(&[(&product, 1)]))
        .await
        .expect("place");
    let order_id = order.id.as_ref().unwrap().to_string();

    // Another user cannot touch the order
    let err = engine
        .cancel_order(&order_id, "intruder", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // Pending orders cancel fine
    let cancelled = engine
        .cancel_order(&order_id, "u1", Some("changed my mind".to_string()))
        .await
        .expect("cancel");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.cancel_reason.as_deref(), Some("changed my mind"));

    // A shipped order cannot be cancelled
    let shipped = engine
        .place_order("u1", cart(&[(&product, 1)]))
        .await
        .expect("place second");
    let shipped_id = shipped.id.as_ref().unwrap().to_string();
    engine
        .add_tracking(&shipped_id, "TRACK123".to_string(), None)
        .await
        .expect("ship");

    let err = engine
        .cancel_order(&shipped_id, "u1", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_delivery_is_idempotent() {
    let (_state, engine, products) = setup().await;
    let product = seed_product(&products, "Widget", 20.0, 10).await;

    let order = engine
        .place_order("u1", cart(&[(&product, 1)]))
        .await
        .expect("place");
    let order_id = order.id.as_ref().unwrap().to_string();

    let shipped = engine
        .add_tracking(&order_id, "TRACK123".to_string(), Some(1_700_000_000_000))
        .await
        .expect("ship");
    assert_eq!(shipped.status, OrderStatus::Shipped);
    assert_eq!(shipped.shipping.tracking_number.as_deref(), Some("TRACK123"));

    let first = engine.mark_delivered(&order_id).await.expect("deliver");
    assert_eq!(first.status, OrderStatus::Delivered);
    let stamp = first.shipping.actual_delivery.expect("timestamp set");

    // Second confirmation keeps the original timestamp
    let second = engine.mark_delivered(&order_id).await.expect("redeliver");
    assert_eq!(second.shipping.actual_delivery, Some(stamp));
}

#[tokio::test]
async fn test_refund_requires_completed_payment() {
    let (state, engine, products) = setup().await;
    let product = seed_product(&products, "Widget", 20.0, 10).await;

    let order = engine
        .place_order("u1", cart(&[(&product, 1)]))
        .await
        .expect("place");
    let order_id = order.id.as_ref().unwrap().to_string();

    // Pending order with pending payment is not refundable
    let err = engine
        .update_status(&order_id, OrderStatus::Refunded)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Ship it and mark the payment completed (payment capture happens in an
    // external collaborator; emulate its write here)
    engine
        .add_tracking(&order_id, "TRACK123".to_string(), None)
        .await
        .expect("ship");
    let repo = OrderRepository::new(state.db.clone());
    let mut shipped: Order = repo.find_by_id(&order_id).await.unwrap().unwrap();
    shipped.payment.status = PaymentStatus::Completed;
    repo.save(shipped).await.expect("complete payment");

    let refunded = engine
        .update_status(&order_id, OrderStatus::Refunded)
        .await
        .expect("refund");
    assert_eq!(refunded.status, OrderStatus::Refunded);
}

#[tokio::test]
async fn test_reorder_skips_unavailable_items() {
    let (_state, engine, products) = setup().await;
    let widget = seed_product(&products, "Widget", 10.0, 10).await;
    let gadget = seed_product(&products, "Gadget", 30.0, 10).await;

    let original = engine
        .place_order("u1", cart(&[(&widget, 2), (&gadget, 1)]))
        .await
        .expect("place");
    let original_id = original.id.as_ref().unwrap().to_string();

    // Gadget goes away before the reorder
    products
        .deactivate(&gadget.id.as_ref().unwrap().to_string())
        .await
        .expect("deactivate");

    let reordered = engine.reorder(&original_id, "u1").await.expect("reorder");
    assert_eq!(reordered.items.len(), 1);
    assert_eq!(reordered.items[0].name, "Widget");
    assert_eq!(reordered.items[0].quantity, 2);
    assert_eq!(reordered.shipping.method, ShippingMethod::Standard);
    assert_eq!(reordered.status, OrderStatus::Pending);

    // Reorder claims stock again: 10 - 2 - 2
    assert_eq!(stock_of(&products, &widget).await, 6);
}

#[tokio::test]
async fn test_reorder_fails_when_nothing_survives() {
    let (_state, engine, products) = setup().await;
    let widget = seed_product(&products, "Widget", 10.0, 2).await;

    let original = engine
        .place_order("u1", cart(&[(&widget, 2)]))
        .await
        .expect("place");
    let original_id = original.id.as_ref().unwrap().to_string();

    // Stock is exhausted, so the reorder has nothing left
    let err = engine.reorder(&original_id, "u1").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_reorder_reprices_at_current_price() {
    let (_state, engine, products) = setup().await;
    let widget = seed_product(&products, "Widget", 10.0, 10).await;

    let original = engine
        .place_order("u1", cart(&[(&widget, 1)]))
        .await
        .expect("place");
    let original_id = original.id.as_ref().unwrap().to_string();
    assert_eq!(original.items[0].price, 10.0);

    products
        .update(
            &widget.id.as_ref().unwrap().to_string(),
            storefront_server::db::models::ProductUpdate {
                name: None,
                description: None,
                brand: None,
                category: None,
                price: Some(15.0),
                original_price: None,
                stock: None,
                images: None,
                is_published: None,
                is_active: None,
                is_featured: None,
            },
        )
        .await
        .expect("raise price");

    let reordered = engine.reorder(&original_id, "u1").await.expect("reorder");
    assert_eq!(reordered.items[0].price, 15.0);
    assert_eq!(reordered.subtotal, 15.0);
}
