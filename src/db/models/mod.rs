//! Data Models
//!
//! Document shapes persisted in SurrealDB plus the Create/Update payloads
//! accepted at the API boundary.

pub mod brand;
pub mod category;
pub mod order;
pub mod product;
pub mod user;

pub use brand::{Brand, BrandCreate, BrandUpdate};
pub use category::{Category, CategoryCreate, CategoryNode, CategoryUpdate, ReparentRequest};
pub use order::{
    AmountType, DiscountInfo, Order, OrderItem, OrderItemRequest, OrderStatus, PaymentInfo,
    PaymentStatus, PlaceOrderRequest, ShippingInfo, ShippingMethod, TaxInfo,
};
pub use product::{
    Inventory, Price, Product, ProductCreate, ProductImage, ProductUpdate, RatingDistribution,
    Ratings, Review, ReviewCreate,
};
pub use user::{Address, ProfileUpdate, User};
