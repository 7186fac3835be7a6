// storefront/src/models/mod.rs

//! Data structures for the stored entities and the read views built from them.

pub mod address;
pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use address::Address;
pub use cart::{Cart, CartItem, CartLine, CartView};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
pub use product::Product;
pub use user::UserId;
