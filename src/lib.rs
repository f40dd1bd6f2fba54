//! Platter
//!
//! Platter is the domain core of a food-ordering client: menu catalog, shopping cart, order
//! lifecycle, invoices and customer notifications. Everything here is synchronous and free of
//! I/O; persistence, identity and notification delivery live in `platter-app`.

pub mod cart;
pub mod catalog;
pub mod ids;
pub mod invoice;
pub mod notifications;
pub mod orders;
pub mod pricing;
pub mod products;
pub mod session;
pub mod validation;
