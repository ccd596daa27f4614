//! Domain models.
//!
//! These are validated domain objects, separate from database row types and
//! from the request/response DTOs declared next to the route handlers.

pub mod order;
pub mod product;
pub mod user;

pub use order::{NewOrder, Order, OrderLine};
pub use product::Product;
pub use user::{CartLine, NewUser, User};
