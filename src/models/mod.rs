pub mod delivery_type;
pub mod order;

pub use delivery_type::DeliveryType;
pub use order::{CustomerDetails, Order, OrderItem, OrderStatus, ProductRef};
