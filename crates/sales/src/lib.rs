//! Sales order domain module.
//!
//! Business rules for a sales order and its items, implemented as
//! deterministic domain logic (no IO, no HTTP, no storage). The aggregate can
//! be driven through its methods (`add_item`, `add_payment`, `dispatch`,
//! `cancel`) or through commands, and records the events it produced for
//! whoever persists or publishes them.

pub mod address;
pub mod item;
pub mod order;
pub mod status;

pub use address::ShippingAddress;
pub use item::{OrderItem, OrderItemId, ProductId};
pub use order::{
    AddItem, AddPayment, Cancel, CustomerId, CreateSalesOrder, Dispatch, ItemAdded,
    OrderCancelled, OrderReadyForShipment, OrderShipped, PaymentAdded, SalesOrder,
    SalesOrderCommand, SalesOrderCreated, SalesOrderEvent, SalesOrderId,
};
pub use status::SalesOrderStatus;
