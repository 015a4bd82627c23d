//! Sales order status machine.

use serde::{Deserialize, Serialize};

use commerce_core::{DomainError, DomainResult};

/// Sales order status lifecycle.
///
/// ```text
/// PendingPayment --(fully paid)--> ReadyForShipment --(dispatch)--> Shipped
///        \____________________ cancel (from anywhere) ____________/--> Cancelled
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesOrderStatus {
    #[default]
    PendingPayment,
    ReadyForShipment,
    Shipped,
    Cancelled,
}

impl SalesOrderStatus {
    /// Items can only be added before payment processing unlocks shipment.
    pub fn accepts_items(self) -> bool {
        matches!(self, SalesOrderStatus::PendingPayment)
    }

    /// Status after a payment has been accepted.
    ///
    /// Only a pending order moves; an order already past payment keeps its status.
    pub fn on_payment(self, fully_paid: bool) -> DomainResult<Self> {
        match self {
            SalesOrderStatus::PendingPayment if fully_paid => Ok(SalesOrderStatus::ReadyForShipment),
            SalesOrderStatus::Cancelled => {
                Err(DomainError::invariant("cannot add a payment to a cancelled order"))
            }
            other => Ok(other),
        }
    }

    /// Status after a dispatch.
    pub fn on_dispatch(self) -> DomainResult<Self> {
        match self {
            SalesOrderStatus::ReadyForShipment => Ok(SalesOrderStatus::Shipped),
            SalesOrderStatus::PendingPayment => Err(DomainError::invariant(
                "cannot dispatch an order that is not paid yet",
            )),
            SalesOrderStatus::Shipped => {
                Err(DomainError::invariant("order has already been shipped"))
            }
            SalesOrderStatus::Cancelled => {
                Err(DomainError::invariant("cannot dispatch a cancelled order"))
            }
        }
    }

    /// Cancellation is unconditional, shipped orders included.
    pub fn on_cancel(self) -> Self {
        SalesOrderStatus::Cancelled
    }
}

impl core::fmt::Display for SalesOrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            SalesOrderStatus::PendingPayment => "pending_payment",
            SalesOrderStatus::ReadyForShipment => "ready_for_shipment",
            SalesOrderStatus::Shipped => "shipped",
            SalesOrderStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SalesOrderStatus; 4] = [
        SalesOrderStatus::PendingPayment,
        SalesOrderStatus::ReadyForShipment,
        SalesOrderStatus::Shipped,
        SalesOrderStatus::Cancelled,
    ];

    #[test]
    fn initial_status_is_pending_payment() {
        assert_eq!(SalesOrderStatus::default(), SalesOrderStatus::PendingPayment);
    }

    #[test]
    fn only_pending_orders_accept_items() {
        for status in ALL {
            assert_eq!(
                status.accepts_items(),
                status == SalesOrderStatus::PendingPayment
            );
        }
    }

    #[test]
    fn full_payment_unlocks_shipment() {
        let pending = SalesOrderStatus::PendingPayment;
        assert_eq!(pending.on_payment(false), Ok(SalesOrderStatus::PendingPayment));
        assert_eq!(pending.on_payment(true), Ok(SalesOrderStatus::ReadyForShipment));
        assert_eq!(
            SalesOrderStatus::Shipped.on_payment(true),
            Ok(SalesOrderStatus::Shipped)
        );
    }

    #[test]
    fn cancelled_orders_reject_payment() {
        let err = SalesOrderStatus::Cancelled.on_payment(true).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn only_ready_orders_can_ship() {
        assert_eq!(
            SalesOrderStatus::ReadyForShipment.on_dispatch(),
            Ok(SalesOrderStatus::Shipped)
        );
        for status in [
            SalesOrderStatus::PendingPayment,
            SalesOrderStatus::Shipped,
            SalesOrderStatus::Cancelled,
        ] {
            let err = status.on_dispatch().unwrap_err();
            assert!(err.is_invariant_violation(), "{status} should not dispatch");
        }
    }

    #[test]
    fn cancel_from_any_status() {
        for status in ALL {
            assert_eq!(status.on_cancel(), SalesOrderStatus::Cancelled);
        }
    }

    #[test]
    fn display_matches_serialized_name() {
        for status in ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }
}
