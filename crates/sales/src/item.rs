use serde::{Deserialize, Serialize};

use commerce_core::{AggregateId, DomainError, DomainResult, Entity, Money};

use crate::order::SalesOrderId;

/// Order item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderItemId(pub AggregateId);

impl OrderItemId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Catalog product reference. Existence is the caller's concern; the order
/// only requires a positive value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A line of a sales order: product, quantity, unit price.
///
/// Immutable once built. Items are created by [`SalesOrder::add_item`] and
/// live and die with their order.
///
/// [`SalesOrder::add_item`]: crate::SalesOrder::add_item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: OrderItemId,
    sales_order_id: SalesOrderId,
    product_id: ProductId,
    quantity: i64,
    unit_price: Money,
}

impl OrderItem {
    /// Validate and build an item.
    ///
    /// Fields are checked in declaration order; the first violation is
    /// reported as a validation error.
    pub fn new(
        id: OrderItemId,
        sales_order_id: SalesOrderId,
        product_id: ProductId,
        quantity: i64,
        unit_price: Money,
    ) -> DomainResult<Self> {
        if sales_order_id.0.is_nil() {
            return Err(DomainError::validation("sales order id is required"));
        }

        if product_id.0 <= 0 {
            return Err(DomainError::validation(
                "product id is required and must be greater than zero",
            ));
        }

        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be greater than zero"));
        }

        if !unit_price.is_positive() {
            return Err(DomainError::validation("unit price must be greater than zero"));
        }

        if unit_price.checked_mul(quantity).is_none() {
            return Err(DomainError::validation("item price is out of range"));
        }

        Ok(Self {
            id,
            sales_order_id,
            product_id,
            quantity,
            unit_price,
        })
    }

    /// Rebuild an item from a recorded event, skipping validation (the event
    /// was only emitted for a valid item).
    pub(crate) fn restore(
        id: OrderItemId,
        sales_order_id: SalesOrderId,
        product_id: ProductId,
        quantity: i64,
        unit_price: Money,
    ) -> Self {
        Self {
            id,
            sales_order_id,
            product_id,
            quantity,
            unit_price,
        }
    }

    pub fn id_typed(&self) -> OrderItemId {
        self.id
    }

    pub fn sales_order_id(&self) -> SalesOrderId {
        self.sales_order_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Subtotal for this line: quantity × unit price.
    pub fn calculate_item_price(&self) -> Money {
        // cannot saturate: `new` rejects products that overflow
        self.unit_price.saturating_mul(self.quantity)
    }
}

impl Entity for OrderItem {
    type Id = OrderItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commerce_core::{IdGenerator, SequentialIdGenerator};

    fn ids() -> (OrderItemId, SalesOrderId) {
        let mut id_gen = SequentialIdGenerator::new();
        let order_id = SalesOrderId::new(id_gen.next_id());
        let item_id = OrderItemId::new(id_gen.next_id());
        (item_id, order_id)
    }

    fn price(major: f64) -> Money {
        Money::from_major(major).unwrap()
    }

    fn expect_validation(result: DomainResult<OrderItem>, needle: &str) {
        match result {
            Err(DomainError::Validation(msg)) if msg.contains(needle) => {}
            other => panic!("Expected validation error mentioning {needle:?}, got {other:?}"),
        }
    }

    #[test]
    fn valid_item_keeps_its_fields() {
        let (item_id, order_id) = ids();
        let item = OrderItem::new(item_id, order_id, ProductId(7), 3, price(2.5)).unwrap();

        assert_eq!(item.id(), &item_id);
        assert_eq!(item.sales_order_id(), order_id);
        assert_eq!(item.product_id(), ProductId(7));
        assert_eq!(item.quantity(), 3);
        assert_eq!(item.unit_price(), price(2.5));
    }

    #[test]
    fn item_price_is_quantity_times_unit_price() {
        let (item_id, order_id) = ids();
        let item = OrderItem::new(item_id, order_id, ProductId(1), 2, price(10.0)).unwrap();

        assert_eq!(item.calculate_item_price(), price(20.0));
        // pure: repeated calls agree
        assert_eq!(item.calculate_item_price(), item.calculate_item_price());
    }

    #[test]
    fn nil_order_id_is_rejected() {
        let (item_id, _) = ids();
        let nil_order = SalesOrderId::new(AggregateId::nil());
        expect_validation(
            OrderItem::new(item_id, nil_order, ProductId(1), 1, price(1.0)),
            "sales order id",
        );
    }

    #[test]
    fn non_positive_product_id_is_rejected() {
        let (item_id, order_id) = ids();
        for product in [0, -5] {
            expect_validation(
                OrderItem::new(item_id, order_id, ProductId(product), 1, price(1.0)),
                "product id",
            );
        }
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let (item_id, order_id) = ids();
        expect_validation(
            OrderItem::new(item_id, order_id, ProductId(1), 0, price(1.0)),
            "quantity",
        );
    }

    #[test]
    fn negative_unit_price_is_rejected() {
        let (item_id, order_id) = ids();
        expect_validation(
            OrderItem::new(item_id, order_id, ProductId(1), 1, price(-1.0)),
            "unit price",
        );
        expect_validation(
            OrderItem::new(item_id, order_id, ProductId(1), 1, Money::ZERO),
            "unit price",
        );
    }

    #[test]
    fn first_violation_wins() {
        let (item_id, order_id) = ids();
        expect_validation(
            OrderItem::new(item_id, order_id, ProductId(0), 0, price(-1.0)),
            "product id",
        );
    }

    #[test]
    fn overflowing_subtotal_is_rejected() {
        let (item_id, order_id) = ids();
        expect_validation(
            OrderItem::new(item_id, order_id, ProductId(1), i64::MAX, price(1.0)),
            "out of range",
        );
    }
}
