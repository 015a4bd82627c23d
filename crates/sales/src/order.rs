use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use commerce_core::{
    Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult, IdGenerator, Money,
    UuidV7Generator,
};
use commerce_events::Event;

use crate::address::ShippingAddress;
use crate::item::{OrderItem, OrderItemId, ProductId};
use crate::status::SalesOrderStatus;

/// Sales order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalesOrderId(pub AggregateId);

impl SalesOrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for SalesOrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Customer reference, owned by whatever system manages customers.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub i64);

impl core::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: SalesOrder.
///
/// `G` mints identifiers for the order and its items. Production code uses
/// the default UUIDv7 generator; tests inject a deterministic one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesOrder<G = UuidV7Generator> {
    id: SalesOrderId,
    customer_id: CustomerId,
    status: SalesOrderStatus,
    shipping_address: Option<ShippingAddress>,
    paid_amount: Money,
    items: Vec<OrderItem>,
    version: u64,
    created: bool,
    uncommitted: Vec<SalesOrderEvent>,
    ids: G,
}

impl SalesOrder {
    /// Open a new order for `customer_id` with a random identity.
    pub fn new(customer_id: CustomerId) -> Self {
        Self::with_id_generator(customer_id, UuidV7Generator)
    }
}

impl<G> SalesOrder<G> {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: SalesOrderId, ids: G) -> Self {
        Self {
            id,
            customer_id: CustomerId::default(),
            status: SalesOrderStatus::PendingPayment,
            shipping_address: None,
            paid_amount: Money::ZERO,
            items: Vec::new(),
            version: 0,
            created: false,
            uncommitted: Vec::new(),
            ids,
        }
    }

    pub fn id_typed(&self) -> SalesOrderId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn status(&self) -> SalesOrderStatus {
        self.status
    }

    /// `None` until the order ships.
    pub fn shipping_address(&self) -> Option<&ShippingAddress> {
        self.shipping_address.as_ref()
    }

    pub fn paid_amount(&self) -> Money {
        self.paid_amount
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Sum of every item's subtotal, recomputed on each call.
    pub fn total_price(&self) -> Money {
        // item additions that would overflow the total are rejected
        self.items
            .iter()
            .fold(Money::ZERO, |acc, item| acc.saturating_add(item.calculate_item_price()))
    }

    pub fn remaining_balance(&self) -> Money {
        self.total_price().saturating_sub(self.paid_amount)
    }

    /// Readiness guard: the paid amount matches the total exactly.
    pub fn is_fully_paid(&self) -> bool {
        self.paid_amount == self.total_price()
    }

    /// Events produced since the last [`take_events`](Self::take_events).
    pub fn uncommitted_events(&self) -> &[SalesOrderEvent] {
        &self.uncommitted
    }

    /// Drain the uncommitted events, e.g. to persist or publish them.
    pub fn take_events(&mut self) -> Vec<SalesOrderEvent> {
        std::mem::take(&mut self.uncommitted)
    }

    fn record(&mut self, event: SalesOrderEvent) {
        self.apply(&event);
        log_event(&event, self);
        self.uncommitted.push(event);
    }
}

impl<G: IdGenerator + Clone> SalesOrder<G> {
    /// Open a new order, drawing its identity from `ids`.
    pub fn with_id_generator(customer_id: CustomerId, mut ids: G) -> Self {
        let order_id = SalesOrderId::new(ids.next_id());
        let mut order = Self::empty(order_id, ids);
        order.record(SalesOrderEvent::SalesOrderCreated(SalesOrderCreated {
            order_id,
            customer_id,
        }));
        order
    }

    /// Decide, apply and record a command's events.
    ///
    /// On error nothing changes: no state, no version, no recorded events.
    pub fn execute(&mut self, command: &SalesOrderCommand) -> DomainResult<()> {
        let events = self.handle(command).inspect_err(|err| {
            debug!(
                order_id = %self.id,
                command = command.name(),
                error = %err,
                "sales order command rejected"
            );
        })?;
        for event in events {
            self.record(event);
        }
        Ok(())
    }

    /// Append an item. Only allowed while the order awaits payment.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        quantity: i64,
        unit_price: Money,
    ) -> DomainResult<OrderItemId> {
        // the generator only advances when the item is accepted
        let mut ids = self.ids.clone();
        let item_id = self.next_item_id(&mut ids);

        self.execute(&SalesOrderCommand::AddItem(AddItem {
            order_id: self.id,
            item_id,
            product_id,
            quantity,
            unit_price,
        }))?;

        self.ids = ids;
        Ok(item_id)
    }

    /// Draw an item id not yet taken by this order or its items.
    ///
    /// A rehydrated order's generator starts over, so ids already present in
    /// the history are skipped.
    fn next_item_id(&self, ids: &mut G) -> OrderItemId {
        loop {
            let candidate = ids.next_id();
            let taken = candidate == self.id.0
                || self.items.iter().any(|item| item.id_typed().0 == candidate);
            if !taken {
                return OrderItemId::new(candidate);
            }
        }
    }

    /// Register a payment towards the remaining balance.
    pub fn add_payment(&mut self, amount: Money) -> DomainResult<()> {
        self.execute(&SalesOrderCommand::AddPayment(AddPayment {
            order_id: self.id,
            amount,
        }))
    }

    /// Ship a paid order to `address`.
    ///
    /// Succeeds without effect if the order turns out not to be fully paid.
    pub fn dispatch(&mut self, address: ShippingAddress) -> DomainResult<()> {
        self.execute(&SalesOrderCommand::Dispatch(Dispatch {
            order_id: self.id,
            address,
        }))
    }

    /// Cancel the order, whatever its status. Only an uncreated shell fails.
    pub fn cancel(&mut self) -> DomainResult<()> {
        self.execute(&SalesOrderCommand::Cancel(Cancel { order_id: self.id }))
    }
}

impl<G> AggregateRoot for SalesOrder<G> {
    type Id = SalesOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateSalesOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSalesOrder {
    pub order_id: SalesOrderId,
    pub customer_id: CustomerId,
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub order_id: SalesOrderId,
    pub item_id: OrderItemId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Money,
}

/// Command: AddPayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPayment {
    pub order_id: SalesOrderId,
    pub amount: Money,
}

/// Command: Dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch {
    pub order_id: SalesOrderId,
    pub address: ShippingAddress,
}

/// Command: Cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancel {
    pub order_id: SalesOrderId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesOrderCommand {
    CreateSalesOrder(CreateSalesOrder),
    AddItem(AddItem),
    AddPayment(AddPayment),
    Dispatch(Dispatch),
    Cancel(Cancel),
}

impl SalesOrderCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SalesOrderCommand::CreateSalesOrder(_) => "create_sales_order",
            SalesOrderCommand::AddItem(_) => "add_item",
            SalesOrderCommand::AddPayment(_) => "add_payment",
            SalesOrderCommand::Dispatch(_) => "dispatch",
            SalesOrderCommand::Cancel(_) => "cancel",
        }
    }
}

/// Event: SalesOrderCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesOrderCreated {
    pub order_id: SalesOrderId,
    pub customer_id: CustomerId,
}

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub order_id: SalesOrderId,
    pub item_id: OrderItemId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Money,
}

/// Event: PaymentAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAdded {
    pub order_id: SalesOrderId,
    pub amount: Money,
    pub new_paid_amount: Money,
}

/// Event: OrderReadyForShipment (the readiness guard passed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReadyForShipment {
    pub order_id: SalesOrderId,
}

/// Event: OrderShipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderShipped {
    pub order_id: SalesOrderId,
    pub address: ShippingAddress,
}

/// Event: OrderCancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub order_id: SalesOrderId,
    pub previous_status: SalesOrderStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesOrderEvent {
    SalesOrderCreated(SalesOrderCreated),
    ItemAdded(ItemAdded),
    PaymentAdded(PaymentAdded),
    OrderReadyForShipment(OrderReadyForShipment),
    OrderShipped(OrderShipped),
    OrderCancelled(OrderCancelled),
}

impl SalesOrderEvent {
    pub fn order_id(&self) -> SalesOrderId {
        match self {
            SalesOrderEvent::SalesOrderCreated(e) => e.order_id,
            SalesOrderEvent::ItemAdded(e) => e.order_id,
            SalesOrderEvent::PaymentAdded(e) => e.order_id,
            SalesOrderEvent::OrderReadyForShipment(e) => e.order_id,
            SalesOrderEvent::OrderShipped(e) => e.order_id,
            SalesOrderEvent::OrderCancelled(e) => e.order_id,
        }
    }
}

impl Event for SalesOrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SalesOrderEvent::SalesOrderCreated(_) => "sales.order.created",
            SalesOrderEvent::ItemAdded(_) => "sales.order.item_added",
            SalesOrderEvent::PaymentAdded(_) => "sales.order.payment_added",
            SalesOrderEvent::OrderReadyForShipment(_) => "sales.order.ready_for_shipment",
            SalesOrderEvent::OrderShipped(_) => "sales.order.shipped",
            SalesOrderEvent::OrderCancelled(_) => "sales.order.cancelled",
        }
    }

    fn version(&self) -> u32 {
        1
    }
}

impl<G> Aggregate for SalesOrder<G> {
    type Command = SalesOrderCommand;
    type Event = SalesOrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            SalesOrderEvent::SalesOrderCreated(e) => {
                self.id = e.order_id;
                self.customer_id = e.customer_id;
                self.status = SalesOrderStatus::PendingPayment;
                self.shipping_address = None;
                self.paid_amount = Money::ZERO;
                self.items.clear();
                self.created = true;
            }
            SalesOrderEvent::ItemAdded(e) => {
                self.items.push(OrderItem::restore(
                    e.item_id,
                    e.order_id,
                    e.product_id,
                    e.quantity,
                    e.unit_price,
                ));
            }
            SalesOrderEvent::PaymentAdded(e) => {
                self.paid_amount = e.new_paid_amount;
            }
            SalesOrderEvent::OrderReadyForShipment(_) => {
                self.status = SalesOrderStatus::ReadyForShipment;
            }
            SalesOrderEvent::OrderShipped(e) => {
                self.shipping_address = Some(e.address.clone());
                self.status = SalesOrderStatus::Shipped;
            }
            SalesOrderEvent::OrderCancelled(_) => {
                self.status = self.status.on_cancel();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SalesOrderCommand::CreateSalesOrder(cmd) => self.handle_create(cmd),
            SalesOrderCommand::AddItem(cmd) => self.handle_add_item(cmd),
            SalesOrderCommand::AddPayment(cmd) => self.handle_add_payment(cmd),
            SalesOrderCommand::Dispatch(cmd) => self.handle_dispatch(cmd),
            SalesOrderCommand::Cancel(cmd) => self.handle_cancel(cmd),
        }
    }
}

impl<G> SalesOrder<G> {
    fn ensure_order(&self, order_id: SalesOrderId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        if self.id != order_id {
            return Err(DomainError::invariant("order_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateSalesOrder) -> Result<Vec<SalesOrderEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("sales order already exists"));
        }

        Ok(vec![SalesOrderEvent::SalesOrderCreated(SalesOrderCreated {
            order_id: cmd.order_id,
            customer_id: cmd.customer_id,
        })])
    }

    fn handle_add_item(&self, cmd: &AddItem) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_order(cmd.order_id)?;

        if !self.status.accepts_items() {
            return Err(DomainError::invariant(
                "cannot modify an order once payment is processed",
            ));
        }

        if self.items.iter().any(|item| item.id_typed() == cmd.item_id) {
            return Err(DomainError::conflict("order item already exists"));
        }

        let item = OrderItem::new(
            cmd.item_id,
            cmd.order_id,
            cmd.product_id,
            cmd.quantity,
            cmd.unit_price,
        )?;

        Money::checked_sum(
            self.items
                .iter()
                .chain(core::iter::once(&item))
                .map(OrderItem::calculate_item_price),
        )
        .ok_or_else(|| DomainError::invariant("order total overflow"))?;

        Ok(vec![SalesOrderEvent::ItemAdded(ItemAdded {
            order_id: cmd.order_id,
            item_id: item.id_typed(),
            product_id: item.product_id(),
            quantity: item.quantity(),
            unit_price: item.unit_price(),
        })])
    }

    fn handle_add_payment(&self, cmd: &AddPayment) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_order(cmd.order_id)?;

        if !cmd.amount.is_positive() {
            return Err(DomainError::invariant(
                "payment amount must be greater than zero",
            ));
        }

        if cmd.amount > self.remaining_balance() {
            return Err(DomainError::invariant(
                "payment amount must be less than or equal to the remaining balance",
            ));
        }

        let new_paid_amount = self
            .paid_amount
            .checked_add(cmd.amount)
            .ok_or_else(|| DomainError::invariant("paid amount overflow"))?;
        let next_status = self
            .status
            .on_payment(new_paid_amount == self.total_price())?;

        let mut events = vec![SalesOrderEvent::PaymentAdded(PaymentAdded {
            order_id: cmd.order_id,
            amount: cmd.amount,
            new_paid_amount,
        })];
        if next_status != self.status {
            events.push(SalesOrderEvent::OrderReadyForShipment(OrderReadyForShipment {
                order_id: cmd.order_id,
            }));
        }
        Ok(events)
    }

    fn handle_dispatch(&self, cmd: &Dispatch) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_order(cmd.order_id)?;
        self.status.on_dispatch()?;

        if self.items.is_empty() {
            return Err(DomainError::invariant("cannot dispatch an order without items"));
        }

        // Readiness is re-verified; an order that is not fully paid stays put.
        if !self.is_fully_paid() {
            debug!(
                order_id = %self.id,
                paid = %self.paid_amount,
                total = %self.total_price(),
                "dispatch skipped: order is not fully paid"
            );
            return Ok(Vec::new());
        }

        Ok(vec![SalesOrderEvent::OrderShipped(OrderShipped {
            order_id: cmd.order_id,
            address: cmd.address.clone(),
        })])
    }

    fn handle_cancel(&self, cmd: &Cancel) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_order(cmd.order_id)?;

        Ok(vec![SalesOrderEvent::OrderCancelled(OrderCancelled {
            order_id: cmd.order_id,
            previous_status: self.status,
        })])
    }
}

fn log_event<G>(event: &SalesOrderEvent, order: &SalesOrder<G>) {
    match event {
        SalesOrderEvent::SalesOrderCreated(e) => {
            debug!(order_id = %e.order_id, customer_id = %e.customer_id, "sales order created");
        }
        SalesOrderEvent::ItemAdded(e) => {
            debug!(
                order_id = %e.order_id,
                item_id = %e.item_id,
                product_id = %e.product_id,
                quantity = e.quantity,
                unit_price = %e.unit_price,
                "item added to sales order"
            );
        }
        SalesOrderEvent::PaymentAdded(e) => {
            debug!(
                order_id = %e.order_id,
                amount = %e.amount,
                paid = %e.new_paid_amount,
                "payment added to sales order"
            );
        }
        SalesOrderEvent::OrderReadyForShipment(e) => {
            info!(order_id = %e.order_id, total = %order.total_price(), "sales order ready for shipment");
        }
        SalesOrderEvent::OrderShipped(e) => {
            info!(order_id = %e.order_id, address = %e.address, "sales order shipped");
        }
        SalesOrderEvent::OrderCancelled(e) => {
            info!(
                order_id = %e.order_id,
                previous_status = %e.previous_status,
                "sales order cancelled"
            );
        }
    }
}
