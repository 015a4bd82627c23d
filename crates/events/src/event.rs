/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **versioned** (schema evolution)
/// - designed to be **append-only**
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "sales.order.created").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// Aggregate type the event belongs to (the event type up to its last dot).
    fn aggregate_type(&self) -> &'static str {
        let event_type = self.event_type();
        match event_type.rfind('.') {
            Some(idx) => &event_type[..idx],
            None => event_type,
        }
    }
}
