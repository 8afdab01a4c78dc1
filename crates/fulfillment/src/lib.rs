//! Order fulfillment module.
//!
//! Orders wait in a FIFO queue, are classified into triage lanes against live
//! stock, and are dispatched by decrementing stock through the product store.

pub mod order;
pub mod pipeline;
pub mod safety;

pub use order::{CustomerTier, NewOrder, Order, OrderStatus};
pub use pipeline::{Lane, OrderPipeline, PickListLine, Shipment, TriagedOrder, Triage};
pub use safety::SafetyGate;
