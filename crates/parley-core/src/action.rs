//! Side effects produced by the session state machines.

use parley_proto::OutboundEvent;

use crate::RenderOp;

/// Instruction for the runtime. Actions are executed in the order returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Send an event on the channel.
    Emit(OutboundEvent),
    /// Apply a render operation to the view.
    Render(RenderOp),
}
