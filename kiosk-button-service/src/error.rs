//! Error type for the button service plumbing

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while moving button events into the controller
pub enum Error {
    /// The event queue is full, the event was dropped
    QueueFull,
    /// The pin driver failed while waiting for an edge
    Pin,
}
