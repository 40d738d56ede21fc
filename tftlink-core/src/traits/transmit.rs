//! Request sink

/// Destination for finished requests
///
/// Implementations forward each request to the display MCU in call order.
/// The encoder does not wait for or inspect any reply; delivery and
/// retries belong to the implementation.
pub trait Transmit {
    /// Send one request on the given channel (the MCU object id)
    fn transmit(&mut self, channel: u8, request: &[u8]);
}

impl<T: Transmit + ?Sized> Transmit for &mut T {
    fn transmit(&mut self, channel: u8, request: &[u8]) {
        (**self).transmit(channel, request);
    }
}
