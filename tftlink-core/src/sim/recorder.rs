//! Request recorder

use alloc::vec::Vec;

use crate::traits::Transmit;

/// One transmitted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub channel: u8,
    pub bytes: Vec<u8>,
}

/// Sink that stores requests in transmit order
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    requests: Vec<Request>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests recorded so far, oldest first
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Total bytes over all requests
    pub fn total_bytes(&self) -> usize {
        self.requests.iter().map(|r| r.bytes.len()).sum()
    }

    /// Remove and return everything recorded so far
    pub fn take(&mut self) -> Vec<Request> {
        core::mem::take(&mut self.requests)
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }
}

impl Transmit for RecordingSink {
    fn transmit(&mut self, channel: u8, request: &[u8]) {
        self.requests.push(Request {
            channel,
            bytes: request.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut sink = RecordingSink::new();
        sink.transmit(1, &[1, 2]);
        sink.transmit(2, &[3]);

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.total_bytes(), 3);
        assert_eq!(sink.requests()[1].channel, 2);

        let taken = sink.take();
        assert_eq!(taken[0].bytes, [1, 2]);
        assert!(sink.is_empty());
    }
}
