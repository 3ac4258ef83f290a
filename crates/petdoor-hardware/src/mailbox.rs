//! Single-slot mailbox between the BLE radio and the scan loop.
//!
//! The radio reports advertisements from its own callback context. Only
//! advertisements whose name matches the configured beacon are kept, and a
//! newer sighting overwrites an older one that has not been consumed yet:
//! the scan loop only ever sees the most recent sighting per cycle.
//!
//! ```text
//! radio callback ──offer(name, rssi)──► [ slot ] ──take()──► scan loop
//!                  (filtered, overwrite)
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::types::ProximitySample;

/// Single-slot, overwrite-on-write mailbox for beacon sightings.
///
/// Cloning yields another handle to the same slot.
///
/// # Examples
///
/// ```
/// use petdoor_hardware::mailbox::ObservationMailbox;
///
/// let mailbox = ObservationMailbox::new("Ellie");
///
/// assert!(!mailbox.offer("Phone", -40));
/// assert!(mailbox.offer("Ellie", -80));
/// assert!(mailbox.offer("Ellie", -72));
///
/// // Only the latest sighting survives
/// assert_eq!(mailbox.take().map(|s| s.rssi), Some(-72));
/// assert!(mailbox.take().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ObservationMailbox {
    inner: Arc<MailboxInner>,
}

#[derive(Debug)]
struct MailboxInner {
    target: String,
    slot: Mutex<Option<ProximitySample>>,
}

impl ObservationMailbox {
    /// Create an empty mailbox that accepts sightings of `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(MailboxInner {
                target: target.into(),
                slot: Mutex::new(None),
            }),
        }
    }

    /// Offer an advertisement.
    ///
    /// Returns `true` if it matched the target and was stored. Non-matching
    /// names are ignored; they are not an error.
    pub fn offer(&self, name: &str, rssi: i16) -> bool {
        if self.inner.target != name {
            return false;
        }

        let previous = self.inner.slot.lock().replace(ProximitySample::now(rssi));
        trace!(name, rssi, overwrote = previous.is_some(), "beacon sighting stored");
        true
    }

    /// Take the pending sighting, leaving the slot empty.
    pub fn take(&self) -> Option<ProximitySample> {
        self.inner.slot.lock().take()
    }

    /// The beacon name accepted by this mailbox.
    pub fn target(&self) -> &str {
        &self.inner.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_matching_names_ignored() {
        let mailbox = ObservationMailbox::new("Ellie");

        assert!(!mailbox.offer("ellie", -50));
        assert!(!mailbox.offer("", -50));
        assert!(mailbox.take().is_none());
    }

    #[test]
    fn test_latest_sighting_wins() {
        let mailbox = ObservationMailbox::new("Ellie");

        mailbox.offer("Ellie", -90);
        mailbox.offer("Ellie", -85);
        mailbox.offer("Ellie", -60);

        assert_eq!(mailbox.take().unwrap().rssi, -60);
        assert!(mailbox.take().is_none());
    }

    #[test]
    fn test_take_empties_slot() {
        let mailbox = ObservationMailbox::new("Ellie");
        mailbox.offer("Ellie", -70);

        assert!(mailbox.take().is_some());
        assert!(mailbox.take().is_none());
    }

    #[test]
    fn test_clone_shares_slot() {
        let mailbox = ObservationMailbox::new("Ellie");
        let radio_side = mailbox.clone();

        radio_side.offer("Ellie", -66);
        assert_eq!(mailbox.take().unwrap().rssi, -66);
    }

    #[test]
    fn test_target_is_exact_match() {
        let mailbox = ObservationMailbox::new("Rex");

        assert_eq!(mailbox.target(), "Rex");
        assert!(!mailbox.offer("Ellie", -70));
        assert!(mailbox.offer("Rex", -70));
    }
}
