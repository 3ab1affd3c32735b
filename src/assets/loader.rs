use std::sync::mpsc;

use crate::{
    TwibbonError, TwibbonResult,
    assets::{Layer, decode::decode_layer},
};

/// Which editor slot a decoded layer is destined for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LayerSlot {
    Frame,
    Photo,
}

/// Identifies one decode request. Later tickets supersede earlier ones for the same slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecodeTicket(pub u64);

/// Completion message posted by a decode task.
#[derive(Debug)]
pub(crate) struct Decoded {
    pub(crate) ticket: DecodeTicket,
    pub(crate) slot: LayerSlot,
    pub(crate) result: TwibbonResult<Layer>,
}

/// Runs image decodes off the editor thread and queues their completions.
///
/// Decoding happens on the rayon global pool; completions are only observed when the owner
/// drains them, so all state updates stay on the editor's thread.
pub(crate) struct LayerLoader {
    tx: mpsc::Sender<Decoded>,
    rx: mpsc::Receiver<Decoded>,
    next_ticket: u64,
    in_flight: usize,
}

impl LayerLoader {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            next_ticket: 0,
            in_flight: 0,
        }
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start decoding `bytes` for `slot` and return its ticket.
    pub(crate) fn spawn(&mut self, slot: LayerSlot, bytes: Vec<u8>) -> DecodeTicket {
        self.next_ticket += 1;
        let ticket = DecodeTicket(self.next_ticket);
        self.in_flight += 1;

        let tx = self.tx.clone();
        rayon::spawn(move || {
            let result = decode_layer(&bytes);
            // The receiver only disappears when the editor is dropped; nothing to report then.
            let _ = tx.send(Decoded {
                ticket,
                slot,
                result,
            });
        });
        tracing::debug!(ticket = ticket.0, ?slot, "decode scheduled");
        ticket
    }

    /// Take every completion that has already arrived.
    pub(crate) fn drain_ready(&mut self) -> Vec<Decoded> {
        let mut out = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            out.push(msg);
        }
        out
    }

    /// Block until the next completion arrives. Returns `None` when nothing is in flight.
    pub(crate) fn recv_next(&mut self) -> TwibbonResult<Option<Decoded>> {
        if self.in_flight == 0 {
            return Ok(None);
        }
        let msg = self
            .rx
            .recv()
            .map_err(|_| TwibbonError::decode("decode channel disconnected unexpectedly"))?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Ok(Some(msg))
    }
}
