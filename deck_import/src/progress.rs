//! Progress events emitted while an import runs.

use serde::Serialize;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Percent reported when fallback commander detection starts
pub const DETECTING_COMMANDER_PERCENT: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStage {
    Parsing,
    Resolving,
    DetectingCommander,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub stage: ImportStage,
    pub current: usize,
    pub total: usize,
    pub card_name: Option<String>,
    pub percent: u8,
}

impl ProgressEvent {
    pub fn parsing() -> Self {
        Self::at(ImportStage::Parsing, 0)
    }

    /// Card `current` of `total` has just been resolved
    pub fn resolving(current: usize, total: usize, card_name: &str) -> Self {
        let percent = if total == 0 {
            0
        } else {
            (current * usize::from(DETECTING_COMMANDER_PERCENT) / total) as u8
        };
        Self {
            stage: ImportStage::Resolving,
            current,
            total,
            card_name: Some(card_name.to_string()),
            percent,
        }
    }

    pub fn detecting_commander() -> Self {
        Self::at(ImportStage::DetectingCommander, DETECTING_COMMANDER_PERCENT)
    }

    pub fn complete() -> Self {
        Self::at(ImportStage::Complete, 100)
    }

    fn at(stage: ImportStage, percent: u8) -> Self {
        Self {
            stage,
            current: 0,
            total: 0,
            card_name: None,
            percent,
        }
    }
}

/// Sending half of the progress stream; a sink without a channel drops events
#[derive(Debug, Clone, Default)]
pub struct ProgressSink {
    sender: Option<UnboundedSender<ProgressEvent>>,
}

impl ProgressSink {
    /// A sink that discards every event
    pub fn none() -> Self {
        Self::default()
    }

    /// A connected sink and the receiver that consumes its events
    pub fn channel() -> (Self, UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self { sender: Some(tx) }, rx)
    }

    pub fn emit(&self, event: ProgressEvent) {
        if let Some(sender) = &self.sender {
            // Receiver may already be gone
            let _ = sender.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolving_percent_scales_to_detection_mark() {
        assert_eq!(ProgressEvent::resolving(0, 10, "Sol Ring").percent, 0);
        assert_eq!(ProgressEvent::resolving(5, 10, "Sol Ring").percent, 45);
        assert_eq!(ProgressEvent::resolving(10, 10, "Sol Ring").percent, 90);
        assert_eq!(ProgressEvent::resolving(0, 0, "Sol Ring").percent, 0);
    }

    #[test]
    fn channel_delivers_events_in_order() {
        let (sink, mut rx) = ProgressSink::channel();
        sink.emit(ProgressEvent::parsing());
        sink.emit(ProgressEvent::complete());

        assert_eq!(rx.try_recv().unwrap().stage, ImportStage::Parsing);
        assert_eq!(rx.try_recv().unwrap().stage, ImportStage::Complete);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn emit_survives_dropped_receiver() {
        let (sink, rx) = ProgressSink::channel();
        drop(rx);
        sink.emit(ProgressEvent::parsing());
        ProgressSink::none().emit(ProgressEvent::complete());
    }

    #[test]
    fn stage_serializes_snake_case() {
        let json = serde_json::to_string(&ImportStage::DetectingCommander).unwrap();
        assert_eq!(json, "\"detecting_commander\"");
    }
}
