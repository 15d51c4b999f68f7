//! Control queue
//!
//! Input sources hold [`ControlSender`] clones (possibly on other threads) and
//! push typed control events; the simulation drains the queue once at the
//! start of every tick.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::state::{BeamAction, PlayerHandle, RotationDirection};
use crate::util::vec2::Vec2;

/// Abstract control event from an input source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControlEvent {
    RotateStart(RotationDirection),
    RotateStop,
    /// Rotate along the shortest arc to an absolute angle (radians)
    RotateTo(f32),
    BeamStart(BeamAction),
    BeamStop,
    UseWarpCore,
    /// Pointer position the cannon should aim at
    AimAt(Vec2),
}

/// Control event addressed to a player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlMessage {
    pub player: PlayerHandle,
    pub event: ControlEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControlQueueError {
    #[error("control queue is full")]
    Full,
    #[error("control queue is disconnected")]
    Disconnected,
}

impl<T> From<TrySendError<T>> for ControlQueueError {
    fn from(err: TrySendError<T>) -> Self {
        match err {
            TrySendError::Full(_) => ControlQueueError::Full,
            TrySendError::Disconnected(_) => ControlQueueError::Disconnected,
        }
    }
}

/// Bounded MPSC queue between input sources and the tick loop
pub struct ControlQueue {
    sender: Sender<ControlMessage>,
    receiver: Receiver<ControlMessage>,
    capacity: usize,
}

impl ControlQueue {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// New sender handle for an input source
    pub fn sender(&self) -> ControlSender {
        ControlSender {
            sender: self.sender.clone(),
        }
    }

    /// Non-blocking submit from the simulation's own thread
    #[inline]
    pub fn try_submit(
        &self,
        player: PlayerHandle,
        event: ControlEvent,
    ) -> Result<(), ControlQueueError> {
        self.sender.try_send(ControlMessage { player, event })?;
        Ok(())
    }

    /// Everything queued since the last drain, in submission order
    pub fn drain(&self) -> Vec<ControlMessage> {
        self.receiver.try_iter().collect()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Clonable, thread-safe handle for input sources
#[derive(Clone)]
pub struct ControlSender {
    sender: Sender<ControlMessage>,
}

impl ControlSender {
    /// Non-blocking send; `Full` is backpressure, the event is dropped
    #[inline]
    pub fn try_send(&self, player: PlayerHandle, event: ControlEvent) -> Result<(), ControlQueueError> {
        self.sender.try_send(ControlMessage { player, event })?;
        Ok(())
    }
}
