//! Hand-off from background work to the UI thread.
//!
//! Producers post items through a [`Poster`]; the UI thread drains them once
//! per frame with [`UiBridge::drain`]. The channel is FIFO, so items are
//! applied in exactly the order they were posted.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

type Waker = Arc<dyn Fn() + Send + Sync>;

pub struct UiBridge<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
    waker: Waker,
}

impl<T> UiBridge<T> {
    /// `wake` is called after every post so the event loop schedules a frame.
    pub fn new(wake: impl Fn() + Send + Sync + 'static) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            waker: Arc::new(wake),
        }
    }

    pub fn poster(&self) -> Poster<T> {
        Poster {
            sender: self.sender.clone(),
            waker: Arc::clone(&self.waker),
        }
    }

    /// Applies every pending item in arrival order and returns how many ran.
    pub fn drain(&self, mut apply: impl FnMut(T)) -> usize {
        let mut applied = 0;
        while let Ok(item) = self.receiver.try_recv() {
            apply(item);
            applied += 1;
        }
        applied
    }
}

pub struct Poster<T> {
    sender: Sender<T>,
    waker: Waker,
}

impl<T> Clone for Poster<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            waker: Arc::clone(&self.waker),
        }
    }
}

impl<T> Poster<T> {
    /// Queues `item` for the UI thread. Returns `false` once the UI side is
    /// gone; the item is dropped and the caller should stop producing.
    pub fn post(&self, item: T) -> bool {
        match self.sender.send(item) {
            Ok(()) => {
                (self.waker)();
                true
            }
            Err(_) => false,
        }
    }
}
