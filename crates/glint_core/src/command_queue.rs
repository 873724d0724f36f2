//! Thread-affine command queue
//!
//! Bridges producer threads to the single thread that owns the rendering
//! context. Producers post `FnOnce` continuations from anywhere; the owning
//! thread drains them once per frame, so context mutation needs no locking.
//!
//! The queue is unbounded: `post` never blocks and never fails. Accepting
//! unbounded growth is the memory trade-off that keeps producers wait-free.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, ThreadId};

use thiserror::Error;

/// A deferred unit of work executed against the owning thread's context.
pub type Command<Ctx> = Box<dyn FnOnce(&mut Ctx) + Send + 'static>;

/// Command queue errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueueError {
    /// Synchronous hand-off is not supported: the owning thread is the
    /// render loop and re-entering it from another thread would deadlock.
    #[error("blocking send is not supported; use post")]
    BlockingSendUnsupported,
}

/// Consumer half of the queue, owned by the render thread.
///
/// Constructed on the thread that will drain it; that thread is the only
/// one allowed to call [`drain`](Self::drain).
pub struct CommandQueue<Ctx> {
    rx: Receiver<Command<Ctx>>,
    tx: Sender<Command<Ctx>>,
    owner: ThreadId,
}

/// Producer handle, cheap to clone and safe to move across threads.
pub struct CommandSender<Ctx> {
    tx: Sender<Command<Ctx>>,
}

impl<Ctx> Clone for CommandSender<Ctx> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<Ctx> CommandQueue<Ctx> {
    /// Create a queue owned by the current thread.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            tx,
            owner: thread::current().id(),
        }
    }

    /// Create a new producer handle for this queue.
    pub fn sender(&self) -> CommandSender<Ctx> {
        CommandSender {
            tx: self.tx.clone(),
        }
    }

    /// Execute queued commands on the owning thread until the queue reports
    /// empty. Returns the number of commands executed.
    ///
    /// Every command accepted before this call is executed before it
    /// returns. Commands posted while a drain is in progress may run in the
    /// same pass or be left for the next frame; callers must not rely on
    /// either.
    pub fn drain(&mut self, ctx: &mut Ctx) -> usize {
        debug_assert_eq!(
            thread::current().id(),
            self.owner,
            "CommandQueue::drain called off the owning thread"
        );

        let mut executed = 0;
        loop {
            match self.rx.try_recv() {
                Ok(command) => {
                    command(ctx);
                    executed += 1;
                }
                // Disconnected cannot happen while `self.tx` is alive.
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if executed > 0 {
            tracing::trace!(executed, "drained command queue");
        }
        executed
    }
}

impl<Ctx> Default for CommandQueue<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> CommandSender<Ctx> {
    /// Enqueue a command for execution on the owning thread.
    ///
    /// Callable from any thread; never blocks, never fails. If the owning
    /// loop has already shut down (the queue was dropped), the command is
    /// silently discarded - a post that loses the shutdown race must not
    /// panic or deadlock.
    pub fn post<F>(&self, f: F)
    where
        F: FnOnce(&mut Ctx) + Send + 'static,
    {
        if self.tx.send(Box::new(f)).is_err() {
            tracing::warn!("command posted after queue shutdown; dropped");
        }
    }

    /// Synchronous, blocking hand-off. Permanently unsupported.
    ///
    /// The consumer is the render loop; blocking a producer on it invites
    /// deadlock, so this reports [`QueueError::BlockingSendUnsupported`]
    /// instead of degrading to a blocking wait.
    pub fn send_blocking<F>(&self, _f: F) -> Result<(), QueueError>
    where
        F: FnOnce(&mut Ctx) + Send + 'static,
    {
        Err(QueueError::BlockingSendUnsupported)
    }
}
