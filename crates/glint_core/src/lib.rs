//! Glint Core Runtime
//!
//! This crate provides the foundational cross-thread primitive for the Glint
//! rendering kernel:
//!
//! - **Command Queue**: an unbounded multi-producer/single-consumer queue of
//!   deferred closures, drained once per frame on the thread that owns the
//!   rendering context
//!
//! Worker threads (font rasterization, resource decoding) may not touch the
//! rendering context directly; they post continuations here and the frame
//! loop executes them on the owning thread before drawing.
//!
//! # Example
//!
//! ```rust
//! use glint_core::CommandQueue;
//!
//! let mut queue: CommandQueue<Vec<u32>> = CommandQueue::new();
//! let sender = queue.sender();
//!
//! std::thread::spawn(move || {
//!     sender.post(|ctx| ctx.push(42));
//! })
//! .join()
//! .unwrap();
//!
//! let mut ctx = Vec::new();
//! queue.drain(&mut ctx);
//! assert_eq!(ctx, vec![42]);
//! ```

pub mod command_queue;

pub use command_queue::{Command, CommandQueue, CommandSender, QueueError};
