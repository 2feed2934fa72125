//! # Events Module
//!
//! Progress and outcome reporting, decoupled from presentation.
//!
//! ## Design
//! The core library emits events through a channel. The CLI renders them;
//! tests collect them to check what the pipeline did.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Delete(DeleteEvent::Deleted { media_id }) = event {
//!             println!("Deleted media item {}", media_id);
//!         }
//!     }
//! });
//!
//! pipeline.run(&mut prompt, &sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
