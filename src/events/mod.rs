//! # Events Module
//!
//! Event-driven progress reporting.
//!
//! ## Design
//! The core emits lifecycle events through a crossbeam channel and
//! progress percentages through a [`ProgressSink`](crate::core::progress::ProgressSink).
//! [`ProgressBroadcaster`] is the sink to use when several listeners
//! (a progress bar, a web socket, a log) want the same percentages.
//!
//! ## Example
//! ```rust,ignore
//! let broadcaster = Arc::new(ProgressBroadcaster::new());
//! let subscription = broadcaster.subscribe();
//!
//! std::thread::spawn(move || {
//!     for percent in subscription.iter() {
//!         println!("{}%", percent);
//!     }
//! });
//!
//! let coordinator = ScanCoordinator::new(settings).with_progress_sink(broadcaster);
//! coordinator.scan_and_organize_files(request)?;
//! ```

mod broadcast;
mod channel;
mod types;

pub use broadcast::{ProgressBroadcaster, ProgressSubscription};
pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
