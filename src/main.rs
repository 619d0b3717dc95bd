//! # media-organize CLI
//!
//! Command-line interface for the media organizer.
//!
//! ## Usage
//! ```bash
//! media-organize scan ~/Inbox
//! media-organize scan ~/Inbox --operation move --output json
//! ```

mod cli;

use media_organizer::Result;

fn main() -> Result<()> {
    media_organizer::init_tracing();
    cli::run()
}
