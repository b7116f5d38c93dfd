//! Plain-text formats of a weekly task planner.
//!
//! - [`parse`]: the markdown export, one `## Week of` section per ISO week
//! - [`share`]: compressed, versioned share-link slugs for a single week
//!
//! Both are pure string transforms over [`model::Task`] lists. [`io`],
//! [`ops`] and [`cli`] make up the `wl` command that hosts them.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod parse;
pub mod share;

pub use model::{Statuses, Task, TaskStatus, WeekKey};
pub use parse::{format_markdown, parse_markdown};
pub use share::{ShareData, decode_share_data, encode_share_data};
