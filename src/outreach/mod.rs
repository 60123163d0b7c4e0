pub mod filter;
pub mod storage;
pub mod types;

pub use filter::{filter_active, filter_snoozed};
pub use storage::{get_outreach_path, load_outreach_state, save_outreach_state};
pub use types::{OutreachEntry, OutreachState};
