mod branch;
pub mod exec;
mod status;

pub use branch::{push_current_branch, switch_branch};
pub use exec::{CommandOutput, GitCli, GitRunner};
pub use status::{add_file_changes, collect_file_changes, parse_status_lines};
