mod diff;
mod list;
mod synth;

pub use diff::cmd_diff;
pub use list::cmd_list;
pub use synth::cmd_synth;
