// Each command is its own submodule.

pub mod add;
pub mod delete;
pub mod edit;
pub mod list;
pub mod recurrence;
pub mod show;
pub mod stats;
pub mod status;
pub mod transfer;
