//! HYDRAD configuration CLI library.
//!
//! Terminal styling and the renderers used by the `hydrad-cli` commands.

pub mod output;
pub mod terminal;
