//! Editing and search operations over an [`core_state::EditorBuffer`].
//!
//! Every operation takes the buffer it acts on explicitly, plus the
//! [`core_config::Config`] knobs and the viewport geometry it needs to
//! keep scrolling consistent. Mutating operations snapshot the buffer
//! onto the undo stack exactly once before touching it, so one user
//! action is always one undo step.

pub mod edit;
pub mod search;

pub use search::{SearchSession, perform_replace, perform_search, replace_all};
