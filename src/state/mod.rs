//! State Module - Pointer and hover state.
//!
//! - **Pointer** - Latest pointer position, updated on every move
//! - **Hover** - Interactive element registry and derived cursor mode
//! - **Context** - Explicit owner of both, tied to root mount/unmount

mod context;
mod hover;
mod pointer;

pub use context::*;
pub use hover::*;
pub use pointer::*;
