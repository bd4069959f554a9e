//! Services that run alongside the editor: clocks, timers, the highlight
//! worker and logging setup.

pub mod debounce;
pub mod highlight_worker;
pub mod time_source;
pub mod tracing_setup;
