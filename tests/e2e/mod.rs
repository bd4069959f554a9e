pub mod documents;
pub mod drag_drop;
pub mod editing;
pub mod highlighting;
