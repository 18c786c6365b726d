// CV document store: action vocabulary, transition function, dispatcher,
// derived views and editor-side helpers (validation, debounce, skill suggestions).

pub mod actions;
pub mod completeness;
pub mod debounce;
pub mod handlers;
pub mod reducer;
pub mod skills;
pub mod store;
pub mod validation;
