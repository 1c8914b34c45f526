//! CDP page session for interacting with a single page.

mod bindings;
mod core;
mod js;
mod navigation;

pub use self::bindings::BindingHandler;
pub use self::core::PageSession;

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
