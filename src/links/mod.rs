//! Concrete chain links, one per sink

pub mod console;
pub mod notifier;
pub mod remote;

pub use console::ConsoleLink;
pub use notifier::ErrorNotifierLink;
pub use remote::RemoteLogLink;
