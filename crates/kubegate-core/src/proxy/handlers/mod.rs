// Handlers module - forwarding endpoints

pub mod forward;
pub mod secret;

pub use forward::handle_forward;
pub use secret::handle_create_secret;
