pub mod login;
pub mod register;
pub mod utils;

// Re-export handler functions for use in routing
pub use login::login;
pub use register::register;
