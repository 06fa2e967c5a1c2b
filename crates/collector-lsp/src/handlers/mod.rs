mod configuration;
mod lifecycle;
mod notifications;

pub use configuration::*;
pub use lifecycle::*;
pub use notifications::*;
