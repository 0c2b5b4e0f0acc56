#[macro_use]
mod macros;
mod application;
mod error;
mod user_interface;
mod view;

pub use application::Application;
pub use error::VisualiserError;
use user_interface::UI;
