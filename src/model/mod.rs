pub mod column;
pub mod config;
pub mod project;
pub mod task;
pub mod view;

pub use column::*;
pub use config::*;
pub use task::*;
pub use view::*;
