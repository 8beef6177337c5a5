pub mod filter;
pub mod projection;
pub mod view_builder;

pub use view_builder::rebuild_view;
