pub mod media;
pub mod model;
pub mod types;

pub use media::MediaRef;
pub use model::*;
pub use types::*;
