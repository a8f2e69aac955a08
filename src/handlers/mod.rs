pub mod health;
pub mod item;
pub mod landing;

pub use health::*;
pub use item::*;
pub use landing::*;
