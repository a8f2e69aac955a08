pub mod item;
pub mod health;
pub mod stats;
pub mod error;
pub mod validation;

pub use item::*;
pub use health::*;
pub use stats::*;
pub use error::*;
pub use validation::*;
