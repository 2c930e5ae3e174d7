pub mod enums;
pub mod feedback;
pub mod health;
pub mod prediction;

pub use enums::*;
pub use feedback::*;
pub use health::*;
pub use prediction::*;
