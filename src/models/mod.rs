pub mod catalogue;
pub mod enums;
pub mod fitness;
pub mod mood;
pub mod nutrition;
pub mod symptom;

pub use fitness::*;
pub use mood::*;
pub use nutrition::*;
pub use symptom::*;
