pub mod attendance;
pub mod student;
pub mod user;

pub use attendance::*;
pub use student::*;
pub use user::*;
