mod course;
mod subscription;
mod user;

pub use course::*;
pub use subscription::*;
pub use user::*;
