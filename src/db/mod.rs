pub mod course;
pub mod subscription;
