pub mod admin;
pub mod center_detail;
pub mod centers;
pub mod course_detail;
pub mod courses;
pub mod home;
pub mod login;
pub mod not_found;
pub mod profile;
pub mod register;
pub mod resource_detail;
pub mod resources;
pub mod search;
pub mod subjects;
pub mod verify_otp;
