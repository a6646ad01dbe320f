// src/members/mod.rs

pub mod models;
pub mod services;
pub mod validators;


pub use models::{
    CountryCode, Member, MemberProfile, PasswordChangeRequest, PasswordChangeResponse,
    ProfileUpdate, ProfileUpdateResponse, RegistrationRequest, RegistrationResponse,
};
pub use services::MemberService;
pub use validators::{PasswordChangeValidator, ProfileValidator, RegistrationValidator};
