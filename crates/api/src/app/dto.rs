//! Request DTOs for the HTTP surface.
//!
//! Responses are serialized straight from the domain types; only inbound
//! shapes need dedicated structs.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub business_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterBusinessRequest {
    pub name: String,
    pub contact_email: String,
}

#[derive(Debug, Deserialize)]
pub struct PostJobRequest {
    pub business_id: String,
    pub title: String,
    pub job_function: String,
}

#[derive(Debug, Deserialize)]
pub struct OfferJobRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub email: String,
}
