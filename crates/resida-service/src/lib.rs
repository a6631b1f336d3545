#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod auth;
pub mod code;
pub mod model;
pub mod query;
pub mod request;
pub mod response;
pub mod service;
pub mod types;

pub use crate::auth::{Caller, ScopeEvaluator};
pub use crate::request::{CreateInvitation, LinkAccount};
pub use crate::response::{InvitationLookup, IssuedInvitation, PrefillProfile};
pub use crate::service::InviteService;
