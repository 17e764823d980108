mod data;
pub mod domain;
mod http;
pub(crate) mod validation;

pub(crate) use http::{router, PATH};
