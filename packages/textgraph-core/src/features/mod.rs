//! Feature modules

pub mod corpus;
pub mod dag;
pub mod fold;
pub mod search;
pub mod text;
