//! Wire and domain types shared by the users client core and its front-ends.

pub mod domain;
pub mod error;
pub mod protocol;
