//! Preprocessing of sugared macro tag syntaxes into canonical instructions

pub mod scanner;
pub mod syntax;
pub mod tags;

pub use scanner::{find_closing, find_next};
pub use syntax::TagSyntax;
pub use tags::{preprocess_tags, rewrite_tags, TagMatch};
