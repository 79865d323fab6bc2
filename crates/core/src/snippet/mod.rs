mod types;

pub use types::{NewSnippet, Snippet};
