//! Grammar productions for the schema language.
//!
//! This module implements all `parse_*` methods as an extension of `Parser`.
//! Keywords are contextual: productions match `Id` tokens by text, so any
//! keyword stays usable as a name.
//!
//! Line breaks matter in one place only: an expression's values end at the end
//! of the line, and inline domains must start on the line they annotate.

mod domains;
mod items;
mod types;
