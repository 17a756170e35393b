//! # schema-to-scaffold
//!
//! Turns a Rails `schema.rb` into `rails generate` commands.
//!
//! ## Quick Example
//!
//! ```rust
//! use schema_to_scaffold::prelude::*;
//!
//! let schema = r#"
//! create_table "users", force: :cascade do |t|
//!   t.string "email"
//! end
//! create_table "posts", force: :cascade do |t|
//!   t.references "user"
//!   t.text "body"
//! end
//! "#;
//!
//! let catalogue = schema_to_scaffold::load(schema).unwrap();
//! let ids = select(&catalogue, "[2]").unwrap();
//! let options = ScriptOptions { migration: true, ..Default::default() };
//! let scripts = render_selection(&catalogue, &ids, &options).unwrap();
//!
//! assert_eq!(
//!     scripts[0],
//!     "rails generate scaffold Post user:references body:text --migration\n\n"
//! );
//! ```
//!
//! ## Selection
//!
//! | Input    | Tables               |
//! |----------|----------------------|
//! | `4`      | table 4              |
//! | `(4..6)` | tables 4 to 6        |
//! | `[4,6]`  | tables 4 and 6       |
//! | `*`      | all tables           |

pub mod clipboard;
pub mod config;
pub mod discovery;
pub mod error;
pub mod exec;
pub mod parser;
pub mod renderer;
pub mod schema;
pub mod selector;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::*;
    pub use crate::parser::parse_schema;
    pub use crate::renderer::{
        render, render_all, render_selection, ScriptOptions, Target, ToScript,
    };
    pub use crate::schema::{Attribute, Catalogue, Table, TableId};
    pub use crate::selector::{list_names, select, select_by_name_or_id, SELECTION_HELP};
}

/// Parse schema text into a catalogue, failing when it declares no tables.
///
/// # Example
///
/// ```
/// use schema_to_scaffold::load;
///
/// let catalogue = load("create_table \"users\" do |t|\nend\n").unwrap();
/// assert_eq!(catalogue.tables()[0].name, "users");
///
/// assert!(load("# nothing here").is_err());
/// ```
pub fn load(text: &str) -> Result<schema::Catalogue, error::ScaffoldError> {
    let catalogue = parser::parse_schema(text);
    if catalogue.is_empty() {
        return Err(error::ScaffoldError::ParseEmpty);
    }
    Ok(catalogue)
}
