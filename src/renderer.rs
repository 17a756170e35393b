//! Script renderer for catalogue tables.
//!
//! Converts tables into `rails generate` invocations:
//!
//! ```text
//! rails generate scaffold User email:string account:references --no-migration
//! ```

use inflector::Inflector;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::schema::{Attribute, Catalogue, Table, TableId};

const GENERATE: &str = "rails generate";

/// Which generator the script invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Model, controller, views and routes.
    #[default]
    Scaffold,
    /// Test factory definition.
    Factory,
}

impl Target {
    /// Generator name as passed to `rails generate`.
    pub fn generator(self) -> &'static str {
        match self {
            Self::Scaffold => "scaffold",
            Self::Factory => "factory_girl:model",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.generator())
    }
}

/// Generation flags applied to every rendered script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptOptions {
    /// Generator to invoke.
    pub target: Target,
    /// Emit `--migration` so the generator also writes a migration file.
    /// When false, `--no-migration` is emitted since the schema already
    /// describes the table.
    pub migration: bool,
    /// Emit `--force` so existing generated files are overwritten.
    pub force: bool,
}

/// Trait for converting schema nodes to generator scripts.
pub trait ToScript {
    /// Convert this node to script text.
    fn to_script(&self, options: &ScriptOptions) -> String;
}

impl ToScript for Table {
    fn to_script(&self, options: &ScriptOptions) -> String {
        let mut script = String::from(GENERATE);
        script.push(' ');
        script.push_str(options.target.generator());
        script.push(' ');
        script.push_str(&model_name(&self.name));

        for attribute in self.attributes.iter().filter(|a| !a.is_bookkeeping()) {
            script.push(' ');
            script.push_str(&attribute.to_argument());
        }

        if options.migration {
            script.push_str(" --migration");
        } else {
            script.push_str(" --no-migration");
        }
        if options.force {
            script.push_str(" --force");
        }

        script.push_str("\n\n");
        script
    }
}

impl ToScript for Catalogue {
    fn to_script(&self, options: &ScriptOptions) -> String {
        self.iter().map(|table| table.to_script(options)).collect()
    }
}

impl Attribute {
    /// Generator argument, e.g. `email:string` or `account:references`.
    fn to_argument(&self) -> String {
        if self.is_reference() {
            format!("{}:references", self.name)
        } else {
            format!("{}:{}", self.name, self.kind)
        }
    }
}

/// Singular class name for a table (`user_profiles` -> `UserProfile`).
pub fn model_name(table: &str) -> String {
    table.to_class_case()
}

/// Render the script for one table.
pub fn render(table: &Table, options: &ScriptOptions) -> String {
    table.to_script(options)
}

/// Render every table in declaration order, concatenated.
pub fn render_all(catalogue: &Catalogue, options: &ScriptOptions) -> String {
    catalogue.to_script(options)
}

/// Render one script per selected table, in selection order.
pub fn render_selection(
    catalogue: &Catalogue,
    ids: &[TableId],
    options: &ScriptOptions,
) -> ScaffoldResult<Vec<String>> {
    // Resolve everything first so a bad id never yields a partial result.
    let tables = ids
        .iter()
        .map(|id| {
            catalogue
                .get(*id)
                .ok_or_else(|| ScaffoldError::unknown(id, id.to_string()))
        })
        .collect::<ScaffoldResult<Vec<_>>>()?;

    debug!(
        tables = tables.len(),
        generator = %options.target,
        migration = options.migration,
        force = options.force,
        "rendering scripts"
    );
    Ok(tables.into_iter().map(|t| t.to_script(options)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;
    use pretty_assertions::assert_eq;

    const SCHEMA: &str = r#"
create_table "users", force: :cascade do |t|
  t.string "email", null: false
  t.integer "age"
  t.datetime "created_at", null: false
  t.datetime "updated_at", null: false
end

create_table "user_profiles" do |t|
  t.references "user", foreign_key: true
  t.text "bio"
end

create_table "categories" do |t|
  t.belongs_to "parent"
end
"#;

    fn opts(target: Target, migration: bool, force: bool) -> ScriptOptions {
        ScriptOptions {
            target,
            migration,
            force,
        }
    }

    #[test]
    fn test_scaffold_with_migration() {
        let cat = parse_schema(SCHEMA);
        let users = cat.by_name("users").unwrap();
        assert_eq!(
            render(users, &opts(Target::Scaffold, true, false)),
            "rails generate scaffold User email:string age:integer --migration\n\n"
        );
    }

    #[test]
    fn test_scaffold_without_migration_forced() {
        let cat = parse_schema(SCHEMA);
        let users = cat.by_name("users").unwrap();
        assert_eq!(
            render(users, &opts(Target::Scaffold, false, true)),
            "rails generate scaffold User email:string age:integer --no-migration --force\n\n"
        );
    }

    #[test]
    fn test_factory_target() {
        let cat = parse_schema(SCHEMA);
        let profiles = cat.by_name("user_profiles").unwrap();
        assert_eq!(
            render(profiles, &opts(Target::Factory, false, false)),
            "rails generate factory_girl:model UserProfile user:references bio:text --no-migration\n\n"
        );
    }

    #[test]
    fn test_model_name_singularized() {
        assert_eq!(model_name("users"), "User");
        assert_eq!(model_name("user_profiles"), "UserProfile");
        assert_eq!(model_name("categories"), "Category");
    }

    #[test]
    fn test_render_is_deterministic() {
        let cat = parse_schema(SCHEMA);
        let table = &cat.tables()[2];
        let options = opts(Target::Scaffold, true, true);
        assert_eq!(render(table, &options), render(table, &options));
    }

    #[test]
    fn test_render_all_concatenates_in_declaration_order() {
        let cat = parse_schema(SCHEMA);
        let options = ScriptOptions::default();
        let expected: String = cat.iter().map(|t| render(t, &options)).collect();
        assert_eq!(render_all(&cat, &options), expected);
        assert!(render_all(&cat, &options).starts_with("rails generate scaffold User "));
    }

    #[test]
    fn test_render_selection_keeps_selection_order() {
        let cat = parse_schema(SCHEMA);
        let options = ScriptOptions::default();
        let scripts =
            render_selection(&cat, &[TableId::new(3), TableId::new(1)], &options).unwrap();
        assert_eq!(scripts.len(), 2);
        assert!(scripts[0].contains(" Category "));
        assert!(scripts[1].contains(" User "));
    }

    #[test]
    fn test_constraint_lines_do_not_reach_script() {
        let cat = parse_schema(
            "create_table \"products\" do |t|\n  t.decimal \"price\"\n  t.check_constraint \"price > 0\", name: \"price_positive\"\nend\n",
        );
        assert_eq!(
            render(&cat.tables()[0], &ScriptOptions::default()),
            "rails generate scaffold Product price:decimal --no-migration\n\n"
        );
    }

    #[test]
    fn test_render_selection_rejects_unknown_id() {
        let cat = parse_schema(SCHEMA);
        let result = render_selection(&cat, &[TableId::new(1), TableId::new(9)], &ScriptOptions::default());
        assert!(matches!(result, Err(ScaffoldError::UnknownTable { .. })));
    }
}
