use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List schema sections in display order.
    Sections,
    /// List declared fields.
    Fields(FieldsArgs),
    /// Show base fields with their variants, per section.
    Groups(GroupsArgs),
    /// Check field characteristics; exits non-zero on violations.
    Check,
    /// List metadata keys the schema does not declare.
    Legacy(LegacyArgs),
    /// Render a plan form, optionally applying edits first.
    Form(FormArgs),
    /// List contact roles, or the fields of one role.
    Roles(RolesArgs),
    /// Dump the JSON Schema for a registered type, or list them.
    Schema(SchemaArgs),
}

/// Arguments for `crm fields`.
#[derive(Clone, Debug, Args)]
pub struct FieldsArgs {
    /// Only fields of this section key.
    #[arg(long)]
    pub section: Option<String>,
}

/// Arguments for `crm groups`.
#[derive(Clone, Debug, Args)]
pub struct GroupsArgs {
    /// Only this section key.
    #[arg(long)]
    pub section: Option<String>,
}

/// Arguments for `crm legacy`.
#[derive(Clone, Debug, Args)]
pub struct LegacyArgs {
    /// Plan metadata JSON file.
    pub metadata: PathBuf,
}

/// Arguments for `crm form`.
#[derive(Clone, Debug, Args)]
pub struct FormArgs {
    /// Plan metadata JSON file.
    pub metadata: PathBuf,
    /// Render mode: create, edit, compare (defaults to `general.default_mode`).
    #[arg(long)]
    pub mode: Option<String>,
    /// Only this section key.
    #[arg(long)]
    pub section: Option<String>,
    /// Set a declared field, `KEY=VALUE`. An empty value clears it.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
    /// Set a legacy field as text, `KEY=VALUE`.
    #[arg(long = "set-legacy", value_name = "KEY=VALUE")]
    pub set_legacy: Vec<String>,
    /// Write the edited metadata to this file.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for `crm roles`.
#[derive(Clone, Debug, Args)]
pub struct RolesArgs {
    pub role: Option<String>,
}

/// Arguments for `crm schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    pub type_name: Option<String>,
}
