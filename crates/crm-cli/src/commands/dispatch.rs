use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: &Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Sections => commands::sections::handle(ctx, flags),
        Commands::Fields(args) => commands::fields::handle(args, ctx, flags),
        Commands::Groups(args) => commands::groups::handle(args, ctx, flags),
        Commands::Check => commands::check::handle(ctx, flags),
        Commands::Legacy(args) => commands::legacy::handle(args, ctx, flags),
        Commands::Form(args) => commands::form::handle(args, ctx, flags),
        Commands::Roles(_) | Commands::Schema(_) => {
            unreachable!("roles/schema are pre-dispatched in main")
        }
    }
}
