use crm_core::enums::RenderMode;
use crm_core::notifications::{Notification, NotificationLog};
use crm_schema::{PlanForm, PlanMetadata, RenderedForm};
use serde::Serialize;

use crate::cli::root_commands::FormArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::metadata::{read_metadata, write_metadata};
use crate::commands::shared::parse::{ensure_section, parse_assignment, parse_enum};
use crate::context::AppContext;
use crate::output::{output, print_notifications};

#[derive(Debug, Serialize)]
struct FormResponse<'a> {
    form: RenderedForm,
    metadata: &'a PlanMetadata,
    notifications: Vec<Notification>,
}

/// Handle `crm form`.
pub fn handle(args: &FormArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mode = match &args.mode {
        Some(raw) => parse_enum::<RenderMode>(raw, "mode")?,
        None => ctx.config.general.default_mode,
    };
    if let Some(section) = &args.section {
        ensure_section(&ctx.schema(), section)?;
    }

    let log = &ctx.notifications;
    let mut live = log.subscribe();

    let metadata = read_metadata(&args.metadata)?;
    let mut form = PlanForm::new(ctx.schema(), metadata, mode);
    let failed = apply_edits(&mut form, &args.set, &args.set_legacy, log);

    if let Some(out) = &args.out {
        if failed == 0 {
            write_metadata(out, form.metadata())?;
            log.success(format!("saved {}", out.display()));
        } else {
            log.warning(format!("not saved: {failed} edit(s) failed"));
        }
    }

    let missing = form.missing_required();
    if !missing.is_empty() {
        log.warning(format!("missing required: {}", missing.join(", ")));
    }

    if !flags.quiet {
        let mut streamed = Vec::new();
        while let Ok(notification) = live.try_recv() {
            streamed.push(notification);
        }
        print_notifications(&streamed, flags.verbose);
    }

    let rendered = form.render(args.section.as_deref());
    if flags.format == OutputFormat::Table {
        output(&rendered.sections, flags.format)?;
    } else {
        output(
            &FormResponse {
                form: rendered,
                metadata: form.metadata(),
                notifications: log.history(),
            },
            flags.format,
        )?;
    }

    if failed > 0 {
        anyhow::bail!("{failed} edit(s) failed");
    }
    Ok(())
}

/// Apply `KEY=VALUE` edits in order, logging each outcome. Returns the
/// number of edits that failed; failed edits leave the form untouched.
pub fn apply_edits(
    form: &mut PlanForm,
    set: &[String],
    set_legacy: &[String],
    log: &NotificationLog,
) -> usize {
    let mut failed = 0;

    for raw in set {
        let outcome = parse_assignment(raw)
            .and_then(|(key, value)| form.set_field(key, value).map(|()| key).map_err(Into::into));
        match outcome {
            Ok(key) => {
                log.success(format!("updated {key}"));
            }
            Err(error) => {
                failed += 1;
                log.error(format!("{error}"));
            }
        }
    }

    for raw in set_legacy {
        let outcome = parse_assignment(raw)
            .and_then(|(key, value)| form.set_legacy(key, value).map(|()| key).map_err(Into::into));
        match outcome {
            Ok(key) => {
                log.info(format!("updated legacy {key}"));
            }
            Err(error) => {
                failed += 1;
                log.error(format!("{error}"));
            }
        }
    }

    failed
}
