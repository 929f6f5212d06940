use std::io::Write;

use color_eyre::Result;
use serde::Serialize;
use settings::SnapshotStore;
use signature::{
    render, to_html, to_plain_text, Branding, ClipboardExporter, CopyStatus, ErrorMap, FormReconciler,
    FormState, MemoryLocation, SignatureModel, APP_VERSION, GROUPS,
};

use crate::cli::{Assignment, Cmd, Format};

/// One CLI invocation's view of the form: hydrated from the store and the
/// `--query` link, edited through `--set`.
///
/// Opening does not touch the store. Hydration (which writes the merged
/// snapshot back) only happens for commands that work on the form.
pub struct Session<S> {
    reconciler: FormReconciler<S, MemoryLocation>,
    branding: Branding,
}

impl<S: SnapshotStore> Session<S> {
    pub fn open(store: S, query: Option<&str>, branding: Branding) -> Self {
        let location = MemoryLocation::new("/").with_query(query.unwrap_or_default());
        Self {
            reconciler: FormReconciler::new(store, location),
            branding,
        }
    }

    /// Merge the stored snapshot and the query. Later calls are no-ops.
    pub fn hydrate(&mut self) {
        if !self.reconciler.is_hydrated() {
            self.reconciler.hydrate();
        }
    }

    /// Each assignment is an edit followed by leaving the field.
    pub fn apply(&mut self, assignments: &[Assignment]) {
        for Assignment { field, value } in assignments {
            self.reconciler.update_field(*field, value.clone());
            self.reconciler.set_field_touched(*field);
        }
    }

    pub fn reconciler(&self) -> &FormReconciler<S, MemoryLocation> {
        &self.reconciler
    }

    pub fn model(&self) -> SignatureModel {
        render(&self.reconciler.trimmed_values(), &self.branding)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    values: &'a FormState,
    errors: &'a ErrorMap,
    signature: SignatureModel,
}

/// Run `cmd`. Signature output goes to `out`, diagnostics to `err`.
pub async fn run<S: SnapshotStore>(
    cmd: Cmd,
    session: &mut Session<S>,
    exporter: &ClipboardExporter,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    match cmd {
        Cmd::Render { set, format, copy } => {
            session.hydrate();
            session.apply(&set);
            report_errors(session, err)?;

            let model = session.model();
            match format {
                Format::Html => writeln!(out, "{}", to_html(&model))?,
                Format::Text => writeln!(out, "{}", to_plain_text(&model))?,
                Format::Json => {
                    let report = JsonReport {
                        version: APP_VERSION,
                        values: session.reconciler.state(),
                        errors: session.reconciler.errors(),
                        signature: model.clone(),
                    };
                    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
                }
            }

            if copy {
                let status = CopyStatus::from(exporter.copy_model(&model).await);
                writeln!(err, "{}", status.message())?;
            }
        }
        Cmd::Url { set, base } => {
            session.hydrate();
            session.apply(&set);
            report_errors(session, err)?;

            let query = session
                .reconciler
                .url_state()
                .share_query(session.reconciler.state());
            if query.is_empty() {
                writeln!(out, "{base}")?;
            } else {
                writeln!(out, "{base}?{query}")?;
            }
        }
        Cmd::Reset => {
            session.reconciler.reset();
            writeln!(err, "Form reset to defaults")?;
        }
        Cmd::Fields => {
            for group in &GROUPS {
                writeln!(out, "{}: {}", group.title, group.description)?;
                for field in group.definitions() {
                    write!(out, "  {:<16} {:<14} e.g. {}", field.id, field.label, field.placeholder)?;
                    match field.hint {
                        Some(hint) => writeln!(out, "  ({hint})")?,
                        None => writeln!(out)?,
                    }
                }
            }
        }
    }
    Ok(())
}

/// Validation messages go to `err` only; the console log layer shares stderr.
fn report_errors<S: SnapshotStore>(session: &Session<S>, err: &mut impl Write) -> Result<()> {
    for (id, message) in session.reconciler.errors() {
        writeln!(err, "{id}: {message}")?;
    }
    Ok(())
}
