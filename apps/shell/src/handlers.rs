//! Subcommand handlers. Each returns the text to print.

use hzn::kernel::app::Application;
use hzn::kernel::publish::PublishReport;
use std::fmt::Write as _;

#[must_use]
pub fn routes(app: &Application) -> String {
    let Some(router) = app.router() else {
        return "HTTP is disabled for this host\n".to_owned();
    };

    let mut out = String::new();
    for route in router.routes() {
        let _ = writeln!(
            out,
            "{:<7} {:<40} {:<36} {}",
            route.method,
            route.uri,
            route.name.as_deref().unwrap_or("-"),
            route.action
        );
    }
    out
}

#[must_use]
pub fn commands(app: &Application) -> String {
    app.commands().commands().into_iter().map(|c| c + "\n").collect()
}

#[must_use]
pub fn events(app: &Application) -> String {
    let mut out = String::new();
    for event in app.events().events() {
        let _ = writeln!(out, "{event}");
        for listener in app.events().listeners(&event) {
            let _ = writeln!(out, "  -> {listener}");
        }
    }
    out
}

/// Pretty JSON for the value at `key`.
///
/// # Errors
/// Fails when the key is absent.
pub fn config(app: &Application, key: &str) -> anyhow::Result<String> {
    let value = app.config().value(key).ok_or_else(|| anyhow::anyhow!("[{key}] is not set"))?;
    Ok(serde_json::to_string_pretty(&value)? + "\n")
}

/// Publishes one tag, or every tag when none is given.
///
/// # Errors
/// Propagates publish failures.
pub fn publish(app: &Application, tag: Option<&str>, force: bool) -> anyhow::Result<String> {
    let publisher = app.publisher(force);
    let report = match tag {
        Some(tag) => publisher.publish(tag)?,
        None => publisher.publish_all()?,
    };
    Ok(render_report(&report))
}

fn render_report(report: &PublishReport) -> String {
    let mut out = String::new();
    for path in &report.copied {
        let _ = writeln!(out, "Copied  {}", path.display());
    }
    for path in &report.skipped {
        let _ = writeln!(out, "Skipped {} (exists, use --force)", path.display());
    }
    for path in &report.overridden {
        let _ = writeln!(out, "Shadowed {} (a later group targets the same file)", path.display());
    }
    let _ = writeln!(out, "Publishing complete.");
    out
}

#[must_use]
pub fn status(app: &Application) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "context:   {}", app.context());
    let _ = writeln!(out, "base:      {}", app.base_path().display());
    let _ = writeln!(out, "providers: {}", app.providers().join(", "));
    let _ = writeln!(out, "bindings:  {}", app.container().keys().len());
    let _ = writeln!(out, "routes:    {}", app.router().map_or(0, |r| r.len()));
    let _ = writeln!(out, "commands:  {}", app.commands().len());
    let _ = writeln!(out, "events:    {}", app.events().events().len());
    let _ = writeln!(out, "publish:   {}", app.publishes().tags().join(", "));
    let _ = writeln!(out, "views:     {}", app.views().namespaces().join(", "));
    out
}
