//! Non-interactive subcommands: catalog printing and headless execution.

use std::{
    fmt::Write as _,
    io::{self, BufRead, Write},
};

use anyhow::{Context, Result, anyhow, bail};
use scriptdeck_engine::{ScriptExecutor, ValidationSchema, WizardError, WizardState, parse_input};
use scriptdeck_registry::ScriptRegistry;
use scriptdeck_types::{Catalog, Category, Script};

/// Parses a `key=value` pair; the value may itself contain `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw.split_once('=').ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

pub fn find_script<'a>(registry: &'a ScriptRegistry, id: &str) -> Result<&'a Script> {
    registry.find_script(id).with_context(|| format!("unknown script '{id}'"))
}

pub fn action_schema(registry: &ScriptRegistry, script: &str, action: &str) -> Result<ValidationSchema> {
    let script = find_script(registry, script)?;
    let action = script
        .action(action)
        .with_context(|| format!("script '{}' has no action '{action}'", script.id))?;
    Ok(ValidationSchema::for_action(action))
}

pub fn render_tree(catalog: &Catalog) -> String {
    fn visit(category: &Category, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let _ = writeln!(out, "{indent}{}/", category.name);
        for script in &category.scripts {
            let _ = writeln!(out, "{indent}  {}", script.name);
        }
        for child in &category.children {
            visit(child, depth + 1, out);
        }
    }

    let mut out = String::new();
    for category in &catalog.categories {
        visit(category, 0, &mut out);
    }
    out
}

pub fn render_script(script: &Script) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", script.name);
    let _ = writeln!(out, "  path:        {}", script.path);
    if !script.category.is_empty() {
        let _ = writeln!(out, "  category:    {}", script.category);
    }
    if !script.description.is_empty() {
        let _ = writeln!(out, "  description: {}", script.description);
    }
    if let Some(owner) = script.meta.owner.as_ref() {
        let _ = writeln!(out, "  owner:       {} / {}", owner.team.join(", "), owner.project);
    }
    let _ = writeln!(out, "  actions:");
    for action in &script.actions {
        let destructive = if action.is_destructive() { "  [destructive]" } else { "" };
        let _ = writeln!(out, "    {}  {} {}{destructive}", action.id, action.method, action.endpoint);
        for parameter in &action.parameters {
            let required = if parameter.required { ", required" } else { "" };
            let _ = writeln!(out, "      --param {}=<{}{required}>", parameter.id, parameter.kind);
        }
    }
    out
}

pub fn render_search(registry: &ScriptRegistry, query: &str) -> String {
    let results = registry.search(query);
    if results.is_empty() {
        return format!("No scripts match '{query}'\n");
    }
    let mut out = String::new();
    for result in results {
        let _ = writeln!(out, "{}/{}  {}", result.path, result.script_id, result.description);
    }
    out
}

/// Inputs of a headless run.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub script: String,
    pub action: String,
    pub params: Vec<(String, String)>,
    pub team: Option<String>,
    pub project: Option<String>,
    /// Skip the interactive confirmation.
    pub confirmed: bool,
}

/// Walks the wizard from information to execution and prints the output.
///
/// Fails on unknown scripts, actions or parameters, on invalid input (each
/// field error is printed to stderr), and when the execution reports failure.
pub async fn run_script(registry: &ScriptRegistry, executor: &dyn ScriptExecutor, request: RunRequest) -> Result<()> {
    let script = find_script(registry, &request.script)?;
    let mut wizard = WizardState::new(registry.config.require_context);
    wizard.select_script(script.clone());
    wizard.next()?;
    wizard.select_action(&request.action)?;

    for (key, raw) in &request.params {
        let kind = wizard
            .action()
            .and_then(|action| action.parameter(key))
            .map(|parameter| parameter.kind)
            .with_context(|| format!("action '{}' has no parameter '{key}'", request.action))?;
        wizard.set_field(key, parse_input(kind, raw))?;
    }
    wizard.set_team(request.team);
    wizard.set_project(request.project);

    if let Err(err) = wizard.submit() {
        if let WizardError::Invalid(errors) = &err {
            for (field, message) in errors.iter() {
                eprintln!("{field}: {message}");
            }
        }
        return Err(anyhow!(err).context("cannot submit the form"));
    }

    println!("{} → {}", script.name, request.action);
    for (label, value) in wizard.confirmation_rows() {
        println!("  {label}: {value}");
    }
    if !request.confirmed && !confirm("Execute?")? {
        println!("Aborted");
        return Ok(());
    }

    let execution = wizard.begin_execution()?;
    let result = executor.execute(&execution).await;
    wizard.finish_execution(result);

    let notice = wizard.take_notice();
    let Some(response) = wizard.output() else {
        bail!("{}", notice.map(|notice| notice.message).unwrap_or_else(|| "Script execution failed".to_string()));
    };
    if let Some(output) = response.output.as_deref() {
        println!("{output}");
    }
    if !response.success {
        bail!("{}", response.error.as_deref().unwrap_or("Script execution failed"));
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptdeck_engine::MockExecutor;
    use scriptdeck_registry::RegistryConfig;

    fn registry(require_context: bool) -> ScriptRegistry {
        let items = serde_json::from_str(
            r#"[{
                "meta": { "name": "disk-cleanup", "path": "system/maintenance", "description": "Frees disk space" },
                "options": [
                    { "action": { "type": "select", "required": "yes", "choices": ["cleanup"] } },
                    { "hostname": { "type": "str", "required": "yes", "define_action_arg": ["cleanup"] } },
                    { "dry_run": { "type": "bool", "required": "no", "define_action_arg": ["cleanup"] } }
                ],
                "commands": [{ "name": "cleanup", "command": "/api/system/disk/cleanup", "actionT": "d" }]
            }]"#,
        )
        .expect("fixture items");
        let config = RegistryConfig {
            require_context,
            ..RegistryConfig::default()
        };
        ScriptRegistry::from_items(config, items)
    }

    fn request(params: &[(&str, &str)]) -> RunRequest {
        RunRequest {
            script: "disk-cleanup".into(),
            action: "cleanup".into(),
            params: params.iter().map(|(key, value)| (key.to_string(), value.to_string())).collect(),
            confirmed: true,
            ..RunRequest::default()
        }
    }

    #[test]
    fn key_value_pairs_split_on_first_equals() {
        assert_eq!(parse_key_value("filter=a=b"), Ok(("filter".into(), "a=b".into())));
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn tree_and_script_rendering() {
        let registry = registry(false);
        assert_eq!(render_tree(&registry.catalog), "system/\n  maintenance/\n    disk-cleanup\n");
        let shown = render_script(find_script(&registry, "disk-cleanup").expect("script"));
        assert!(shown.contains("cleanup  POST /api/system/disk/cleanup  [destructive]"));
        assert!(shown.contains("--param hostname=<text, required>"));
        assert!(render_search(&registry, "zzz").starts_with("No scripts match"));
    }

    #[test]
    fn schema_lookup_reports_unknown_actions() {
        let registry = registry(false);
        let schema = action_schema(&registry, "disk-cleanup", "cleanup").expect("schema");
        assert_eq!(schema.fields.len(), 2);
        let err = action_schema(&registry, "disk-cleanup", "purge").expect_err("unknown action");
        assert!(err.to_string().contains("no action 'purge'"));
    }

    #[tokio::test]
    async fn headless_run_executes_valid_input() {
        let registry = registry(false);
        let result = run_script(&registry, &MockExecutor::immediate(), request(&[("hostname", "web-1"), ("dry_run", "yes")])).await;
        assert!(result.is_ok(), "{result:?}");
    }

    #[tokio::test]
    async fn headless_run_rejects_invalid_input_and_missing_context() {
        let registry = registry(false);
        let err = run_script(&registry, &MockExecutor::immediate(), request(&[])).await.expect_err("hostname missing");
        assert!(err.to_string().contains("cannot submit"));

        let err = run_script(&registry, &MockExecutor::immediate(), request(&[("port", "1")]))
            .await
            .expect_err("unknown parameter");
        assert!(err.to_string().contains("no parameter 'port'"));

        let registry = registry_with_context();
        let err = run_script(&registry, &MockExecutor::immediate(), request(&[("hostname", "web-1")]))
            .await
            .expect_err("context missing");
        assert!(format!("{err:#}").contains("Please select a team and project"));
    }

    #[tokio::test]
    async fn headless_run_fails_when_execution_fails() {
        let registry = registry(false);
        let executor = MockExecutor::immediate().failing(true);
        let err = run_script(&registry, &executor, request(&[("hostname", "web-1")])).await.expect_err("simulated failure");
        assert_eq!(err.to_string(), scriptdeck_engine::SIMULATED_FAILURE);
    }

    fn registry_with_context() -> ScriptRegistry {
        registry(true)
    }
}
