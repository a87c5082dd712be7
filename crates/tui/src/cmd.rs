//! # Command Execution Layer
//!
//! The boundary where effects reported by the UI turn into work:
//! execution requests are spawned on tokio against the execution
//! collaborator, catalog reloads re-fetch the source.
//!
//! State updates stay pure; everything effectful is here or in the runtime.

use std::sync::Arc;

use scriptdeck_engine::ScriptExecutor;
use scriptdeck_types::{Effect, ExecutionRequest, Msg};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::app::App;

/// Side effects the runtime performs outside of state updates.
#[derive(Debug, PartialEq)]
pub enum Cmd {
    /// Run a request on a background task.
    Execute(ExecutionRequest),
    /// Re-fetch and reassemble the catalog.
    Reload,
}

/// Result of running a batch of commands.
#[derive(Debug, Default)]
pub struct CommandBatch {
    /// Messages to feed back into the app right away.
    pub immediate: Vec<Msg>,
    /// Background tasks that will each produce one message.
    pub pending: Vec<JoinHandle<Msg>>,
}

/// Converts effects into commands. `Quit` is handled by the runtime.
pub fn from_effects(effects: Vec<Effect>) -> Vec<Cmd> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::ExecuteRequested(request) => Some(Cmd::Execute(request)),
            Effect::ReloadCatalog => Some(Cmd::Reload),
            Effect::Quit => None,
        })
        .collect()
}

/// Spawns the request on tokio. The task always yields a message: the
/// collaborator's response, or the reason it produced none.
pub fn spawn_execution(executor: Arc<dyn ScriptExecutor>, request: ExecutionRequest) -> JoinHandle<Msg> {
    tokio::spawn(async move {
        match executor.execute(&request).await {
            Ok(response) => Msg::ExecCompleted(response),
            Err(err) => {
                warn!(endpoint = %request.endpoint, error = %err, "execution failed without a response");
                Msg::ExecAborted(err.to_string())
            }
        }
    })
}

pub async fn run_cmds(app: &mut App, executor: &Arc<dyn ScriptExecutor>, commands: Vec<Cmd>) -> CommandBatch {
    let mut batch = CommandBatch::default();
    for command in commands {
        match command {
            Cmd::Execute(request) => {
                debug!(endpoint = %request.endpoint, "spawning execution");
                batch.pending.push(spawn_execution(Arc::clone(executor), request));
            }
            Cmd::Reload => {
                let mut registry = app.registry.clone();
                registry.reload().await;
                app.replace_registry(registry);
                batch.immediate.push(Msg::CatalogReloaded);
            }
        }
    }
    batch
}

pub async fn run_from_effects(app: &mut App, executor: &Arc<dyn ScriptExecutor>, effects: Vec<Effect>) -> CommandBatch {
    run_cmds(app, executor, from_effects(effects)).await
}
