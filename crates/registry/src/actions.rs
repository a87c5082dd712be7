//! Joins an action choice with its command record and parameters.

use scriptdeck_types::{CommandRecord, HttpMethod, OptionDescriptor, ScriptAction};
use tracing::warn;

use crate::parameters::extract_parameters;

/// Invocation target used when no command record matches a choice.
pub const DEFAULT_ENDPOINT: &str = "/api/default";

/// Builds the [`ScriptAction`] for one action choice.
///
/// The endpoint is the `command` of the first record named `choice`. When
/// none matches, the action falls back to [`DEFAULT_ENDPOINT`] and a warning
/// is logged; the item is never rejected.
pub fn build_action(choice: &str, options: &[OptionDescriptor], commands: &[CommandRecord]) -> ScriptAction {
    let command = commands.iter().find(|command| command.name == choice);
    let endpoint = match command {
        Some(command) => command.command.clone(),
        None => {
            warn!(action = choice, fallback = DEFAULT_ENDPOINT, "no command record matches action choice");
            DEFAULT_ENDPOINT.to_string()
        }
    };

    ScriptAction {
        id: choice.to_string(),
        name: choice.to_string(),
        endpoint,
        method: HttpMethod::Post,
        description: format!("Execute {choice} command"),
        parameters: extract_parameters(options, choice),
        action_type: command.and_then(CommandRecord::action_kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptdeck_types::{CommandActionType, FieldDescriptor};

    fn commands() -> Vec<CommandRecord> {
        vec![
            CommandRecord {
                name: "status".into(),
                command: "/api/system/service/status".into(),
                action_type: Some("r".into()),
            },
            CommandRecord {
                name: "status".into(),
                command: "/api/shadowed".into(),
                action_type: Some("d".into()),
            },
        ]
    }

    #[test]
    fn resolves_first_matching_command() {
        let action = build_action("status", &[], &commands());
        assert_eq!(action.endpoint, "/api/system/service/status");
        assert_eq!(action.method, HttpMethod::Post);
        assert_eq!(action.description, "Execute status command");
        assert_eq!(action.action_type, Some(CommandActionType::Read));
    }

    #[test]
    fn unmatched_choice_falls_back_to_default_endpoint() {
        let action = build_action("restart", &[], &commands());
        assert_eq!(action.id, "restart");
        assert_eq!(action.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(action.action_type, None);
    }

    #[test]
    fn attaches_applicable_parameters() {
        let options = vec![OptionDescriptor::Field(FieldDescriptor {
            name: "service_name".into(),
            raw_type: "str".into(),
            required: Some("yes".into()),
            applies_to: vec!["status".into()],
        })];
        let action = build_action("status", &options, &commands());
        assert_eq!(action.parameters.len(), 1);
        assert!(action.parameters[0].required);
    }
}
