//! # ScriptDeck Engine
//!
//! Everything between an assembled catalog and the execution collaborator:
//! validating form input, driving the three-step wizard, and running the
//! resulting request.
//!
//! ## Usage
//!
//! ```rust
//! use scriptdeck_engine::{WizardState, WizardStep};
//! use scriptdeck_registry::{RegistryConfig, ScriptRegistry};
//! use serde_json::json;
//!
//! let items = serde_json::from_str(r#"[{
//!     "meta": { "name": "disk-cleanup", "path": "system/maintenance" },
//!     "options": [
//!         { "action": { "type": "select", "required": "yes", "choices": ["cleanup"] } },
//!         { "hostname": { "type": "str", "required": "yes", "define_action_arg": ["cleanup"] } }
//!     ],
//!     "commands": [{ "name": "cleanup", "command": "/api/system/disk/cleanup", "actionT": "d" }]
//! }]"#)?;
//! let registry = ScriptRegistry::from_items(RegistryConfig::default(), items);
//!
//! let mut wizard = WizardState::new(false);
//! wizard.select_script(registry.find_script("disk-cleanup").cloned().expect("script"));
//! wizard.next()?;
//! wizard.select_action("cleanup")?;
//! wizard.set_field("hostname", json!("web-1"))?;
//! wizard.submit()?;
//! assert_eq!(wizard.step(), WizardStep::Confirm);
//!
//! let request = wizard.begin_execution()?;
//! assert_eq!(request.endpoint, "/api/system/disk/cleanup");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`schema`**: per-action validation rules and the field error map
//! - **`form`**: form values, defaults, and raw text → JSON conversion
//! - **`wizard`**: the step state machine and its reset transitions
//! - **`executor`**: the collaborator trait and the mock implementation
//! - **`transcripts`**: canned tagged output for the demo endpoints

pub mod executor;
pub mod form;
pub mod schema;
pub mod transcripts;
pub mod wizard;

pub use executor::{ExecutionError, MockExecutor, SIMULATED_FAILURE, ScriptExecutor};
pub use form::{FormValues, default_values, parse_input, parse_number};
pub use schema::{Constraint, FieldRule, ValidationErrors, ValidationSchema, ValueType};
pub use wizard::{Notice, NoticeLevel, WizardError, WizardState, WizardStep};
