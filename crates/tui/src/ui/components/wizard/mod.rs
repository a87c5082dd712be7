mod state;
mod wizard_component;

pub use state::{ActionFormState, FormRow};
pub use wizard_component::WizardComponent;
