pub mod catalog;
pub mod common;
pub mod component;
pub mod hint_bar;
pub mod output;
pub mod wizard;

pub use catalog::CatalogComponent;
pub use hint_bar::HintBarComponent;
pub use output::OutputComponent;
pub use wizard::WizardComponent;
