//! Selection of the field descriptors that apply to one action choice.

use scriptdeck_types::{OptionDescriptor, Parameter};

use crate::field_type::map_field_type;

/// Builds the ordered parameter list for `choice`.
///
/// Descriptors are visited in source order; the action selector is skipped
/// and a field is kept only when its applicability list names `choice`. The
/// result keeps source order because it determines form field order.
pub fn extract_parameters(options: &[OptionDescriptor], choice: &str) -> Vec<Parameter> {
    options
        .iter()
        .filter_map(|option| match option {
            OptionDescriptor::Field(field) if field.applies_to(choice) => {
                Some(Parameter::new(field.name.clone(), map_field_type(&field.raw_type), field.is_required()))
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptdeck_types::{ActionSelector, FieldDescriptor, ParameterKind};

    fn field(name: &str, raw_type: &str, required: Option<&str>, applies_to: &[&str]) -> OptionDescriptor {
        OptionDescriptor::Field(FieldDescriptor {
            name: name.into(),
            raw_type: raw_type.into(),
            required: required.map(String::from),
            applies_to: applies_to.iter().map(|choice| choice.to_string()).collect(),
        })
    }

    fn options() -> Vec<OptionDescriptor> {
        vec![
            field("path", "str", Some("yes"), &["analyze", "cleanup"]),
            OptionDescriptor::ActionSelector(ActionSelector {
                raw_type: "select".into(),
                required: Some("yes".into()),
                choices: vec!["analyze".into(), "cleanup".into()],
            }),
            field("older_than", "num", Some("no"), &["cleanup"]),
            field("hostname", "str", Some("yes"), &["cleanup", "analyze"]),
            field("dry_run", "bool", None, &["cleanup"]),
        ]
    }

    #[test]
    fn keeps_only_applicable_fields_in_source_order() {
        let names: Vec<String> = extract_parameters(&options(), "analyze").into_iter().map(|p| p.id).collect();
        assert_eq!(names, ["path", "hostname"]);

        let names: Vec<String> = extract_parameters(&options(), "cleanup").into_iter().map(|p| p.id).collect();
        assert_eq!(names, ["path", "older_than", "hostname", "dry_run"]);
    }

    #[test]
    fn required_only_for_literal_yes() {
        let parameters = extract_parameters(&options(), "cleanup");
        let required: Vec<bool> = parameters.iter().map(|p| p.required).collect();
        assert_eq!(required, [true, false, true, false]);
    }

    #[test]
    fn label_is_field_key_and_kind_is_mapped() {
        let parameters = extract_parameters(&options(), "cleanup");
        let older_than = &parameters[1];
        assert_eq!(older_than.label, "older_than");
        assert_eq!(older_than.name, "older_than");
        assert_eq!(older_than.kind, ParameterKind::Number);
        assert!(older_than.options.is_empty());
        assert!(older_than.validation.is_none());
    }

    #[test]
    fn unknown_choice_yields_no_parameters() {
        assert!(extract_parameters(&options(), "restart").is_empty());
    }

    #[test]
    fn yes_is_case_sensitive() {
        let options = vec![field("force", "bool", Some("YES"), &["run"])];
        assert!(!extract_parameters(&options, "run")[0].required);
    }
}
