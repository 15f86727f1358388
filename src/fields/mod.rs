//! Field-configuration model for salesforce forms.
//!
//! A form's `fieldConfigs` column holds an ordered array of field descriptors
//! describing the variable schema the front-end renders: data format, required
//! flag, static or remotely sourced choice options, conditional visibility, and
//! one-level-deep field groups.
//!
//! The wire format is the flat camelCase object the admin UI edits
//! (`{"name", "label", "dataFormat", "required", "options"?, "optionSource"?,
//! "dependentField"?, "dropdown"?, "multiple"?, "longText"?, "fields"?}`).
//! Internally each descriptor becomes a tagged [`FieldKind`] so choice options
//! and remote option sources only exist on the variants that need them.

use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::FieldConfigError;

/// Remote lookup used to populate a choice field's options at render time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSource {
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_field: Option<String>,
    pub label_field: String,
}

/// Data format of a single field, carrying only the data its format needs.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldFormat {
    Text,
    Number,
    Email,
    Phone,
    Date,
    Currency,
    /// Static ordered options
    Choice { options: Vec<String> },
    /// Options fetched from a remote endpoint
    RemoteChoice { option_source: OptionSource },
}

impl FieldFormat {
    /// The `dataFormat` value this format serializes to.
    pub fn data_format(&self) -> &'static str {
        match self {
            FieldFormat::Text => "text",
            FieldFormat::Number => "number",
            FieldFormat::Email => "email",
            FieldFormat::Phone => "phone",
            FieldFormat::Date => "date",
            FieldFormat::Currency => "currency",
            FieldFormat::Choice { .. } | FieldFormat::RemoteChoice { .. } => "choice",
        }
    }
}

/// What a descriptor describes: a single field, or a labelled group of fields.
/// Groups render one level deep only.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    Scalar(FieldFormat),
    Group(Vec<FieldConfig>),
}

/// One entry in a form's ordered `fieldConfigs` sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    /// Source field key in the submitted payload
    pub name: String,
    pub label: String,
    pub required: bool,
    /// Name of a field whose value gates this field's visibility
    pub dependent_field: Option<String>,
    pub dropdown: bool,
    pub multiple: bool,
    pub long_text: bool,
    pub kind: FieldKind,
}

impl FieldConfig {
    /// Shorthand for a scalar descriptor with no display hints.
    pub fn scalar(name: &str, label: &str, format: FieldFormat, required: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            required,
            dependent_field: None,
            dropdown: false,
            multiple: false,
            long_text: false,
            kind: FieldKind::Scalar(format),
        }
    }
}

/// Flat wire representation the admin UI reads and writes.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFieldConfig {
    name: String,
    #[serde(default)]
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_format: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    option_source: Option<OptionSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dependent_field: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    dropdown: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    multiple: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    long_text: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<RawFieldConfig>,
}

impl TryFrom<RawFieldConfig> for FieldConfig {
    type Error = FieldConfigError;

    fn try_from(raw: RawFieldConfig) -> Result<Self, Self::Error> {
        if raw.name.trim().is_empty() {
            return Err(FieldConfigError::EmptyName);
        }

        let kind = if !raw.fields.is_empty() {
            let mut members = Vec::with_capacity(raw.fields.len());
            for member in raw.fields {
                let member = FieldConfig::try_from(member)?;
                if matches!(member.kind, FieldKind::Group(_)) {
                    return Err(FieldConfigError::NestedGroup(raw.name));
                }
                members.push(member);
            }
            FieldKind::Group(members)
        } else {
            let format = match raw.data_format.as_deref() {
                None => return Err(FieldConfigError::MissingDataFormat(raw.name)),
                Some("choice") => match (raw.options, raw.option_source) {
                    (Some(_), Some(_)) => {
                        return Err(FieldConfigError::AmbiguousChoiceSource(raw.name))
                    }
                    (None, Some(option_source)) => FieldFormat::RemoteChoice { option_source },
                    (options, None) => FieldFormat::Choice {
                        options: options.unwrap_or_default(),
                    },
                },
                Some(other) => {
                    if raw.options.is_some() {
                        return Err(FieldConfigError::UnexpectedOptions(raw.name));
                    }
                    match other {
                        "text" => FieldFormat::Text,
                        "number" => FieldFormat::Number,
                        "email" => FieldFormat::Email,
                        "phone" => FieldFormat::Phone,
                        "date" => FieldFormat::Date,
                        "currency" => FieldFormat::Currency,
                        _ => {
                            return Err(FieldConfigError::UnknownDataFormat {
                                name: raw.name,
                                format: other.to_string(),
                            })
                        }
                    }
                }
            };
            FieldKind::Scalar(format)
        };

        Ok(FieldConfig {
            name: raw.name,
            label: raw.label,
            required: raw.required,
            dependent_field: raw.dependent_field,
            dropdown: raw.dropdown,
            multiple: raw.multiple,
            long_text: raw.long_text,
            kind,
        })
    }
}

impl From<&FieldConfig> for RawFieldConfig {
    fn from(config: &FieldConfig) -> Self {
        let (data_format, options, option_source, fields) = match &config.kind {
            FieldKind::Scalar(format) => {
                let (options, option_source) = match format {
                    FieldFormat::Choice { options } => (Some(options.clone()), None),
                    FieldFormat::RemoteChoice { option_source } => {
                        (None, Some(option_source.clone()))
                    }
                    _ => (None, None),
                };
                (
                    Some(format.data_format().to_string()),
                    options,
                    option_source,
                    Vec::new(),
                )
            }
            FieldKind::Group(members) => (
                None,
                None,
                None,
                members.iter().map(RawFieldConfig::from).collect(),
            ),
        };

        RawFieldConfig {
            name: config.name.clone(),
            label: config.label.clone(),
            data_format,
            required: config.required,
            options,
            option_source,
            dependent_field: config.dependent_field.clone(),
            dropdown: config.dropdown,
            multiple: config.multiple,
            long_text: config.long_text,
            fields,
        }
    }
}

impl Serialize for FieldConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawFieldConfig::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawFieldConfig::deserialize(deserializer)?;
        FieldConfig::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Parse a stored `fieldConfigs` JSON value into typed descriptors,
/// running full validation.
pub fn parse_configs(value: &serde_json::Value) -> Result<Vec<FieldConfig>, FieldConfigError> {
    if !value.is_array() {
        return Err(FieldConfigError::NotAnArray);
    }
    let configs: Vec<FieldConfig> = serde_json::from_value(value.clone())?;
    validate_configs(&configs)?;
    Ok(configs)
}

/// Serialize typed descriptors back to the stored JSON shape.
pub fn configs_to_value(configs: &[FieldConfig]) -> serde_json::Value {
    serde_json::to_value(configs).unwrap_or_else(|_| serde_json::Value::Array(Vec::new()))
}

/// Validate cross-field invariants over a whole descriptor array:
/// non-empty names, name uniqueness across the form (group members included),
/// non-empty groups, and one-level nesting.
pub fn validate_configs(configs: &[FieldConfig]) -> Result<(), FieldConfigError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for config in configs {
        check_config(config, &mut seen, true)?;
    }
    Ok(())
}

fn check_config<'a>(
    config: &'a FieldConfig,
    seen: &mut HashSet<&'a str>,
    allow_group: bool,
) -> Result<(), FieldConfigError> {
    if config.name.trim().is_empty() {
        return Err(FieldConfigError::EmptyName);
    }
    if !seen.insert(config.name.as_str()) {
        return Err(FieldConfigError::DuplicateName(config.name.clone()));
    }
    if let FieldKind::Group(members) = &config.kind {
        if !allow_group {
            return Err(FieldConfigError::NestedGroup(config.name.clone()));
        }
        if members.is_empty() {
            return Err(FieldConfigError::EmptyGroup(config.name.clone()));
        }
        for member in members {
            check_config(member, seen, false)?;
        }
    }
    Ok(())
}

/// Append a descriptor, preserving order. Rejects names already present
/// anywhere in the form, group members included.
pub fn add_field(
    configs: &mut Vec<FieldConfig>,
    field: FieldConfig,
) -> Result<(), FieldConfigError> {
    let existing: HashSet<&str> = collect_names(configs).into_iter().collect();
    for name in collect_names(std::slice::from_ref(&field)) {
        if existing.contains(name) {
            return Err(FieldConfigError::DuplicateName(name.to_string()));
        }
    }
    configs.push(field);
    validate_configs(configs)
}

/// Remove every descriptor with the given name, including members of
/// one-level groups. Groups whose members are all removed are dropped too.
/// Returns the number of descriptors removed.
pub fn remove_field(configs: &mut Vec<FieldConfig>, name: &str) -> usize {
    let mut removed = 0;

    configs.retain(|config| {
        if config.name == name {
            removed += 1;
            false
        } else {
            true
        }
    });

    for config in configs.iter_mut() {
        if let FieldKind::Group(members) = &mut config.kind {
            members.retain(|member| {
                if member.name == name {
                    removed += 1;
                    false
                } else {
                    true
                }
            });
        }
    }
    configs.retain(|config| !matches!(&config.kind, FieldKind::Group(members) if members.is_empty()));

    removed
}

fn collect_names(configs: &[FieldConfig]) -> Vec<&str> {
    let mut names = Vec::new();
    for config in configs {
        names.push(config.name.as_str());
        if let FieldKind::Group(members) = &config.kind {
            for member in members {
                names.push(member.name.as_str());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_choice_field_round_trips() {
        let value = json!([{
            "name": "industry",
            "label": "Industry",
            "dataFormat": "choice",
            "required": true,
            "options": ["A", "B"]
        }]);

        let configs = parse_configs(&value).unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(
            configs[0].kind,
            FieldKind::Scalar(FieldFormat::Choice {
                options: vec!["A".to_string(), "B".to_string()]
            })
        );

        assert_eq!(configs_to_value(&configs), value);
    }

    #[test]
    fn test_remote_choice_parses_option_source() {
        let value = json!([{
            "name": "country",
            "label": "Country",
            "dataFormat": "choice",
            "optionSource": {
                "url": "https://api.example.com/countries",
                "headers": {"x-api-key": "k"},
                "matchField": "iso",
                "labelField": "name"
            }
        }]);

        let configs = parse_configs(&value).unwrap();
        match &configs[0].kind {
            FieldKind::Scalar(FieldFormat::RemoteChoice { option_source }) => {
                assert_eq!(option_source.url, "https://api.example.com/countries");
                assert_eq!(option_source.label_field, "name");
                assert_eq!(option_source.match_field.as_deref(), Some("iso"));
            }
            other => panic!("expected remote choice, got {:?}", other),
        }
    }

    #[test]
    fn test_choice_without_options_defaults_empty() {
        let value = json!([{"name": "tier", "label": "Tier", "dataFormat": "choice"}]);
        let configs = parse_configs(&value).unwrap();
        assert_eq!(
            configs[0].kind,
            FieldKind::Scalar(FieldFormat::Choice { options: vec![] })
        );
    }

    #[test]
    fn test_options_and_option_source_rejected() {
        let value = json!([{
            "name": "x",
            "dataFormat": "choice",
            "options": ["A"],
            "optionSource": {"url": "u", "labelField": "l"}
        }]);
        assert!(parse_configs(&value).is_err());
    }

    #[test]
    fn test_options_on_text_field_rejected() {
        let value = json!([{"name": "x", "dataFormat": "text", "options": ["A"]}]);
        assert!(parse_configs(&value).is_err());
    }

    #[test]
    fn test_unknown_data_format_rejected() {
        let value = json!([{"name": "x", "dataFormat": "blob"}]);
        let err = parse_configs(&value).unwrap_err();
        assert!(err.to_string().contains("blob"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let value = json!([
            {"name": "email", "dataFormat": "email"},
            {"name": "email", "dataFormat": "text"}
        ]);
        assert!(matches!(
            parse_configs(&value),
            Err(FieldConfigError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_group_parses_one_level() {
        let value = json!([{
            "name": "address",
            "label": "Address",
            "fields": [
                {"name": "street", "dataFormat": "text"},
                {"name": "zip", "dataFormat": "number"}
            ]
        }]);
        let configs = parse_configs(&value).unwrap();
        match &configs[0].kind {
            FieldKind::Group(members) => assert_eq!(members.len(), 2),
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_group_rejected() {
        let value = json!([{
            "name": "outer",
            "fields": [{"name": "inner", "fields": [{"name": "leaf", "dataFormat": "text"}]}]
        }]);
        assert!(parse_configs(&value).is_err());
    }

    #[test]
    fn test_add_field_rejects_duplicate_name() {
        let mut configs = vec![FieldConfig::scalar("email", "Email", FieldFormat::Email, true)];
        let dup = FieldConfig::scalar("email", "Email again", FieldFormat::Text, false);
        assert!(matches!(
            add_field(&mut configs, dup),
            Err(FieldConfigError::DuplicateName(_))
        ));
        assert_eq!(configs.len(), 1);
    }

    #[test]
    fn test_add_field_appends_in_order() {
        let mut configs = vec![FieldConfig::scalar("first", "First", FieldFormat::Text, true)];
        add_field(
            &mut configs,
            FieldConfig::scalar("second", "Second", FieldFormat::Number, false),
        )
        .unwrap();
        assert_eq!(configs[1].name, "second");
    }

    #[test]
    fn test_remove_field_removes_all_matches() {
        let mut configs = vec![
            FieldConfig::scalar("a", "A", FieldFormat::Text, false),
            FieldConfig {
                kind: FieldKind::Group(vec![
                    FieldConfig::scalar("a", "A inside", FieldFormat::Text, false),
                    FieldConfig::scalar("b", "B", FieldFormat::Text, false),
                ]),
                ..FieldConfig::scalar("group", "Group", FieldFormat::Text, false)
            },
        ];

        let removed = remove_field(&mut configs, "a");
        assert_eq!(removed, 2);
        assert_eq!(configs.len(), 1);
        match &configs[0].kind {
            FieldKind::Group(members) => {
                assert_eq!(members.len(), 1);
                assert_eq!(members[0].name, "b");
            }
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_field_drops_emptied_group() {
        let mut configs = vec![FieldConfig {
            kind: FieldKind::Group(vec![FieldConfig::scalar(
                "only",
                "Only",
                FieldFormat::Text,
                false,
            )]),
            ..FieldConfig::scalar("group", "Group", FieldFormat::Text, false)
        }];

        assert_eq!(remove_field(&mut configs, "only"), 1);
        assert!(configs.is_empty());
    }

    #[test]
    fn test_non_array_rejected() {
        assert!(matches!(
            parse_configs(&json!({"name": "x"})),
            Err(FieldConfigError::NotAnArray)
        ));
    }

    #[test]
    fn test_display_hints_round_trip() {
        let value = json!([{
            "name": "notes",
            "label": "Notes",
            "dataFormat": "text",
            "required": false,
            "longText": true,
            "dependentField": "wants_contact"
        }]);
        let configs = parse_configs(&value).unwrap();
        assert!(configs[0].long_text);
        assert_eq!(configs[0].dependent_field.as_deref(), Some("wants_contact"));
        assert_eq!(configs_to_value(&configs), value);
    }
}
