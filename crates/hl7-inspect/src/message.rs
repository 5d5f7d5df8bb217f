//! Message construction for inspection.

use hl7_model::schema::load_schema;
use hl7_model::hl7_types::MessageSchema;
use hl7_model::{factory, v24, FactoryRegistry, Group, Structure};
use tracing::{debug, info};

use crate::config::InspectConfig;
use crate::InspectError;

/// Builds the empty message selected by `config`.
///
/// With a schema path the message and its groups come from the schema file,
/// on top of the built-in v2.4 registry. Otherwise `config.message` names a
/// built-in structure.
pub fn build_message(config: &InspectConfig) -> Result<Box<dyn Structure>, InspectError> {
    let mut registry = v24::registry();

    let name = match &config.schema_path {
        Some(path) => {
            let schema = load_schema(path)?;
            info!(
                "Loaded schema {} (version {}) from {}",
                schema.name,
                schema.version,
                path.display()
            );
            register_schema_segments(&mut registry, &schema);
            registry.register_schema(&schema);
            schema.name
        }
        None => config.message.clone(),
    };

    let shared = registry.into_shared();
    Ok(factory::create(&shared, &name)?)
}

/// Registers plain segments for every leaf kind the registry does not know.
fn register_schema_segments(registry: &mut FactoryRegistry, schema: &MessageSchema) {
    let leaves = schema
        .entries
        .iter()
        .chain(schema.groups().into_iter().flat_map(|g| g.children.iter()))
        .filter(|entry| !entry.is_group())
        .map(|entry| entry.kind.as_str());

    for kind in leaves {
        if !registry.contains(kind) {
            debug!(kind, "registering schema segment");
            registry.register_segment(kind);
        }
    }
}

/// Creates every required structure that has no repetition yet.
///
/// Descends into required groups, including ones that already existed.
/// Returns the number of structures created. A group that turns up inside
/// itself stops the walk with [`InspectError::RecursiveStructure`].
pub fn populate_required(group: &mut Group) -> Result<usize, InspectError> {
    let mut path = vec![group.name().to_string()];
    populate(group, &mut path)
}

fn populate(group: &mut Group, path: &mut Vec<String>) -> Result<usize, InspectError> {
    let required: Vec<String> = group
        .definitions()
        .filter(|d| d.required)
        .map(|d| d.name.clone())
        .collect();

    let mut created = 0;
    for name in required {
        if group.count(&name)? == 0 {
            created += 1;
        }
        if let Some(child) = group.get(&name)?.as_group_mut() {
            let recursive = path.iter().any(|ancestor| ancestor == child.name());
            path.push(child.name().to_string());
            if recursive {
                return Err(InspectError::RecursiveStructure {
                    path: path.join(" > "),
                });
            }
            created += populate(child, path)?;
            path.pop();
        }
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl7_model::hl7_types::SchemaValidationError;
    use hl7_model::v24::PmuB01;
    use hl7_model::{SchemaError, SlotSpec};
    use std::io::Write;
    use std::path::PathBuf;

    fn temp_schema(file: &str, json: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), file));
        let mut out = std::fs::File::create(&path).unwrap();
        out.write_all(json.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_build_builtin_message() {
        let config = InspectConfig::default();
        let message = build_message(&config).unwrap();
        assert_eq!(message.name(), "PMU_B01");
        assert!(message.as_any().is::<PmuB01>());
    }

    #[test]
    fn test_build_unknown_message() {
        let config = InspectConfig {
            message: "ZZZ_Z01".to_string(),
            ..InspectConfig::default()
        };
        assert!(matches!(
            build_message(&config),
            Err(InspectError::Factory(_))
        ));
    }

    #[test]
    fn test_populate_required_builtin() {
        let mut message = build_message(&InspectConfig::default()).unwrap();
        let group = message.as_group_mut().unwrap();

        assert_eq!(populate_required(group).unwrap(), 3);
        assert!(group.missing_required().is_empty());
        assert_eq!(group.count("PRA").unwrap(), 0);

        assert_eq!(populate_required(group).unwrap(), 0);
    }

    #[test]
    fn test_build_from_schema_file() {
        let path = temp_schema(
            "hl7-inspect-zrx.json",
            r#"{
                "name": "ZRX_Z01",
                "entries": [
                    { "kind": "MSH", "required": true },
                    {
                        "kind": "ZRX_Z01_ORDER",
                        "required": true,
                        "children": [
                            { "kind": "ZRX", "required": true },
                            { "kind": "NTE", "repeating": true }
                        ]
                    }
                ]
            }"#,
        );
        let config = InspectConfig {
            schema_path: Some(path.clone()),
            ..InspectConfig::default()
        };

        let mut message = build_message(&config).unwrap();
        let group = message.as_group_mut().unwrap();
        assert_eq!(group.name(), "ZRX_Z01");

        assert_eq!(populate_required(group).unwrap(), 3);
        let order = group.get_as::<Group>("ZRX_Z01_ORDER").unwrap();
        assert_eq!(order.count("ZRX").unwrap(), 1);
        assert_eq!(order.count("NTE").unwrap(), 0);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_schema_nesting_the_message_is_rejected() {
        let path = temp_schema(
            "hl7-inspect-zzx.json",
            r#"{
                "name": "ZZX",
                "entries": [
                    {
                        "kind": "ZZG",
                        "required": true,
                        "children": [{ "kind": "ZZX", "required": true }]
                    }
                ]
            }"#,
        );
        let config = InspectConfig {
            schema_path: Some(path.clone()),
            ..InspectConfig::default()
        };

        let error = build_message(&config).unwrap_err();
        std::fs::remove_file(path).ok();
        assert!(matches!(
            error,
            InspectError::Schema(SchemaError::Invalid(SchemaValidationError::RecursiveKind { .. }))
        ));
    }

    #[test]
    fn test_populate_required_stops_on_cycle() {
        let mut registry = FactoryRegistry::new();
        registry
            .register_group("ZZX", vec![SlotSpec::new("ZZG", true, false)])
            .register_group("ZZG", vec![SlotSpec::new("ZZX", true, false)]);
        let shared = registry.into_shared();

        let mut message = factory::create(&shared, "ZZX").unwrap();
        let error = populate_required(message.as_group_mut().unwrap()).unwrap_err();
        match error {
            InspectError::RecursiveStructure { path } => assert_eq!(path, "ZZX > ZZG > ZZX"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_schema_file() {
        let config = InspectConfig {
            schema_path: Some(PathBuf::from("/nonexistent/hl7-schema.json")),
            ..InspectConfig::default()
        };
        assert!(matches!(
            build_message(&config),
            Err(InspectError::Schema(_))
        ));
    }
}
