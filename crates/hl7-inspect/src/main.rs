//! HL7 message structure inspector.

use hl7_inspect::{build_message, outline, populate_required, InspectConfig, InspectError};
use hl7_model::Structure;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = InspectConfig::from_env();
    match &config.schema_path {
        Some(path) => tracing::info!("Building message from schema {}", path.display()),
        None => tracing::info!("Building built-in message {}", config.message),
    }

    let mut message = build_message(&config)?;
    let name = message.name().to_string();
    let group = message
        .as_group_mut()
        .ok_or(InspectError::NotAGroup { name })?;

    if config.populate_required {
        let created = populate_required(group)?;
        tracing::info!("Created {} required structures", created);
    }

    let missing = group.missing_required();
    if !missing.is_empty() {
        tracing::warn!("Missing required structures: {}", missing.join(", "));
    }

    tracing::info!(
        "{} has {} slots and {} repetitions",
        group.name(),
        group.names().len(),
        group.repetition_count()
    );

    println!("{}", serde_json::to_string_pretty(&outline(group))?);

    Ok(())
}
