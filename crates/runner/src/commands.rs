//! Operator commands, rendered as plain text

use broker_core::TransactionRequest;

use crate::config::ConfigError;
use crate::metrics::RegistryMetrics;
use crate::service::BrokerService;

pub const NO_PROVIDERS: &str = "There are no registered Broker providers.";

/// Registered providers and their broker ids
pub fn list(service: &BrokerService) -> String {
    let available = service.available();
    if available.is_empty() {
        return NO_PROVIDERS.to_string();
    }

    let mut out = String::from("Registered Broker providers:");
    for (provider, ids) in &available {
        out.push_str(&format!("\n{}:", provider));
        for id in ids {
            out.push_str(&format!("\n - {}", id));
        }
    }
    out
}

pub fn reload(service: &BrokerService) -> Result<String, ConfigError> {
    let registered = service.reload()?;
    Ok(format!(
        "Brokers reloaded with the current configuration ({} defaults registered)",
        registered
    ))
}

/// Read-only price of a request; nothing is committed
pub fn quote(service: &BrokerService, request: &TransactionRequest) -> String {
    let subject = format!(
        "{} {} x{} [{}]",
        request.operation(),
        request.subject(),
        request.quantity(),
        request.subject_type()
    );
    match service.registry().quote(request) {
        Some(quote) => format!(
            "{}: {} each, {} total via {}/{} ({})",
            subject,
            quote.unit_price,
            quote.value,
            quote.broker.provider,
            quote.broker.id,
            quote.display_name.as_deref().unwrap_or(request.subject())
        ),
        None => format!("{}: no broker can price this", subject),
    }
}

pub fn metrics(service: &BrokerService) -> serde_json::Result<String> {
    RegistryMetrics::collect(service.registry()).to_json()
}
