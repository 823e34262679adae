//! Canonical key-space layout, conserved from the legacy tree:
//! `usuarios/{owner}/dispositivos/{device}/dados/{tempoReal,alertas}`.

/// Storage paths for one device. Identifiers are used verbatim as path
/// segments; callers are responsible for not passing path-unsafe
/// characters in device ids.
#[derive(Debug, Clone, PartialEq)]
pub struct DevicePaths {
    pub metadata: String,
    pub telemetry: String,
    pub alerts: String,
}

impl DevicePaths {
    pub fn resolve(owner_id: &str, device_id: &str) -> Self {
        let metadata = format!("{}/{}", devices_path(owner_id), device_id);
        Self {
            telemetry: format!("{metadata}/dados/tempoReal"),
            alerts: format!("{metadata}/dados/alertas"),
            metadata,
        }
    }
}

/// `usuarios/{owner}` — the account profile node.
pub fn user_path(owner_id: &str) -> String {
    format!("usuarios/{owner_id}")
}

/// `usuarios/{owner}/dispositivos` — the device collection node.
pub fn devices_path(owner_id: &str) -> String {
    format!("usuarios/{owner_id}/dispositivos")
}
