use serde::Serialize;

/// Version information printed when the plugin starts.
#[derive(Debug, Serialize)]
pub struct Version {
    pub canonical: String,
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub metadata: Metadata,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub architecture: &'static str,
    pub os: &'static str,
    pub package: &'static str,
}

impl Version {
    pub fn current() -> Self {
        Version {
            canonical: format!("v{}", env!("CARGO_PKG_VERSION")),
            major: env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or_default(),
            minor: env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or_default(),
            patch: env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or_default(),
            metadata: Metadata {
                architecture: std::env::consts::ARCH,
                os: std::env::consts::OS,
                package: env!("CARGO_PKG_NAME"),
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
