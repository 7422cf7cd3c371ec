use facecheck_onnx::SourceConfig;

/// Which message bus the daemon registers on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusKind {
    System,
    Session,
}

impl BusKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "system" => Some(BusKind::System),
            "session" => Some(BusKind::Session),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BusKind::System => "system",
            BusKind::Session => "session",
        }
    }
}

/// Daemon configuration, loaded from environment variables.
pub struct Config {
    /// Model paths and inference settings (`FACECHECK_MODEL_DIR` and friends).
    pub source: SourceConfig,
    /// `FACECHECK_BUS`: `system` (default) or `session`.
    pub bus: BusKind,
}

impl Config {
    pub fn from_env() -> Self {
        let bus = match std::env::var("FACECHECK_BUS") {
            Ok(v) => BusKind::parse(&v).unwrap_or_else(|| {
                tracing::warn!(value = %v, "unknown FACECHECK_BUS, using system bus");
                BusKind::System
            }),
            Err(_) => BusKind::System,
        };

        Self {
            source: SourceConfig::from_env(),
            bus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_parse() {
        assert_eq!(BusKind::parse("system"), Some(BusKind::System));
        assert_eq!(BusKind::parse(" Session "), Some(BusKind::Session));
        assert_eq!(BusKind::parse("tcp"), None);
    }
}
