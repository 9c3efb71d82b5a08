use tracing_subscriber::EnvFilter;

/// Filtro cuando no hay `RUST_LOG`: lo nuestro en info, rusoto solo avisos.
pub const DEFAULT_FILTER: &str = "ngrams_finder=info,ngrams_common=info,rusoto_core=warn";

pub fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Los logs van a stderr; stdout queda para el diálogo con el usuario.
pub fn init() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}
