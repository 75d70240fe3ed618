//! Log output for the console and optional OTLP span export.
//!
//! Every invocation is one short command, so the exporter is only built when
//! `OTEL_EXPORTER_OTLP_ENDPOINT` is set and is flushed by [`shutdown_tracer`]
//! before the process exits.

use anyhow::{anyhow, Context, Result};
use base64ct::{Base64, Encoding};
use once_cell::sync::OnceCell;
use opentelemetry::{trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::{Compression, WithExportConfig, WithTonicConfig};
use opentelemetry_sdk::{
    trace::{SdkTracerProvider, Tracer},
    Resource,
};
use std::{env::var, io, time::Duration};
use tonic::{
    metadata::{Ascii, Binary, MetadataKey, MetadataMap, MetadataValue},
    transport::ClientTlsConfig,
};
use tracing::{debug, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};
use ulid::Ulid;

use crate::GIT_COMMIT_HASH;

const EXPORT_TIMEOUT: Duration = Duration::from_secs(3);

static TRACER_PROVIDER: OnceCell<SdkTracerProvider> = OnceCell::new();

/// Where and how to ship spans, read from the standard `OTEL_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OtlpSettings {
    endpoint: String,
    headers: Vec<(String, String)>,
    instance_id: String,
}

impl OtlpSettings {
    /// `None` unless `OTEL_EXPORTER_OTLP_ENDPOINT` is set and non-empty.
    fn from_env() -> Option<Self> {
        let endpoint = var("OTEL_EXPORTER_OTLP_ENDPOINT").ok()?;
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return None;
        }

        Some(Self {
            endpoint: normalize_endpoint(endpoint),
            headers: var("OTEL_EXPORTER_OTLP_HEADERS")
                .map(|raw| parse_otlp_headers(&raw))
                .unwrap_or_default(),
            instance_id: var("OTEL_SERVICE_INSTANCE_ID")
                .unwrap_or_else(|_| Ulid::new().to_string()),
        })
    }

    /// Host to verify when the collector is reached over TLS.
    fn tls_domain(&self) -> Option<&str> {
        self.endpoint
            .strip_prefix("https://")
            .and_then(|rest| rest.split(|c: char| c == '/' || c == ':').next())
            .filter(|host| !host.is_empty())
    }
}

/// `key=value` pairs separated by commas; malformed entries are skipped.
fn parse_otlp_headers(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

// Keys ending in "-bin" carry base64 values and become binary metadata.
fn headers_to_metadata(headers: &[(String, String)]) -> Result<MetadataMap> {
    let mut meta = MetadataMap::with_capacity(headers.len());

    for (key, value) in headers {
        if key.ends_with("-bin") {
            let bytes = Base64::decode_vec(value)
                .map_err(|e| anyhow!("failed to base64-decode value for key {key}: {e}"))?;
            let name = MetadataKey::<Binary>::from_bytes(key.as_bytes())
                .map_err(|e| anyhow!("invalid binary metadata key {key}: {e}"))?;
            meta.insert_bin(name, MetadataValue::from_bytes(&bytes));
        } else {
            let name = MetadataKey::<Ascii>::from_bytes(key.as_bytes())
                .map_err(|e| anyhow!("invalid ASCII metadata key {key}: {e}"))?;
            let value: MetadataValue<Ascii> = value
                .parse()
                .map_err(|e| anyhow!("invalid ASCII metadata value for key {key}: {e}"))?;
            meta.insert(name, value);
        }
    }

    Ok(meta)
}

// gRPC collectors default to TLS when no scheme is given.
fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint.trim_end_matches('/'))
    }
}

fn init_tracer(settings: &OtlpSettings) -> Result<Tracer> {
    let mut builder = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&settings.endpoint)
        .with_compression(Compression::Gzip)
        .with_timeout(EXPORT_TIMEOUT);

    if let Some(host) = settings.tls_domain() {
        builder = builder.with_tls_config(
            ClientTlsConfig::new()
                .domain_name(host.to_string())
                .with_native_roots(),
        );
    }

    if !settings.headers.is_empty() {
        builder = builder.with_metadata(headers_to_metadata(&settings.headers)?);
    }

    let exporter = builder
        .build()
        .with_context(|| format!("failed to build OTLP exporter for {}", settings.endpoint))?;

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            Resource::builder_empty()
                .with_attributes(vec![
                    KeyValue::new("service.name", env!("CARGO_PKG_NAME")),
                    KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                    KeyValue::new("service.instance.id", settings.instance_id.clone()),
                    KeyValue::new("vcs.revision", GIT_COMMIT_HASH),
                ])
                .build(),
        )
        .build();

    let tracer = provider.tracer(env!("CARGO_PKG_NAME"));
    let _ = TRACER_PROVIDER.set(provider);
    Ok(tracer)
}

/// Install the global subscriber: compact logs on stderr, filtered by
/// `verbosity_level` (or `RUST_LOG`), plus OTLP export when configured.
///
/// # Errors
///
/// Returns an error if the exporter or the subscriber cannot be installed
pub fn init(verbosity_level: Option<Level>) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact();

    let filter = EnvFilter::builder()
        .with_default_directive(verbosity_level.unwrap_or(Level::ERROR).into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("hyper_util=error".parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("opentelemetry_sdk=warn".parse()?);

    let otel_layer = OtlpSettings::from_env()
        .map(|settings| init_tracer(&settings))
        .transpose()?
        .map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    let subscriber = Registry::default()
        .with(fmt_layer)
        .with(otel_layer)
        .with(filter);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// Flush pending spans. Does nothing when export was never enabled.
pub fn shutdown_tracer() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        debug!("flushing spans");
        let _ = provider.shutdown();
    }
}
