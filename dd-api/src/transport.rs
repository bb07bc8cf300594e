//! HTTP transport construction.
//!
//! Builds the `reqwest::Client` a `DeploymentClient` owns: connect and read
//! timeouts, the accepted TLS protocol range, and optional trust material
//! loaded from a keystore file. Hostname verification is always on.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use p12_keystore::{KeyStore, KeyStoreEntry};
use reqwest::tls::{Certificate, Identity, Version};
use reqwest::Client;
use tracing::debug;

use dd_core::config::{ServerConfig, TlsProtocol};
use dd_core::constants;
use dd_core::error::{ClientError, ClientResult};

/// Everything needed to build the HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportSettings {
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// Socket read timeout.
    pub socket_timeout: Duration,
    /// Trust store used instead of the built-in roots.
    pub keystore: Option<PathBuf>,
    /// With a password the keystore is read as PKCS#12, without one as PEM or DER.
    pub keystore_password: Option<String>,
    pub min_tls_version: TlsProtocol,
    pub max_tls_version: TlsProtocol,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(constants::DEFAULT_CONNECT_TIMEOUT_MS),
            socket_timeout: Duration::from_millis(constants::DEFAULT_SOCKET_TIMEOUT_MS),
            keystore: None,
            keystore_password: None,
            min_tls_version: TlsProtocol::Tls12,
            max_tls_version: TlsProtocol::Tls13,
        }
    }
}

impl TransportSettings {
    /// Derive transport settings from the `[server]` config section.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            socket_timeout: config.socket_timeout(),
            keystore: None,
            keystore_password: None,
            min_tls_version: config.min_tls_version,
            max_tls_version: config.max_tls_version,
        }
        .with_keystore(config.keystore(), config.keystore_password())
    }

    /// Set the keystore. An empty path counts as no keystore.
    pub fn with_keystore(mut self, path: Option<&Path>, password: Option<&str>) -> Self {
        self.keystore = path
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf);
        self.keystore_password = password.map(str::to_string);
        self
    }
}

/// Trust material read from a keystore file.
struct TrustMaterial {
    certificates: Vec<Certificate>,
    identity: Option<Identity>,
}

/// Build the HTTP transport. Fails with `ClientError::Configuration` on any
/// keystore or TLS backend problem.
pub(crate) fn build_transport(settings: &TransportSettings) -> ClientResult<Client> {
    if settings.min_tls_version > settings.max_tls_version {
        return Err(ClientError::Configuration(format!(
            "min TLS version {} is above max {}",
            settings.min_tls_version, settings.max_tls_version
        )));
    }

    let mut builder = Client::builder()
        .use_rustls_tls()
        .user_agent(constants::user_agent())
        .connect_timeout(settings.connect_timeout)
        .read_timeout(settings.socket_timeout)
        .min_tls_version(tls_version(settings.min_tls_version))
        .max_tls_version(tls_version(settings.max_tls_version));

    if let Some(ref path) = settings.keystore {
        let material = load_trust_material(path, settings.keystore_password.as_deref())?;
        debug!(
            "trusting {} certificate(s) from {}",
            material.certificates.len(),
            path.display()
        );
        builder = builder.tls_built_in_root_certs(false);
        for cert in material.certificates {
            builder = builder.add_root_certificate(cert);
        }
        if let Some(identity) = material.identity {
            debug!("client identity loaded for mutual TLS");
            builder = builder.identity(identity);
        }
    }

    builder
        .build()
        .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))
}

fn tls_version(protocol: TlsProtocol) -> Version {
    match protocol {
        TlsProtocol::Tls10 => Version::TLS_1_0,
        TlsProtocol::Tls11 => Version::TLS_1_1,
        TlsProtocol::Tls12 => Version::TLS_1_2,
        TlsProtocol::Tls13 => Version::TLS_1_3,
    }
}

/// Read a keystore file. A password selects PKCS#12; otherwise the file is a
/// PEM bundle, or a single DER certificate when no PEM armor is present.
fn load_trust_material(path: &Path, password: Option<&str>) -> ClientResult<TrustMaterial> {
    let bytes = std::fs::read(path).map_err(|e| {
        ClientError::Configuration(format!("cannot read keystore {}: {e}", path.display()))
    })?;

    let material = match password {
        Some(password) => load_pkcs12(path, &bytes, password)?,
        None => load_pem_or_der(path, &bytes)?,
    };

    if material.certificates.is_empty() {
        return Err(ClientError::Configuration(format!(
            "keystore {} contains no certificates",
            path.display()
        )));
    }
    Ok(material)
}

fn invalid_keystore(path: &Path) -> impl Fn(reqwest::Error) -> ClientError + '_ {
    move |e| ClientError::Configuration(format!("invalid keystore {}: {e}", path.display()))
}

fn load_pem_or_der(path: &Path, bytes: &[u8]) -> ClientResult<TrustMaterial> {
    if !contains(bytes, b"-----BEGIN") {
        let cert = Certificate::from_der(bytes).map_err(invalid_keystore(path))?;
        return Ok(TrustMaterial {
            certificates: vec![cert],
            identity: None,
        });
    }

    let certificates = Certificate::from_pem_bundle(bytes).map_err(invalid_keystore(path))?;
    let identity = if contains(bytes, b"PRIVATE KEY-----") && !certificates.is_empty() {
        Some(Identity::from_pem(bytes).map_err(invalid_keystore(path))?)
    } else {
        None
    };

    Ok(TrustMaterial {
        certificates,
        identity,
    })
}

/// Open a PKCS#12 store. Every certificate it holds is trusted; the first
/// private key entry becomes the client identity.
fn load_pkcs12(path: &Path, bytes: &[u8], password: &str) -> ClientResult<TrustMaterial> {
    let store = KeyStore::from_pkcs12(bytes, password).map_err(|e| {
        ClientError::Configuration(format!(
            "cannot open PKCS#12 keystore {} (wrong password or not a PKCS#12 file): {e}",
            path.display()
        ))
    })?;

    let mut certificates = Vec::new();
    let mut identity = None;
    for (alias, entry) in store.entries() {
        match entry {
            KeyStoreEntry::Certificate(cert) => {
                let cert = Certificate::from_der(cert.as_der()).map_err(invalid_keystore(path))?;
                certificates.push(cert);
            }
            KeyStoreEntry::PrivateKeyChain(chain) => {
                for cert in chain.chain() {
                    let cert =
                        Certificate::from_der(cert.as_der()).map_err(invalid_keystore(path))?;
                    certificates.push(cert);
                }
                if identity.is_some() {
                    debug!("keystore entry {alias} ignored, client identity already set");
                    continue;
                }
                let ders: Vec<&[u8]> = chain.chain().iter().map(|c| c.as_der()).collect();
                let pem = identity_pem(chain.key(), &ders);
                identity = Some(Identity::from_pem(&pem).map_err(invalid_keystore(path))?);
            }
        }
    }

    Ok(TrustMaterial {
        certificates,
        identity,
    })
}

/// PEM text holding a PKCS#8 key followed by its certificate chain.
fn identity_pem(key: &[u8], chain: &[&[u8]]) -> Vec<u8> {
    let mut pem = armor("PRIVATE KEY", key);
    for der in chain {
        pem.push_str(&armor("CERTIFICATE", der));
    }
    pem.into_bytes()
}

fn armor(label: &str, der: &[u8]) -> String {
    let encoded = STANDARD.encode(der);
    let mut out = format!("-----BEGIN {label}-----\n");
    for line in encoded.as_bytes().chunks(64) {
        out.push_str(&String::from_utf8_lossy(line));
        out.push('\n');
    }
    out.push_str(&format!("-----END {label}-----\n"));
    out
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
