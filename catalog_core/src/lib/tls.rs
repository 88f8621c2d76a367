use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use tokio_rustls::{rustls, TlsAcceptor};

use crate::{Error, Result};

/// Build a TLS acceptor from a PEM certificate/key file pair.
pub fn load_tls_acceptor(cert_path: &Path, key_path: &Path) -> Result<TlsAcceptor> {
    let certs = load_certs(cert_path)?;
    let key = load_private_key(key_path)?;

    let mut config = rustls::ServerConfig::builder()
        .with_safe_defaults()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| Error::TlsMaterial(format!("invalid certificate/key pair: {e}")))?;
    config.alpn_protocols = vec![b"http/1.1".to_vec()];

    Ok(TlsAcceptor::from(Arc::new(config)))
}

fn load_certs(path: &Path) -> Result<Vec<rustls::Certificate>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let certs = rustls_pemfile::certs(&mut reader)?;
    if certs.is_empty() {
        return Err(Error::TlsMaterial(format!(
            "no certificates found in {}",
            path.display()
        )));
    }
    Ok(certs.into_iter().map(rustls::Certificate).collect())
}

/// Load a PEM-encoded private key (PKCS8 or RSA) from disk.
fn load_private_key(path: &Path) -> Result<rustls::PrivateKey> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let keys = rustls_pemfile::pkcs8_private_keys(&mut reader)?;
    if let Some(key) = keys.into_iter().next() {
        return Ok(rustls::PrivateKey(key));
    }

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let keys = rustls_pemfile::rsa_private_keys(&mut reader)?;
    if let Some(key) = keys.into_iter().next() {
        return Ok(rustls::PrivateKey(key));
    }

    Err(Error::TlsMaterial(format!(
        "no private keys found in {}",
        path.display()
    )))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_material_is_an_error() {
        load_tls_acceptor(Path::new("no-such.pem"), Path::new("no-such.key"))
            .err()
            .unwrap();
    }
}
