//! Decodes base64 certificate material and writes it to role directories.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use super::role_material;
use crate::layout::{Layout, TlsFile, TlsRole};
use crate::model::{BrokerConfig, TlsMaterial};
use crate::update::writer::{ensure_dir, StagedWrites, PRIVATE_MODE, PUBLIC_MODE};

/// Errors raised while provisioning TLS material.
#[derive(Debug, Error)]
pub enum TlsError {
    /// Malformed base64. Fatal: the broker would start with a dangling reference.
    #[error("invalid base64 for {role}/{}: {source}", .file.file_name())]
    Decode {
        role: TlsRole,
        file: TlsFile,
        #[source]
        source: base64::DecodeError,
    },

    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TlsError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, TlsError::Decode { .. })
    }
}

/// A decoded file waiting to be written.
#[derive(Debug)]
struct DecodedFile {
    file: TlsFile,
    bytes: Vec<u8>,
}

/// Decode every present field of `material`.
///
/// Line breaks inside the encoded text are ignored.
pub fn decode_material(
    role: TlsRole,
    material: &TlsMaterial,
) -> Result<Vec<(TlsFile, Vec<u8>)>, TlsError> {
    material
        .entries()
        .map(|(file, encoded)| {
            let cleaned: String = encoded.chars().filter(|c| *c != '\r' && *c != '\n').collect();
            STANDARD
                .decode(cleaned)
                .map(|bytes| (file, bytes))
                .map_err(|source| TlsError::Decode { role, file, source })
        })
        .collect()
}

/// Materializes TLS files under the configured layout.
#[derive(Debug, Clone)]
pub struct TlsProvisioner {
    layout: Layout,
}

impl TlsProvisioner {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Decode every role, then stage its files into `batch`.
    ///
    /// Role directories are created here; the files themselves only appear
    /// once the batch is committed.
    pub fn stage(
        &self,
        config: &BrokerConfig,
        batch: &mut StagedWrites,
    ) -> Result<Vec<PathBuf>, TlsError> {
        let mut decoded: Vec<(TlsRole, Vec<DecodedFile>)> = Vec::new();
        for role in TlsRole::ALL {
            if let Some(material) = role_material(config, role) {
                let files = decode_material(role, material)?
                    .into_iter()
                    .map(|(file, bytes)| DecodedFile { file, bytes })
                    .collect();
                decoded.push((role, files));
            }
        }

        let mut staged = Vec::new();
        for (role, files) in decoded {
            staged.extend(self.stage_role(role, &files, batch)?);
        }
        Ok(staged)
    }

    fn stage_role(
        &self,
        role: TlsRole,
        files: &[DecodedFile],
        batch: &mut StagedWrites,
    ) -> Result<Vec<PathBuf>, TlsError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let dir = self.layout.role_dir(role);
        tracing::info!(role = %role, dir = %dir.display(), "Provisioning TLS material");
        ensure_dir(&dir).map_err(|source| TlsError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let mut staged = Vec::with_capacity(files.len());
        for decoded in files {
            let path = self.layout.tls_file(role, decoded.file);
            let mode = match decoded.file {
                TlsFile::Key => PRIVATE_MODE,
                TlsFile::Ca | TlsFile::Cert => PUBLIC_MODE,
            };
            batch.stage(&path, &decoded.bytes, mode).map_err(|source| {
                tracing::error!(path = %path.display(), error = %source, "Failed to stage TLS file");
                TlsError::Write {
                    path: path.clone(),
                    source,
                }
            })?;
            staged.push(path);
        }
        Ok(staged)
    }
}
