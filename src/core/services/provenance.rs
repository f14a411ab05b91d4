//! Package provenance
//!
//! Derives authenticated side information for a package file from the
//! committed assertion store: the file digest selects a package-revision,
//! whose package id selects the package-declaration naming the package.

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{Context, anyhow};
use serde_json::Value;
use sha2::{Digest, Sha384};

use crate::core::models::{AssertionRef, AssertionType, SideInfo};
use crate::core::ports::{AssertionStore, StoreError};

/// Lowercase hex SHA-384 digest of a package file
pub fn package_digest(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha384::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Derive side information for the package file at `path`
///
/// Returns [`StoreError::NotFound`] when the store holds no signed metadata
/// matching this exact file.
pub fn derive_side_info(
    path: &Path,
    series: &str,
    store: &dyn AssertionStore,
) -> Result<SideInfo, StoreError> {
    let digest = package_digest(path)
        .with_context(|| format!("cannot compute digest of {}", path.display()))?;

    let revision = store.find(&AssertionRef::new(AssertionType::PackageRevision, &[&digest]))?;
    let package_id = revision
        .header_str("package-id")
        .ok_or_else(|| anyhow!("package-revision {digest} has no package-id"))?;
    let rev = revision
        .headers
        .get("package-revision")
        .and_then(Value::as_u64)
        .ok_or_else(|| anyhow!("package-revision {digest} has no numeric package-revision"))?;

    // A signed revision without its declaration means the store is inconsistent,
    // not that the package is unsigned.
    let declaration = store
        .find(&AssertionRef::new(AssertionType::PackageDeclaration, &[series, package_id]))
        .map_err(|err| match err {
            StoreError::NotFound(reference) => StoreError::Backend(anyhow!(
                "internal error: cannot find package-declaration for {package_id}: \
                 {reference} not found"
            )),
            other => other,
        })?;
    let name = declaration
        .header_str("package-name")
        .ok_or_else(|| anyhow!("package-declaration {package_id} has no package-name"))?;

    Ok(SideInfo {
        real_name: name.to_string(),
        package_id: Some(package_id.to_string()),
        revision: Some(rev),
        ..SideInfo::default()
    })
}
