use std::path::PathBuf;

use crate::cli::GlobalArgs;
use crate::error::{ServiceError, ServiceResult};
use crate::metadata::DATA_DIR_NAME;

/// Where the blob store lives for this run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    Directory(PathBuf),
}

impl StoreLocation {
    /// `--memory` wins, then `--data-dir`/`VOTING_DATA_DIR`, then the
    /// platform data directory (or the home directory as a last resort).
    pub fn resolve(args: &GlobalArgs) -> ServiceResult<Self> {
        if args.memory {
            return Ok(StoreLocation::Memory);
        }
        if let Some(dir) = &args.data_dir {
            return Ok(StoreLocation::Directory(dir.clone()));
        }
        default_data_dir().map(StoreLocation::Directory)
    }
}

pub fn default_data_dir() -> ServiceResult<PathBuf> {
    if let Some(dir) = dirs::data_dir() {
        return Ok(dir.join(DATA_DIR_NAME));
    }
    dirs::home_dir()
        .map(|home| home.join(format!(".{DATA_DIR_NAME}")))
        .ok_or_else(|| {
            ServiceError::FromString(
                "Could not determine a data directory; pass --data-dir".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_flag_takes_precedence() {
        let args = GlobalArgs {
            data_dir: Some(PathBuf::from("/tmp/votes")),
            user: None,
            memory: true,
        };
        assert_eq!(StoreLocation::resolve(&args).unwrap(), StoreLocation::Memory);
    }

    #[test]
    fn explicit_directory_is_used() {
        let args = GlobalArgs {
            data_dir: Some(PathBuf::from("/tmp/votes")),
            ..GlobalArgs::default()
        };
        assert_eq!(
            StoreLocation::resolve(&args).unwrap(),
            StoreLocation::Directory(PathBuf::from("/tmp/votes"))
        );
    }
}
