use thiserror::Error;

use crate::domain::{CellId, OptionId};

#[derive(Debug, Error)]
pub enum GridError {
    #[error("no module registered for option '{0}'")]
    UnknownOption(OptionId),

    #[error("cell '{0}' is not registered in the current grid")]
    UnknownCell(CellId),

    #[error("fragment fetch for '{path}' failed with status {status}")]
    Fetch { path: String, status: u16 },

    #[error("fragment fetch for '{path}' failed before a status was received: {cause}")]
    Transport {
        path: String,
        #[source]
        cause: anyhow::Error,
    },

    #[error("module load from '{source_ref}' failed: {cause}")]
    Load {
        source_ref: String,
        #[source]
        cause: anyhow::Error,
    },

    #[error("module for option '{0}' loaded but did not expose its entry point")]
    ModuleNotExposed(OptionId),

    #[error("render surface rejected update for cell '{cell}': {cause}")]
    Surface {
        cell: CellId,
        #[source]
        cause: anyhow::Error,
    },
}
