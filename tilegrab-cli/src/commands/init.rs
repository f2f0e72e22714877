//! Init command - write the default configuration file.

use tilegrab::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Run the init command.
pub fn run() -> Result<(), CliError> {
    let existed = config_file_path().exists();
    let path = ConfigFile::ensure_exists()?;

    if existed {
        println!("Configuration already exists: {}", path.display());
    } else {
        println!("Created configuration: {}", path.display());
    }

    Ok(())
}
