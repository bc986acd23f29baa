//! Input file loading.

use std::{fs, io::Read, path::Path};

use serde::de::DeserializeOwned;

use super::{CliError, Result};

/// Read a whole input file, or stdin for `-`.
pub fn read_input(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(file)
            .map_err(|source| CliError::InputLoad { file: file.to_path_buf(), source })
    }
}

/// Load and parse a JSON input file, or stdin for `-`.
pub fn load_json<T: DeserializeOwned>(file: &Path) -> Result<T> {
    let content = read_input(file)?;
    serde_json::from_str(&content)
        .map_err(|source| CliError::JsonParse { file: file.to_path_buf(), source })
}
