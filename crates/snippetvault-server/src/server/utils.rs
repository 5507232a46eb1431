//! Utilities for managing the API server.

use snippetvault_core::config::{ensure_config_dir, get_api_port_file_path, API_PORT_FILENAME};
use snippetvault_core::{Result, VaultError};
use std::fs;

/// Try to get the API server port from stored configuration
pub fn get_api_server_port() -> Result<u16> {
    let port_file_path = get_api_port_file_path();

    if port_file_path.exists() {
        let contents = fs::read_to_string(port_file_path)?;
        contents
            .trim()
            .parse::<u16>()
            .map_err(|_| VaultError::Other("Invalid port stored in configuration".to_string()))
    } else {
        Err(VaultError::Other(
            "API server port information not found".to_string(),
        ))
    }
}

/// Check if a port is available by trying to bind to it
pub fn port_is_available(port: u16) -> bool {
    use std::net::TcpListener;
    TcpListener::bind(format!("127.0.0.1:{}", port)).is_ok()
}

/// Save the API port to a configuration file
pub fn save_api_port(port: u16) -> Result<()> {
    let config_dir = ensure_config_dir()?;
    fs::write(config_dir.join(API_PORT_FILENAME), port.to_string())?;
    Ok(())
}
