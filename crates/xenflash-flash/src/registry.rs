//! Programmer registry - opens devices from a programmer string

use std::collections::HashMap;

use xenflash_core::programmer::ProgrammerInfo;

use crate::handle::DeviceHandle;

/// Parsed programmer parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammerParams {
    /// Programmer name as given
    pub name: String,
    /// Key-value parameters
    pub params: HashMap<String, String>,
}

impl ProgrammerParams {
    /// Parameters as borrowed pairs, the form backends take options in
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Parse a programmer string into name and parameters
///
/// Format: "name" or "name:key1=value1,key2=value2"
///
/// # Example
/// ```
/// let params = xenflash_flash::parse_programmer_params("dummy:genuine=no").unwrap();
/// assert_eq!(params.name, "dummy");
/// assert_eq!(params.params.get("genuine").map(String::as_str), Some("no"));
/// ```
pub fn parse_programmer_params(s: &str) -> Result<ProgrammerParams, Box<dyn std::error::Error>> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));
    let name = name.trim();
    if name.is_empty() {
        return Err("Empty programmer name".into());
    }

    let mut params = HashMap::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            match opt.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    params.insert(key.trim().to_string(), value.trim().to_string());
                }
                _ => {
                    return Err(format!(
                        "Invalid parameter format: '{}' (expected key=value)",
                        opt
                    )
                    .into());
                }
            }
        }
    }

    Ok(ProgrammerParams {
        name: name.to_string(),
        params,
    })
}

/// Open a device from a programmer string
///
/// # Example
/// ```ignore
/// let mut handle = open_device("internal")?;
/// let mut selector = handle.selector()?;
/// let present = xenflash_core::probe::probe_device_present(&mut selector)?;
/// ```
pub fn open_device(programmer: &str) -> Result<DeviceHandle, Box<dyn std::error::Error>> {
    let params = parse_programmer_params(programmer)?;

    match params.name.as_str() {
        #[cfg(feature = "dummy")]
        "dummy" | "emulator" => open_dummy(&params),

        #[cfg(feature = "internal")]
        "internal" | "lpc" => open_internal(&params),

        _ => Err(format!(
            "Unknown programmer: {} (available: {})",
            params.name,
            programmer_names_short()
        )
        .into()),
    }
}

#[cfg(feature = "dummy")]
fn parse_bool(key: &str, value: &str) -> Result<bool, Box<dyn std::error::Error>> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(format!("Invalid value '{}' for {} (expected yes or no)", value, key).into()),
    }
}

#[cfg(feature = "dummy")]
fn parse_u8(key: &str, value: &str) -> Result<u8, Box<dyn std::error::Error>> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("Invalid value '{}' for {}: {}", value, key, e).into())
}

/// Build the emulator configuration from programmer parameters
///
/// Supported options:
/// - genuine=yes|no (write-protected sector, default yes)
/// - quirk=yes|no (identity only after the wake-up handshake, default yes)
/// - manufacturer=<id>, device=<id>
/// - boot=<bank number>
#[cfg(feature = "dummy")]
pub fn dummy_config(
    params: &ProgrammerParams,
) -> Result<xenflash_dummy::DummyConfig, Box<dyn std::error::Error>> {
    let mut config = xenflash_dummy::DummyConfig::default();
    for (key, value) in params.pairs() {
        match key {
            "genuine" => config.genuine = parse_bool(key, value)?,
            "quirk" => config.wake_quirk = parse_bool(key, value)?,
            "manufacturer" => config.manufacturer_id = parse_u8(key, value)?,
            "device" => config.device_id = parse_u8(key, value)?,
            "boot" => config.boot_bank = parse_u8(key, value)?,
            "image" => {}
            _ => log::warn!("Unknown dummy programmer option: {}={}", key, value),
        }
    }
    Ok(config)
}

// Programmer-specific open functions

#[cfg(feature = "dummy")]
fn open_dummy(params: &ProgrammerParams) -> Result<DeviceHandle, Box<dyn std::error::Error>> {
    use xenflash_core::chip::Am29lv160;
    use xenflash_core::image::FlashImage;
    use xenflash_dummy::DummyXenium;

    let config = dummy_config(params)?;
    let dummy = match params.params.get("image") {
        Some(path) => {
            let image = FlashImage::from_file(std::path::Path::new(path))?;
            DummyXenium::with_data(config, &image)
        }
        None => DummyXenium::new(config),
    };
    log::info!("Opened dummy programmer");
    Ok(DeviceHandle::new(Box::new(Am29lv160::new(dummy)), "dummy"))
}

#[cfg(feature = "internal")]
fn open_internal(params: &ProgrammerParams) -> Result<DeviceHandle, Box<dyn std::error::Error>> {
    use xenflash_internal::InternalOptions;

    log::info!("Opening internal programmer...");

    let options = InternalOptions::from_options(&params.pairs())
        .map_err(|e| format!("Invalid internal programmer options: {}", e))?;

    let device = xenflash_internal::open_internal(&options).map_err(|e| {
        format!(
            "Failed to initialize internal programmer: {}\n\
             Make sure you are running as root on the console the device is installed in.",
            e
        )
    })?;

    Ok(DeviceHandle::new(Box::new(device), "internal"))
}

/// Get information about all available programmers (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_programmers() -> Vec<ProgrammerInfo> {
    let mut programmers = Vec::new();

    #[cfg(feature = "dummy")]
    programmers.push(xenflash_dummy::programmer_info());

    #[cfg(feature = "internal")]
    programmers.push(xenflash_internal::programmer_info());

    programmers
}

/// Generate a short list of programmer names for CLI help
pub fn programmer_names_short() -> String {
    let programmers = available_programmers();
    if programmers.is_empty() {
        return "none (recompile with features)".to_string();
    }
    let names: Vec<&str> = programmers.iter().map(|p| p.name).collect();
    names.join(", ")
}
