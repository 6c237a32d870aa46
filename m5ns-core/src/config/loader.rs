//! Configuration loading
//!
//! Reads `M5NS.INI` from local storage into a [`DeviceConfig`].
//! The file is checked against the line buffer first, then each known key
//! is looked up in turn. Only the Nightscout URL is mandatory; every other
//! key falls back to its default when missing.

use core::fmt;

use embedded_io::{Read, Seek};
use heapless::String;
use m5ns_hal::FileStorage;

use super::defaults::{is_valid_brightness, DeviceDefaults};
use super::types::{
    bounded, DeviceConfig, MAX_BLE_PASSWORD_LEN, MAX_TOKEN_LEN, MAX_URL_LEN, MAX_WLAN_FIELD_LEN,
    WLAN_SLOTS,
};
use crate::ini::{describe, IniError, IniFile, LINE_BUFFER_LEN};

/// Main configuration section
const SECTION_CONFIG: &str = "config";

/// Wi-Fi slot sections, indexed by slot
const WLAN_SECTIONS: [&str; WLAN_SLOTS] = [
    "wlan0", "wlan1", "wlan2", "wlan3", "wlan4", "wlan5", "wlan6", "wlan7", "wlan8", "wlan9",
];

const KEY_URL: &str = "nightscout";
const KEY_TOKEN: &str = "token";
const KEY_TIME_ZONE: &str = "time_zone";
const KEY_DST: &str = "dst";
const KEY_SHOW_MGDL: &str = "show_mgdl";
const KEY_BRIGHTNESS1: &str = "brightness1";
const KEY_BRIGHTNESS2: &str = "brightness2";
const KEY_BRIGHTNESS3: &str = "brightness3";
const KEY_SSID: &str = "ssid";
const KEY_PASS: &str = "pass";
const KEY_BLE_PASSWORD: &str = "blepassword";

/// Fatal configuration errors
///
/// Any of these leaves the device without a usable configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// The INI file could not be opened
    Open(IniError),
    /// A line does not fit the line buffer, or the file could not be read
    Invalid(IniError),
    /// `[config] nightscout` is missing
    MissingUrl(IniError),
}

impl LoadError {
    /// Short message for the status display
    pub const fn display_message(&self) -> &'static str {
        match self {
            LoadError::Open(_) => "No INI file",
            LoadError::Invalid(_) => "Bad INI file",
            LoadError::MissingUrl(_) => "No Nightscout URL in INI file",
        }
    }

    /// Underlying reader error
    pub const fn cause(&self) -> IniError {
        match self {
            LoadError::Open(e) | LoadError::Invalid(e) | LoadError::MissingUrl(e) => *e,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Open(e) => write!(f, "ini file does not exist: {}", e),
            LoadError::Invalid(e) => write!(f, "ini file not valid: {}", e),
            LoadError::MissingUrl(e) => {
                write!(f, "could not read 'nightscout' from section 'config': {}", e)
            }
        }
    }
}

/// Open the INI file at `path` and load the configuration from it
pub fn load_config<S: FileStorage>(
    storage: &mut S,
    path: &str,
    defaults: &DeviceDefaults,
) -> Result<DeviceConfig, LoadError> {
    let mut ini = IniFile::open(storage, path).map_err(|e| {
        error!("Ini file {} does not exist: {}", path, e.as_str());
        LoadError::Open(e)
    })?;
    info!("Ini file exists");

    load(&mut ini, defaults)
}

/// Load the configuration from an open INI file
///
/// Fails only if the file does not validate against
/// [`LINE_BUFFER_LEN`] or has no Nightscout URL.
pub fn load<F: Read + Seek>(
    ini: &mut IniFile<F>,
    defaults: &DeviceDefaults,
) -> Result<DeviceConfig, LoadError> {
    let mut buffer = [0u8; LINE_BUFFER_LEN];

    if let Err(e) = ini.validate(&mut buffer) {
        error!("ini file {} not valid: {}", ini.filename(), e.as_str());
        return Err(LoadError::Invalid(e));
    }

    let url: String<MAX_URL_LEN> = match ini.get_value(SECTION_CONFIG, KEY_URL, &mut buffer) {
        Ok(value) => {
            info!("section 'config' has an entry 'nightscout' with value {}", value);
            bounded(value)
        }
        Err(e) => {
            error!(
                "Could not read 'nightscout' from section 'config', error was {}",
                describe(ini.error())
            );
            return Err(LoadError::MissingUrl(e));
        }
    };

    let mut config = DeviceConfig::new(url, defaults);

    if let Some(token) = read_string::<_, MAX_TOKEN_LEN>(ini, SECTION_CONFIG, KEY_TOKEN, &mut buffer) {
        info!("token found in config");
        config.token = token;
    }

    match read_int(ini, SECTION_CONFIG, KEY_TIME_ZONE, &mut buffer) {
        Some(v) => config.time_zone = v,
        None => info!("NO time zone defined, using {}", defaults.time_zone),
    }
    debug!("time_zone = {}", config.time_zone);

    match read_int(ini, SECTION_CONFIG, KEY_DST, &mut buffer) {
        Some(v) => config.dst = v,
        None => info!("NO DST defined, using {}", defaults.dst),
    }
    debug!("dst = {}", config.dst);

    match read_int(ini, SECTION_CONFIG, KEY_SHOW_MGDL, &mut buffer) {
        Some(v) => config.show_mgdl = v,
        None => info!("NO show_mgdl defined, using {}", defaults.show_mgdl),
    }
    debug!("show_mgdl = {}", config.show_mgdl);

    config.brightness1 = read_brightness(ini, KEY_BRIGHTNESS1, defaults.brightness1, &mut buffer);
    config.brightness2 = read_brightness(ini, KEY_BRIGHTNESS2, defaults.brightness2, &mut buffer);
    config.brightness3 = read_brightness(ini, KEY_BRIGHTNESS3, defaults.brightness3, &mut buffer);

    for (i, section) in WLAN_SECTIONS.iter().enumerate() {
        let slot = &mut config.wlan[i];

        match read_string::<_, MAX_WLAN_FIELD_LEN>(ini, section, KEY_SSID, &mut buffer) {
            Some(ssid) => {
                info!("[{}] ssid = {}", section, ssid.as_str());
                slot.ssid = ssid;
            }
            None => debug!("NO [{}] ssid", section),
        }

        match read_string::<_, MAX_WLAN_FIELD_LEN>(ini, section, KEY_PASS, &mut buffer) {
            Some(pass) => {
                info!("[{}] password found in config", section);
                slot.pass = pass;
            }
            None => debug!("NO [{}] password found", section),
        }
    }

    match read_string::<_, MAX_BLE_PASSWORD_LEN>(ini, SECTION_CONFIG, KEY_BLE_PASSWORD, &mut buffer)
    {
        Some(password) => {
            info!("blepassword found in config");
            config.ble_password = password;
        }
        None => info!("NO blepassword in config"),
    }

    info!(
        "Configuration loaded, {} wlan networks",
        config.configured_networks().count()
    );
    Ok(config)
}

/// Parse the leading integer of `text`
///
/// Accepts leading whitespace, an optional sign, and the digits that
/// follow; anything after the digits is ignored (`"7200 ; CET"` is 7200).
/// Returns `None` if there are no digits or the value overflows `i32`.
pub fn parse_int(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for b in digits[..end].bytes() {
        value = value.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
    }
    if negative {
        value = -value;
    }
    i32::try_from(value).ok()
}

fn read_string<F: Read + Seek, const N: usize>(
    ini: &mut IniFile<F>,
    section: &str,
    key: &str,
    buffer: &mut [u8],
) -> Option<String<N>> {
    match ini.get_value(section, key, buffer) {
        Ok(value) => {
            if value.len() > N {
                warn!("[{}] {} longer than {} bytes, truncated", section, key, N);
            }
            Some(bounded(value))
        }
        Err(e) => {
            debug!("[{}] {}: {}", section, key, e.as_str());
            None
        }
    }
}

fn read_int<F: Read + Seek>(
    ini: &mut IniFile<F>,
    section: &str,
    key: &str,
    buffer: &mut [u8],
) -> Option<i32> {
    let value = ini.get_value(section, key, buffer).ok()?;
    let parsed = parse_int(value);
    if parsed.is_none() {
        warn!("[{}] {} = {} is not a number, using default", section, key, value);
    }
    parsed
}

fn read_brightness<F: Read + Seek>(
    ini: &mut IniFile<F>,
    key: &str,
    default: u8,
    buffer: &mut [u8],
) -> u8 {
    match read_int(ini, SECTION_CONFIG, key, buffer) {
        Some(v) if is_valid_brightness(v) => {
            debug!("{} = {}", key, v);
            v as u8
        }
        Some(v) => {
            warn!("{} = {} out of range, using {}", key, v, default);
            default
        }
        None => {
            info!("NO {}, using {}", key, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use m5ns_hal::{MemFile, MemStorage};
    use proptest::prelude::*;

    const PATH: &str = "/M5NS.INI";

    fn load_bytes(data: &[u8]) -> Result<DeviceConfig, LoadError> {
        let mut ini = IniFile::from_file(MemFile::new(data), PATH);
        load(&mut ini, &DeviceDefaults::default())
    }

    #[test]
    fn test_minimal_file() {
        let config = load_bytes(b"[config]\nnightscout=http://x/api\ntime_zone=7200\n").unwrap();

        assert_eq!(config.url.as_str(), "http://x/api");
        assert_eq!(config.time_zone, 7200);
        assert_eq!(config.dst, 3600);
        assert_eq!(config.show_mgdl, 0);
        assert_eq!(config.token.as_str(), "");
        assert_eq!(config.brightness_levels(), [50, 100, 10]);
        assert_eq!(config.ble_password.as_str(), "");
        for slot in &config.wlan {
            assert!(slot.ssid.is_empty());
            assert!(slot.pass.is_empty());
        }
    }

    #[test]
    fn test_full_file() {
        let config = load_bytes(
            b"[config]\n\
              nightscout = https://cgm.example.com\n\
              token = abc123\n\
              time_zone = -18000\n\
              dst = 0\n\
              show_mgdl = 1\n\
              brightness1 = 30\n\
              brightness2 = 80\n\
              brightness3 = 1\n\
              blepassword = 123456\n\
              \n\
              [wlan0]\n\
              ssid = home\n\
              pass = hunter2\n\
              \n\
              [wlan9]\n\
              ssid = phone\n",
        )
        .unwrap();

        assert_eq!(config.url.as_str(), "https://cgm.example.com");
        assert_eq!(config.token.as_str(), "abc123");
        assert_eq!(config.time_zone, -18000);
        assert_eq!(config.dst, 0);
        assert!(config.uses_mgdl());
        assert_eq!(config.brightness_levels(), [30, 80, 1]);
        assert_eq!(config.ble_password.as_str(), "123456");

        assert_eq!(config.wlan[0].ssid.as_str(), "home");
        assert_eq!(config.wlan[0].pass.as_str(), "hunter2");
        assert_eq!(config.wlan[9].ssid.as_str(), "phone");
        assert_eq!(config.wlan[9].pass.as_str(), "");
        assert!(config.wlan[1..9].iter().all(|s| !s.is_configured()));
    }

    #[test]
    fn test_missing_url() {
        assert_eq!(
            load_bytes(b"[config]\ntoken=abc\n"),
            Err(LoadError::MissingUrl(IniError::KeyNotFound))
        );
        assert_eq!(
            load_bytes(b"[wlan0]\nssid=x\n"),
            Err(LoadError::MissingUrl(IniError::SectionNotFound))
        );
        // URL in the wrong section does not count
        assert_eq!(
            load_bytes(b"[wlan0]\nnightscout=http://x\n[config]\n"),
            Err(LoadError::MissingUrl(IniError::KeyNotFound))
        );
    }

    #[test]
    fn test_line_too_long() {
        let err = load_bytes(
            b"[config]\nnightscout=http://x\n\
              token=0123456789012345678901234567890123456789012345678901234567890123456789012345678\n",
        )
        .unwrap_err();
        assert_eq!(err, LoadError::Invalid(IniError::BufferTooSmall));
        assert_eq!(err.display_message(), "Bad INI file");
    }

    #[test]
    fn test_missing_file() {
        let mut storage = MemStorage::<1>::new();
        let err = load_config(&mut storage, PATH, &DeviceDefaults::default()).unwrap_err();
        assert_eq!(err, LoadError::Open(IniError::FileNotFound));
        assert_eq!(err.display_message(), "No INI file");
        assert_eq!(err.cause(), IniError::FileNotFound);
    }

    #[test]
    fn test_load_config_from_storage() {
        let mut storage = MemStorage::<1>::new()
            .with_file(PATH, b"[config]\nnightscout=http://x/api\n")
            .unwrap();
        let config = load_config(&mut storage, PATH, &DeviceDefaults::default()).unwrap();
        assert_eq!(config.url.as_str(), "http://x/api");
    }

    #[test]
    fn test_brightness_out_of_range_uses_slot_default() {
        let config = load_bytes(
            b"[config]\nnightscout=http://x\nbrightness1=0\nbrightness2=150\nbrightness3=abc\n",
        )
        .unwrap();
        assert_eq!(config.brightness_levels(), [50, 100, 10]);

        let config = load_bytes(
            b"[config]\nnightscout=http://x\nbrightness1=101\nbrightness2=-1\nbrightness3=100\n",
        )
        .unwrap();
        assert_eq!(config.brightness_levels(), [50, 100, 100]);
    }

    #[test]
    fn test_unparsable_numbers_use_defaults() {
        let config = load_bytes(
            b"[config]\nnightscout=http://x\ntime_zone=CET\ndst=\nshow_mgdl=yes\n",
        )
        .unwrap();
        assert_eq!(config.time_zone, 3600);
        assert_eq!(config.dst, 3600);
        assert_eq!(config.show_mgdl, 0);

        // Trailing text after the digits is ignored
        let config =
            load_bytes(b"[config]\nnightscout=http://x\ntime_zone=7200 ; CET\ndst=0s\n").unwrap();
        assert_eq!(config.time_zone, 7200);
        assert_eq!(config.dst, 0);
    }

    #[test]
    fn test_custom_defaults() {
        let defaults = DeviceDefaults {
            time_zone: -3600,
            dst: 0,
            show_mgdl: 1,
            brightness1: 20,
            brightness2: 40,
            brightness3: 60,
        };
        let mut ini = IniFile::from_file(
            MemFile::new(b"[config]\nnightscout=http://x\nbrightness2=500\n"),
            PATH,
        );
        let config = load(&mut ini, &defaults).unwrap();

        assert_eq!(config.time_zone, -3600);
        assert_eq!(config.dst, 0);
        assert_eq!(config.show_mgdl, 1);
        assert_eq!(config.brightness_levels(), [20, 40, 60]);
    }

    #[test]
    fn test_values_truncated_to_field_capacity() {
        let config = load_bytes(
            b"[config]\n\
              nightscout=https://a-very-long-nightscout-site-name.herokuapp.com/api/v1/ent\n\
              token=0123456789abcdef0123456789abcdefXYZ\n\
              [wlan3]\n\
              ssid=0123456789012345678901234567890123\n",
        )
        .unwrap();

        assert_eq!(config.url.len(), MAX_URL_LEN);
        assert_eq!(
            config.url.as_str(),
            "https://a-very-long-nightscout-site-name.herokuapp.com/api/v1/e"
        );
        assert_eq!(config.token.as_str(), "0123456789abcdef0123456789abcde");
        assert_eq!(config.wlan[3].ssid.len(), MAX_WLAN_FIELD_LEN);
    }

    #[test]
    fn test_token_round_trip() {
        let config = load_bytes(b"[config]\nnightscout=http://x\ntoken=abc123\n").unwrap();
        assert_eq!(config.token.as_str(), "abc123");
        assert!(config.has_token());

        let config = load_bytes(b"[config]\nnightscout=http://x\n").unwrap();
        assert_eq!(config.token.as_str(), "");
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("7200"), Some(7200));
        assert_eq!(parse_int("  -3600"), Some(-3600));
        assert_eq!(parse_int("+5"), Some(5));
        assert_eq!(parse_int("12abc"), Some(12));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("2147483647"), Some(i32::MAX));
        assert_eq!(parse_int("-2147483648"), Some(i32::MIN));
        assert_eq!(parse_int("2147483648"), None);
        assert_eq!(parse_int("99999999999999999999999"), None);
    }

    proptest! {
        #[test]
        fn prop_parse_int_matches_std(v in any::<i32>()) {
            let text = std::format!("{}", v);
            prop_assert_eq!(parse_int(&text), Some(v));
        }

        #[test]
        fn prop_brightness_always_in_range(v in -1000i32..1000) {
            let text = std::format!("[config]\nnightscout=http://x\nbrightness1={}\n", v);
            let config = load_bytes(text.as_bytes()).unwrap();

            prop_assert!((1..=100).contains(&config.brightness1));
            if is_valid_brightness(v) {
                prop_assert_eq!(i32::from(config.brightness1), v);
            } else {
                prop_assert_eq!(config.brightness1, 50);
            }
        }
    }
}
