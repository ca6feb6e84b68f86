//! Common routines for handling input data.
use anyhow::{Context, Result, ensure};
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

pub mod include;
use include::resolve_includes;

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read a YAML document, expanding `!include` directives and merge keys.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML file
///
/// # Returns
///
/// The resolved document or an error naming the file which could not be read.
pub fn read_yaml_value(file_path: &Path) -> Result<Value> {
    resolve_includes(file_path).with_context(|| input_err_msg(file_path))
}

/// Deserialise a resolved YAML document into a struct of type T.
///
/// `file_path` is the file the document was read from and is only used for error messages.
pub fn from_yaml_value<T: DeserializeOwned>(file_path: &Path, value: &Value) -> Result<T> {
    T::deserialize(value).with_context(|| input_err_msg(file_path))
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Read a percentage, checking that it is between 0 and 100
pub fn deserialise_percentage<'de, D>(deserialiser: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = Deserialize::deserialize(deserialiser)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(serde::de::Error::custom("Value is not between 0 and 100"));
    }

    Ok(value)
}

/// Read a value, checking that it is greater than 0 and less than or equal to 1
pub fn deserialise_proportion_nonzero<'de, D, T>(deserialiser: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Copy + Into<f64>,
{
    let value: T = Deserialize::deserialize(deserialiser)?;
    let raw: f64 = value.into();
    if !(raw > 0.0 && raw <= 1.0) {
        return Err(serde::de::Error::custom("Value must be > 0 and <= 1"));
    }

    Ok(value)
}

/// Check that a named value is finite and greater than zero
pub fn check_positive(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "{name} must be a finite number greater than zero"
    );

    Ok(())
}

/// Check that a named value is finite and not negative
pub fn check_non_negative(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "{name} must be a finite number greater than or equal to zero"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;
    use serde::Deserialize;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Record {
        id: String,
        value: u32,
    }

    #[derive(Debug, Deserialize)]
    struct Percent {
        #[serde(deserialize_with = "deserialise_percentage")]
        value: f64,
    }

    #[derive(Debug, Deserialize)]
    struct Proportion {
        #[serde(deserialize_with = "deserialise_proportion_nonzero")]
        value: f64,
    }

    #[test]
    fn test_read_yaml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.yaml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "id: hello\nvalue: 1").unwrap();
        }

        let value = read_yaml_value(&file_path).unwrap();
        assert_eq!(
            from_yaml_value::<Record>(&file_path, &value).unwrap(),
            Record {
                id: "hello".to_string(),
                value: 1,
            }
        );
    }

    #[test]
    fn test_read_yaml_bad_field() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.yaml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "id: hello\nvalue: -1").unwrap();
        }

        let value = read_yaml_value(&file_path).unwrap();
        let result = from_yaml_value::<Record>(&file_path, &value);
        assert_error!(result, input_err_msg(&file_path));
    }

    #[test]
    fn test_read_yaml_missing_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("missing.yaml");
        assert_error!(read_yaml_value(&file_path), input_err_msg(&file_path));
    }

    #[test]
    fn test_read_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "id = \"hello\"\nvalue = 1").unwrap();
        }

        assert_eq!(
            read_toml::<Record>(&file_path).unwrap(),
            Record {
                id: "hello".to_string(),
                value: 1,
            }
        );

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "bad toml syntax").unwrap();
        }

        assert!(read_toml::<Record>(&file_path).is_err());
    }

    #[rstest]
    #[case("0", true)]
    #[case("42.5", true)]
    #[case("100", true)]
    #[case("-0.1", false)]
    #[case("100.1", false)]
    fn test_deserialise_percentage(#[case] value: &str, #[case] expected_valid: bool) {
        let result: Result<Percent, _> = serde_yaml::from_str(&format!("value: {value}"));
        assert_eq!(result.is_ok(), expected_valid);
    }

    #[rstest]
    #[case("0.995", true)]
    #[case("1", true)]
    #[case("0", false)]
    #[case("-0.5", false)]
    #[case("1.5", false)]
    fn test_deserialise_proportion_nonzero(#[case] value: &str, #[case] expected_valid: bool) {
        let result: Result<Proportion, _> = serde_yaml::from_str(&format!("value: {value}"));
        assert_eq!(result.is_ok(), expected_valid);
    }

    #[rstest]
    #[case(1e-10, true)]
    #[case(1.0, true)]
    #[case(0.0, false)]
    #[case(-1.0, false)]
    #[case(f64::INFINITY, false)]
    #[case(f64::NAN, false)]
    fn test_check_positive(#[case] value: f64, #[case] expected_valid: bool) {
        assert_eq!(check_positive("x", value).is_ok(), expected_valid);
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(1.0, true)]
    #[case(-1e-10, false)]
    #[case(f64::NAN, false)]
    fn test_check_non_negative(#[case] value: f64, #[case] expected_valid: bool) {
        assert_eq!(check_non_negative("x", value).is_ok(), expected_valid);
    }
}
