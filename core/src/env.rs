// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Utilities to deal with environment variables.
//!
//! Configuration is read once at startup into explicit option structs by calling the functions in
//! this module with a per-component prefix.

use std::env;
use std::time::Duration;

/// Result type for environment errors.
type Result<T> = std::result::Result<T, String>;

/// Wrapper around an environment variable's value to support conversions to other types.
pub struct Value(String);

impl TryFrom<Value> for String {
    type Error = String;

    fn try_from(value: Value) -> Result<Self> {
        Ok(value.0)
    }
}

/// Generates a `TryFrom<Value>` for a type that can be parsed by `FromStr`.
macro_rules! tryfrom_value_for_fromstr [
    ( $t:ty ) => {
        impl TryFrom<Value> for $t {
            type Error = String;

            fn try_from(value: Value) -> Result<Self> {
                value.0.parse::<$t>().map_err(|e| format!("Invalid {}: {}", stringify!($t), e))
            }
        }
    }
];

tryfrom_value_for_fromstr!(bool);
tryfrom_value_for_fromstr!(u16);
tryfrom_value_for_fromstr!(u32);
tryfrom_value_for_fromstr!(u64);
tryfrom_value_for_fromstr!(usize);

impl TryFrom<Value> for Duration {
    type Error = String;

    /// Parses a duration expressed as a number followed by a unit, which can be one of `s` for
    /// seconds, `m` for minutes, `h` for hours or `d` for days.
    fn try_from(value: Value) -> Result<Self> {
        let s = value.0.trim();
        let Some(unit) = s.chars().last() else {
            return Err("Invalid duration: empty value".to_owned());
        };
        let multiplier = match unit {
            's' => 1,
            'm' => 60,
            'h' => 60 * 60,
            'd' => 24 * 60 * 60,
            _ => return Err(format!("Invalid duration '{}': unknown unit '{}'", s, unit)),
        };
        let amount = s[..s.len() - 1]
            .parse::<u64>()
            .map_err(|e| format!("Invalid duration '{}': {}", s, e))?;
        match amount.checked_mul(multiplier) {
            Some(secs) => Ok(Duration::from_secs(secs)),
            None => Err(format!("Invalid duration '{}': too large", s)),
        }
    }
}

/// Converts the raw contents of the `name` variable into a `T`, if present.
fn get_var<T: TryFrom<Value, Error = String>>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) => match Value(value).try_into() {
            Ok(value) => Ok(Some(value)),
            Err(e) => Err(format!("Invalid type in environment variable {}: {}", name, e)),
        },
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            Err(format!("Invalid value in environment variable {}", name))
        }
    }
}

/// Gets a required environment variable whose name is `<prefix>_<suffix>` with a conversion to
/// a target type `T`.
pub fn get_required_var<T: TryFrom<Value, Error = String>>(
    prefix: &str,
    suffix: &str,
) -> Result<T> {
    let name = format!("{}_{}", prefix, suffix);
    match get_var(&name)? {
        Some(value) => Ok(value),
        None => Err(format!("Required environment variable {} not present", name)),
    }
}

/// Gets an optional environment variable whose name is `<prefix>_<suffix>` with a conversion to
/// a target type `T`.
pub fn get_optional_var<T: TryFrom<Value, Error = String>>(
    prefix: &str,
    suffix: &str,
) -> Result<Option<T>> {
    get_var(&format!("{}_{}", prefix, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    #[test]
    fn test_value_to_string() {
        assert_eq!("foo bar", &TryInto::<String>::try_into(Value("foo bar".to_owned())).unwrap());
    }

    #[test]
    fn test_value_to_fromstr() {
        assert_eq!(1234u16, TryInto::<u16>::try_into(Value("1234".to_owned())).unwrap());
        assert!(TryInto::<bool>::try_into(Value("true".to_owned())).unwrap());

        let err = TryInto::<u16>::try_into(Value("-1".to_owned())).unwrap_err();
        assert!(err.starts_with("Invalid u16:"));
    }

    #[test]
    fn test_value_to_duration_ok() {
        for (raw, secs) in [("0s", 0), ("45s", 45), ("30m", 1800), ("24h", 86400), ("2d", 172800)]
        {
            let duration: Duration = Value(raw.to_owned()).try_into().unwrap();
            assert_eq!(Duration::from_secs(secs), duration, "Bad parse for {}", raw);
        }
    }

    #[test]
    fn test_value_to_duration_errors() {
        for (raw, exp_error) in [
            ("", "empty value"),
            ("10", "unknown unit"),
            ("10w", "unknown unit"),
            ("m", "empty string"),
            ("-5s", "invalid digit"),
            ("18446744073709551615d", "too large"),
        ] {
            let err = TryInto::<Duration>::try_into(Value(raw.to_owned())).unwrap_err();
            assert!(err.contains(exp_error), "'{}' does not contain '{}'", err, exp_error);
        }
    }

    #[test]
    fn test_get_required_var_ok() {
        temp_env::with_var("PREFIX_PRESENT", Some("1234"), || {
            assert_eq!("1234", &get_required_var::<String>("PREFIX", "PRESENT").unwrap());
        });
    }

    #[test]
    fn test_get_required_var_missing() {
        temp_env::with_var_unset("PREFIX_MISSING", || {
            assert_eq!(
                "Required environment variable PREFIX_MISSING not present",
                &get_required_var::<String>("PREFIX", "MISSING").unwrap_err()
            );
        });
    }

    #[test]
    fn test_get_required_var_not_utf8() {
        temp_env::with_var("PREFIX_INVALID", Some(OsStr::from_bytes(b"\xc3\x28")), || {
            assert_eq!(
                "Invalid value in environment variable PREFIX_INVALID",
                &get_required_var::<String>("PREFIX", "INVALID").unwrap_err()
            );
        });
    }

    #[test]
    fn test_get_required_var_bad_type() {
        temp_env::with_var("PREFIX_BAD", Some("b4d"), || {
            let err = get_required_var::<u16>("PREFIX", "BAD").unwrap_err();
            let exp_prefix = "Invalid type in environment variable PREFIX_BAD: Invalid u16";
            assert!(err.starts_with(exp_prefix));
        });
    }

    #[test]
    fn test_get_optional_var() {
        temp_env::with_vars(
            [("OPTIONAL_PRESENT", Some("10m")), ("OPTIONAL_MISSING", None::<&str>)],
            || {
                assert_eq!(
                    Some(Duration::from_secs(600)),
                    get_optional_var::<Duration>("OPTIONAL", "PRESENT").unwrap()
                );
                assert_eq!(None, get_optional_var::<Duration>("OPTIONAL", "MISSING").unwrap());
            },
        );
    }
}
