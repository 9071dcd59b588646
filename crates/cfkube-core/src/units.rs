//! Human-readable byte quantities as they appear in application manifests
//! (`512M`, `1G`, `2GB`, `1024K`).

use crate::error::{CoreError, Result};

const KIB_PER_MIB: f64 = 1024.0;
const MIB_PER_GIB: f64 = 1024.0;
const MIB_PER_TIB: f64 = 1024.0 * 1024.0;

/// Converts a byte quantity with a mandatory unit suffix into whole megabytes.
///
/// Units are case-insensitive: `T`/`TB`/`TiB`, `G`/`GB`/`GiB`, `M`/`MB`/`MiB`,
/// `K`/`KB`/`KiB`, `B`. All multiples are powers of 1024. Fractions are
/// truncated towards zero after conversion, so `512K` is 0 megabytes.
pub fn to_megabytes(quantity: &str) -> Result<i64> {
    let trimmed = quantity.trim().to_ascii_uppercase();
    let unit_start = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| CoreError::invalid_byte_quantity(quantity, "missing unit"))?;

    let (number, unit) = trimmed.split_at(unit_start);
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| CoreError::invalid_byte_quantity(quantity, "not a number"))?;

    if value <= 0.0 {
        return Err(CoreError::non_positive_byte_quantity(quantity));
    }

    let megabytes = match unit {
        "T" | "TB" | "TIB" => value * MIB_PER_TIB,
        "G" | "GB" | "GIB" => value * MIB_PER_GIB,
        "M" | "MB" | "MIB" => value,
        "K" | "KB" | "KIB" => value / KIB_PER_MIB,
        "B" => value / KIB_PER_MIB / KIB_PER_MIB,
        other => {
            return Err(CoreError::invalid_byte_quantity(
                quantity,
                format!("unknown unit {other:?}"),
            ));
        }
    };

    Ok(megabytes as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_units() {
        assert_eq!(to_megabytes("512M").unwrap(), 512);
        assert_eq!(to_megabytes("512MB").unwrap(), 512);
        assert_eq!(to_megabytes("1G").unwrap(), 1024);
        assert_eq!(to_megabytes("2gb").unwrap(), 2048);
        assert_eq!(to_megabytes("1T").unwrap(), 1024 * 1024);
        assert_eq!(to_megabytes("2048K").unwrap(), 2);
    }

    #[test]
    fn test_fractions_truncate() {
        assert_eq!(to_megabytes("1.5G").unwrap(), 1536);
        assert_eq!(to_megabytes("1500K").unwrap(), 1);
        assert_eq!(to_megabytes("512K").unwrap(), 0);
    }

    #[test]
    fn test_binary_unit_spellings() {
        assert_eq!(to_megabytes("256MiB").unwrap(), 256);
        assert_eq!(to_megabytes("2gib").unwrap(), 2048);
        assert_eq!(to_megabytes("1TiB").unwrap(), 1024 * 1024);
        assert_eq!(to_megabytes("4096KiB").unwrap(), 4);
        assert_eq!(to_megabytes(" 64 M ").unwrap(), 64);
    }

    #[test]
    fn test_missing_unit_is_rejected() {
        let err = to_megabytes("512").unwrap_err();
        assert!(matches!(err, CoreError::InvalidByteQuantity { .. }));
    }

    #[test]
    fn test_unknown_unit_is_rejected() {
        let err = to_megabytes("5X").unwrap_err();
        assert!(err.to_string().contains("unknown unit"));
    }

    #[test]
    fn test_non_positive_is_rejected() {
        assert!(matches!(
            to_megabytes("0M").unwrap_err(),
            CoreError::NonPositiveByteQuantity(_)
        ));
        assert!(to_megabytes("-1G").is_err());
    }
}
