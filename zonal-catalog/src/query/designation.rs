//! Canonical designation handling.
//!
//! A designation names a star by zone and running index:
//! `UCAC4 zzz-nnnnnn` (zone zero-padded to three digits, running index to
//! six). Search input is more forgiving: the running index may be partial
//! or absent entirely.

/// Designation prefix of this catalog.
pub const DESIGNATION_PREFIX: &str = "UCAC4";

/// Canonical designation for (zone, running index).
pub fn format_designation(zone: u16, running_index: u32) -> String {
    format!("{DESIGNATION_PREFIX} {zone:03}-{running_index:06}")
}

/// A parsed designation search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesignationQuery {
    pub zone: u16,
    /// Absent when the user typed only a zone; possibly partial otherwise.
    pub running_index: Option<u32>,
}

/// Parse search text of the form `UCAC4 <zone>[-<running>]`.
///
/// The prefix is case-insensitive and the zone may carry leading zeros. A
/// trailing `-` with no digits reads the same as no running index. Returns
/// `None` for anything that is not a designation for this catalog.
pub fn parse_designation(text: &str) -> Option<DesignationQuery> {
    let mut tokens = text.split_whitespace();
    let prefix = tokens.next()?;
    let body = tokens.next()?;
    if tokens.next().is_some() || !prefix.eq_ignore_ascii_case(DESIGNATION_PREFIX) {
        return None;
    }

    let (zone_part, running_part) = match body.split_once('-') {
        Some((z, r)) => (z, Some(r)),
        None => (body, None),
    };

    let zone: u16 = zone_part.parse().ok()?;
    if zone < 1 || zone > crate::geom::ZONE_COUNT {
        return None;
    }

    let running_index = match running_part {
        None | Some("") => None,
        Some(r) => {
            let n: u32 = r.parse().ok()?;
            if n == 0 {
                return None;
            }
            Some(n)
        }
    };

    Some(DesignationQuery {
        zone,
        running_index,
    })
}
