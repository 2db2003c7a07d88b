//! Codes in authority-qualified identifiers: `EPSG:9001`, `urn:ogc:def:uom:EPSG::9001` or
//! `http://www.opengis.net/def/uom/EPSG/0/9001`.

/// Case-insensitive comparison ignoring surrounding whitespace.
fn part_matches(expected: &str, part: &str) -> bool {
    part.trim().eq_ignore_ascii_case(expected)
}

/// The code at the start of `text`, skipping an optional version before the first separator.
/// `None` if the code is empty or followed by more parts.
fn code_ignore_version(text: &str, separator: char) -> Option<&str> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    let code = match text.split_once(separator) {
        Some((_version, code)) => {
            let code = code.trim_start();
            if code.is_empty() || code.contains(separator) {
                return None;
            }
            code
        }
        None => text,
    };
    Some(code.trim_end())
}

/// The code that `uri` gives for `authority`, or `None` if `uri` is not an identifier from that
/// authority for a unit of measurement.
///
/// Recognized forms are `AUTH:code` and `AUTH:version:code`, OGC URNs `urn:ogc:def:uom:AUTH:version:code`
/// (also with `x-ogc`, and with an empty version), and OGC URLs
/// `http://www.opengis.net/def/uom/AUTH/version/code`. The authority and the fixed parts are
/// case-insensitive and whitespace around separators is ignored.
pub fn code_of<'a>(authority: &str, uri: &'a str) -> Option<&'a str> {
    let (scheme, rest) = uri.split_once(':')?;
    if part_matches(authority, scheme) {
        return code_ignore_version(rest, ':');
    }
    let (separator, site, rest) = if part_matches("urn", scheme) {
        (':', None, rest)
    } else if part_matches("http", scheme) || part_matches("https", scheme) {
        ('/', Some("www.opengis.net"), rest.trim_start().strip_prefix("//")?)
    } else {
        return None;
    };
    let mut parts = rest.splitn(5, separator);
    let head = parts.next()?;
    let head_ok = match site {
        Some(site) => part_matches(site, head),
        None => part_matches("ogc", head) || part_matches("x-ogc", head),
    };
    if !head_ok {
        return None;
    }
    for expected in ["def", "uom", authority] {
        if !part_matches(expected, parts.next()?) {
            return None;
        }
    }
    code_ignore_version(parts.next()?, separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple() {
        assert_eq!(code_of("EPSG", "EPSG:9102"), Some("9102"));
        assert_eq!(code_of("EPSG", " epsg : 9102 "), Some("9102"));
        assert_eq!(code_of("EPSG", "EPSG:8.2:9102"), Some("9102"));
        assert_eq!(code_of("EPSG", "EPSG:"), None);
        assert_eq!(code_of("EPSG", "EPSG:8.2:"), None);
        assert_eq!(code_of("EPSG", "CRS:84"), None);
        assert_eq!(code_of("EPSG", "9102"), None);
    }

    #[test]
    fn test_urn() {
        assert_eq!(code_of("EPSG", "urn:ogc:def:uom:EPSG::9102"), Some("9102"));
        assert_eq!(code_of("EPSG", "urn:ogc:def:uom:EPSG:8.2:9102"), Some("9102"));
        assert_eq!(code_of("EPSG", "URN:x-ogc:def:uom:epsg:9102"), Some("9102"));
        assert_eq!(code_of("EPSG", "urn : ogc : def : uom : EPSG : : 9102"), Some("9102"));
        assert_eq!(code_of("EPSG", "urn:ogc:def:crs:EPSG::4326"), None);
        assert_eq!(code_of("EPSG", "urn:ogc:def:uom:EPSG"), None);
        assert_eq!(code_of("EPSG", "urn:ogc:def:uom:EPSG::9102:extra"), None);
    }

    #[test]
    fn test_url() {
        assert_eq!(
            code_of("EPSG", "http://www.opengis.net/def/uom/EPSG/0/9102"),
            Some("9102")
        );
        assert_eq!(
            code_of("EPSG", "https://www.opengis.net/def/uom/EPSG/0/9001"),
            Some("9001")
        );
        assert_eq!(code_of("EPSG", "http://www.opengis.net/def/crs/EPSG/0/4326"), None);
        assert_eq!(code_of("EPSG", "http://example.com/def/uom/EPSG/0/9102"), None);
    }
}
