//! Format rules: character classes, encodings, identifiers and coordinates.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::foundation::{Field, PredicateError};
use crate::funcs::{FuncMap, FuncOption, func};
use crate::macros::pattern_funcs;

const BYTE: &str = r"(?:0|[1-9]\d?|1\d\d?|2[0-4]\d|25[0-5])";
const ALPHA_CHANNEL: &str = r"(?:(?:0.[1-9]*)|[01])";
const HUE: &str = r"(?:0|[1-9]\d?|[12]\d\d|3[0-5]\d|360)";
const PERCENT: &str = r"(?:(?:0|[1-9]\d?|100)%)";
const BASE64: &str =
    r"(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=|[A-Za-z0-9+/]{4})";

fn rgb_body() -> String {
    format!(
        r"(?:{BYTE}\s*,\s*{BYTE}\s*,\s*{BYTE}|{BYTE}%\s*,\s*{BYTE}%\s*,\s*{BYTE}%)"
    )
}

pattern_funcs! {
    fn is_alpha = ALPHA(r"^[a-zA-Z]+$") => ["alpha"];
    fn is_alpha_num = ALPHA_NUM(r"^[a-zA-Z0-9]+$") => ["alphanum"];
    /// Letters of any script.
    fn is_alpha_unicode = ALPHA_UNICODE(r"^\p{L}+$") => ["alphaunicode"];
    fn is_alpha_num_unicode = ALPHA_NUM_UNICODE(r"^[\p{L}\p{N}]+$") => ["alphanumunicode"];
    fn is_hexadecimal = HEXADECIMAL(r"^[0-9a-fA-F]+$") => ["hexadecimal"];
    fn is_hex_color = HEX_COLOR(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$") => ["hexcolor"];
    fn is_rgb = RGB(&format!(r"^rgb\(\s*{}\s*\)$", rgb_body())) => ["rgb"];
    fn is_rgba = RGBA(&format!(r"^rgba\(\s*{}\s*,\s*{ALPHA_CHANNEL}\s*\)$", rgb_body())) => ["rgba"];
    fn is_hsl = HSL(&format!(r"^hsl\(\s*{HUE}\s*,\s*{PERCENT}\s*,\s*{PERCENT}\s*\)$")) => ["hsl"];
    fn is_hsla = HSLA(&format!(
        r"^hsla\(\s*{HUE}\s*,\s*{PERCENT}\s*,\s*{PERCENT}\s*,\s*{ALPHA_CHANNEL}\s*\)$"
    )) => ["hsla"];
    fn is_email = EMAIL(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ) => ["email"];
    fn is_base64 = BASE64_STD(&format!("^{BASE64}$")) => ["base64"];
    /// URL-safe alphabet, padding still required.
    fn is_base64_url = BASE64_URL(
        r"^(?:[A-Za-z0-9_-]{4})*(?:[A-Za-z0-9_-]{2}==|[A-Za-z0-9_-]{3}=|[A-Za-z0-9_-]{4})$"
    ) => ["base64url"];
    fn is_isbn10 = ISBN10(r"^(?:[0-9]{9}X|[0-9]{10})$") => ["isbn10"];
    fn is_isbn13 = ISBN13(r"^(?:97[89][0-9]{10})$") => ["isbn13", "isbn"];
    /// Lowercase hex, any version.
    fn is_uuid = UUID(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$") => ["uuid"];
    fn is_uuid3 = UUID3(r"^[0-9a-f]{8}-[0-9a-f]{4}-3[0-9a-f]{3}-[0-9a-f]{4}-[0-9a-f]{12}$") => ["uuid3"];
    fn is_uuid4 = UUID4(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$") => ["uuid4"];
    fn is_uuid5 = UUID5(r"^[0-9a-f]{8}-[0-9a-f]{4}-5[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$") => ["uuid5"];
    fn is_ascii = ASCII(r"^[\x00-\x7F]+$") => ["ascii"];
    fn is_printable_ascii = PRINTABLE_ASCII(r"^[\x20-\x7E]+$") => ["printableascii"];
    fn is_multibyte = MULTIBYTE(r"^[^\x00-\x7F]+$") => ["multibyte"];
    fn is_data_uri = DATA_URI(&format!("^data:.+/(.+);base64,{BASE64}$")) => ["datauri"];
    fn is_latitude = LATITUDE(r"^[-+]?(?:[1-8]?\d(?:\.\d+)?|90(?:\.0+)?)$") => ["latitude"];
    fn is_longitude = LONGITUDE(
        r"^[-+]?(?:180(?:\.0+)?|(?:1[0-7]\d|[1-9]?\d)(?:\.\d+)?)$"
    ) => ["longitude"];
    fn is_ssn = SSN(r"^\d{3}[- ]?\d{2}[- ]?\d{4}$") => ["ssn"];
    fn is_semver = SEMVER(
        r"^v?(?:0|[1-9]\d*)\.(?:0|[1-9]\d*)\.(?:0|[1-9]\d*)(?:-(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*)?(?:\+[0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*)?$"
    ) => ["semver"];
    fn is_katakana = KATAKANA(r"^\p{Katakana}+$") => ["katakana"];
    fn is_hiragana = HIRAGANA(r"^\p{Hiragana}+$") => ["hiragana"];
    /// At least one character outside the half-width ranges.
    fn is_full_width = FULL_WIDTH(
        r"[^\x{0020}-\x{007E}\x{FF61}-\x{FF9F}\x{FFA0}-\x{FFDC}\x{FFE8}-\x{FFEE}0-9a-zA-Z]"
    ) => ["fullwidth"];
    /// At least one half-width character.
    fn is_half_width = HALF_WIDTH(
        r"[\x{0020}-\x{007E}\x{FF61}-\x{FF9F}\x{FFA0}-\x{FFDC}\x{FFE8}-\x{FFEE}0-9a-zA-Z]"
    ) => ["halfwidth"];
}

pub(super) fn register(funcs: &mut FuncMap) {
    register_patterns(funcs);
    funcs.insert("numeric".to_owned(), func(is_numeric));
    funcs.insert("number".to_owned(), func(is_number));
    funcs.insert("url".to_owned(), func(is_url));
    funcs.insert("uri".to_owned(), func(is_uri));
}

// ============================================================================
// NUMBERS
// ============================================================================

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?$").unwrap());

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Numeric kinds pass; text must look like a signed decimal.
fn is_numeric(field: &Field<'_>, _: &FuncOption<'_>) -> Result<bool, PredicateError> {
    Ok(field.current().is_numeric() || NUMERIC.is_match(&field.text()))
}

/// Numeric kinds pass; text must be unsigned digits.
fn is_number(field: &Field<'_>, _: &FuncOption<'_>) -> Result<bool, PredicateError> {
    Ok(field.current().is_numeric() || NUMBER.is_match(&field.text()))
}

// ============================================================================
// URLS
// ============================================================================

/// An absolute URL with a scheme.
fn is_url(field: &Field<'_>, _: &FuncOption<'_>) -> Result<bool, PredicateError> {
    Ok(Url::parse(&field.text()).is_ok())
}

/// An absolute URL or an absolute path.
fn is_uri(field: &Field<'_>, _: &FuncOption<'_>) -> Result<bool, PredicateError> {
    let text = field.text();
    Ok(text.starts_with('/') || Url::parse(&text).is_ok())
}
