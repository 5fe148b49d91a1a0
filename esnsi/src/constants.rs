/// Element and attribute names of the CNSI simple-classifier document.
/// Matched by local name, namespace prefixes are ignored.
pub const EL_DOCUMENT: &[u8] = b"document";
pub const EL_CLASSIFIER: &[u8] = b"simple-classifier";
pub const EL_STRING_ATTRIBUTE: &[u8] = b"string-attribute";
pub const EL_TEXT_ATTRIBUTE: &[u8] = b"text-attribute";
pub const EL_INTEGER_ATTRIBUTE: &[u8] = b"integer-attribute";
pub const EL_DATA: &[u8] = b"data";
pub const EL_RECORD: &[u8] = b"record";
pub const EL_ATTRIBUTE_VALUE: &[u8] = b"attribute-value";
pub const EL_INTEGER: &[u8] = b"integer";
pub const EL_TEXT: &[u8] = b"text";
pub const EL_STRING: &[u8] = b"string";

pub const ATTR_NAME: &[u8] = b"name";
pub const ATTR_CODE: &[u8] = b"code";
pub const ATTR_UID: &[u8] = b"uid";
pub const ATTR_VERSION: &[u8] = b"version";
pub const ATTR_REF: &[u8] = b"attribute-ref";

/// Width of a fully padded administrative-division code ("01201800000").
pub const CANONICAL_WIDTH: usize = 11;
