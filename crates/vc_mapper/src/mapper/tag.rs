use alloc::string::{String, ToString};
use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// Reserved options

/// A canonical name that excludes the field.
pub const IGNORE_THIS_FIELD: &str = "-";

/// The field is skipped by encoders when it is empty.
pub const OMIT_EMPTY: &str = "omitempty";

/// The fields of this struct field are not mapped.
pub const OMIT_NESTED: &str = "omitnested";

/// The fields of this struct field are promoted to the parent level.
pub const FLATTEN: &str = "flatten";

// -----------------------------------------------------------------------------
// TagFunc

/// Resolve the canonical name and the annotation parts of a field.
///
/// Called with the declared field name and the annotation, which is `""`
/// when the field has no annotation under the mapper's key.
pub type TagFunc = fn(field_name: &str, tag: &str) -> (String, Vec<String>);

/// Parse the canonical name and parts of an annotation split by `,`.
///
/// The first part is the name, an empty first part keeps the field name.
///
/// ```
/// use vc_mapper::mapper::std_tag_func;
///
/// assert_eq!(std_tag_func("Foo", ""), ("Foo".into(), vec![]));
/// assert_eq!(
///     std_tag_func("Foo", "foo,bar,size=64"),
///     ("foo".into(), vec!["bar".into(), "size=64".into()]),
/// );
/// assert_eq!(std_tag_func("Foo", ",bar"), ("Foo".into(), vec!["bar".into()]));
/// ```
pub fn std_tag_func(field_name: &str, tag: &str) -> (String, Vec<String>) {
    if tag.is_empty() {
        return (field_name.to_string(), Vec::new());
    }

    let mut parts = tag.split(',');
    let name = match parts.next() {
        Some(first) if !first.is_empty() => first,
        _ => field_name,
    };
    (name.to_string(), parts.map(ToString::to_string).collect())
}

/// Same as [`std_tag_func`], but the field name is mapped to lower case.
pub fn field_name_to_lower(field_name: &str, tag: &str) -> (String, Vec<String>) {
    std_tag_func(&field_name.to_lowercase(), tag)
}

/// Same as [`std_tag_func`], but the field name is mapped to underscore form.
///
/// ```
/// use vc_mapper::mapper::field_name_to_underscore;
///
/// assert_eq!(field_name_to_underscore("UserName", "").0, "user_name");
/// assert_eq!(field_name_to_underscore("UserName", "login").0, "login");
/// ```
pub fn field_name_to_underscore(field_name: &str, tag: &str) -> (String, Vec<String>) {
    std_tag_func(&camel_case_to_underscore(field_name), tag)
}

/// Treat the whole annotation as parts, the name is always the field name.
///
/// A `"-"` annotation ignores the field. Used by the
/// [`DefaultMapper`](crate::defaults::DefaultMapper), where the annotation
/// is the default value itself.
pub fn default_tag_func(field_name: &str, tag: &str) -> (String, Vec<String>) {
    if tag == IGNORE_THIS_FIELD {
        return (IGNORE_THIS_FIELD.to_string(), Vec::new());
    }
    // An empty annotation is kept, the field may be a child struct.
    if tag.is_empty() {
        return (field_name.to_string(), Vec::new());
    }
    (
        field_name.to_string(),
        tag.split(',').map(ToString::to_string).collect(),
    )
}

// -----------------------------------------------------------------------------
// Naming

/// Converts from camel case form to underscore separated form.
///
/// Digits do not start a new segment.
///
/// ```
/// use vc_mapper::mapper::camel_case_to_underscore;
///
/// assert_eq!(camel_case_to_underscore("MyFunc"), "my_func");
/// assert_eq!(camel_case_to_underscore("Field2Name"), "field2_name");
/// assert_eq!(camel_case_to_underscore("ID"), "i_d");
/// ```
pub fn camel_case_to_underscore(s: &str) -> String {
    fn add_segment(output: &mut String, segment: &mut String) {
        if segment.is_empty() {
            return;
        }
        if !output.is_empty() {
            output.push('_');
        }
        output.push_str(segment);
        segment.clear();
    }

    let mut output = String::with_capacity(s.len() + 4);
    let mut segment = String::new();
    for c in s.chars() {
        if !c.is_lowercase() && c != '_' && !c.is_numeric() {
            add_segment(&mut output, &mut segment);
        }
        segment.extend(c.to_lowercase());
    }
    add_segment(&mut output, &mut segment);
    output
}

/// Converts from underscore separated form to camel case form.
///
/// ```
/// use vc_mapper::mapper::underscore_to_camel_case;
///
/// assert_eq!(underscore_to_camel_case("my_func"), "MyFunc");
/// assert_eq!(underscore_to_camel_case("HTTP_server"), "HttpServer");
/// ```
pub fn underscore_to_camel_case(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut output = String::with_capacity(lower.len());
    for word in lower.split('_') {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            output.extend(first.to_uppercase());
            output.push_str(chars.as_str());
        }
    }
    output
}

// -----------------------------------------------------------------------------
// Options

/// Parse `key=value` parts into options, bare parts become empty values.
pub(crate) fn parse_options(parts: &[String]) -> alloc::collections::BTreeMap<String, String> {
    parts
        .iter()
        .map(|part| match part.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (part.clone(), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::*;

    #[test]
    fn default_tag_func_keeps_name() {
        assert_eq!(default_tag_func("A", "-"), (String::from("-"), vec![]));
        assert_eq!(default_tag_func("A", ""), (String::from("A"), vec![]));
        assert_eq!(
            default_tag_func("A", "x=1,y=2"),
            (String::from("A"), vec![String::from("x=1"), String::from("y=2")])
        );
    }

    #[test]
    fn lower_and_underscore() {
        assert_eq!(field_name_to_lower("FooBar", "").0, "foobar");
        assert_eq!(field_name_to_lower("FooBar", ",omitempty").0, "foobar");
        assert_eq!(camel_case_to_underscore("already_snake"), "already_snake");
        assert_eq!(camel_case_to_underscore("UserID"), "user_i_d");
        assert_eq!(underscore_to_camel_case("user_name_2"), "UserName2");
    }

    #[test]
    fn options_split_once() {
        let parts = vec![
            String::from("omitempty"),
            String::from("size=64"),
            String::from("expr=a=b"),
        ];
        let options = parse_options(&parts);
        assert_eq!(options.get("omitempty").map(String::as_str), Some(""));
        assert_eq!(options.get("size").map(String::as_str), Some("64"));
        assert_eq!(options.get("expr").map(String::as_str), Some("a=b"));
    }
}
