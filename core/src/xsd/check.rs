//! Instance validation against a compiled [`Schema`].
//!
//! Messages use libxml2's wording so clients see the same text whichever
//! validator produced it. Checking stops at the first violation in document
//! order.

use std::borrow::Cow;

use crate::xml::XmlNode;

use super::compile::{
    Bound, Builtin, Content, ElementDecl, Facets, Group, GroupKind, Schema, SimpleType, Whitespace,
};

type Matched<'n, 'd> = Vec<(&'n XmlNode, &'d ElementDecl)>;

/// Validates a parsed document against `schema`.
pub fn validate_document(schema: &Schema, root: &XmlNode) -> Result<(), String> {
    let decl = schema.elements.get(root.local_name()).ok_or_else(|| {
        format!(
            "Element '{}': No matching global declaration available for the validation root.",
            root.name
        )
    })?;
    check_element(root, decl)
}

fn check_element(node: &XmlNode, decl: &ElementDecl) -> Result<(), String> {
    match &decl.content {
        Content::Any => Ok(()),
        Content::Simple(ty) => {
            if !node.children.is_empty() {
                return Err(format!(
                    "Element '{}': Element content is not allowed, because the content type is a simple type.",
                    node.name
                ));
            }
            check_simple(&node.name, &node.text, ty)
        }
        Content::Complex(None) => {
            if !node.children.is_empty() {
                return Err(format!(
                    "Element '{}': Element content is not allowed, because the content type is empty.",
                    node.name
                ));
            }
            if node.has_text() {
                return Err(format!(
                    "Element '{}': Character content is not allowed, because the content type is empty.",
                    node.name
                ));
            }
            Ok(())
        }
        Content::Complex(Some(group)) => {
            if node.has_text() {
                return Err(format!(
                    "Element '{}': Character content other than whitespace is not allowed because the content type is 'element-only'.",
                    node.name
                ));
            }

            let (matched, model_error) = match group.kind {
                GroupKind::Sequence => match_sequence(node, group),
                GroupKind::All => match_all(node, group),
            };
            for (child, child_decl) in matched {
                check_element(child, child_decl)?;
            }
            model_error.map_or(Ok(()), Err)
        }
    }
}

/// Greedy left-to-right match of children against a sequence.
fn match_sequence<'n, 'd>(
    node: &'n XmlNode,
    group: &'d Group,
) -> (Matched<'n, 'd>, Option<String>) {
    let children = &node.children;
    let mut matched = Vec::new();
    let mut counts = vec![0u32; group.particles.len()];
    let mut position = 0;

    for (index, decl) in group.particles.iter().enumerate() {
        while position < children.len()
            && children[position].local_name() == decl.name
            && decl.allows_more(counts[index])
        {
            matched.push((&children[position], decl));
            counts[index] += 1;
            position += 1;
        }

        if counts[index] < decl.min_occurs {
            let expected = expected_in_sequence(group, index, &counts);
            let error = match children.get(position) {
                Some(child) => not_expected(child, &expected),
                None => missing(node, &expected),
            };
            return (matched, Some(error));
        }
    }

    let error = children.get(position).map(|child| {
        let expected = expected_in_sequence(group, group.particles.len(), &counts);
        not_expected(child, &expected)
    });
    (matched, error)
}

/// Names that could legally appear where particle `index` is being matched.
///
/// Skipped optional particles and repeatable ones right before `index` are
/// still open, as is everything up to the next required particle.
fn expected_in_sequence<'d>(group: &'d Group, index: usize, counts: &[u32]) -> Vec<&'d str> {
    let mut start = index;
    while start > 0 {
        let previous = &group.particles[start - 1];
        let seen = counts[start - 1];
        if seen == 0 {
            start -= 1;
            continue;
        }
        if previous.allows_more(seen) {
            start -= 1;
        }
        break;
    }

    let mut expected = Vec::new();
    for (offset, decl) in group.particles[start..].iter().enumerate() {
        let seen = counts[start + offset];
        if decl.allows_more(seen) {
            expected.push(decl.name.as_str());
        }
        if seen < decl.min_occurs {
            break;
        }
    }
    expected
}

/// Each particle at most once, in any order.
fn match_all<'n, 'd>(node: &'n XmlNode, group: &'d Group) -> (Matched<'n, 'd>, Option<String>) {
    let mut matched = Vec::new();
    let mut seen = vec![false; group.particles.len()];

    for child in &node.children {
        let slot = group
            .particles
            .iter()
            .position(|decl| decl.name == child.local_name());
        match slot {
            Some(index) if !seen[index] && group.particles[index].max_occurs != Some(0) => {
                seen[index] = true;
                matched.push((child, &group.particles[index]));
            }
            _ => {
                let expected = remaining(group, &seen, |_| true);
                return (matched, Some(not_expected(child, &expected)));
            }
        }
    }

    let missing_names = remaining(group, &seen, |decl| decl.min_occurs > 0);
    let error = (!missing_names.is_empty()).then(|| missing(node, &missing_names));
    (matched, error)
}

fn remaining<'d>(
    group: &'d Group,
    seen: &[bool],
    keep: impl Fn(&ElementDecl) -> bool,
) -> Vec<&'d str> {
    group
        .particles
        .iter()
        .zip(seen)
        .filter(|(decl, seen)| !**seen && decl.max_occurs != Some(0) && keep(*decl))
        .map(|(decl, _)| decl.name.as_str())
        .collect()
}

fn expected_clause(expected: &[&str]) -> String {
    match expected {
        [] => String::new(),
        [one] => format!(" Expected is ( {one} )."),
        many => format!(" Expected is one of ( {} ).", many.join(", ")),
    }
}

fn not_expected(child: &XmlNode, expected: &[&str]) -> String {
    format!(
        "Element '{}': This element is not expected.{}",
        child.name,
        expected_clause(expected)
    )
}

fn missing(parent: &XmlNode, expected: &[&str]) -> String {
    format!(
        "Element '{}': Missing child element(s).{}",
        parent.name,
        expected_clause(expected)
    )
}

fn normalize(raw: &str, whitespace: Whitespace) -> Cow<'_, str> {
    let is_xml_space = |c: char| matches!(c, ' ' | '\t' | '\n' | '\r');
    match whitespace {
        Whitespace::Preserve => Cow::Borrowed(raw),
        Whitespace::Replace => Cow::Owned(
            raw.chars()
                .map(|c| if is_xml_space(c) { ' ' } else { c })
                .collect(),
        ),
        Whitespace::Collapse => Cow::Owned(
            raw.split(is_xml_space)
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        ),
    }
}

fn check_simple(element: &str, raw: &str, ty: &SimpleType) -> Result<(), String> {
    let value = normalize(raw, ty.base.whitespace());
    let value = value.as_ref();

    if !lexically_valid(ty.base, value) {
        return Err(format!(
            "Element '{element}': '{value}' is not a valid value of the atomic type '{}'.",
            ty.base.qualified_name()
        ));
    }

    let facets = &ty.facets;
    let length = value.chars().count();
    if let Some(expected) = facets.length.filter(|l| *l != length) {
        return Err(format!(
            "Element '{element}': [facet 'length'] The value has a length of '{length}'; this differs from the allowed length of '{expected}'."
        ));
    }
    if let Some(min) = facets.min_length.filter(|m| length < *m) {
        return Err(format!(
            "Element '{element}': [facet 'minLength'] The value has a length of '{length}'; this underruns the allowed minimum length of '{min}'."
        ));
    }
    if let Some(max) = facets.max_length.filter(|m| length > *m) {
        return Err(format!(
            "Element '{element}': [facet 'maxLength'] The value has a length of '{length}'; this exceeds the allowed maximum length of '{max}'."
        ));
    }

    if !facets.enumeration.is_empty() && !facets.enumeration.iter().any(|e| e == value) {
        let set = facets
            .enumeration
            .iter()
            .map(|e| format!("'{e}'"))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(format!(
            "Element '{element}': [facet 'enumeration'] The value '{value}' is not an element of the set {{{set}}}."
        ));
    }

    if let Some(pattern) = facets.patterns.iter().find(|p| !p.regex.is_match(value)) {
        return Err(format!(
            "Element '{element}': [facet 'pattern'] The value '{value}' is not accepted by the pattern '{}'.",
            pattern.source
        ));
    }

    if ty.base.is_numeric() {
        check_range(element, value, facets)?;
    }
    Ok(())
}

fn check_range(element: &str, value: &str, facets: &Facets) -> Result<(), String> {
    let Ok(number) = value.parse::<f64>() else {
        return Ok(());
    };
    let violated = |bound: &Option<Bound>, ok: fn(f64, f64) -> bool| {
        bound.as_ref().filter(|b| !ok(number, b.value)).cloned()
    };

    if let Some(b) = violated(&facets.min_inclusive, |n, b| n >= b) {
        return Err(format!(
            "Element '{element}': [facet 'minInclusive'] The value '{value}' is less than the minimum value allowed ('{}').",
            b.literal
        ));
    }
    if let Some(b) = violated(&facets.max_inclusive, |n, b| n <= b) {
        return Err(format!(
            "Element '{element}': [facet 'maxInclusive'] The value '{value}' is greater than the maximum value allowed ('{}').",
            b.literal
        ));
    }
    if let Some(b) = violated(&facets.min_exclusive, |n, b| n > b) {
        return Err(format!(
            "Element '{element}': [facet 'minExclusive'] The value '{value}' must be greater than '{}'.",
            b.literal
        ));
    }
    if let Some(b) = violated(&facets.max_exclusive, |n, b| n < b) {
        return Err(format!(
            "Element '{element}': [facet 'maxExclusive'] The value '{value}' must be less than '{}'.",
            b.literal
        ));
    }
    Ok(())
}

fn lexically_valid(base: Builtin, value: &str) -> bool {
    match base {
        Builtin::String | Builtin::NormalizedString | Builtin::Token => true,
        Builtin::Boolean => matches!(value, "true" | "false" | "1" | "0"),
        Builtin::Decimal => is_decimal(value),
        Builtin::Float | Builtin::Double => is_double(value),
        Builtin::Date => is_date(value),
        Builtin::DateTime => is_date_time(value),
        integer => {
            if !is_integer(value) {
                return false;
            }
            let Ok(n) = value.trim_start_matches('+').parse::<i128>() else {
                return false;
            };
            match integer {
                Builtin::Long => i64::try_from(n).is_ok(),
                Builtin::Int => i32::try_from(n).is_ok(),
                Builtin::Short => i16::try_from(n).is_ok(),
                Builtin::NonNegativeInteger => n >= 0,
                Builtin::PositiveInteger => n > 0,
                Builtin::NonPositiveInteger => n <= 0,
                Builtin::NegativeInteger => n < 0,
                _ => true,
            }
        }
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn unsigned(s: &str) -> &str {
    s.strip_prefix(|c| c == '+' || c == '-').unwrap_or(s)
}

fn is_integer(s: &str) -> bool {
    is_digits(unsigned(s))
}

fn is_decimal(s: &str) -> bool {
    match unsigned(s).split_once('.') {
        None => is_digits(unsigned(s)),
        Some(("", "")) => false,
        Some((whole, fraction)) => {
            (whole.is_empty() || is_digits(whole)) && (fraction.is_empty() || is_digits(fraction))
        }
    }
}

fn is_double(s: &str) -> bool {
    if matches!(s, "INF" | "+INF" | "-INF" | "NaN") {
        return true;
    }
    match s.split_once(|c| c == 'e' || c == 'E') {
        None => is_decimal(s),
        Some((mantissa, exponent)) => is_decimal(mantissa) && is_integer(exponent),
    }
}

/// Strips a trailing `Z` or `±hh:mm` zone, if well formed.
fn without_zone(s: &str) -> &str {
    if let Some(body) = s.strip_suffix('Z') {
        return body;
    }
    let bytes = s.as_bytes();
    if bytes.len() >= 6 {
        let zone = &bytes[bytes.len() - 6..];
        let well_formed = matches!(zone[0], b'+' | b'-')
            && zone[1].is_ascii_digit()
            && zone[2].is_ascii_digit()
            && zone[3] == b':'
            && zone[4].is_ascii_digit()
            && zone[5].is_ascii_digit();
        if well_formed {
            return &s[..s.len() - 6];
        }
    }
    s
}

fn two_digits_in(s: &str, range: std::ops::RangeInclusive<u32>) -> bool {
    s.len() == 2 && is_digits(s) && s.parse().is_ok_and(|n: u32| range.contains(&n))
}

fn is_date_body(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    let mut parts = s.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day)) => {
            year.len() >= 4 && is_digits(year) && two_digits_in(month, 1..=12) && two_digits_in(day, 1..=31)
        }
        _ => false,
    }
}

fn is_time_body(s: &str) -> bool {
    let (clock, fraction) = match s.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (s, None),
    };
    let mut parts = clock.split(':');
    let shape = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), Some(sec), None) => {
            two_digits_in(h, 0..=24) && two_digits_in(m, 0..=59) && two_digits_in(sec, 0..=60)
        }
        _ => false,
    };
    shape && fraction.map_or(true, is_digits)
}

fn is_date(s: &str) -> bool {
    is_date_body(without_zone(s))
}

fn is_date_time(s: &str) -> bool {
    match without_zone(s).split_once('T') {
        Some((date, time)) => is_date_body(date) && is_time_body(time),
        None => false,
    }
}
