#![deny(missing_docs)]

//! # XSD Compilation
//!
//! Turns an XML Schema document into the in-memory model the checker walks.
//!
//! Only the subset used by the resource schemas is understood: global element
//! declarations, named and anonymous simple types derived by restriction,
//! complex types with `xs:sequence` or `xs:all` content, and occurrence bounds.
//! Anything else is rejected at compile time instead of being skipped.

use std::collections::HashMap;

use indexmap::IndexMap;
use regex::Regex;

use crate::xml::{local_name, parse_document, XmlNode};

const MAX_DEPTH: usize = 32;

/// A compiled schema: its global element declarations by name.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) elements: IndexMap<String, ElementDecl>,
}

impl Schema {
    /// Names of the global elements, i.e. the accepted document roots.
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ElementDecl {
    pub name: String,
    pub min_occurs: u32,
    /// `None` is `unbounded`.
    pub max_occurs: Option<u32>,
    pub content: Content,
}

impl ElementDecl {
    pub fn allows_more(&self, seen: u32) -> bool {
        self.max_occurs.map_or(true, |max| seen < max)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Content {
    /// `xs:anyType`, or no type given.
    Any,
    Simple(SimpleType),
    /// Element-only content; `None` is the empty content model.
    Complex(Option<Group>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GroupKind {
    Sequence,
    All,
}

#[derive(Debug, Clone)]
pub(crate) struct Group {
    pub kind: GroupKind,
    pub particles: Vec<ElementDecl>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Whitespace {
    Preserve,
    Replace,
    Collapse,
}

/// The built-in datatypes the checker knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    String,
    NormalizedString,
    Token,
    Integer,
    Long,
    Int,
    Short,
    NonNegativeInteger,
    PositiveInteger,
    NonPositiveInteger,
    NegativeInteger,
    Decimal,
    Float,
    Double,
    Boolean,
    Date,
    DateTime,
}

impl Builtin {
    fn from_local(name: &str) -> Option<Self> {
        let builtin = match name {
            "string" | "anySimpleType" => Builtin::String,
            "normalizedString" => Builtin::NormalizedString,
            "token" => Builtin::Token,
            "integer" => Builtin::Integer,
            "long" => Builtin::Long,
            "int" => Builtin::Int,
            "short" => Builtin::Short,
            "nonNegativeInteger" => Builtin::NonNegativeInteger,
            "positiveInteger" => Builtin::PositiveInteger,
            "nonPositiveInteger" => Builtin::NonPositiveInteger,
            "negativeInteger" => Builtin::NegativeInteger,
            "decimal" => Builtin::Decimal,
            "float" => Builtin::Float,
            "double" => Builtin::Double,
            "boolean" => Builtin::Boolean,
            "date" => Builtin::Date,
            "dateTime" => Builtin::DateTime,
            _ => return None,
        };
        Some(builtin)
    }

    pub fn qualified_name(self) -> &'static str {
        match self {
            Builtin::String => "xs:string",
            Builtin::NormalizedString => "xs:normalizedString",
            Builtin::Token => "xs:token",
            Builtin::Integer => "xs:integer",
            Builtin::Long => "xs:long",
            Builtin::Int => "xs:int",
            Builtin::Short => "xs:short",
            Builtin::NonNegativeInteger => "xs:nonNegativeInteger",
            Builtin::PositiveInteger => "xs:positiveInteger",
            Builtin::NonPositiveInteger => "xs:nonPositiveInteger",
            Builtin::NegativeInteger => "xs:negativeInteger",
            Builtin::Decimal => "xs:decimal",
            Builtin::Float => "xs:float",
            Builtin::Double => "xs:double",
            Builtin::Boolean => "xs:boolean",
            Builtin::Date => "xs:date",
            Builtin::DateTime => "xs:dateTime",
        }
    }

    pub fn whitespace(self) -> Whitespace {
        match self {
            Builtin::String => Whitespace::Preserve,
            Builtin::NormalizedString => Whitespace::Replace,
            _ => Whitespace::Collapse,
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            Builtin::String
                | Builtin::NormalizedString
                | Builtin::Token
                | Builtin::Boolean
                | Builtin::Date
                | Builtin::DateTime
        )
    }
}

/// A numeric facet bound, kept with its literal for messages.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Bound {
    pub literal: String,
    pub value: f64,
}

/// All `xs:pattern` facets of one derivation step, compiled as one alternation.
#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    pub source: String,
    pub regex: Regex,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Facets {
    pub length: Option<usize>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub patterns: Vec<Pattern>,
    pub enumeration: Vec<String>,
    pub min_inclusive: Option<Bound>,
    pub max_inclusive: Option<Bound>,
    pub min_exclusive: Option<Bound>,
    pub max_exclusive: Option<Bound>,
}

#[derive(Debug, Clone)]
pub(crate) struct SimpleType {
    pub base: Builtin,
    pub facets: Facets,
}

impl SimpleType {
    fn builtin(base: Builtin) -> Self {
        Self {
            base,
            facets: Facets::default(),
        }
    }
}

/// Compiles the text of an XML Schema document.
///
/// Returns a message naming the offending construct on failure.
pub fn compile(source: &str) -> Result<Schema, String> {
    let root = parse_document(source)?;
    if root.local_name() != "schema" {
        return Err(format!(
            "root element is '{}', expected 'xs:schema'",
            root.name
        ));
    }

    let mut compiler = Compiler::default();
    for child in &root.children {
        match child.local_name() {
            "simpleType" => compiler.simple_types.insert(required(child, "name")?, child),
            "complexType" => compiler.complex_types.insert(required(child, "name")?, child),
            _ => None,
        };
    }

    let mut elements = IndexMap::new();
    for child in &root.children {
        match child.local_name() {
            "element" => {
                let decl = compiler.element(child, 0)?;
                if elements.insert(decl.name.clone(), decl).is_some() {
                    return Err(format!(
                        "global element '{}' is declared twice",
                        required(child, "name")?
                    ));
                }
            }
            "simpleType" | "complexType" | "annotation" => {}
            other => return Err(unsupported(other)),
        }
    }

    if elements.is_empty() {
        return Err("schema declares no global element".into());
    }
    Ok(Schema { elements })
}

#[derive(Default)]
struct Compiler<'a> {
    simple_types: HashMap<&'a str, &'a XmlNode>,
    complex_types: HashMap<&'a str, &'a XmlNode>,
}

impl Compiler<'_> {
    fn element(&self, node: &XmlNode, depth: usize) -> Result<ElementDecl, String> {
        check_depth(depth)?;
        if node.attribute("ref").is_some() {
            return Err(unsupported("element ref"));
        }
        let name = required(node, "name")?.to_string();

        let min_occurs = match node.attribute("minOccurs") {
            None => 1,
            Some(raw) => parse_occurs(raw)?,
        };
        let max_occurs = match node.attribute("maxOccurs") {
            None => Some(1),
            Some("unbounded") => None,
            Some(raw) => Some(parse_occurs(raw)?),
        };
        if max_occurs.is_some_and(|max| max < min_occurs) {
            return Err(format!("element '{name}': maxOccurs is below minOccurs"));
        }

        let inline = node
            .children
            .iter()
            .find(|c| matches!(c.local_name(), "simpleType" | "complexType"));

        let content = match (node.attribute("type"), inline) {
            (Some(_), Some(_)) => {
                return Err(format!(
                    "element '{name}' has both a type attribute and an inline type"
                ))
            }
            (Some(type_name), None) => self.named_type(type_name, depth + 1)?,
            (None, Some(ty)) if ty.local_name() == "simpleType" => {
                Content::Simple(self.simple_type(ty, depth + 1)?)
            }
            (None, Some(ty)) => self.complex_type(ty, depth + 1)?,
            (None, None) => Content::Any,
        };

        Ok(ElementDecl {
            name,
            min_occurs,
            max_occurs,
            content,
        })
    }

    fn named_type(&self, qualified: &str, depth: usize) -> Result<Content, String> {
        check_depth(depth)?;
        let name = local_name(qualified);
        if let Some(node) = self.complex_types.get(name) {
            return self.complex_type(node, depth + 1);
        }
        if let Some(node) = self.simple_types.get(name) {
            return Ok(Content::Simple(self.simple_type(node, depth + 1)?));
        }
        if name == "anyType" {
            return Ok(Content::Any);
        }
        Builtin::from_local(name)
            .map(|b| Content::Simple(SimpleType::builtin(b)))
            .ok_or_else(|| format!("type '{qualified}' is not defined"))
    }

    fn simple_type(&self, node: &XmlNode, depth: usize) -> Result<SimpleType, String> {
        check_depth(depth)?;
        let restriction = node
            .children
            .iter()
            .find(|c| c.local_name() != "annotation")
            .ok_or_else(|| "simpleType without content".to_string())?;
        if restriction.local_name() != "restriction" {
            return Err(unsupported(restriction.local_name()));
        }

        let base_name = required(restriction, "base")?;
        let mut ty = match self.simple_types.get(local_name(base_name)) {
            Some(base) => self.simple_type(base, depth + 1)?,
            None => Builtin::from_local(local_name(base_name))
                .map(SimpleType::builtin)
                .ok_or_else(|| format!("simple type base '{base_name}' is not defined"))?,
        };

        let mut patterns = Vec::new();
        let mut enumeration = Vec::new();
        for facet in &restriction.children {
            let facet_name = facet.local_name();
            if facet_name == "annotation" {
                continue;
            }
            let value = required(facet, "value")?;
            match facet_name {
                "length" => ty.facets.length = Some(parse_length(facet_name, value)?),
                "minLength" => ty.facets.min_length = Some(parse_length(facet_name, value)?),
                "maxLength" => ty.facets.max_length = Some(parse_length(facet_name, value)?),
                "pattern" => patterns.push(value.to_string()),
                "enumeration" => enumeration.push(value.to_string()),
                "minInclusive" => ty.facets.min_inclusive = Some(parse_bound(facet_name, value)?),
                "maxInclusive" => ty.facets.max_inclusive = Some(parse_bound(facet_name, value)?),
                "minExclusive" => ty.facets.min_exclusive = Some(parse_bound(facet_name, value)?),
                "maxExclusive" => ty.facets.max_exclusive = Some(parse_bound(facet_name, value)?),
                other => return Err(unsupported(other)),
            }
        }

        if !patterns.is_empty() {
            ty.facets.patterns.push(compile_pattern(&patterns)?);
        }
        if !enumeration.is_empty() {
            ty.facets.enumeration = enumeration;
        }
        Ok(ty)
    }

    fn complex_type(&self, node: &XmlNode, depth: usize) -> Result<Content, String> {
        check_depth(depth)?;
        let mut group = None;
        for child in &node.children {
            let kind = match child.local_name() {
                "sequence" => GroupKind::Sequence,
                "all" => GroupKind::All,
                "annotation" | "attribute" | "anyAttribute" => continue,
                other => return Err(unsupported(other)),
            };
            if group.is_some() {
                return Err("complexType may hold only one model group".into());
            }
            group = Some(self.group(child, kind, depth + 1)?);
        }
        Ok(Content::Complex(group))
    }

    fn group(&self, node: &XmlNode, kind: GroupKind, depth: usize) -> Result<Group, String> {
        let mut particles = Vec::new();
        for child in &node.children {
            match child.local_name() {
                "element" => particles.push(self.element(child, depth + 1)?),
                "annotation" => {}
                other => return Err(unsupported(other)),
            }
        }

        if kind == GroupKind::All {
            if let Some(decl) = particles.iter().find(|d| d.max_occurs != Some(1)) {
                return Err(format!(
                    "element '{}' inside xs:all must have maxOccurs 1",
                    decl.name
                ));
            }
        }
        Ok(Group { kind, particles })
    }
}

fn required<'a>(node: &'a XmlNode, attribute: &str) -> Result<&'a str, String> {
    node.attribute(attribute)
        .ok_or_else(|| format!("'{}' is missing the '{attribute}' attribute", node.name))
}

fn unsupported(construct: &str) -> String {
    format!("unsupported schema construct '{construct}'")
}

fn check_depth(depth: usize) -> Result<(), String> {
    if depth > MAX_DEPTH {
        return Err("type definitions are circular or nested too deeply".into());
    }
    Ok(())
}

fn parse_occurs(raw: &str) -> Result<u32, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a valid occurrence bound"))
}

fn parse_length(facet: &str, raw: &str) -> Result<usize, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("facet '{facet}': '{raw}' is not a valid length"))
}

fn parse_bound(facet: &str, raw: &str) -> Result<Bound, String> {
    let literal = raw.trim().to_string();
    let value = literal
        .parse::<f64>()
        .map_err(|_| format!("facet '{facet}': '{raw}' is not a number"))?;
    Ok(Bound { literal, value })
}

fn compile_pattern(sources: &[String]) -> Result<Pattern, String> {
    let source = sources.join("|");
    let anchored = format!(
        "^(?:{})$",
        sources
            .iter()
            .map(|s| format!("(?:{s})"))
            .collect::<Vec<_>>()
            .join("|")
    );
    let regex =
        Regex::new(&anchored).map_err(|e| format!("facet 'pattern': invalid pattern '{source}': {e}"))?;
    Ok(Pattern { source, regex })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SENSOR: &str = r#"<?xml version="1.0"?>
        <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
          <xs:simpleType name="batteryType">
            <xs:restriction base="xs:integer">
              <xs:minInclusive value="0"/>
              <xs:maxInclusive value="100"/>
            </xs:restriction>
          </xs:simpleType>
          <xs:element name="sensor">
            <xs:complexType>
              <xs:sequence>
                <xs:element name="name" type="xs:string"/>
                <xs:element name="battery" type="batteryType" minOccurs="0"/>
                <xs:element name="tag" type="xs:token" minOccurs="0" maxOccurs="unbounded"/>
              </xs:sequence>
            </xs:complexType>
          </xs:element>
        </xs:schema>"#;

    fn particles(schema: &Schema, root: &str) -> Vec<ElementDecl> {
        match &schema.elements[root].content {
            Content::Complex(Some(group)) => group.particles.clone(),
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn test_compiles_named_types_and_occurrences() {
        let schema = compile(SENSOR).unwrap();
        assert_eq!(schema.roots().collect::<Vec<_>>(), vec!["sensor"]);

        let particles = particles(&schema, "sensor");
        let names: Vec<_> = particles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["name", "battery", "tag"]);
        assert_eq!(particles[1].min_occurs, 0);
        assert_eq!(particles[2].max_occurs, None);

        let Content::Simple(battery) = &particles[1].content else {
            panic!("battery should be simple");
        };
        assert_eq!(battery.base, Builtin::Integer);
        assert_eq!(battery.facets.max_inclusive.as_ref().unwrap().literal, "100");
    }

    #[test]
    fn test_derived_simple_types_inherit_facets() {
        let schema = compile(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:simpleType name="shortText"><xs:restriction base="xs:string"><xs:maxLength value="10"/></xs:restriction></xs:simpleType>
              <xs:simpleType name="code"><xs:restriction base="shortText"><xs:pattern value="[A-Z]+"/></xs:restriction></xs:simpleType>
              <xs:element name="code" type="code"/>
            </xs:schema>"#,
        )
        .unwrap();
        let Content::Simple(ty) = &schema.elements["code"].content else {
            panic!("code should be simple");
        };
        assert_eq!(ty.facets.max_length, Some(10));
        assert_eq!(ty.facets.patterns.len(), 1);
        assert!(ty.facets.patterns[0].regex.is_match("ABC"));
        assert!(!ty.facets.patterns[0].regex.is_match("xABC"));
    }

    #[test]
    fn test_rejects_unsupported_constructs() {
        let err = compile(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:element name="a"><xs:complexType><xs:choice/></xs:complexType></xs:element>
            </xs:schema>"#,
        )
        .unwrap_err();
        assert!(err.contains("choice"), "{err}");
    }

    #[test]
    fn test_rejects_unknown_types_and_cycles() {
        let unknown = compile(
            r#"<xs:schema xmlns:xs="x"><xs:element name="a" type="nope"/></xs:schema>"#,
        )
        .unwrap_err();
        assert!(unknown.contains("'nope' is not defined"), "{unknown}");

        let cycle = compile(
            r#"<xs:schema xmlns:xs="x">
              <xs:complexType name="node"><xs:sequence><xs:element name="child" type="node"/></xs:sequence></xs:complexType>
              <xs:element name="root" type="node"/>
            </xs:schema>"#,
        )
        .unwrap_err();
        assert!(cycle.contains("circular"), "{cycle}");
    }

    #[test]
    fn test_all_group_requires_single_occurrence() {
        let err = compile(
            r#"<xs:schema xmlns:xs="x">
              <xs:element name="a"><xs:complexType><xs:all>
                <xs:element name="b" maxOccurs="2"/>
              </xs:all></xs:complexType></xs:element>
            </xs:schema>"#,
        )
        .unwrap_err();
        assert!(err.contains("xs:all"), "{err}");
    }

    #[test]
    fn test_rejects_documents_that_are_not_schemas() {
        assert!(compile("<company/>").is_err());
        assert!(compile("<xs:schema xmlns:xs=\"x\"/>").is_err());
        assert!(compile("not xml").is_err());
    }
}
