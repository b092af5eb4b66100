//! Schema content models and explicit validation.
//!
//! Every bound type declares its content model (element sequence or choice with occurrence
//! bounds, plus attribute uses). [`check`] compares an element against its model and reports
//! [`Violation`]s; the record types themselves never enforce cardinality. Whether a violation
//! rejects a document is decided by [`Strictness`] in the [`DecodeContext`].

use crate::xml::{Element, Name};
use crate::{VtjError, VtjResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper occurrence bound of a particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaxOccurs {
    Bounded(u32),
    Unbounded,
}

impl MaxOccurs {
    fn allows(self, count: u32) -> bool {
        match self {
            MaxOccurs::Bounded(max) => count <= max,
            MaxOccurs::Unbounded => true,
        }
    }
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxOccurs::Bounded(max) => write!(f, "{max}"),
            MaxOccurs::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// One element declaration inside a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Particle {
    pub name: Name,
    pub min_occurs: u32,
    pub max_occurs: MaxOccurs,
}

impl Particle {
    /// `minOccurs="1" maxOccurs="1"`.
    pub const fn required(name: Name) -> Self {
        Self {
            name,
            min_occurs: 1,
            max_occurs: MaxOccurs::Bounded(1),
        }
    }

    /// `minOccurs="0" maxOccurs="1"`.
    pub const fn optional(name: Name) -> Self {
        Self {
            name,
            min_occurs: 0,
            max_occurs: MaxOccurs::Bounded(1),
        }
    }

    /// `minOccurs="0" maxOccurs="unbounded"`.
    pub const fn repeated(name: Name) -> Self {
        Self {
            name,
            min_occurs: 0,
            max_occurs: MaxOccurs::Unbounded,
        }
    }

    /// `minOccurs="0" maxOccurs="{max}"`.
    pub const fn bounded(name: Name, max: u32) -> Self {
        Self {
            name,
            min_occurs: 0,
            max_occurs: MaxOccurs::Bounded(max),
        }
    }
}

/// Child element structure of a complex type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Particles {
    /// No child elements (simple content or empty).
    Empty,
    /// Children in declared order.
    Sequence(&'static [Particle]),
    /// Any mix of the listed elements, in any order.
    Choice {
        options: &'static [Name],
        min_occurs: u32,
        max_occurs: MaxOccurs,
    },
    /// Lax wildcard; only the number of children is checked.
    Any { max_occurs: MaxOccurs },
}

/// Attribute declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeUse {
    pub name: Name,
    pub required: bool,
}

impl AttributeUse {
    pub const fn required(name: Name) -> Self {
        Self {
            name,
            required: true,
        }
    }

    pub const fn optional(name: Name) -> Self {
        Self {
            name,
            required: false,
        }
    }
}

/// Content model of a complex type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentModel {
    pub particles: Particles,
    pub attributes: &'static [AttributeUse],
}

impl ContentModel {
    pub const fn sequence(particles: &'static [Particle]) -> Self {
        Self {
            particles: Particles::Sequence(particles),
            attributes: &[],
        }
    }

    /// Simple content: text plus attributes, no child elements.
    pub const fn simple(attributes: &'static [AttributeUse]) -> Self {
        Self {
            particles: Particles::Empty,
            attributes,
        }
    }

    pub const fn with_attributes(self, attributes: &'static [AttributeUse]) -> Self {
        Self {
            particles: self.particles,
            attributes,
        }
    }
}

/// What is wrong with an element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    MissingElement { element: String },
    TooManyOccurrences { element: String, max: String },
    UnexpectedElement { element: String },
    OutOfOrder { element: String },
    WrongNamespace { element: String, expected: String },
    MissingAttribute { attribute: String },
    ChoiceCardinality { found: u32, min: u32, max: String },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::MissingElement { element } => {
                write!(f, "required element {element} is missing")
            }
            ViolationKind::TooManyOccurrences { element, max } => {
                write!(f, "element {element} occurs more than {max} times")
            }
            ViolationKind::UnexpectedElement { element } => {
                write!(f, "element {element} is not allowed here")
            }
            ViolationKind::OutOfOrder { element } => {
                write!(f, "element {element} appears out of declared order")
            }
            ViolationKind::WrongNamespace { element, expected } => {
                write!(f, "element {element} should be in namespace {expected}")
            }
            ViolationKind::MissingAttribute { attribute } => {
                write!(f, "required attribute {attribute} is missing")
            }
            ViolationKind::ChoiceCardinality { found, min, max } => {
                write!(f, "found {found} choice entries, expected {min}..{max}")
            }
        }
    }
}

/// A schema violation located by its element path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub path: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

/// Check `element` against `model`, returning every violation found.
pub fn check(element: &Element, model: &ContentModel, path: &str) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut report = |kind: ViolationKind| {
        violations.push(Violation {
            path: path.to_string(),
            kind,
        })
    };

    for attribute in model.attributes.iter().filter(|a| a.required) {
        if element.attribute_ns(attribute.name).is_none() {
            report(ViolationKind::MissingAttribute {
                attribute: attribute.name.to_string(),
            });
        }
    }

    match model.particles {
        Particles::Empty => {
            for child in &element.children {
                report(ViolationKind::UnexpectedElement {
                    element: child.display_name(),
                });
            }
        }
        Particles::Sequence(particles) => check_sequence(element, particles, &mut report),
        Particles::Choice {
            options,
            min_occurs,
            max_occurs,
        } => {
            let mut found = 0;
            for child in &element.children {
                match options.iter().find(|o| o.local == child.local_name) {
                    Some(option) => {
                        found += 1;
                        check_namespace(child, option, &mut report);
                    }
                    None => report(ViolationKind::UnexpectedElement {
                        element: child.display_name(),
                    }),
                }
            }
            if found < min_occurs || !max_occurs.allows(found) {
                report(ViolationKind::ChoiceCardinality {
                    found,
                    min: min_occurs,
                    max: max_occurs.to_string(),
                });
            }
        }
        Particles::Any { max_occurs } => {
            let found = u32::try_from(element.children.len()).unwrap_or(u32::MAX);
            if !max_occurs.allows(found) {
                report(ViolationKind::ChoiceCardinality {
                    found,
                    min: 0,
                    max: max_occurs.to_string(),
                });
            }
        }
    }

    violations
}

fn check_sequence(
    element: &Element,
    particles: &[Particle],
    report: &mut impl FnMut(ViolationKind),
) {
    let mut index = 0;
    let mut count = 0;

    for child in &element.children {
        let position = particles[index..]
            .iter()
            .position(|p| p.name.local == child.local_name);

        match position {
            Some(offset) => {
                if offset > 0 {
                    check_minimum(&particles[index], count, report);
                    for skipped in &particles[index + 1..index + offset] {
                        check_minimum(skipped, 0, report);
                    }
                    index += offset;
                    count = 0;
                }
                count += 1;
                let particle = &particles[index];
                check_namespace(child, &particle.name, report);
                if count == exceeded_at(particle.max_occurs) {
                    report(ViolationKind::TooManyOccurrences {
                        element: particle.name.to_string(),
                        max: particle.max_occurs.to_string(),
                    });
                }
            }
            None if particles[..index]
                .iter()
                .any(|p| p.name.local == child.local_name) =>
            {
                report(ViolationKind::OutOfOrder {
                    element: child.display_name(),
                });
            }
            None => report(ViolationKind::UnexpectedElement {
                element: child.display_name(),
            }),
        }
    }

    if let Some(current) = particles.get(index) {
        check_minimum(current, count, report);
        for remaining in &particles[index + 1..] {
            check_minimum(remaining, 0, report);
        }
    }
}

// Report the overflow once, on the first occurrence past the bound.
fn exceeded_at(max: MaxOccurs) -> u32 {
    match max {
        MaxOccurs::Bounded(max) => max + 1,
        MaxOccurs::Unbounded => 0,
    }
}

fn check_minimum(particle: &Particle, count: u32, report: &mut impl FnMut(ViolationKind)) {
    if count < particle.min_occurs {
        report(ViolationKind::MissingElement {
            element: particle.name.to_string(),
        });
    }
}

// Unqualified children are accepted, matching `Element::is`.
fn check_namespace(child: &Element, declared: &Name, report: &mut impl FnMut(ViolationKind)) {
    let Some(namespace) = child.namespace.as_deref() else {
        return;
    };
    if Some(namespace) != declared.namespace {
        report(ViolationKind::WrongNamespace {
            element: child.display_name(),
            expected: declared.namespace.unwrap_or("(none)").to_string(),
        });
    }
}

// ============================================================================
// Decoding policy
// ============================================================================

/// How schema violations are handled while decoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Violations are logged and collected; decoding continues.
    #[default]
    Lax,
    /// The first violation aborts decoding.
    Strict,
}

/// State threaded through a decode: policy, current element path, collected violations.
#[derive(Debug)]
pub struct DecodeContext {
    strictness: Strictness,
    path: Vec<String>,
    violations: Vec<Violation>,
}

impl DecodeContext {
    pub fn new(strictness: Strictness) -> Self {
        Self {
            strictness,
            path: Vec::new(),
            violations: Vec::new(),
        }
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Slash-joined path of the element currently being decoded.
    pub fn path(&self) -> String {
        if self.path.is_empty() {
            "<root>".to_string()
        } else {
            self.path.join("/")
        }
    }

    pub(crate) fn enter(&mut self, segment: String) {
        self.path.push(segment);
    }

    pub(crate) fn leave(&mut self) {
        self.path.pop();
    }

    /// Validate `element` against `model` at the current path.
    ///
    /// # Errors
    ///
    /// In strict mode returns [`VtjError::Schema`] with the first violation.
    pub fn validate(&mut self, element: &Element, model: &ContentModel) -> VtjResult<()> {
        let found = check(element, model, &self.path());
        if found.is_empty() {
            return Ok(());
        }
        for violation in &found {
            tracing::debug!(%violation, "schema violation");
        }
        if self.strictness == Strictness::Strict {
            return Err(VtjError::Schema(found[0].clone()));
        }
        self.violations.extend(found);
        Ok(())
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
