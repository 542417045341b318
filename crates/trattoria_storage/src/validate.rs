//! Discriminant-gated attribute rules.
//!
//! Some persisted records carry a tag (a role, a category) alongside a flat
//! set of optional attributes. For each tag value only a subset of those
//! attributes may be populated, and some of them must be.

use std::fmt;

use trattoria_foundation::{Error, Result};

/// A record whose legal attributes depend on a tag value.
pub trait Discriminated<T> {
    /// Returns the tag selecting the legal attribute subset.
    fn discriminant(&self) -> T;

    /// Returns true if the named attribute holds a value.
    fn is_populated(&self, attribute: &str) -> bool;
}

#[derive(Clone, Debug)]
struct Rule<T> {
    tag: T,
    mandatory: Vec<&'static str>,
    optional: Vec<&'static str>,
}

impl<T> Rule<T> {
    fn allows(&self, attribute: &str) -> bool {
        self.mandatory.contains(&attribute) || self.optional.contains(&attribute)
    }
}

/// Checks that exactly the attributes legal for a record's tag are populated.
///
/// # Example
///
/// ```
/// use trattoria_storage::{ConditionalValidator, Discriminated};
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Shape { Circle, Rect }
///
/// struct Draft { shape: Shape, radius: Option<u32>, width: Option<u32> }
///
/// impl Discriminated<Shape> for Draft {
///     fn discriminant(&self) -> Shape { self.shape }
///     fn is_populated(&self, attribute: &str) -> bool {
///         match attribute {
///             "radius" => self.radius.is_some(),
///             "width" => self.width.is_some(),
///             _ => false,
///         }
///     }
/// }
///
/// let rules = ConditionalValidator::new("shape", &["radius", "width"])
///     .rule(Shape::Circle, &["radius"], &[])
///     .rule(Shape::Rect, &["width"], &[]);
///
/// assert!(rules.validate(&Draft { shape: Shape::Circle, radius: Some(2), width: None }).is_ok());
/// assert!(rules.validate(&Draft { shape: Shape::Circle, radius: Some(2), width: Some(1) }).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct ConditionalValidator<T> {
    discriminant: &'static str,
    attributes: Vec<&'static str>,
    rules: Vec<Rule<T>>,
}

impl<T: PartialEq + fmt::Debug> ConditionalValidator<T> {
    /// Creates a validator over the given tag-dependent attributes.
    #[must_use]
    pub fn new(discriminant: &'static str, attributes: &[&'static str]) -> Self {
        Self {
            discriminant,
            attributes: attributes.to_vec(),
            rules: Vec::new(),
        }
    }

    /// Declares the mandatory and optional attributes for one tag value.
    #[must_use]
    pub fn rule(
        mut self,
        tag: T,
        mandatory: &[&'static str],
        optional: &[&'static str],
    ) -> Self {
        self.rules.push(Rule {
            tag,
            mandatory: mandatory.to_vec(),
            optional: optional.to_vec(),
        });
        self
    }

    /// Returns the attributes that may be populated for `tag`.
    #[must_use]
    pub fn legal(&self, tag: &T) -> Vec<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.tag == *tag)
            .map(|rule| {
                self.attributes
                    .iter()
                    .copied()
                    .filter(|attr| rule.allows(attr))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Validates a record against the rule for its tag.
    ///
    /// Reports the first illegal populated attribute in declaration order,
    /// then the first missing mandatory one.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending attribute, or naming
    /// the discriminant if its value has no rule.
    pub fn validate<E: Discriminated<T>>(&self, record: &E) -> Result<()> {
        let tag = record.discriminant();
        let rule = self
            .rules
            .iter()
            .find(|rule| rule.tag == tag)
            .ok_or_else(|| {
                Error::validation(self.discriminant, format!("no attribute rule for {tag:?}"))
            })?;

        if let Some(illegal) = self
            .attributes
            .iter()
            .find(|attr| record.is_populated(attr) && !rule.allows(attr))
        {
            return Err(Error::validation(
                *illegal,
                format!("not allowed when {} is {tag:?}", self.discriminant),
            ));
        }

        if let Some(missing) = rule.mandatory.iter().find(|attr| !record.is_populated(attr)) {
            return Err(Error::validation(
                *missing,
                format!("required when {} is {tag:?}", self.discriminant),
            ));
        }

        Ok(())
    }
}
