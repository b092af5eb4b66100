//! Translation between typed records and the XML element tree.
//!
//! Every bound type implements [`XmlType`]: it declares its [`ContentModel`] and knows how to
//! read its fields from an element and write them back in declared order. Types that can be a
//! document root also implement [`RootElement`].
//!
//! Reading is deliberately forgiving: the content model is checked by [`decode`] through the
//! [`DecodeContext`], and the `read` implementations simply pick up whatever children are present.

use crate::schema::{ContentModel, DecodeContext};
use crate::xml::{Element, Name};
use crate::{VtjError, VtjResult};
use std::str::FromStr;

/// A complex type bound to XML.
pub trait XmlType: Sized {
    /// Content model the element is checked against before reading.
    const CONTENT: &'static ContentModel;

    /// Read the fields of `Self` from `element`.
    fn read(element: &Element, ctx: &mut DecodeContext) -> VtjResult<Self>;

    /// Write attributes and children of `self` into `element`, in declared order.
    fn write(&self, element: &mut Element);
}

/// A type declared as a global element.
pub trait RootElement: XmlType {
    const NAME: Name;
}

/// Validate `element` against `T`'s content model, then read it.
pub fn decode<T: XmlType>(element: &Element, ctx: &mut DecodeContext) -> VtjResult<T> {
    ctx.validate(element, T::CONTENT)?;
    T::read(element, ctx)
}

/// Decode a document root, checking that it is `T::NAME`.
///
/// # Errors
///
/// Returns [`VtjError::UnexpectedRoot`] if the root element has another name.
pub fn decode_root<T: RootElement>(element: &Element, ctx: &mut DecodeContext) -> VtjResult<T> {
    if !element.is(T::NAME) {
        return Err(VtjError::UnexpectedRoot {
            expected: T::NAME.to_string(),
            found: element.display_name(),
        });
    }
    ctx.enter(element.local_name.clone());
    let value = decode(element, ctx)?;
    ctx.leave();
    Ok(value)
}

/// Build the element `name` holding `value`.
pub fn to_element<T: XmlType>(value: &T, name: Name) -> Element {
    let mut element = Element::new(name);
    value.write(&mut element);
    element
}

/// Decode the first child named `name`, if present.
pub fn read_child<T: XmlType>(
    parent: &Element,
    name: Name,
    ctx: &mut DecodeContext,
) -> VtjResult<Option<T>> {
    let Some(child) = parent.child(name) else {
        return Ok(None);
    };
    ctx.enter(name.local.to_string());
    let value = decode(child, ctx)?;
    ctx.leave();
    Ok(Some(value))
}

/// Decode every child named `name`, in document order.
pub fn read_children<T: XmlType>(
    parent: &Element,
    name: Name,
    ctx: &mut DecodeContext,
) -> VtjResult<Vec<T>> {
    let mut values = Vec::new();
    for (index, child) in parent.children_named(name).enumerate() {
        ctx.enter(format!("{}[{}]", name.local, index + 1));
        values.push(decode(child, ctx)?);
        ctx.leave();
    }
    Ok(values)
}

/// Parse the text of the child `name` into `T`.
///
/// A value that does not parse is a decode error in every strictness mode.
pub fn read_parsed<T>(parent: &Element, name: Name, ctx: &DecodeContext) -> VtjResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(text) = parent.child_text(name) else {
        return Ok(None);
    };
    text.trim()
        .parse()
        .map(Some)
        .map_err(|e| VtjError::InvalidValue {
            path: format!("{}/{}", ctx.path(), name.local),
            message: format!("'{text}': {e}"),
        })
}

/// Append the child `name` when `value` is present.
pub fn write_child<T: XmlType>(parent: &mut Element, name: Name, value: Option<&T>) {
    if let Some(value) = value {
        parent.push_child(to_element(value, name));
    }
}

/// Append one child `name` per value.
pub fn write_children<T: XmlType>(parent: &mut Element, name: Name, values: &[T]) {
    for value in values {
        parent.push_child(to_element(value, name));
    }
}

/// Declare a record whose fields are optional text-only child elements.
///
/// Fields are written in the order listed, which is the declared sequence order.
macro_rules! text_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $type:ident in $ns:ident {
            $($field:ident => $tag:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        $vis struct $type {
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<String>,
            )*
        }

        impl $crate::binding::XmlType for $type {
            const CONTENT: &'static $crate::schema::ContentModel =
                &$crate::schema::ContentModel::sequence(&[
                    $($crate::schema::Particle::optional($crate::xml::Name::$ns($tag)),)*
                ]);

            fn read(
                element: &$crate::xml::Element,
                _ctx: &mut $crate::schema::DecodeContext,
            ) -> $crate::VtjResult<Self> {
                Ok(Self {
                    $($field: element.child_text($crate::xml::Name::$ns($tag)),)*
                })
            }

            fn write(&self, element: &mut $crate::xml::Element) {
                $(element.push_text_child($crate::xml::Name::$ns($tag), self.$field.as_deref());)*
            }
        }
    };
}

pub(crate) use text_record;
