//! Wire model and XML codec for the VTJ population registry query service.
//!
//! This crate provides **wire models** and **format/translation helpers** for the SOAP body
//! payloads exchanged with the VTJ (Väestötietojärjestelmä) query interface:
//! - request parameter bodies for person, building, property and product-schema lookups
//! - result bodies, including the `VTJHenkiloVastaussanoma` person document
//! - X-Road identifier and header element types
//!
//! Documents are parsed into a namespace-resolved element tree ([`xml`]), checked against the
//! declared content models ([`schema`]) and bound to typed records ([`binding`]). Cardinality is
//! not enforced by the record types themselves; whether a schema violation rejects a document
//! is controlled by [`Strictness`].
//!
//! The SOAP envelope, transport security and the network client live outside this crate.

pub mod binding;
pub mod config;
pub mod factory;
pub mod henkilo;
pub mod namespaces;
pub mod paluukoodi;
pub mod request;
pub mod response;
pub mod schema;
pub mod xml;
pub mod xroad;

use std::path::Path;

// Re-export facades
pub use binding::{RootElement, XmlType};
pub use config::CodecConfig;
pub use factory::{BodyElement, QualifiedText};
pub use henkilo::VtjHenkiloVastaussanoma;
pub use paluukoodi::ReturnCode;
pub use schema::{DecodeContext, Strictness, Violation};
pub use xml::{Element, Name};
pub use xroad::{XRoadHeader, XRoadIdentifier, XRoadObjectType};

// Re-export validated primitives used in constructors
pub use vtj_types::{NonEmptyText, PersonalIdentityCode};

/// Errors returned by the `vtjkysely` codec.
#[derive(Debug, thiserror::Error)]
pub enum VtjError {
    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid UTF-8: {0}")]
    FromUtf8(#[from] std::string::FromUtf8Error),

    #[error("undeclared namespace prefix '{0}'")]
    UnknownPrefix(String),

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("unexpected root element: expected {expected}, found {found}")]
    UnexpectedRoot { expected: String, found: String },

    #[error("schema violation at {0}")]
    Schema(Violation),

    #[error("invalid value at {path}: {message}")]
    InvalidValue { path: String, message: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Type alias for Results that can fail with a [`VtjError`].
pub type VtjResult<T> = Result<T, VtjError>;

/// A decoded value together with the schema violations tolerated while decoding it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub violations: Vec<Violation>,
}

impl<T> Decoded<T> {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// XML codec for VTJ documents.
///
/// Holds the [`CodecConfig`] resolved at startup; every operation is otherwise stateless.
#[derive(Clone, Debug, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode a document whose root element is `T`.
    ///
    /// # Errors
    ///
    /// Returns [`VtjError`] if the XML is malformed, the root element is not `T::NAME`, a value
    /// cannot be converted, or (in strict mode) the document violates its content model.
    pub fn decode<T: RootElement>(&self, xml: &str) -> VtjResult<T> {
        self.decode_with_report(xml).map(|decoded| decoded.value)
    }

    /// Decode a document and return the schema violations tolerated in lax mode.
    ///
    /// # Errors
    ///
    /// See [`Codec::decode`].
    pub fn decode_with_report<T: RootElement>(&self, xml: &str) -> VtjResult<Decoded<T>> {
        let root = xml::parse_document(xml)?;
        let mut ctx = DecodeContext::new(self.config.strictness());
        let value = binding::decode_root::<T>(&root, &mut ctx)?;
        Ok(Decoded {
            value,
            violations: ctx.into_violations(),
        })
    }

    /// Encode `value` as a document rooted at `T::NAME`.
    ///
    /// # Errors
    ///
    /// Returns [`VtjError`] if writing the document fails.
    pub fn encode<T: RootElement>(&self, value: &T) -> VtjResult<String> {
        let element = binding::to_element(value, T::NAME);
        xml::render_document(&element, self.config.render_options())
    }

    /// Decode any of the SOAP body elements, dispatching on the root element name.
    ///
    /// # Errors
    ///
    /// Returns [`VtjError::UnexpectedRoot`] for a root that is not a known body element, and
    /// otherwise the errors of [`Codec::decode`].
    pub fn decode_body(&self, xml: &str) -> VtjResult<Decoded<BodyElement>> {
        let root = xml::parse_document(xml)?;
        let mut ctx = DecodeContext::new(self.config.strictness());
        let value = BodyElement::from_element(&root, &mut ctx)?;
        Ok(Decoded {
            value,
            violations: ctx.into_violations(),
        })
    }

    /// Encode a SOAP body element.
    ///
    /// # Errors
    ///
    /// Returns [`VtjError`] if writing the document fails.
    pub fn encode_body(&self, body: &BodyElement) -> VtjResult<String> {
        xml::render_document(&body.to_element(), self.config.render_options())
    }

    /// Read and decode a SOAP body element from a file.
    ///
    /// # Errors
    ///
    /// Returns [`VtjError::Io`] if the file cannot be read, and otherwise the errors of
    /// [`Codec::decode_body`].
    pub fn read_body_file(&self, path: &Path) -> VtjResult<Decoded<BodyElement>> {
        let xml = std::fs::read_to_string(path)?;
        self.decode_body(&xml)
    }
}
