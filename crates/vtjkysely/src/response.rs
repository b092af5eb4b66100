//! Result bodies: the echoed request parameters plus the result payload or fault.
//!
//! A result type is an ordered list mixing the result document with `faultCode` and
//! `faultString` entries. Person lookups carry a [`VtjHenkiloVastaussanoma`]; building and
//! property documents belong to another schema and are kept as raw [`AnyElement`] trees.

use crate::binding::{
    decode, read_child, text_record, to_element, write_child, RootElement, XmlType,
};
use crate::henkilo::VtjHenkiloVastaussanoma;
use crate::request::{
    HenkiloTunnistusKyselyReqBodyTiedot, HenkiloTunnusKyselyReqBodyTiedot,
    KiinteistoTunnistusKyselyReqBodyTiedot, KiinteistoTunnusKyselyReqBodyTiedot,
    RakennusTunnistusKyselyReqBodyTiedot, RakennusTunnusKyselyReqBodyTiedot,
    TuotteenSkeemaReqBodyTiedot, REQUEST,
};
use crate::schema::{ContentModel, DecodeContext, MaxOccurs, Particle, Particles};
use crate::xml::{Element, Name};
use crate::VtjResult;
use serde::{Deserialize, Serialize};

pub const FAULT_CODE: Name = Name::vtj("faultCode");
pub const FAULT_STRING: Name = Name::vtj("faultString");

const RESPONSE: Name = Name::vtj("response");
const REGUEST: Name = Name::vtj("reguest");

text_record! {
    /// Fault reported in place of a result document.
    pub struct FaultResponseType in vtj {
        fault_code => "faultCode",
        fault_string => "faultString",
    }
}

/// An element from a schema this crate does not model, kept verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnyElement(pub Element);

/// A document that can appear as the payload of a result type.
pub trait ResultDocument: Sized {
    /// Content model of the result type carrying this document.
    const RESULT_CONTENT: &'static ContentModel;

    /// Whether `element` is this document.
    fn matches(element: &Element) -> bool;

    fn read_document(element: &Element, ctx: &mut DecodeContext) -> VtjResult<Self>;

    fn to_document(&self) -> Element;
}

impl ResultDocument for VtjHenkiloVastaussanoma {
    const RESULT_CONTENT: &'static ContentModel = &ContentModel {
        particles: Particles::Choice {
            options: &[VtjHenkiloVastaussanoma::NAME, FAULT_CODE, FAULT_STRING],
            min_occurs: 0,
            max_occurs: MaxOccurs::Unbounded,
        },
        attributes: &[],
    };

    fn matches(element: &Element) -> bool {
        element.is(Self::NAME)
    }

    fn read_document(element: &Element, ctx: &mut DecodeContext) -> VtjResult<Self> {
        decode(element, ctx)
    }

    fn to_document(&self) -> Element {
        to_element(self, Self::NAME)
    }
}

impl ResultDocument for AnyElement {
    const RESULT_CONTENT: &'static ContentModel = &ContentModel {
        particles: Particles::Any {
            max_occurs: MaxOccurs::Unbounded,
        },
        attributes: &[],
    };

    fn matches(element: &Element) -> bool {
        !element.is(FAULT_CODE) && !element.is(FAULT_STRING)
    }

    fn read_document(element: &Element, _ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(AnyElement(element.clone()))
    }

    fn to_document(&self) -> Element {
        self.0.clone()
    }
}

/// One entry of a result type, in document order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum KyselyResEntry<D> {
    Document(D),
    FaultCode(String),
    FaultString(String),
}

/// Result of a lookup: result documents and faults in document order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KyselyResType<D> {
    #[serde(default = "Vec::new")]
    pub entries: Vec<KyselyResEntry<D>>,
}

pub type HenkiloTunnusKyselyResType = KyselyResType<VtjHenkiloVastaussanoma>;
pub type HenkiloTunnistusKyselyResType = KyselyResType<VtjHenkiloVastaussanoma>;
pub type RakennusTunnusKyselyResType = KyselyResType<AnyElement>;
pub type RakennusTunnistusKyselyResType = KyselyResType<AnyElement>;
pub type KiinteistoTunnusKyselyResType = KyselyResType<AnyElement>;
pub type KiinteistoTunnistusKyselyResType = KyselyResType<AnyElement>;

impl<D> Default for KyselyResType<D> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<D> KyselyResType<D> {
    pub fn with_document(document: D) -> Self {
        Self {
            entries: vec![KyselyResEntry::Document(document)],
        }
    }

    pub fn with_fault(fault: FaultResponseType) -> Self {
        let mut result = Self::default();
        result.entries.extend(fault.fault_code.map(KyselyResEntry::FaultCode));
        result
            .entries
            .extend(fault.fault_string.map(KyselyResEntry::FaultString));
        result
    }

    /// The first result document.
    pub fn document(&self) -> Option<&D> {
        self.documents().next()
    }

    pub fn documents(&self) -> impl Iterator<Item = &D> {
        self.entries.iter().filter_map(|entry| match entry {
            KyselyResEntry::Document(document) => Some(document),
            _ => None,
        })
    }

    /// The first fault code and fault string, if either is present.
    pub fn fault(&self) -> Option<FaultResponseType> {
        let mut fault = FaultResponseType::default();
        for entry in &self.entries {
            match entry {
                KyselyResEntry::FaultCode(code) if fault.fault_code.is_none() => {
                    fault.fault_code = Some(code.clone());
                }
                KyselyResEntry::FaultString(text) if fault.fault_string.is_none() => {
                    fault.fault_string = Some(text.clone());
                }
                _ => {}
            }
        }
        (fault != FaultResponseType::default()).then_some(fault)
    }
}

impl<D: ResultDocument> XmlType for KyselyResType<D> {
    const CONTENT: &'static ContentModel = D::RESULT_CONTENT;

    fn read(element: &Element, ctx: &mut DecodeContext) -> VtjResult<Self> {
        let mut entries = Vec::new();
        for child in &element.children {
            if child.is(FAULT_CODE) {
                entries.push(KyselyResEntry::FaultCode(child.text_content()));
            } else if child.is(FAULT_STRING) {
                entries.push(KyselyResEntry::FaultString(child.text_content()));
            } else if D::matches(child) {
                ctx.enter(child.local_name.clone());
                entries.push(KyselyResEntry::Document(D::read_document(child, ctx)?));
                ctx.leave();
            }
        }
        Ok(Self { entries })
    }

    fn write(&self, element: &mut Element) {
        for entry in &self.entries {
            let child = match entry {
                KyselyResEntry::Document(document) => document.to_document(),
                KyselyResEntry::FaultCode(code) => Element::with_text(FAULT_CODE, code.as_str()),
                KyselyResEntry::FaultString(text) => {
                    Element::with_text(FAULT_STRING, text.as_str())
                }
            };
            element.push_child(child);
        }
    }
}

const RES_BODY: &ContentModel = &ContentModel::sequence(&[
    Particle::optional(REQUEST),
    Particle::optional(RESPONSE),
]);

/// Result body: the echoed request parameters and the result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KyselyResBody<T, R> {
    pub request: Option<T>,
    pub response: Option<R>,
}

pub type HenkiloTunnusKyselyResBody =
    KyselyResBody<HenkiloTunnusKyselyReqBodyTiedot, HenkiloTunnusKyselyResType>;
pub type HenkiloTunnistusKyselyResBody =
    KyselyResBody<HenkiloTunnistusKyselyReqBodyTiedot, HenkiloTunnistusKyselyResType>;
pub type RakennusTunnusKyselyResBody =
    KyselyResBody<RakennusTunnusKyselyReqBodyTiedot, RakennusTunnusKyselyResType>;
pub type RakennusTunnistusKyselyResBody =
    KyselyResBody<RakennusTunnistusKyselyReqBodyTiedot, RakennusTunnistusKyselyResType>;
pub type KiinteistoTunnusKyselyResBody =
    KyselyResBody<KiinteistoTunnusKyselyReqBodyTiedot, KiinteistoTunnusKyselyResType>;
pub type KiinteistoTunnistusKyselyResBody =
    KyselyResBody<KiinteistoTunnistusKyselyReqBodyTiedot, KiinteistoTunnistusKyselyResType>;

impl<T, R> Default for KyselyResBody<T, R> {
    fn default() -> Self {
        Self {
            request: None,
            response: None,
        }
    }
}

impl<T, R> KyselyResBody<T, R> {
    pub fn new(request: T, response: R) -> Self {
        Self {
            request: Some(request),
            response: Some(response),
        }
    }
}

impl<T: XmlType, R: XmlType> XmlType for KyselyResBody<T, R> {
    const CONTENT: &'static ContentModel = RES_BODY;

    fn read(element: &Element, ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            request: read_child(element, REQUEST, ctx)?,
            response: read_child(element, RESPONSE, ctx)?,
        })
    }

    fn write(&self, element: &mut Element) {
        write_child(element, REQUEST, self.request.as_ref());
        write_child(element, RESPONSE, self.response.as_ref());
    }
}

// ============================================================================
// Product schema
// ============================================================================

/// Product schema document, returned as a single element of any namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuotteenSkeemaResType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any: Option<AnyElement>,
}

impl XmlType for TuotteenSkeemaResType {
    const CONTENT: &'static ContentModel = &ContentModel {
        particles: Particles::Any {
            max_occurs: MaxOccurs::Bounded(1),
        },
        attributes: &[],
    };

    fn read(element: &Element, _ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            any: element.children.first().cloned().map(AnyElement),
        })
    }

    fn write(&self, element: &mut Element) {
        if let Some(any) = &self.any {
            element.push_child(any.0.clone());
        }
    }
}

const TUOTTEEN_SKEEMA_RES_BODY: &ContentModel = &ContentModel::sequence(&[
    Particle::optional(REGUEST),
    Particle::optional(RESPONSE),
]);

/// Result body of a product schema request.
///
/// The echoed parameters are in an element named `reguest`, as published in the service
/// description.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuotteenSkeemaResBody {
    pub reguest: Option<TuotteenSkeemaReqBodyTiedot>,
    pub response: Option<TuotteenSkeemaResType>,
}

impl XmlType for TuotteenSkeemaResBody {
    const CONTENT: &'static ContentModel = TUOTTEEN_SKEEMA_RES_BODY;

    fn read(element: &Element, ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            reguest: read_child(element, REGUEST, ctx)?,
            response: read_child(element, RESPONSE, ctx)?,
        })
    }

    fn write(&self, element: &mut Element) {
        write_child(element, REGUEST, self.reguest.as_ref());
        write_child(element, RESPONSE, self.response.as_ref());
    }
}
