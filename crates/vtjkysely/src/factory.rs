//! Global element declarations: the string wrapper elements and the SOAP body elements.
//!
//! Complex types are built with their own constructors and `Default`; this module only maps
//! qualified element names to the value they carry.

use crate::binding::{decode, to_element};
use crate::request::{
    HenkiloTunnistusKyselyReqBody, HenkiloTunnusKyselyReqBody, KiinteistoTunnistusKyselyReqBody,
    KiinteistoTunnusKyselyReqBody, RakennusTunnistusKyselyReqBody, RakennusTunnusKyselyReqBody,
    TuotteenSkeemaReqBody,
};
use crate::response::{
    HenkiloTunnistusKyselyResBody, HenkiloTunnusKyselyResBody, KiinteistoTunnistusKyselyResBody,
    KiinteistoTunnusKyselyResBody, RakennusTunnistusKyselyResBody, RakennusTunnusKyselyResBody,
    TuotteenSkeemaResBody, FAULT_CODE, FAULT_STRING,
};
use crate::schema::DecodeContext;
use crate::xml::{Element, Name};
use crate::xroad;
use crate::{VtjError, VtjResult};
use serde::{Deserialize, Serialize};

macro_rules! qualified_text {
    ($($variant:ident => $name:expr,)+) => {
        /// A global element whose content is a single string.
        #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(tag = "element", content = "value", rename_all = "camelCase")]
        pub enum QualifiedText {
            $($variant(String),)+
        }

        impl QualifiedText {
            /// Every string element name, in declaration order.
            pub const NAMES: &'static [Name] = &[$($name,)+];

            pub fn name(&self) -> Name {
                match self {
                    $(QualifiedText::$variant(_) => $name,)+
                }
            }

            pub fn value(&self) -> &str {
                match self {
                    $(QualifiedText::$variant(value) => value,)+
                }
            }

            /// Read a string element by its qualified name.
            ///
            /// # Errors
            ///
            /// Returns [`VtjError::UnexpectedRoot`] if `element` is not one of [`Self::NAMES`].
            pub fn from_element(element: &Element) -> VtjResult<Self> {
                let value = element.text_content();
                $(
                    if element.is($name) {
                        return Ok(QualifiedText::$variant(value));
                    }
                )+
                Err(VtjError::UnexpectedRoot {
                    expected: "a string element".to_string(),
                    found: element.display_name(),
                })
            }
        }
    };
}

qualified_text! {
    Id => xroad::ID,
    UserId => xroad::USER_ID,
    Issue => xroad::ISSUE,
    ProtocolVersion => xroad::PROTOCOL_VERSION_ELEMENT,
    Version => xroad::VERSION,
    XRoadInstance => xroad::X_ROAD_INSTANCE,
    MemberClass => xroad::MEMBER_CLASS,
    MemberCode => xroad::MEMBER_CODE,
    SubsystemCode => xroad::SUBSYSTEM_CODE,
    GroupCode => xroad::GROUP_CODE,
    ServiceCode => xroad::SERVICE_CODE,
    ServiceVersion => xroad::SERVICE_VERSION,
    SecurityCategoryCode => xroad::SECURITY_CATEGORY_CODE,
    ServerCode => xroad::SERVER_CODE,
    FaultCode => FAULT_CODE,
    FaultString => FAULT_STRING,
}

impl QualifiedText {
    pub fn to_element(&self) -> Element {
        Element::with_text(self.name(), self.value())
    }
}

macro_rules! body_elements {
    ($($variant:ident($body:ty),)+) => {
        /// One of the global elements that can form a SOAP body.
        ///
        /// Each variant is named after its element in the web-service namespace.
        #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(tag = "element", content = "body")]
        pub enum BodyElement {
            $($variant($body),)+
        }

        impl BodyElement {
            /// Every body element name, in declaration order.
            pub const NAMES: &'static [Name] = &[$(Name::vtj(stringify!($variant)),)+];

            pub fn name(&self) -> Name {
                match self {
                    $(BodyElement::$variant(_) => Name::vtj(stringify!($variant)),)+
                }
            }

            /// Decode a body element, dispatching on its qualified name.
            ///
            /// # Errors
            ///
            /// Returns [`VtjError::UnexpectedRoot`] for an element that is not a body element,
            /// and otherwise the errors of decoding the matched body.
            pub fn from_element(element: &Element, ctx: &mut DecodeContext) -> VtjResult<Self> {
                $(
                    if element.is(Name::vtj(stringify!($variant))) {
                        tracing::debug!(element = stringify!($variant), "decoding body element");
                        ctx.enter(element.local_name.clone());
                        let body: $body = decode(element, ctx)?;
                        ctx.leave();
                        return Ok(BodyElement::$variant(body));
                    }
                )+
                Err(VtjError::UnexpectedRoot {
                    expected: "a VTJ query body element".to_string(),
                    found: element.display_name(),
                })
            }

            pub fn to_element(&self) -> Element {
                match self {
                    $(BodyElement::$variant(body) => to_element(body, self.name()),)+
                }
            }
        }
    };
}

body_elements! {
    HenkilonTunnusKysely(HenkiloTunnusKyselyReqBody),
    HenkilonTunnusKyselyResponse(HenkiloTunnusKyselyResBody),
    HenkilonTunnistusKysely(HenkiloTunnistusKyselyReqBody),
    HenkilonTunnistusKyselyResponse(HenkiloTunnistusKyselyResBody),
    RakennuksenTunnusKysely(RakennusTunnusKyselyReqBody),
    RakennuksenTunnusKyselyResponse(RakennusTunnusKyselyResBody),
    RakennuksenTunnistusKysely(RakennusTunnistusKyselyReqBody),
    RakennuksenTunnistusKyselyResponse(RakennusTunnistusKyselyResBody),
    KiinteistonTunnusKysely(KiinteistoTunnusKyselyReqBody),
    KiinteistonTunnusKyselyResponse(KiinteistoTunnusKyselyResBody),
    KiinteistonTunnistusKysely(KiinteistoTunnistusKyselyReqBody),
    KiinteistonTunnistusKyselyResponse(KiinteistoTunnistusKyselyResBody),
    HaeTuotteenSkeema(TuotteenSkeemaReqBody),
    HaeTuotteenSkeemaResponse(TuotteenSkeemaResBody),
}

impl BodyElement {
    /// Whether this is a result body rather than a request body.
    pub fn is_response(&self) -> bool {
        self.name().local.ends_with("Response")
    }
}
