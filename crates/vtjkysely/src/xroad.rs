//! X-Road message protocol header elements and identifiers.
//!
//! Only the header *elements* are modelled here; wrapping them in a SOAP envelope is the job of
//! the transport layer. [`XRoadHeader::to_elements`] yields the header children in the order the
//! protocol lists them and [`XRoadHeader::from_elements`] reads them back in any order.

use crate::binding::{decode, to_element, XmlType};
use crate::schema::{check, AttributeUse, ContentModel, DecodeContext, Particle, Violation};
use crate::xml::{Element, Name};
use crate::{VtjError, VtjResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Protocol version written by [`XRoadHeader::new`].
pub const PROTOCOL_VERSION: &str = "4.0";

pub const CLIENT: Name = Name::xroad("client");
pub const SERVICE: Name = Name::xroad("service");
pub const CENTRAL_SERVICE: Name = Name::xroad("centralService");
pub const ID: Name = Name::xroad("id");
pub const USER_ID: Name = Name::xroad("userId");
pub const ISSUE: Name = Name::xroad("issue");
pub const PROTOCOL_VERSION_ELEMENT: Name = Name::xroad("protocolVersion");
pub const VERSION: Name = Name::xroad("version");
pub const REQUEST_HASH: Name = Name::xroad("requestHash");
pub const TITLE: Name = Name::xroad("title");
pub const NOTES: Name = Name::xroad("notes");
pub const TECH_NOTES: Name = Name::xroad("techNotes");

pub const X_ROAD_INSTANCE: Name = Name::identifiers("xRoadInstance");
pub const MEMBER_CLASS: Name = Name::identifiers("memberClass");
pub const MEMBER_CODE: Name = Name::identifiers("memberCode");
pub const SUBSYSTEM_CODE: Name = Name::identifiers("subsystemCode");
pub const GROUP_CODE: Name = Name::identifiers("groupCode");
pub const SERVICE_CODE: Name = Name::identifiers("serviceCode");
pub const SERVICE_VERSION: Name = Name::identifiers("serviceVersion");
pub const SECURITY_CATEGORY_CODE: Name = Name::identifiers("securityCategoryCode");
pub const SERVER_CODE: Name = Name::identifiers("serverCode");

const OBJECT_TYPE: Name = Name::identifiers("objectType");
const ALGORITHM_ID: Name = Name::unqualified("algorithmId");
const LANG: Name = Name::new(crate::namespaces::XML, "lang");

const OBJECT_TYPE_REQUIRED: &[AttributeUse] = &[AttributeUse::required(OBJECT_TYPE)];

// ============================================================================
// Object types
// ============================================================================

/// Kind of X-Road object an identifier points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum XRoadObjectType {
    Member,
    Subsystem,
    Server,
    GlobalGroup,
    LocalGroup,
    SecurityCategory,
    Service,
    CentralService,
}

impl XRoadObjectType {
    pub const ALL: [XRoadObjectType; 8] = [
        XRoadObjectType::Member,
        XRoadObjectType::Subsystem,
        XRoadObjectType::Server,
        XRoadObjectType::GlobalGroup,
        XRoadObjectType::LocalGroup,
        XRoadObjectType::SecurityCategory,
        XRoadObjectType::Service,
        XRoadObjectType::CentralService,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            XRoadObjectType::Member => "MEMBER",
            XRoadObjectType::Subsystem => "SUBSYSTEM",
            XRoadObjectType::Server => "SERVER",
            XRoadObjectType::GlobalGroup => "GLOBALGROUP",
            XRoadObjectType::LocalGroup => "LOCALGROUP",
            XRoadObjectType::SecurityCategory => "SECURITYCATEGORY",
            XRoadObjectType::Service => "SERVICE",
            XRoadObjectType::CentralService => "CENTRALSERVICE",
        }
    }

    /// Content model of identifiers of this kind.
    pub fn restriction(self) -> &'static ContentModel {
        match self {
            XRoadObjectType::Member => MEMBER_IDENTIFIER,
            XRoadObjectType::Subsystem => SUBSYSTEM_IDENTIFIER,
            XRoadObjectType::Server => SERVER_IDENTIFIER,
            XRoadObjectType::GlobalGroup => GLOBAL_GROUP_IDENTIFIER,
            XRoadObjectType::LocalGroup => LOCAL_GROUP_IDENTIFIER,
            XRoadObjectType::SecurityCategory => SECURITY_CATEGORY_IDENTIFIER,
            XRoadObjectType::Service => SERVICE_IDENTIFIER,
            XRoadObjectType::CentralService => CENTRAL_SERVICE_IDENTIFIER,
        }
    }
}

impl fmt::Display for XRoadObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for XRoadObjectType {
    type Err = VtjError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        XRoadObjectType::ALL
            .into_iter()
            .find(|object_type| object_type.as_str() == s.trim())
            .ok_or_else(|| VtjError::InvalidValue {
                path: "@id:objectType".to_string(),
                message: format!("unknown X-Road object type '{s}'"),
            })
    }
}

// ============================================================================
// Identifiers
// ============================================================================

const IDENTIFIER: &ContentModel = &ContentModel::sequence(&[
    Particle::optional(X_ROAD_INSTANCE),
    Particle::optional(MEMBER_CLASS),
    Particle::optional(MEMBER_CODE),
    Particle::optional(SUBSYSTEM_CODE),
    Particle::optional(GROUP_CODE),
    Particle::optional(SERVICE_CODE),
    Particle::optional(SERVICE_VERSION),
    Particle::optional(SECURITY_CATEGORY_CODE),
    Particle::optional(SERVER_CODE),
])
.with_attributes(OBJECT_TYPE_REQUIRED);

const MEMBER_IDENTIFIER: &ContentModel = &ContentModel::sequence(&[
    Particle::required(X_ROAD_INSTANCE),
    Particle::required(MEMBER_CLASS),
    Particle::required(MEMBER_CODE),
])
.with_attributes(OBJECT_TYPE_REQUIRED);

const SUBSYSTEM_IDENTIFIER: &ContentModel = &ContentModel::sequence(&[
    Particle::required(X_ROAD_INSTANCE),
    Particle::required(MEMBER_CLASS),
    Particle::required(MEMBER_CODE),
    Particle::required(SUBSYSTEM_CODE),
])
.with_attributes(OBJECT_TYPE_REQUIRED);

const SERVER_IDENTIFIER: &ContentModel = &ContentModel::sequence(&[
    Particle::required(X_ROAD_INSTANCE),
    Particle::required(MEMBER_CLASS),
    Particle::required(MEMBER_CODE),
    Particle::required(SERVER_CODE),
])
.with_attributes(OBJECT_TYPE_REQUIRED);

const GLOBAL_GROUP_IDENTIFIER: &ContentModel = &ContentModel::sequence(&[
    Particle::required(X_ROAD_INSTANCE),
    Particle::required(GROUP_CODE),
])
.with_attributes(OBJECT_TYPE_REQUIRED);

const LOCAL_GROUP_IDENTIFIER: &ContentModel =
    &ContentModel::sequence(&[Particle::required(GROUP_CODE)])
        .with_attributes(OBJECT_TYPE_REQUIRED);

const SECURITY_CATEGORY_IDENTIFIER: &ContentModel = &ContentModel::sequence(&[
    Particle::required(X_ROAD_INSTANCE),
    Particle::required(SECURITY_CATEGORY_CODE),
])
.with_attributes(OBJECT_TYPE_REQUIRED);

const SERVICE_IDENTIFIER: &ContentModel = &ContentModel::sequence(&[
    Particle::required(X_ROAD_INSTANCE),
    Particle::required(MEMBER_CLASS),
    Particle::required(MEMBER_CODE),
    Particle::optional(SUBSYSTEM_CODE),
    Particle::required(SERVICE_CODE),
    Particle::optional(SERVICE_VERSION),
])
.with_attributes(OBJECT_TYPE_REQUIRED);

const CENTRAL_SERVICE_IDENTIFIER: &ContentModel = &ContentModel::sequence(&[
    Particle::required(X_ROAD_INSTANCE),
    Particle::required(SERVICE_CODE),
])
.with_attributes(OBJECT_TYPE_REQUIRED);

/// Identifier of an X-Road member, subsystem, service, server, group or security category.
///
/// The general type allows every field; which fields a given kind needs is checked by
/// [`XRoadIdentifier::check_restriction`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XRoadIdentifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_road_instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsystem_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_category_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_code: Option<String>,
    pub object_type: Option<XRoadObjectType>,
}

impl XRoadIdentifier {
    fn of(object_type: XRoadObjectType, x_road_instance: Option<String>) -> Self {
        Self {
            x_road_instance,
            object_type: Some(object_type),
            ..Self::default()
        }
    }

    pub fn member(
        x_road_instance: impl Into<String>,
        member_class: impl Into<String>,
        member_code: impl Into<String>,
    ) -> Self {
        Self {
            member_class: Some(member_class.into()),
            member_code: Some(member_code.into()),
            ..Self::of(XRoadObjectType::Member, Some(x_road_instance.into()))
        }
    }

    pub fn subsystem(
        x_road_instance: impl Into<String>,
        member_class: impl Into<String>,
        member_code: impl Into<String>,
        subsystem_code: impl Into<String>,
    ) -> Self {
        Self {
            object_type: Some(XRoadObjectType::Subsystem),
            subsystem_code: Some(subsystem_code.into()),
            ..Self::member(x_road_instance, member_class, member_code)
        }
    }

    /// Service provided by `provider` (a member or subsystem identifier).
    pub fn service(
        provider: &XRoadIdentifier,
        service_code: impl Into<String>,
        service_version: Option<String>,
    ) -> Self {
        Self {
            x_road_instance: provider.x_road_instance.clone(),
            member_class: provider.member_class.clone(),
            member_code: provider.member_code.clone(),
            subsystem_code: provider.subsystem_code.clone(),
            service_code: Some(service_code.into()),
            service_version,
            ..Self::of(XRoadObjectType::Service, None)
        }
    }

    pub fn central_service(
        x_road_instance: impl Into<String>,
        service_code: impl Into<String>,
    ) -> Self {
        Self {
            service_code: Some(service_code.into()),
            ..Self::of(XRoadObjectType::CentralService, Some(x_road_instance.into()))
        }
    }

    pub fn security_server(
        x_road_instance: impl Into<String>,
        member_class: impl Into<String>,
        member_code: impl Into<String>,
        server_code: impl Into<String>,
    ) -> Self {
        Self {
            object_type: Some(XRoadObjectType::Server),
            server_code: Some(server_code.into()),
            ..Self::member(x_road_instance, member_class, member_code)
        }
    }

    pub fn global_group(x_road_instance: impl Into<String>, group_code: impl Into<String>) -> Self {
        Self {
            group_code: Some(group_code.into()),
            ..Self::of(XRoadObjectType::GlobalGroup, Some(x_road_instance.into()))
        }
    }

    pub fn local_group(group_code: impl Into<String>) -> Self {
        Self {
            group_code: Some(group_code.into()),
            ..Self::of(XRoadObjectType::LocalGroup, None)
        }
    }

    pub fn security_category(
        x_road_instance: impl Into<String>,
        security_category_code: impl Into<String>,
    ) -> Self {
        Self {
            security_category_code: Some(security_category_code.into()),
            ..Self::of(XRoadObjectType::SecurityCategory, Some(x_road_instance.into()))
        }
    }

    /// Check the identifier against the restriction for its object type.
    ///
    /// An identifier without an object type reports the missing attribute.
    pub fn check_restriction(&self) -> Vec<Violation> {
        let element = to_element(self, Name::identifiers("identifier"));
        let model = self.object_type.map_or(IDENTIFIER, XRoadObjectType::restriction);
        check(&element, model, "identifier")
    }
}

impl fmt::Display for XRoadIdentifier {
    /// Slash-separated form, for example `SUBSYSTEM:FI/GOV/0245437-2/VTJkysely`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(object_type) = self.object_type {
            write!(f, "{object_type}:")?;
        }
        let parts = [
            &self.x_road_instance,
            &self.member_class,
            &self.member_code,
            &self.subsystem_code,
            &self.group_code,
            &self.security_category_code,
            &self.server_code,
            &self.service_code,
            &self.service_version,
        ];
        let joined: Vec<&str> = parts.iter().filter_map(|p| p.as_deref()).collect();
        f.write_str(&joined.join("/"))
    }
}

impl XmlType for XRoadIdentifier {
    const CONTENT: &'static ContentModel = IDENTIFIER;

    fn read(element: &Element, _ctx: &mut DecodeContext) -> VtjResult<Self> {
        let object_type = element
            .attribute_ns(OBJECT_TYPE)
            .map(XRoadObjectType::from_str)
            .transpose()?;

        Ok(Self {
            x_road_instance: element.child_text(X_ROAD_INSTANCE),
            member_class: element.child_text(MEMBER_CLASS),
            member_code: element.child_text(MEMBER_CODE),
            subsystem_code: element.child_text(SUBSYSTEM_CODE),
            group_code: element.child_text(GROUP_CODE),
            service_code: element.child_text(SERVICE_CODE),
            service_version: element.child_text(SERVICE_VERSION),
            security_category_code: element.child_text(SECURITY_CATEGORY_CODE),
            server_code: element.child_text(SERVER_CODE),
            object_type,
        })
    }

    fn write(&self, element: &mut Element) {
        element.set_optional_attribute(OBJECT_TYPE, self.object_type.map(XRoadObjectType::as_str));
        element.push_text_child(X_ROAD_INSTANCE, self.x_road_instance.as_deref());
        element.push_text_child(MEMBER_CLASS, self.member_class.as_deref());
        element.push_text_child(MEMBER_CODE, self.member_code.as_deref());
        element.push_text_child(SUBSYSTEM_CODE, self.subsystem_code.as_deref());
        element.push_text_child(GROUP_CODE, self.group_code.as_deref());
        element.push_text_child(SERVICE_CODE, self.service_code.as_deref());
        element.push_text_child(SERVICE_VERSION, self.service_version.as_deref());
        element.push_text_child(SECURITY_CATEGORY_CODE, self.security_category_code.as_deref());
        element.push_text_child(SERVER_CODE, self.server_code.as_deref());
    }
}

// ============================================================================
// Simple content elements
// ============================================================================

/// `xrd:requestHash`: hash of the request echoed in the response header.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHash {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm_id: Option<String>,
}

impl XmlType for RequestHash {
    const CONTENT: &'static ContentModel =
        &ContentModel::simple(&[AttributeUse::required(ALGORITHM_ID)]);

    fn read(element: &Element, _ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            value: element.text_content(),
            algorithm_id: element.attribute_ns(ALGORITHM_ID).map(str::to_owned),
        })
    }

    fn write(&self, element: &mut Element) {
        element.text = Some(self.value.clone());
        element.set_optional_attribute(ALGORITHM_ID, self.algorithm_id.as_deref());
    }
}

/// Text with an optional `xml:lang`, used by `xrd:title`, `xrd:notes` and `xrd:techNotes`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

pub type Title = LocalizedText;
pub type Notes = LocalizedText;
pub type TechNotes = LocalizedText;

impl LocalizedText {
    pub fn new(value: impl Into<String>, lang: Option<&str>) -> Self {
        Self {
            value: value.into(),
            lang: lang.map(str::to_owned),
        }
    }
}

impl XmlType for LocalizedText {
    const CONTENT: &'static ContentModel = &ContentModel::simple(&[AttributeUse::optional(LANG)]);

    fn read(element: &Element, _ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            value: element.text_content(),
            lang: element.attribute_ns(LANG).map(str::to_owned),
        })
    }

    fn write(&self, element: &mut Element) {
        element.text = Some(self.value.clone());
        element.set_optional_attribute(LANG, self.lang.as_deref());
    }
}

// ============================================================================
// Header
// ============================================================================

/// X-Road protocol header fields of one message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XRoadHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<XRoadIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<XRoadIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub central_service: Option<XRoadIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_hash: Option<RequestHash>,
}

impl XRoadHeader {
    /// Header for a request from `client` to `service` with message id `id`.
    pub fn new(client: XRoadIdentifier, service: XRoadIdentifier, id: impl Into<String>) -> Self {
        Self {
            client: Some(client),
            service: Some(service),
            id: Some(id.into()),
            protocol_version: Some(PROTOCOL_VERSION.to_string()),
            ..Self::default()
        }
    }

    /// Header elements in protocol order.
    pub fn to_elements(&self) -> Vec<Element> {
        let mut elements = Vec::new();
        let identifiers = [
            (CLIENT, &self.client),
            (SERVICE, &self.service),
            (CENTRAL_SERVICE, &self.central_service),
        ];
        for (name, identifier) in identifiers {
            if let Some(identifier) = identifier {
                elements.push(to_element(identifier, name));
            }
        }
        let texts = [
            (ID, &self.id),
            (USER_ID, &self.user_id),
            (ISSUE, &self.issue),
            (PROTOCOL_VERSION_ELEMENT, &self.protocol_version),
        ];
        for (name, text) in texts {
            if let Some(text) = text {
                elements.push(Element::with_text(name, text.as_str()));
            }
        }
        if let Some(hash) = &self.request_hash {
            elements.push(to_element(hash, REQUEST_HASH));
        }
        elements
    }

    /// Read the header from SOAP header children.
    ///
    /// Elements that are not X-Road header fields are skipped. Identifiers are also checked
    /// against the restriction for their object type.
    ///
    /// # Errors
    ///
    /// Returns [`VtjError`] for an unknown object type, or in strict mode for a schema violation.
    pub fn from_elements(elements: &[Element], ctx: &mut DecodeContext) -> VtjResult<Self> {
        let mut header = Self::default();
        for element in elements {
            ctx.enter(element.local_name.clone());
            if element.is(CLIENT) {
                header.client = Some(read_identifier(element, ctx)?);
            } else if element.is(SERVICE) {
                header.service = Some(read_identifier(element, ctx)?);
            } else if element.is(CENTRAL_SERVICE) {
                header.central_service = Some(read_identifier(element, ctx)?);
            } else if element.is(ID) {
                header.id = Some(element.text_content());
            } else if element.is(USER_ID) {
                header.user_id = Some(element.text_content());
            } else if element.is(ISSUE) {
                header.issue = Some(element.text_content());
            } else if element.is(PROTOCOL_VERSION_ELEMENT) {
                header.protocol_version = Some(element.text_content());
            } else if element.is(REQUEST_HASH) {
                header.request_hash = Some(decode(element, ctx)?);
            } else {
                tracing::debug!(element = %element.display_name(), "skipping non X-Road header element");
            }
            ctx.leave();
        }
        Ok(header)
    }
}

fn read_identifier(element: &Element, ctx: &mut DecodeContext) -> VtjResult<XRoadIdentifier> {
    let identifier: XRoadIdentifier = decode(element, ctx)?;
    if let Some(object_type) = identifier.object_type {
        ctx.validate(element, object_type.restriction())?;
    }
    Ok(identifier)
}
