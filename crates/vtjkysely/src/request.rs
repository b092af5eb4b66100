//! Request bodies and their parameter ("Tiedot") types.
//!
//! Every lookup carries the same credential group and, for certificate-based identification,
//! the same certificate group. Fields are optional at the type level; which of them an
//! operation actually needs is decided by the service.

use crate::binding::{read_child, read_parsed, write_child, XmlType};
use crate::schema::{ContentModel, DecodeContext, Particle};
use crate::xml::{Element, Name};
use crate::VtjResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use vtj_types::{NonEmptyText, PersonalIdentityCode};

const SO_SO_NIMI: Name = Name::vtj("SoSoNimi");
const KAYTTAJATUNNUS: Name = Name::vtj("Kayttajatunnus");
const SALASANA: Name = Name::vtj("Salasana");
const LOPPUKAYTTAJA: Name = Name::vtj("Loppukayttaja");
const LASKUTUSTIEDOT: Name = Name::vtj("Laskutustiedot");

const SAHKOINEN_ASIOINTITUNNUS: Name = Name::vtj("SahkoinenAsiointitunnus");
const VARMENTEEN_MYONTAJA: Name = Name::vtj("VarmenteenMyontaja");
const X509_CERTIFICATE: Name = Name::vtj("X509Certificate");
const VARMENTEEN_VOIMASSAOLOTARKISTUS: Name = Name::vtj("VarmenteenVoimassaolotarkistus");
const VARMENTEEN_SULKULISTATARKISTUS: Name = Name::vtj("VarmenteenSulkulistatarkistus");
const TUNNISTUSPORTAALI: Name = Name::vtj("Tunnistusportaali");

const HENKILOTUNNUS: Name = Name::vtj("Henkilotunnus");
const RAKENNUSTUNNUS: Name = Name::vtj("Rakennustunnus");
const KIINTEISTOTUNNUS: Name = Name::vtj("Kiinteistotunnus");
const VARA1: Name = Name::vtj("Vara1");
const LAJI: Name = Name::vtj("Laji");

/// Child element of every request body.
pub const REQUEST: Name = Name::vtj("request");

// ============================================================================
// Parameter groups
// ============================================================================

/// Service credentials sent with every lookup.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Query product name, for example `PERUSJHHS2`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub so_so_nimi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kayttajatunnus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salasana: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loppukayttaja: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laskutustiedot: Option<String>,
}

impl Credentials {
    pub fn new(
        so_so_nimi: &NonEmptyText,
        kayttajatunnus: &NonEmptyText,
        salasana: &NonEmptyText,
    ) -> Self {
        Self {
            so_so_nimi: Some(so_so_nimi.to_string()),
            kayttajatunnus: Some(kayttajatunnus.to_string()),
            salasana: Some(salasana.to_string()),
            ..Self::default()
        }
    }

    /// Identify the end user on whose behalf the query is made.
    pub fn with_end_user(mut self, loppukayttaja: &NonEmptyText) -> Self {
        self.loppukayttaja = Some(loppukayttaja.to_string());
        self
    }

    pub fn with_billing(mut self, laskutustiedot: &NonEmptyText) -> Self {
        self.laskutustiedot = Some(laskutustiedot.to_string());
        self
    }

    fn read(element: &Element) -> Self {
        Self {
            so_so_nimi: element.child_text(SO_SO_NIMI),
            kayttajatunnus: element.child_text(KAYTTAJATUNNUS),
            salasana: element.child_text(SALASANA),
            loppukayttaja: element.child_text(LOPPUKAYTTAJA),
            laskutustiedot: element.child_text(LASKUTUSTIEDOT),
        }
    }

    fn write(&self, element: &mut Element) {
        element.push_text_child(SO_SO_NIMI, self.so_so_nimi.as_deref());
        element.push_text_child(KAYTTAJATUNNUS, self.kayttajatunnus.as_deref());
        element.push_text_child(SALASANA, self.salasana.as_deref());
        element.push_text_child(LOPPUKAYTTAJA, self.loppukayttaja.as_deref());
        element.push_text_child(LASKUTUSTIEDOT, self.laskutustiedot.as_deref());
    }
}

// The password never ends up in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("so_so_nimi", &self.so_so_nimi)
            .field("kayttajatunnus", &self.kayttajatunnus)
            .field("salasana", &self.salasana.as_ref().map(|_| "<redacted>"))
            .field("loppukayttaja", &self.loppukayttaja)
            .field("laskutustiedot", &self.laskutustiedot)
            .finish()
    }
}

/// Certificate-based identification of the person being looked up.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateAuthentication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sahkoinen_asiointitunnus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub varmenteen_myontaja: Option<String>,
    /// Base64 encoded certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x509_certificate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub varmenteen_voimassaolotarkistus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub varmenteen_sulkulistatarkistus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tunnistusportaali: Option<String>,
}

impl CertificateAuthentication {
    /// Identify by electronic identifier (SATU) and the certificate it was read from.
    pub fn new(sahkoinen_asiointitunnus: &NonEmptyText, x509_certificate: &NonEmptyText) -> Self {
        Self {
            sahkoinen_asiointitunnus: Some(sahkoinen_asiointitunnus.to_string()),
            x509_certificate: Some(x509_certificate.to_string()),
            ..Self::default()
        }
    }

    fn read(element: &Element) -> Self {
        Self {
            sahkoinen_asiointitunnus: element.child_text(SAHKOINEN_ASIOINTITUNNUS),
            varmenteen_myontaja: element.child_text(VARMENTEEN_MYONTAJA),
            x509_certificate: element.child_text(X509_CERTIFICATE),
            varmenteen_voimassaolotarkistus: element.child_text(VARMENTEEN_VOIMASSAOLOTARKISTUS),
            varmenteen_sulkulistatarkistus: element.child_text(VARMENTEEN_SULKULISTATARKISTUS),
            tunnistusportaali: element.child_text(TUNNISTUSPORTAALI),
        }
    }

    fn write(&self, element: &mut Element) {
        element.push_text_child(
            SAHKOINEN_ASIOINTITUNNUS,
            self.sahkoinen_asiointitunnus.as_deref(),
        );
        element.push_text_child(VARMENTEEN_MYONTAJA, self.varmenteen_myontaja.as_deref());
        element.push_text_child(X509_CERTIFICATE, self.x509_certificate.as_deref());
        element.push_text_child(
            VARMENTEEN_VOIMASSAOLOTARKISTUS,
            self.varmenteen_voimassaolotarkistus.as_deref(),
        );
        element.push_text_child(
            VARMENTEEN_SULKULISTATARKISTUS,
            self.varmenteen_sulkulistatarkistus.as_deref(),
        );
        element.push_text_child(TUNNISTUSPORTAALI, self.tunnistusportaali.as_deref());
    }
}

// ============================================================================
// Parameter types
// ============================================================================

const HENKILO_TUNNUS_TIEDOT: &ContentModel = &ContentModel::sequence(&[
    Particle::optional(SO_SO_NIMI),
    Particle::optional(KAYTTAJATUNNUS),
    Particle::optional(SALASANA),
    Particle::optional(LOPPUKAYTTAJA),
    Particle::optional(LASKUTUSTIEDOT),
    Particle::optional(HENKILOTUNNUS),
    Particle::optional(SAHKOINEN_ASIOINTITUNNUS),
    Particle::optional(VARMENTEEN_MYONTAJA),
    Particle::optional(X509_CERTIFICATE),
    Particle::optional(VARMENTEEN_VOIMASSAOLOTARKISTUS),
    Particle::optional(VARMENTEEN_SULKULISTATARKISTUS),
    Particle::optional(TUNNISTUSPORTAALI),
    Particle::optional(VARA1),
]);

const TUNNISTUS_TIEDOT: &ContentModel = &ContentModel::sequence(&[
    Particle::optional(SO_SO_NIMI),
    Particle::optional(KAYTTAJATUNNUS),
    Particle::optional(SALASANA),
    Particle::optional(LOPPUKAYTTAJA),
    Particle::optional(LASKUTUSTIEDOT),
    Particle::optional(SAHKOINEN_ASIOINTITUNNUS),
    Particle::optional(VARMENTEEN_MYONTAJA),
    Particle::optional(X509_CERTIFICATE),
    Particle::optional(VARMENTEEN_VOIMASSAOLOTARKISTUS),
    Particle::optional(VARMENTEEN_SULKULISTATARKISTUS),
    Particle::optional(TUNNISTUSPORTAALI),
    Particle::optional(VARA1),
]);

const RAKENNUS_TUNNUS_TIEDOT: &ContentModel = &ContentModel::sequence(&[
    Particle::optional(SO_SO_NIMI),
    Particle::optional(KAYTTAJATUNNUS),
    Particle::optional(SALASANA),
    Particle::optional(LOPPUKAYTTAJA),
    Particle::optional(LASKUTUSTIEDOT),
    Particle::optional(RAKENNUSTUNNUS),
    Particle::optional(VARA1),
]);

const KIINTEISTO_TUNNUS_TIEDOT: &ContentModel = &ContentModel::sequence(&[
    Particle::optional(SO_SO_NIMI),
    Particle::optional(KAYTTAJATUNNUS),
    Particle::optional(SALASANA),
    Particle::optional(LOPPUKAYTTAJA),
    Particle::optional(LASKUTUSTIEDOT),
    Particle::optional(KIINTEISTOTUNNUS),
    Particle::optional(VARA1),
]);

const TUOTTEEN_SKEEMA_TIEDOT: &ContentModel = &ContentModel::sequence(&[
    Particle::optional(SO_SO_NIMI),
    Particle::required(LAJI),
]);

/// Parameters of a person lookup by identity code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HenkiloTunnusKyselyReqBodyTiedot {
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub henkilotunnus: Option<String>,
    #[serde(flatten)]
    pub certificate: CertificateAuthentication,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vara1: Option<String>,
}

impl HenkiloTunnusKyselyReqBodyTiedot {
    pub fn new(credentials: Credentials, henkilotunnus: &PersonalIdentityCode) -> Self {
        Self {
            credentials,
            henkilotunnus: Some(henkilotunnus.to_string()),
            ..Self::default()
        }
    }
}

impl XmlType for HenkiloTunnusKyselyReqBodyTiedot {
    const CONTENT: &'static ContentModel = HENKILO_TUNNUS_TIEDOT;

    fn read(element: &Element, _ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            credentials: Credentials::read(element),
            henkilotunnus: element.child_text(HENKILOTUNNUS),
            certificate: CertificateAuthentication::read(element),
            vara1: element.child_text(VARA1),
        })
    }

    fn write(&self, element: &mut Element) {
        self.credentials.write(element);
        element.push_text_child(HENKILOTUNNUS, self.henkilotunnus.as_deref());
        self.certificate.write(element);
        element.push_text_child(VARA1, self.vara1.as_deref());
    }
}

/// Parameters of a certificate-based identification lookup.
///
/// Person, building and property identification share this shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnistusKyselyReqBodyTiedot {
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(flatten)]
    pub certificate: CertificateAuthentication,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vara1: Option<String>,
}

pub type HenkiloTunnistusKyselyReqBodyTiedot = TunnistusKyselyReqBodyTiedot;
pub type RakennusTunnistusKyselyReqBodyTiedot = TunnistusKyselyReqBodyTiedot;
pub type KiinteistoTunnistusKyselyReqBodyTiedot = TunnistusKyselyReqBodyTiedot;

impl TunnistusKyselyReqBodyTiedot {
    pub fn new(credentials: Credentials, certificate: CertificateAuthentication) -> Self {
        Self {
            credentials,
            certificate,
            vara1: None,
        }
    }
}

impl XmlType for TunnistusKyselyReqBodyTiedot {
    const CONTENT: &'static ContentModel = TUNNISTUS_TIEDOT;

    fn read(element: &Element, _ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            credentials: Credentials::read(element),
            certificate: CertificateAuthentication::read(element),
            vara1: element.child_text(VARA1),
        })
    }

    fn write(&self, element: &mut Element) {
        self.credentials.write(element);
        self.certificate.write(element);
        element.push_text_child(VARA1, self.vara1.as_deref());
    }
}

/// Parameters of a building lookup by building identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RakennusTunnusKyselyReqBodyTiedot {
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rakennustunnus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vara1: Option<String>,
}

impl RakennusTunnusKyselyReqBodyTiedot {
    pub fn new(credentials: Credentials, rakennustunnus: &NonEmptyText) -> Self {
        Self {
            credentials,
            rakennustunnus: Some(rakennustunnus.to_string()),
            vara1: None,
        }
    }
}

impl XmlType for RakennusTunnusKyselyReqBodyTiedot {
    const CONTENT: &'static ContentModel = RAKENNUS_TUNNUS_TIEDOT;

    fn read(element: &Element, _ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            credentials: Credentials::read(element),
            rakennustunnus: element.child_text(RAKENNUSTUNNUS),
            vara1: element.child_text(VARA1),
        })
    }

    fn write(&self, element: &mut Element) {
        self.credentials.write(element);
        element.push_text_child(RAKENNUSTUNNUS, self.rakennustunnus.as_deref());
        element.push_text_child(VARA1, self.vara1.as_deref());
    }
}

/// Parameters of a property lookup by property identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KiinteistoTunnusKyselyReqBodyTiedot {
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kiinteistotunnus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vara1: Option<String>,
}

impl KiinteistoTunnusKyselyReqBodyTiedot {
    pub fn new(credentials: Credentials, kiinteistotunnus: &NonEmptyText) -> Self {
        Self {
            credentials,
            kiinteistotunnus: Some(kiinteistotunnus.to_string()),
            vara1: None,
        }
    }
}

impl XmlType for KiinteistoTunnusKyselyReqBodyTiedot {
    const CONTENT: &'static ContentModel = KIINTEISTO_TUNNUS_TIEDOT;

    fn read(element: &Element, _ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            credentials: Credentials::read(element),
            kiinteistotunnus: element.child_text(KIINTEISTOTUNNUS),
            vara1: element.child_text(VARA1),
        })
    }

    fn write(&self, element: &mut Element) {
        self.credentials.write(element);
        element.push_text_child(KIINTEISTOTUNNUS, self.kiinteistotunnus.as_deref());
        element.push_text_child(VARA1, self.vara1.as_deref());
    }
}

/// Parameters of a product schema request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuotteenSkeemaReqBodyTiedot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub so_so_nimi: Option<String>,
    /// Schema kind; always written, `0` when unset.
    pub laji: i32,
}

impl TuotteenSkeemaReqBodyTiedot {
    pub fn new(so_so_nimi: &NonEmptyText, laji: i32) -> Self {
        Self {
            so_so_nimi: Some(so_so_nimi.to_string()),
            laji,
        }
    }
}

impl XmlType for TuotteenSkeemaReqBodyTiedot {
    const CONTENT: &'static ContentModel = TUOTTEEN_SKEEMA_TIEDOT;

    fn read(element: &Element, ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            so_so_nimi: element.child_text(SO_SO_NIMI),
            laji: read_parsed(element, LAJI, ctx)?.unwrap_or_default(),
        })
    }

    fn write(&self, element: &mut Element) {
        element.push_text_child(SO_SO_NIMI, self.so_so_nimi.as_deref());
        element.push_child(Element::with_text(LAJI, self.laji.to_string()));
    }
}

// ============================================================================
// Request bodies
// ============================================================================

const REQ_BODY: &ContentModel = &ContentModel::sequence(&[Particle::optional(REQUEST)]);

/// Request body wrapping the parameters of one operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KyselyReqBody<T> {
    pub request: Option<T>,
}

pub type HenkiloTunnusKyselyReqBody = KyselyReqBody<HenkiloTunnusKyselyReqBodyTiedot>;
pub type HenkiloTunnistusKyselyReqBody = KyselyReqBody<HenkiloTunnistusKyselyReqBodyTiedot>;
pub type RakennusTunnusKyselyReqBody = KyselyReqBody<RakennusTunnusKyselyReqBodyTiedot>;
pub type RakennusTunnistusKyselyReqBody = KyselyReqBody<RakennusTunnistusKyselyReqBodyTiedot>;
pub type KiinteistoTunnusKyselyReqBody = KyselyReqBody<KiinteistoTunnusKyselyReqBodyTiedot>;
pub type KiinteistoTunnistusKyselyReqBody = KyselyReqBody<KiinteistoTunnistusKyselyReqBodyTiedot>;
pub type TuotteenSkeemaReqBody = KyselyReqBody<TuotteenSkeemaReqBodyTiedot>;

impl<T> KyselyReqBody<T> {
    pub fn new(request: T) -> Self {
        Self {
            request: Some(request),
        }
    }
}

impl<T: XmlType> XmlType for KyselyReqBody<T> {
    const CONTENT: &'static ContentModel = REQ_BODY;

    fn read(element: &Element, ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            request: read_child(element, REQUEST, ctx)?,
        })
    }

    fn write(&self, element: &mut Element) {
        write_child(element, REQUEST, self.request.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{decode, to_element};
    use crate::schema::Strictness;
    use crate::xml::parse_document;
    use crate::VtjError;

    fn text(value: &str) -> NonEmptyText {
        NonEmptyText::new(value).expect("non-empty")
    }

    fn credentials() -> Credentials {
        Credentials::new(&text("PERUSJHHS2"), &text("kayttaja"), &text("salainen"))
            .with_end_user(&text("espoo-evaka"))
    }

    fn child_names(element: &Element) -> Vec<&str> {
        element.children.iter().map(|c| c.local_name.as_str()).collect()
    }

    #[test]
    fn person_lookup_writes_fields_in_declared_order() {
        let hetu = PersonalIdentityCode::parse("010101A123N").expect("hetu");
        let mut tiedot = HenkiloTunnusKyselyReqBodyTiedot::new(credentials(), &hetu);
        tiedot.vara1 = Some("x".to_string());
        tiedot.certificate.tunnistusportaali = Some("suomi.fi".to_string());

        let body = to_element(&KyselyReqBody::new(tiedot), Name::vtj("HenkilonTunnusKysely"));
        let request = &body.children[0];
        assert!(request.has_name(REQUEST));
        assert_eq!(
            child_names(request),
            [
                "SoSoNimi",
                "Kayttajatunnus",
                "Salasana",
                "Loppukayttaja",
                "Henkilotunnus",
                "Tunnistusportaali",
                "Vara1"
            ]
        );
        assert!(request
            .children
            .iter()
            .all(|c| c.namespace.as_deref() == Some(crate::namespaces::VTJ_WS)));
    }

    #[test]
    fn empty_request_writes_no_fields() {
        let body = to_element(
            &KyselyReqBody::new(TunnistusKyselyReqBodyTiedot::default()),
            Name::vtj("HenkilonTunnistusKysely"),
        );
        assert!(body.children[0].children.is_empty());
        assert!(to_element(&RakennusTunnusKyselyReqBody::default(), Name::vtj("x"))
            .children
            .is_empty());
    }

    #[test]
    fn certificate_lookup_round_trips() {
        let tiedot = TunnistusKyselyReqBodyTiedot::new(
            credentials(),
            CertificateAuthentication::new(&text("999198457"), &text("MIIBIjANBgkq")),
        );
        let element = to_element(&tiedot, REQUEST);
        assert_eq!(
            child_names(&element),
            [
                "SoSoNimi",
                "Kayttajatunnus",
                "Salasana",
                "Loppukayttaja",
                "SahkoinenAsiointitunnus",
                "X509Certificate"
            ]
        );

        let mut ctx = DecodeContext::new(Strictness::Strict);
        let back: TunnistusKyselyReqBodyTiedot = decode(&element, &mut ctx).expect("decode");
        assert_eq!(back, tiedot);
    }

    #[test]
    fn building_and_property_keys() {
        let rakennus = RakennusTunnusKyselyReqBodyTiedot::new(credentials(), &text("103456789A"));
        assert_eq!(
            to_element(&rakennus, REQUEST).child_text(RAKENNUSTUNNUS).as_deref(),
            Some("103456789A")
        );

        let kiinteisto =
            KiinteistoTunnusKyselyReqBodyTiedot::new(credentials(), &text("91-12-34-5"));
        let element = to_element(&kiinteisto, REQUEST);
        assert_eq!(child_names(&element)[4], "Kiinteistotunnus");
    }

    #[test]
    fn laji_is_always_written_and_must_be_an_integer() {
        let tiedot = TuotteenSkeemaReqBodyTiedot::default();
        let element = to_element(&tiedot, REQUEST);
        assert_eq!(element.child_text(LAJI).as_deref(), Some("0"));

        let bad = parse_document(
            r#"<request xmlns="http://xml.vrk.fi/ws/vtj/vtjkysely/1"><Laji>yksi</Laji></request>"#,
        )
        .expect("parse");
        let mut lax = DecodeContext::new(Strictness::Lax);
        let err = decode::<TuotteenSkeemaReqBodyTiedot>(&bad, &mut lax).expect_err("not an int");
        assert!(matches!(err, VtjError::InvalidValue { .. }));
    }

    #[test]
    fn missing_laji_is_a_violation_only() {
        let element = parse_document(
            r#"<request xmlns="http://xml.vrk.fi/ws/vtj/vtjkysely/1"><SoSoNimi>X</SoSoNimi></request>"#,
        )
        .expect("parse");
        let mut lax = DecodeContext::new(Strictness::Lax);
        let tiedot: TuotteenSkeemaReqBodyTiedot = decode(&element, &mut lax).expect("lax");
        assert_eq!(tiedot.laji, 0);
        assert_eq!(lax.violations().len(), 1);
    }

    #[test]
    fn debug_output_hides_password() {
        let debug = format!("{:?}", credentials());
        assert!(debug.contains("kayttaja"));
        assert!(!debug.contains("salainen"));
    }
}
