//! The `VTJHenkiloVastaussanoma` person response document.
//!
//! The document is an ordered list of entries (client info, return code, search criteria and
//! person records) plus three required attributes identifying the extraction. A lookup that
//! matched nobody carries a single `Paluukoodi` entry with code `0001` and no `Henkilo`.
//!
//! Registry dates are `yyyyMMdd` strings; [`parse_registry_date`] converts them.

mod guardianship;
mod person;

pub use guardianship::{
    Edunvalvonta, Edunvalvontavaltuutus, OikeusaputoimistoEdunvalvoja, Tehtavienjako,
    YritysJaYhteisoEdunvalvoja,
};
pub use person::{
    Aidinkieli, AsukasAlle18V, AsukkaatAlle18V, EntinenNimi, Henkilo, Henkilotunnus,
    Kansalaisuus, KotimainenLahiosoite, KotimainenPostiosoite, Kotikunta, Kuolintiedot,
    Kuolleeksijulistamistiedot, NykyinenSukunimi, NykyisetEtunimet, RelatedPerson, Sukupuoli,
    Syntymamaa, Turvakielto, UlkomainenLahiosoite, UlkomainenPostiosoite, VakinainenAsuinpaikka,
    MAX_FORMER_NAMES,
};

use crate::binding::{
    decode, read_child, text_record, to_element, write_child, RootElement, XmlType,
};
use crate::paluukoodi::ReturnCode;
use crate::schema::{AttributeUse, ContentModel, DecodeContext, MaxOccurs, Particle, Particles};
use crate::xml::{Element, Name};
use crate::{VtjError, VtjResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const ASIAKASINFO: Name = Name::schema("Asiakasinfo");
const PALUUKOODI: Name = Name::schema("Paluukoodi");
const HAKUPERUSTEET: Name = Name::schema("Hakuperusteet");
const HENKILO: Name = Name::schema("Henkilo");

const TIETOJEN_POIMINTAAIKA: Name = Name::unqualified("tietojenPoimintaaika");
const SANOMATUNNUS: Name = Name::unqualified("sanomatunnus");
const VERSIO: Name = Name::unqualified("versio");

/// Format of `@tietojenPoimintaaika`.
pub const EXTRACTION_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Format of registry dates such as `Kuolinpvm` or `AsuminenAlkupvm`.
pub const REGISTRY_DATE_FORMAT: &str = "%Y%m%d";

const VASTAUSSANOMA: &ContentModel = &ContentModel {
    particles: Particles::Choice {
        options: &[ASIAKASINFO, PALUUKOODI, HAKUPERUSTEET, HENKILO],
        min_occurs: 1,
        max_occurs: MaxOccurs::Unbounded,
    },
    attributes: &[
        AttributeUse::required(TIETOJEN_POIMINTAAIKA),
        AttributeUse::required(SANOMATUNNUS),
        AttributeUse::required(VERSIO),
    ],
};

/// Parse a `yyyyMMdd` registry date.
///
/// # Errors
///
/// Returns [`VtjError::InvalidValue`] if the text is not a valid date.
pub fn parse_registry_date(text: &str) -> VtjResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), REGISTRY_DATE_FORMAT).map_err(|e| {
        VtjError::InvalidValue {
            path: "date".to_string(),
            message: format!("'{text}': {e}"),
        }
    })
}

/// Person response document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VtjHenkiloVastaussanoma {
    #[serde(default)]
    pub entries: Vec<VastausEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tietojen_poimintaaika: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanomatunnus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versio: Option<String>,
}

/// One entry of [`VtjHenkiloVastaussanoma`], in document order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum VastausEntry {
    Asiakasinfo(Asiakasinfo),
    Paluukoodi(Paluukoodi),
    Hakuperusteet(Hakuperusteet),
    Henkilo(Box<Henkilo>),
}

impl VastausEntry {
    fn name(&self) -> Name {
        match self {
            VastausEntry::Asiakasinfo(_) => ASIAKASINFO,
            VastausEntry::Paluukoodi(_) => PALUUKOODI,
            VastausEntry::Hakuperusteet(_) => HAKUPERUSTEET,
            VastausEntry::Henkilo(_) => HENKILO,
        }
    }

    fn to_element(&self) -> Element {
        let name = self.name();
        match self {
            VastausEntry::Asiakasinfo(value) => to_element(value, name),
            VastausEntry::Paluukoodi(value) => to_element(value, name),
            VastausEntry::Hakuperusteet(value) => to_element(value, name),
            VastausEntry::Henkilo(value) => to_element(value.as_ref(), name),
        }
    }
}

impl VtjHenkiloVastaussanoma {
    /// Build a document stamped with its extraction time.
    pub fn new(
        extracted_at: NaiveDateTime,
        sanomatunnus: impl Into<String>,
        versio: impl Into<String>,
    ) -> Self {
        Self {
            entries: Vec::new(),
            tietojen_poimintaaika: Some(extracted_at.format(EXTRACTION_TIME_FORMAT).to_string()),
            sanomatunnus: Some(sanomatunnus.into()),
            versio: Some(versio.into()),
        }
    }

    pub fn push(&mut self, entry: VastausEntry) {
        self.entries.push(entry);
    }

    /// The first person record, if any.
    pub fn henkilo(&self) -> Option<&Henkilo> {
        self.entries.iter().find_map(|entry| match entry {
            VastausEntry::Henkilo(henkilo) => Some(henkilo.as_ref()),
            _ => None,
        })
    }

    /// All person records in document order.
    pub fn henkilot(&self) -> impl Iterator<Item = &Henkilo> {
        self.entries.iter().filter_map(|entry| match entry {
            VastausEntry::Henkilo(henkilo) => Some(henkilo.as_ref()),
            _ => None,
        })
    }

    pub fn paluukoodi(&self) -> Option<&Paluukoodi> {
        self.entries.iter().find_map(|entry| match entry {
            VastausEntry::Paluukoodi(paluukoodi) => Some(paluukoodi),
            _ => None,
        })
    }

    pub fn asiakasinfo(&self) -> Option<&Asiakasinfo> {
        self.entries.iter().find_map(|entry| match entry {
            VastausEntry::Asiakasinfo(info) => Some(info),
            _ => None,
        })
    }

    pub fn hakuperusteet(&self) -> Option<&Hakuperusteet> {
        self.entries.iter().find_map(|entry| match entry {
            VastausEntry::Hakuperusteet(hakuperusteet) => Some(hakuperusteet),
            _ => None,
        })
    }

    pub fn return_code(&self) -> Option<ReturnCode> {
        self.paluukoodi().and_then(Paluukoodi::return_code)
    }

    /// Whether the registry reported that no person matched.
    pub fn is_not_found(&self) -> bool {
        self.return_code() == Some(ReturnCode::NotFound)
    }

    /// Extraction time from `@tietojenPoimintaaika`.
    ///
    /// # Errors
    ///
    /// Returns [`VtjError::InvalidValue`] if the attribute is not `yyyyMMddHHmmss`.
    pub fn extracted_at(&self) -> VtjResult<Option<NaiveDateTime>> {
        let Some(raw) = self.tietojen_poimintaaika.as_deref() else {
            return Ok(None);
        };
        NaiveDateTime::parse_from_str(raw.trim(), EXTRACTION_TIME_FORMAT)
            .map(Some)
            .map_err(|e| VtjError::InvalidValue {
                path: "VTJHenkiloVastaussanoma/@tietojenPoimintaaika".to_string(),
                message: format!("'{raw}': {e}"),
            })
    }
}

impl XmlType for VtjHenkiloVastaussanoma {
    const CONTENT: &'static ContentModel = VASTAUSSANOMA;

    fn read(element: &Element, ctx: &mut DecodeContext) -> VtjResult<Self> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut entries = Vec::new();

        for child in &element.children {
            let position = seen.entry(child.local_name.as_str()).or_default();
            *position += 1;
            ctx.enter(format!("{}[{}]", child.local_name, position));
            let entry = if child.is(ASIAKASINFO) {
                Some(VastausEntry::Asiakasinfo(decode(child, ctx)?))
            } else if child.is(PALUUKOODI) {
                Some(VastausEntry::Paluukoodi(decode(child, ctx)?))
            } else if child.is(HAKUPERUSTEET) {
                Some(VastausEntry::Hakuperusteet(decode(child, ctx)?))
            } else if child.is(HENKILO) {
                Some(VastausEntry::Henkilo(Box::new(decode(child, ctx)?)))
            } else {
                // Already reported by the choice check.
                None
            };
            ctx.leave();
            entries.extend(entry);
        }

        Ok(Self {
            entries,
            tietojen_poimintaaika: element.attribute_ns(TIETOJEN_POIMINTAAIKA).map(str::to_owned),
            sanomatunnus: element.attribute_ns(SANOMATUNNUS).map(str::to_owned),
            versio: element.attribute_ns(VERSIO).map(str::to_owned),
        })
    }

    fn write(&self, element: &mut Element) {
        element.set_optional_attribute(TIETOJEN_POIMINTAAIKA, self.tietojen_poimintaaika.as_deref());
        element.set_optional_attribute(SANOMATUNNUS, self.sanomatunnus.as_deref());
        element.set_optional_attribute(VERSIO, self.versio.as_deref());
        for entry in &self.entries {
            element.push_child(entry.to_element());
        }
    }
}

impl RootElement for VtjHenkiloVastaussanoma {
    const NAME: Name = Name::schema("VTJHenkiloVastaussanoma");
}

text_record! {
    /// Client information echoed by the service, in Finnish, Swedish and English.
    pub struct Asiakasinfo in schema {
        info_s => "InfoS",
        info_r => "InfoR",
        info_e => "InfoE",
    }
}

const KOODI: Name = Name::unqualified("koodi");

/// Return code with its human-readable explanation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paluukoodi {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub koodi: Option<String>,
}

impl Paluukoodi {
    pub fn new(code: ReturnCode, text: impl Into<String>) -> Self {
        Self {
            value: text.into(),
            koodi: Some(code.as_str().to_string()),
        }
    }

    pub fn return_code(&self) -> Option<ReturnCode> {
        self.koodi.as_deref().map(ReturnCode::from_wire)
    }
}

impl XmlType for Paluukoodi {
    const CONTENT: &'static ContentModel =
        &ContentModel::simple(&[AttributeUse::required(KOODI)]);

    fn read(element: &Element, _ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            value: element.text_content(),
            koodi: element.attribute_ns(KOODI).map(str::to_owned),
        })
    }

    fn write(&self, element: &mut Element) {
        element.text = Some(self.value.clone());
        element.set_optional_attribute(KOODI, self.koodi.as_deref());
    }
}

const HAKUPERUSTE_HENKILOTUNNUS: Name = Name::schema("Henkilotunnus");

const HAKUPERUSTEET_MODEL: &ContentModel =
    &ContentModel::sequence(&[Particle::optional(HAKUPERUSTE_HENKILOTUNNUS)]);

/// Search criteria echoed back with a per-criterion result code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hakuperusteet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub henkilotunnus: Option<HakuperusteHenkilotunnus>,
}

impl XmlType for Hakuperusteet {
    const CONTENT: &'static ContentModel = HAKUPERUSTEET_MODEL;

    fn read(element: &Element, ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            henkilotunnus: read_child(element, HAKUPERUSTE_HENKILOTUNNUS, ctx)?,
        })
    }

    fn write(&self, element: &mut Element) {
        write_child(element, HAKUPERUSTE_HENKILOTUNNUS, self.henkilotunnus.as_ref());
    }
}

const HAKUPERUSTE_PALUUKOODI: Name = Name::unqualified("hakuperustePaluukoodi");
const HAKUPERUSTE_TEKSTI_E: Name = Name::unqualified("hakuperusteTekstiE");
const HAKUPERUSTE_TEKSTI_S: Name = Name::unqualified("hakuperusteTekstiS");
const HAKUPERUSTE_TEKSTI_R: Name = Name::unqualified("hakuperusteTekstiR");

/// `Hakuperusteet/Henkilotunnus`: the identity code searched for and how it matched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HakuperusteHenkilotunnus {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hakuperuste_paluukoodi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hakuperuste_teksti_e: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hakuperuste_teksti_s: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hakuperuste_teksti_r: Option<String>,
}

impl XmlType for HakuperusteHenkilotunnus {
    const CONTENT: &'static ContentModel = &ContentModel::simple(&[
        AttributeUse::required(HAKUPERUSTE_PALUUKOODI),
        AttributeUse::optional(HAKUPERUSTE_TEKSTI_E),
        AttributeUse::optional(HAKUPERUSTE_TEKSTI_S),
        AttributeUse::optional(HAKUPERUSTE_TEKSTI_R),
    ]);

    fn read(element: &Element, _ctx: &mut DecodeContext) -> VtjResult<Self> {
        let attribute = |name: Name| element.attribute_ns(name).map(str::to_owned);
        Ok(Self {
            value: element.text_content(),
            hakuperuste_paluukoodi: attribute(HAKUPERUSTE_PALUUKOODI),
            hakuperuste_teksti_e: attribute(HAKUPERUSTE_TEKSTI_E),
            hakuperuste_teksti_s: attribute(HAKUPERUSTE_TEKSTI_S),
            hakuperuste_teksti_r: attribute(HAKUPERUSTE_TEKSTI_R),
        })
    }

    fn write(&self, element: &mut Element) {
        element.text = Some(self.value.clone());
        element.set_optional_attribute(
            HAKUPERUSTE_PALUUKOODI,
            self.hakuperuste_paluukoodi.as_deref(),
        );
        element.set_optional_attribute(HAKUPERUSTE_TEKSTI_E, self.hakuperuste_teksti_e.as_deref());
        element.set_optional_attribute(HAKUPERUSTE_TEKSTI_S, self.hakuperuste_teksti_s.as_deref());
        element.set_optional_attribute(HAKUPERUSTE_TEKSTI_R, self.hakuperuste_teksti_r.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Strictness, ViolationKind};
    use crate::{Codec, CodecConfig};

    const FOUND: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<VTJHenkiloVastaussanoma xmlns="http://xml.vrk.fi/schema/vtjkysely"
    tietojenPoimintaaika="20190717015902" sanomatunnus="PERUSJHHS2" versio="1.0">
  <Asiakasinfo><InfoS>17.07.2019 01:59</InfoS><InfoE>17.07.2019 01:59</InfoE></Asiakasinfo>
  <Paluukoodi koodi="0000">Haku onnistui</Paluukoodi>
  <Hakuperusteet>
    <Henkilotunnus hakuperustePaluukoodi="1" hakuperusteTekstiS="Löytyi">010101A123N</Henkilotunnus>
  </Hakuperusteet>
  <Henkilo>
    <Henkilotunnus voimassaolokoodi="1">010101A123N</Henkilotunnus>
    <NykyinenSukunimi><Sukunimi>Virtanen</Sukunimi></NykyinenSukunimi>
    <NykyisetEtunimet><Etunimet>Matti</Etunimet></NykyisetEtunimet>
    <VakinainenKotimainenLahiosoite>
      <LahiosoiteS>Kamreerintie 1</LahiosoiteS>
      <Postinumero>02770</Postinumero>
      <PostitoimipaikkaS>ESPOO</PostitoimipaikkaS>
      <AsuminenAlkupvm>20010101</AsuminenAlkupvm>
    </VakinainenKotimainenLahiosoite>
    <Kotikunta><Kuntanumero>049</Kuntanumero><KuntaS>Espoo</KuntaS></Kotikunta>
  </Henkilo>
</VTJHenkiloVastaussanoma>"#;

    const NOT_FOUND: &str = r#"<VTJHenkiloVastaussanoma xmlns="http://xml.vrk.fi/schema/vtjkysely"
    tietojenPoimintaaika="20190717015902" sanomatunnus="PERUSJHHS2" versio="1.0">
  <Paluukoodi koodi="0001">Haku onnistui, henkilöä ei löytynyt</Paluukoodi>
</VTJHenkiloVastaussanoma>"#;

    fn strict() -> Codec {
        Codec::new(CodecConfig::default().with_strictness(Strictness::Strict))
    }

    #[test]
    fn decodes_found_person() {
        let document: VtjHenkiloVastaussanoma = strict().decode(FOUND).expect("decode");
        assert_eq!(document.entries.len(), 4);
        assert_eq!(document.return_code(), Some(ReturnCode::Success));
        assert!(!document.is_not_found());

        let henkilo = document.henkilo().expect("person");
        assert_eq!(henkilo.surname(), Some("Virtanen"));
        let osoite = henkilo
            .vakinainen_kotimainen_lahiosoite
            .as_ref()
            .expect("address");
        assert_eq!(osoite.postinumero.as_deref(), Some("02770"));
        assert_eq!(
            parse_registry_date(osoite.asuminen_alkupvm.as_deref().expect("start"))
                .expect("date"),
            NaiveDate::from_ymd_opt(2001, 1, 1).expect("date")
        );

        let haku = document
            .hakuperusteet()
            .and_then(|h| h.henkilotunnus.as_ref())
            .expect("criteria");
        assert_eq!(haku.hakuperuste_paluukoodi.as_deref(), Some("1"));
        assert_eq!(haku.hakuperuste_teksti_s.as_deref(), Some("Löytyi"));
        assert_eq!(haku.hakuperuste_teksti_e, None);
    }

    #[test]
    fn not_found_has_single_return_code_entry() {
        let decoded = strict()
            .decode_with_report::<VtjHenkiloVastaussanoma>(NOT_FOUND)
            .expect("decode");
        assert!(decoded.is_valid());

        let document = decoded.value;
        assert_eq!(document.entries.len(), 1);
        assert!(matches!(&document.entries[0], VastausEntry::Paluukoodi(p) if p.koodi.as_deref() == Some("0001")));
        assert!(document.is_not_found());
        assert!(document.henkilo().is_none());
        assert_eq!(
            document.paluukoodi().map(|p| p.value.as_str()),
            Some("Haku onnistui, henkilöä ei löytynyt")
        );
    }

    #[test]
    fn extraction_time_is_parsed() {
        let document: VtjHenkiloVastaussanoma = strict().decode(NOT_FOUND).expect("decode");
        let extracted = document.extracted_at().expect("valid").expect("present");
        assert_eq!(extracted.format("%Y-%m-%d %H:%M:%S").to_string(), "2019-07-17 01:59:02");

        let broken = VtjHenkiloVastaussanoma {
            tietojen_poimintaaika: Some("2019-07-17".to_string()),
            ..VtjHenkiloVastaussanoma::default()
        };
        assert!(matches!(broken.extracted_at(), Err(VtjError::InvalidValue { .. })));
    }

    #[test]
    fn missing_required_attribute_is_reported() {
        let xml = r#"<VTJHenkiloVastaussanoma xmlns="http://xml.vrk.fi/schema/vtjkysely"
            sanomatunnus="X" versio="1.0"><Paluukoodi koodi="0001"/></VTJHenkiloVastaussanoma>"#;

        let decoded = Codec::default()
            .decode_with_report::<VtjHenkiloVastaussanoma>(xml)
            .expect("lax decode");
        assert_eq!(
            decoded.violations[0].kind,
            ViolationKind::MissingAttribute {
                attribute: "tietojenPoimintaaika".to_string()
            }
        );
        assert_eq!(decoded.value.tietojen_poimintaaika, None);

        assert!(matches!(
            strict().decode::<VtjHenkiloVastaussanoma>(xml),
            Err(VtjError::Schema(_))
        ));
    }

    #[test]
    fn attributes_render_as_attributes() {
        let extracted = NaiveDate::from_ymd_opt(2019, 7, 17)
            .and_then(|d| d.and_hms_opt(1, 59, 2))
            .expect("timestamp");
        let mut document = VtjHenkiloVastaussanoma::new(extracted, "PERUSJHHS2", "1.0");
        document.push(VastausEntry::Paluukoodi(Paluukoodi::new(
            ReturnCode::NotFound,
            "ei löytynyt",
        )));

        let element = to_element(&document, VtjHenkiloVastaussanoma::NAME);
        assert_eq!(element.attribute("tietojenPoimintaaika"), Some("20190717015902"));
        assert_eq!(element.children.len(), 1);
        let paluukoodi = &element.children[0];
        assert_eq!(paluukoodi.attribute("koodi"), Some("0001"));
        assert!(paluukoodi.children.is_empty());
    }

    #[test]
    fn round_trips_populated_document() {
        let codec = Codec::default();
        let document: VtjHenkiloVastaussanoma = codec.decode(FOUND).expect("decode");
        let xml = codec.encode(&document).expect("encode");
        assert!(xml.contains(r#"<vtjkysely:Paluukoodi koodi="0000">"#));

        let again: VtjHenkiloVastaussanoma = codec.decode(&xml).expect("decode again");
        assert_eq!(again, document);
    }

    #[test]
    fn unknown_entries_are_skipped_in_lax_mode() {
        let xml = r#"<VTJHenkiloVastaussanoma xmlns="http://xml.vrk.fi/schema/vtjkysely"
            tietojenPoimintaaika="20190717015902" sanomatunnus="X" versio="1.0">
            <Paluukoodi koodi="0000">ok</Paluukoodi><Tuntematon/></VTJHenkiloVastaussanoma>"#;
        let decoded = Codec::default()
            .decode_with_report::<VtjHenkiloVastaussanoma>(xml)
            .expect("lax decode");
        assert_eq!(decoded.value.entries.len(), 1);
        assert_eq!(decoded.violations.len(), 1);
    }
}
