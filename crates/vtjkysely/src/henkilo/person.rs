//! The `Henkilo` person record and its nested structures.

use super::guardianship::{Edunvalvonta, Edunvalvontavaltuutus};
use super::parse_registry_date;
use crate::binding::{
    read_child, read_children, text_record, write_child, write_children, XmlType,
};
use crate::schema::{AttributeUse, ContentModel, DecodeContext, Particle};
use crate::xml::{Element, Name};
use crate::VtjResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use vtj_types::{IdentityCodeError, PersonalIdentityCode};

const HENKILOTUNNUS: Name = Name::schema("Henkilotunnus");
const NYKYINEN_SUKUNIMI: Name = Name::schema("NykyinenSukunimi");
const NYKYISET_ETUNIMET: Name = Name::schema("NykyisetEtunimet");
const ENTINEN_NIMI: Name = Name::schema("EntinenNimi");
const VAKINAINEN_KOTIMAINEN: Name = Name::schema("VakinainenKotimainenLahiosoite");
const VAKINAINEN_ULKOMAINEN: Name = Name::schema("VakinainenUlkomainenLahiosoite");
const VAKINAINEN_ASUINPAIKKA: Name = Name::schema("VakinainenAsuinpaikka");
const TILAPAINEN_KOTIMAINEN: Name = Name::schema("TilapainenKotimainenLahiosoite");
const TILAPAINEN_ULKOMAINEN: Name = Name::schema("TilapainenUlkomainenLahiosoite");
const KOTIMAINEN_POSTIOSOITE: Name = Name::schema("KotimainenPostiosoite");
const ULKOMAINEN_POSTIOSOITE: Name = Name::schema("UlkomainenPostiosoite");
const KOTIKUNTA: Name = Name::schema("Kotikunta");
const KUOLINTIEDOT: Name = Name::schema("Kuolintiedot");
const KUOLLEEKSIJULISTAMISTIEDOT: Name = Name::schema("Kuolleeksijulistamistiedot");
const AIDINKIELI: Name = Name::schema("Aidinkieli");
const TURVAKIELTO: Name = Name::schema("Turvakielto");
const SUKUPUOLI: Name = Name::schema("Sukupuoli");
const HUOLTAJA: Name = Name::schema("Huoltaja");
const HUOLLETTAVA: Name = Name::schema("Huollettava");
const LAPSI: Name = Name::schema("Lapsi");
const KANSALAISUUS: Name = Name::schema("Kansalaisuus");
const ASUKKAAT_ALLE_18V: Name = Name::schema("AsukkaatAlle18V");
const ASUKAS_ALLE_18V: Name = Name::schema("AsukasAlle18V");
const SYNTYMAMAA: Name = Name::schema("Syntymamaa");
const EDUNVALVONTA: Name = Name::schema("Edunvalvonta");
const EDUNVALVONTAVALTUUTUS: Name = Name::schema("Edunvalvontavaltuutus");

/// Former names kept by the registry.
pub const MAX_FORMER_NAMES: u32 = 3;

const HENKILO: &ContentModel = &ContentModel::sequence(&[
    Particle::required(HENKILOTUNNUS),
    Particle::required(NYKYINEN_SUKUNIMI),
    Particle::required(NYKYISET_ETUNIMET),
    Particle::bounded(ENTINEN_NIMI, MAX_FORMER_NAMES),
    Particle::optional(VAKINAINEN_KOTIMAINEN),
    Particle::optional(VAKINAINEN_ULKOMAINEN),
    Particle::optional(VAKINAINEN_ASUINPAIKKA),
    Particle::repeated(TILAPAINEN_KOTIMAINEN),
    Particle::repeated(TILAPAINEN_ULKOMAINEN),
    Particle::optional(KOTIMAINEN_POSTIOSOITE),
    Particle::optional(ULKOMAINEN_POSTIOSOITE),
    Particle::optional(KOTIKUNTA),
    Particle::optional(KUOLINTIEDOT),
    Particle::optional(KUOLLEEKSIJULISTAMISTIEDOT),
    Particle::optional(AIDINKIELI),
    Particle::optional(TURVAKIELTO),
    Particle::optional(SUKUPUOLI),
    Particle::repeated(HUOLTAJA),
    Particle::repeated(HUOLLETTAVA),
    Particle::repeated(LAPSI),
    Particle::repeated(KANSALAISUUS),
    Particle::optional(ASUKKAAT_ALLE_18V),
    Particle::repeated(ASUKAS_ALLE_18V),
    Particle::optional(SYNTYMAMAA),
    Particle::optional(EDUNVALVONTA),
    Particle::optional(EDUNVALVONTAVALTUUTUS),
]);

/// Person record returned for a successful lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Henkilo {
    pub henkilotunnus: Option<Henkilotunnus>,
    pub nykyinen_sukunimi: Option<NykyinenSukunimi>,
    pub nykyiset_etunimet: Option<NykyisetEtunimet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entinen_nimi: Vec<EntinenNimi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vakinainen_kotimainen_lahiosoite: Option<KotimainenLahiosoite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vakinainen_ulkomainen_lahiosoite: Option<UlkomainenLahiosoite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vakinainen_asuinpaikka: Option<VakinainenAsuinpaikka>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tilapainen_kotimainen_lahiosoite: Vec<KotimainenLahiosoite>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tilapainen_ulkomainen_lahiosoite: Vec<UlkomainenLahiosoite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kotimainen_postiosoite: Option<KotimainenPostiosoite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ulkomainen_postiosoite: Option<UlkomainenPostiosoite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kotikunta: Option<Kotikunta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kuolintiedot: Option<Kuolintiedot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kuolleeksijulistamistiedot: Option<Kuolleeksijulistamistiedot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aidinkieli: Option<Aidinkieli>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turvakielto: Option<Turvakielto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sukupuoli: Option<Sukupuoli>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub huoltaja: Vec<RelatedPerson>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub huollettava: Vec<RelatedPerson>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lapsi: Vec<RelatedPerson>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kansalaisuus: Vec<Kansalaisuus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asukkaat_alle_18v: Option<AsukkaatAlle18V>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asukas_alle_18v: Vec<AsukasAlle18V>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntymamaa: Option<Syntymamaa>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edunvalvonta: Option<Edunvalvonta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edunvalvontavaltuutus: Option<Edunvalvontavaltuutus>,
}

impl Henkilo {
    /// The person's identity code, validated.
    ///
    /// Returns `None` when the record carries no `Henkilotunnus`.
    pub fn identity_code(&self) -> Option<Result<PersonalIdentityCode, IdentityCodeError>> {
        self.henkilotunnus
            .as_ref()
            .map(|h| PersonalIdentityCode::parse(&h.value))
    }

    pub fn surname(&self) -> Option<&str> {
        self.nykyinen_sukunimi.as_ref()?.sukunimi.as_deref()
    }

    pub fn first_names(&self) -> Option<&str> {
        self.nykyiset_etunimet.as_ref()?.etunimet.as_deref()
    }

    /// Date of death, if the registry has recorded one.
    pub fn date_of_death(&self) -> VtjResult<Option<NaiveDate>> {
        self.kuolintiedot
            .as_ref()
            .and_then(|k| k.kuolinpvm.as_deref())
            .filter(|pvm| !pvm.trim().is_empty())
            .map(parse_registry_date)
            .transpose()
    }

    /// Whether a non-disclosure order (turvakielto) is in force.
    pub fn has_non_disclosure(&self) -> bool {
        self.turvakielto
            .as_ref()
            .and_then(|t| t.turvakielto_tieto.as_deref())
            .is_some_and(|tieto| matches!(tieto.trim(), "1" | "true"))
    }
}

impl XmlType for Henkilo {
    const CONTENT: &'static ContentModel = HENKILO;

    fn read(element: &Element, ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            henkilotunnus: read_child(element, HENKILOTUNNUS, ctx)?,
            nykyinen_sukunimi: read_child(element, NYKYINEN_SUKUNIMI, ctx)?,
            nykyiset_etunimet: read_child(element, NYKYISET_ETUNIMET, ctx)?,
            entinen_nimi: read_children(element, ENTINEN_NIMI, ctx)?,
            vakinainen_kotimainen_lahiosoite: read_child(element, VAKINAINEN_KOTIMAINEN, ctx)?,
            vakinainen_ulkomainen_lahiosoite: read_child(element, VAKINAINEN_ULKOMAINEN, ctx)?,
            vakinainen_asuinpaikka: read_child(element, VAKINAINEN_ASUINPAIKKA, ctx)?,
            tilapainen_kotimainen_lahiosoite: read_children(element, TILAPAINEN_KOTIMAINEN, ctx)?,
            tilapainen_ulkomainen_lahiosoite: read_children(element, TILAPAINEN_ULKOMAINEN, ctx)?,
            kotimainen_postiosoite: read_child(element, KOTIMAINEN_POSTIOSOITE, ctx)?,
            ulkomainen_postiosoite: read_child(element, ULKOMAINEN_POSTIOSOITE, ctx)?,
            kotikunta: read_child(element, KOTIKUNTA, ctx)?,
            kuolintiedot: read_child(element, KUOLINTIEDOT, ctx)?,
            kuolleeksijulistamistiedot: read_child(element, KUOLLEEKSIJULISTAMISTIEDOT, ctx)?,
            aidinkieli: read_child(element, AIDINKIELI, ctx)?,
            turvakielto: read_child(element, TURVAKIELTO, ctx)?,
            sukupuoli: read_child(element, SUKUPUOLI, ctx)?,
            huoltaja: read_children(element, HUOLTAJA, ctx)?,
            huollettava: read_children(element, HUOLLETTAVA, ctx)?,
            lapsi: read_children(element, LAPSI, ctx)?,
            kansalaisuus: read_children(element, KANSALAISUUS, ctx)?,
            asukkaat_alle_18v: read_child(element, ASUKKAAT_ALLE_18V, ctx)?,
            asukas_alle_18v: read_children(element, ASUKAS_ALLE_18V, ctx)?,
            syntymamaa: read_child(element, SYNTYMAMAA, ctx)?,
            edunvalvonta: read_child(element, EDUNVALVONTA, ctx)?,
            edunvalvontavaltuutus: read_child(element, EDUNVALVONTAVALTUUTUS, ctx)?,
        })
    }

    fn write(&self, element: &mut Element) {
        write_child(element, HENKILOTUNNUS, self.henkilotunnus.as_ref());
        write_child(element, NYKYINEN_SUKUNIMI, self.nykyinen_sukunimi.as_ref());
        write_child(element, NYKYISET_ETUNIMET, self.nykyiset_etunimet.as_ref());
        write_children(element, ENTINEN_NIMI, &self.entinen_nimi);
        write_child(
            element,
            VAKINAINEN_KOTIMAINEN,
            self.vakinainen_kotimainen_lahiosoite.as_ref(),
        );
        write_child(
            element,
            VAKINAINEN_ULKOMAINEN,
            self.vakinainen_ulkomainen_lahiosoite.as_ref(),
        );
        write_child(element, VAKINAINEN_ASUINPAIKKA, self.vakinainen_asuinpaikka.as_ref());
        write_children(element, TILAPAINEN_KOTIMAINEN, &self.tilapainen_kotimainen_lahiosoite);
        write_children(element, TILAPAINEN_ULKOMAINEN, &self.tilapainen_ulkomainen_lahiosoite);
        write_child(element, KOTIMAINEN_POSTIOSOITE, self.kotimainen_postiosoite.as_ref());
        write_child(element, ULKOMAINEN_POSTIOSOITE, self.ulkomainen_postiosoite.as_ref());
        write_child(element, KOTIKUNTA, self.kotikunta.as_ref());
        write_child(element, KUOLINTIEDOT, self.kuolintiedot.as_ref());
        write_child(
            element,
            KUOLLEEKSIJULISTAMISTIEDOT,
            self.kuolleeksijulistamistiedot.as_ref(),
        );
        write_child(element, AIDINKIELI, self.aidinkieli.as_ref());
        write_child(element, TURVAKIELTO, self.turvakielto.as_ref());
        write_child(element, SUKUPUOLI, self.sukupuoli.as_ref());
        write_children(element, HUOLTAJA, &self.huoltaja);
        write_children(element, HUOLLETTAVA, &self.huollettava);
        write_children(element, LAPSI, &self.lapsi);
        write_children(element, KANSALAISUUS, &self.kansalaisuus);
        write_child(element, ASUKKAAT_ALLE_18V, self.asukkaat_alle_18v.as_ref());
        write_children(element, ASUKAS_ALLE_18V, &self.asukas_alle_18v);
        write_child(element, SYNTYMAMAA, self.syntymamaa.as_ref());
        write_child(element, EDUNVALVONTA, self.edunvalvonta.as_ref());
        write_child(element, EDUNVALVONTAVALTUUTUS, self.edunvalvontavaltuutus.as_ref());
    }
}

/// `Henkilo/Henkilotunnus`: the identity code with its validity code attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Henkilotunnus {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voimassaolokoodi: Option<String>,
}

const VOIMASSAOLOKOODI: Name = Name::unqualified("voimassaolokoodi");

impl XmlType for Henkilotunnus {
    const CONTENT: &'static ContentModel =
        &ContentModel::simple(&[AttributeUse::optional(VOIMASSAOLOKOODI)]);

    fn read(element: &Element, _ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            value: element.text_content(),
            voimassaolokoodi: element.attribute_ns(VOIMASSAOLOKOODI).map(str::to_owned),
        })
    }

    fn write(&self, element: &mut Element) {
        element.text = Some(self.value.clone());
        element.set_optional_attribute(VOIMASSAOLOKOODI, self.voimassaolokoodi.as_deref());
    }
}

text_record! {
    pub struct NykyinenSukunimi in schema {
        sukunimi => "Sukunimi",
    }
}

text_record! {
    pub struct NykyisetEtunimet in schema {
        etunimet => "Etunimet",
    }
}

text_record! {
    /// A former name; `Nimilajikoodi` tells whether it was a surname or first names.
    pub struct EntinenNimi in schema {
        nimi => "Nimi",
        nimilajikoodi => "Nimilajikoodi",
        alkupvm => "Alkupvm",
        loppupvm => "Loppupvm",
    }
}

text_record! {
    /// Street address in Finland, used for permanent and temporary addresses.
    pub struct KotimainenLahiosoite in schema {
        lahiosoite_s => "LahiosoiteS",
        lahiosoite_r => "LahiosoiteR",
        postinumero => "Postinumero",
        postitoimipaikka_s => "PostitoimipaikkaS",
        postitoimipaikka_r => "PostitoimipaikkaR",
        asuminen_alkupvm => "AsuminenAlkupvm",
        asuminen_loppupvm => "AsuminenLoppupvm",
    }
}

text_record! {
    /// Street address abroad, used for permanent and temporary addresses.
    pub struct UlkomainenLahiosoite in schema {
        ulkomainen_lahiosoite => "UlkomainenLahiosoite",
        paikkakunta_ja_valtio_s => "UlkomainenPaikkakuntaJaValtioS",
        paikkakunta_ja_valtio_r => "UlkomainenPaikkakuntaJaValtioR",
        paikkakunta_ja_valtio_selvakielinen => "UlkomainenPaikkakuntaJaValtioSelvakielinen",
        valtiokoodi3 => "Valtiokoodi3",
        asuminen_alkupvm => "AsuminenAlkupvm",
        asuminen_loppupvm => "AsuminenLoppupvm",
    }
}

text_record! {
    pub struct VakinainenAsuinpaikka in schema {
        asuinpaikantunnus => "Asuinpaikantunnus",
    }
}

text_record! {
    pub struct KotimainenPostiosoite in schema {
        postiosoite_s => "PostiosoiteS",
        postiosoite_r => "PostiosoiteR",
        postinumero => "Postinumero",
        postitoimipaikka_s => "PostitoimipaikkaS",
        postitoimipaikka_r => "PostitoimipaikkaR",
        postiosoite_alkupvm => "PostiosoiteAlkupvm",
        postiosoite_loppupvm => "PostiosoiteLoppupvm",
    }
}

text_record! {
    pub struct UlkomainenPostiosoite in schema {
        ulkomainen_postiosoite => "UlkomainenPostiosoite",
        paikkakunta_ja_valtio_s => "UlkomainenPaikkakuntaJaValtioS",
        paikkakunta_ja_valtio_r => "UlkomainenPaikkakuntaJaValtioR",
        paikkakunta_ja_valtio_selvakielinen => "UlkomainenPaikkakuntaJaValtioSelvakielinen",
        valtiokoodi3 => "Valtiokoodi3",
        postiosoite_alkupvm => "PostiosoiteAlkupvm",
        postiosoite_loppupvm => "PostiosoiteLoppupvm",
    }
}

text_record! {
    /// Municipality of residence.
    pub struct Kotikunta in schema {
        kuntanumero => "Kuntanumero",
        kunta_s => "KuntaS",
        kunta_r => "KuntaR",
        kuntasuhde_alkupvm => "KuntasuhdeAlkupvm",
    }
}

text_record! {
    pub struct Kuolintiedot in schema {
        kuolinpvm => "Kuolinpvm",
    }
}

text_record! {
    pub struct Kuolleeksijulistamistiedot in schema {
        kuolleeksijulistamispvm => "Kuolleeksijulistamispvm",
    }
}

text_record! {
    pub struct Aidinkieli in schema {
        kielikoodi => "Kielikoodi",
        kieli_s => "KieliS",
        kieli_r => "KieliR",
        kieli_selvakielinen => "KieliSelvakielinen",
    }
}

text_record! {
    pub struct Turvakielto in schema {
        turvakielto_tieto => "TurvakieltoTieto",
        turvakielto_paattymispvm => "TurvakieltoPaattymispvm",
    }
}

text_record! {
    pub struct Sukupuoli in schema {
        sukupuolikoodi => "Sukupuolikoodi",
        sukupuoli_s => "SukupuoliS",
        sukupuoli_r => "SukupuoliR",
    }
}

text_record! {
    pub struct Kansalaisuus in schema {
        kansalaisuuskoodi3 => "Kansalaisuuskoodi3",
        kansalaisuus_s => "KansalaisuusS",
        kansalaisuus_r => "KansalaisuusR",
        kansalaisuus_selvakielinen => "KansalaisuusSelvakielinen",
    }
}

text_record! {
    /// Number of minors living at the same address.
    pub struct AsukkaatAlle18V in schema {
        asukas_lkm => "AsukasLkm",
    }
}

text_record! {
    pub struct AsukasAlle18V in schema {
        henkilotunnus => "Henkilotunnus",
        syntymaaika => "Syntymaaika",
    }
}

text_record! {
    pub struct Syntymamaa in schema {
        valtiokoodi3 => "Valtiokoodi3",
        valtio_s => "ValtioS",
        valtio_r => "ValtioR",
        valtio_selvakielinen => "ValtioSelvakielinen",
    }
}

const RELATED_PERSON: &ContentModel = &ContentModel::sequence(&[
    Particle::optional(HENKILOTUNNUS),
    Particle::optional(Name::schema("Syntymaaika")),
    Particle::optional(NYKYINEN_SUKUNIMI),
    Particle::optional(NYKYISET_ETUNIMET),
]);

/// Another person linked to the record: guardian, dependant, child or a person acting as
/// guardian or under a continuing power of attorney.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedPerson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub henkilotunnus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntymaaika: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nykyinen_sukunimi: Option<NykyinenSukunimi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nykyiset_etunimet: Option<NykyisetEtunimet>,
}

impl XmlType for RelatedPerson {
    const CONTENT: &'static ContentModel = RELATED_PERSON;

    fn read(element: &Element, ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            henkilotunnus: element.child_text(HENKILOTUNNUS),
            syntymaaika: element.child_text(Name::schema("Syntymaaika")),
            nykyinen_sukunimi: read_child(element, NYKYINEN_SUKUNIMI, ctx)?,
            nykyiset_etunimet: read_child(element, NYKYISET_ETUNIMET, ctx)?,
        })
    }

    fn write(&self, element: &mut Element) {
        element.push_text_child(HENKILOTUNNUS, self.henkilotunnus.as_deref());
        element.push_text_child(Name::schema("Syntymaaika"), self.syntymaaika.as_deref());
        write_child(element, NYKYINEN_SUKUNIMI, self.nykyinen_sukunimi.as_ref());
        write_child(element, NYKYISET_ETUNIMET, self.nykyiset_etunimet.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{decode, to_element};
    use crate::henkilo::{
        OikeusaputoimistoEdunvalvoja, Tehtavienjako, VastausEntry, VtjHenkiloVastaussanoma,
        YritysJaYhteisoEdunvalvoja,
    };
    use crate::schema::{check, Strictness, ViolationKind};
    use crate::xml::parse_document;
    use crate::{Codec, CodecConfig};

    fn henkilo_xml(body: &str) -> Element {
        parse_document(&format!(
            r#"<Henkilo xmlns="http://xml.vrk.fi/schema/vtjkysely">
                 <Henkilotunnus voimassaolokoodi="1">010101A123N</Henkilotunnus>
                 <NykyinenSukunimi><Sukunimi>Virtanen</Sukunimi></NykyinenSukunimi>
                 <NykyisetEtunimet><Etunimet>Matti Juhani</Etunimet></NykyisetEtunimet>
                 {body}
               </Henkilo>"#
        ))
        .expect("parse")
    }

    fn former_names(count: usize) -> String {
        (0..count)
            .map(|i| format!("<EntinenNimi><Nimi>Nimi{i}</Nimi><Nimilajikoodi>1</Nimilajikoodi></EntinenNimi>"))
            .collect()
    }

    #[test]
    fn lists_are_empty_when_absent() {
        let henkilo = Henkilo::default();
        assert!(henkilo.entinen_nimi.is_empty());
        assert!(henkilo.huoltaja.is_empty());
        assert!(henkilo.kansalaisuus.is_empty());
        assert!(henkilo.edunvalvonta.is_none());

        let mut ctx = DecodeContext::new(Strictness::Strict);
        let decoded: Henkilo = decode(&henkilo_xml(""), &mut ctx).expect("decode");
        assert!(decoded.tilapainen_kotimainen_lahiosoite.is_empty());
        assert!(decoded.lapsi.is_empty());
        assert_eq!(decoded.surname(), Some("Virtanen"));
        assert_eq!(decoded.first_names(), Some("Matti Juhani"));
    }

    #[test]
    fn identity_code_is_text_with_attribute() {
        let mut ctx = DecodeContext::new(Strictness::Strict);
        let henkilo: Henkilo = decode(&henkilo_xml(""), &mut ctx).expect("decode");
        let hetu = henkilo.henkilotunnus.as_ref().expect("hetu");
        assert_eq!(hetu.value, "010101A123N");
        assert_eq!(hetu.voimassaolokoodi.as_deref(), Some("1"));

        let code = henkilo.identity_code().expect("present").expect("valid");
        assert_eq!(code.birth_date(), NaiveDate::from_ymd_opt(2001, 1, 1).expect("date"));

        let element = to_element(hetu, HENKILOTUNNUS);
        assert!(element.children.is_empty());
        assert_eq!(element.attribute("voimassaolokoodi"), Some("1"));
        assert_eq!(element.text.as_deref(), Some("010101A123N"));
    }

    #[test]
    fn three_former_names_are_valid() {
        let mut ctx = DecodeContext::new(Strictness::Strict);
        let henkilo: Henkilo =
            decode(&henkilo_xml(&former_names(3)), &mut ctx).expect("three is within bounds");
        assert_eq!(henkilo.entinen_nimi.len(), 3);
        assert_eq!(henkilo.entinen_nimi[2].nimi.as_deref(), Some("Nimi2"));
    }

    #[test]
    fn fourth_former_name_depends_on_strictness() {
        let element = henkilo_xml(&former_names(4));

        let mut lax = DecodeContext::new(Strictness::Lax);
        let henkilo: Henkilo = decode(&element, &mut lax).expect("lax accepts");
        assert_eq!(henkilo.entinen_nimi.len(), 4);
        assert_eq!(
            lax.violations()[0].kind,
            ViolationKind::TooManyOccurrences {
                element: "vtjkysely:EntinenNimi".to_string(),
                max: "3".to_string()
            }
        );

        let mut strict = DecodeContext::new(Strictness::Strict);
        assert!(decode::<Henkilo>(&element, &mut strict).is_err());
    }

    #[test]
    fn writes_children_in_declared_order() {
        let henkilo = Henkilo {
            sukupuoli: Some(Sukupuoli {
                sukupuolikoodi: Some("1".to_string()),
                ..Sukupuoli::default()
            }),
            kotikunta: Some(Kotikunta {
                kuntanumero: Some("049".to_string()),
                kunta_s: Some("Espoo".to_string()),
                ..Kotikunta::default()
            }),
            lapsi: vec![RelatedPerson {
                henkilotunnus: Some("010118A9011".to_string()),
                ..RelatedPerson::default()
            }],
            henkilotunnus: Some(Henkilotunnus {
                value: "010101A123N".to_string(),
                voimassaolokoodi: None,
            }),
            ..Henkilo::default()
        };

        let element = to_element(&henkilo, Name::schema("Henkilo"));
        let names: Vec<_> = element.children.iter().map(|c| c.local_name.as_str()).collect();
        assert_eq!(names, ["Henkilotunnus", "Kotikunta", "Sukupuoli", "Lapsi"]);

        let kotikunta = &element.children[1];
        let fields: Vec<_> = kotikunta.children.iter().map(|c| c.local_name.as_str()).collect();
        assert_eq!(fields, ["Kuntanumero", "KuntaS"]);
    }

    #[test]
    fn related_people_keep_nested_names() {
        let element = henkilo_xml(
            r#"<Huoltaja>
                 <Henkilotunnus>131052-308T</Henkilotunnus>
                 <NykyinenSukunimi><Sukunimi>Virtanen</Sukunimi></NykyinenSukunimi>
                 <NykyisetEtunimet><Etunimet>Maija</Etunimet></NykyisetEtunimet>
               </Huoltaja>"#,
        );
        let mut ctx = DecodeContext::new(Strictness::Strict);
        let henkilo: Henkilo = decode(&element, &mut ctx).expect("decode");
        let huoltaja = &henkilo.huoltaja[0];
        assert_eq!(huoltaja.henkilotunnus.as_deref(), Some("131052-308T"));
        assert_eq!(
            huoltaja
                .nykyiset_etunimet
                .as_ref()
                .and_then(|e| e.etunimet.as_deref()),
            Some("Maija")
        );
    }

    fn text(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    fn related(hetu: &str, sukunimi: &str, etunimet: &str) -> RelatedPerson {
        RelatedPerson {
            henkilotunnus: text(hetu),
            syntymaaika: text("19520101"),
            nykyinen_sukunimi: Some(NykyinenSukunimi {
                sukunimi: text(sukunimi),
            }),
            nykyiset_etunimet: Some(NykyisetEtunimet {
                etunimet: text(etunimet),
            }),
        }
    }

    fn kotimainen(katu: &str, alku: &str) -> KotimainenLahiosoite {
        KotimainenLahiosoite {
            lahiosoite_s: text(katu),
            lahiosoite_r: text(katu),
            postinumero: text("02770"),
            postitoimipaikka_s: text("ESPOO"),
            postitoimipaikka_r: text("ESBO"),
            asuminen_alkupvm: text(alku),
            asuminen_loppupvm: text("20301231"),
        }
    }

    fn ulkomainen(osoite: &str, valtio: &str) -> UlkomainenLahiosoite {
        UlkomainenLahiosoite {
            ulkomainen_lahiosoite: text(osoite),
            paikkakunta_ja_valtio_s: text(valtio),
            paikkakunta_ja_valtio_r: text(valtio),
            paikkakunta_ja_valtio_selvakielinen: text(valtio),
            valtiokoodi3: text("SWE"),
            asuminen_alkupvm: text("20180101"),
            asuminen_loppupvm: text("20181231"),
        }
    }

    fn populated() -> Henkilo {
        let tehtavienjako = Tehtavienjako {
            alkupvm: text("20150101"),
            paattymispvm: text("20351231"),
            tehtavienjakokoodi: text("1"),
            tehtavienjako_s: text("Yhdessä"),
            tehtavienjako_r: text("Tillsammans"),
        };

        Henkilo {
            henkilotunnus: Some(Henkilotunnus {
                value: "010101A123N".to_string(),
                voimassaolokoodi: text("1"),
            }),
            nykyinen_sukunimi: Some(NykyinenSukunimi {
                sukunimi: text("Virtanen"),
            }),
            nykyiset_etunimet: Some(NykyisetEtunimet {
                etunimet: text("Matti Juhani"),
            }),
            entinen_nimi: (1..=MAX_FORMER_NAMES)
                .map(|i| EntinenNimi {
                    nimi: text(&format!("Entinen{i}")),
                    nimilajikoodi: text("1"),
                    alkupvm: text(&format!("200{i}0101")),
                    loppupvm: text(&format!("200{i}1231")),
                })
                .collect(),
            vakinainen_kotimainen_lahiosoite: Some(kotimainen("Kamreerintie 1", "20010101")),
            vakinainen_ulkomainen_lahiosoite: Some(ulkomainen("Storgatan 1", "Stockholm, Sverige")),
            vakinainen_asuinpaikka: Some(VakinainenAsuinpaikka {
                asuinpaikantunnus: text("123456789A"),
            }),
            tilapainen_kotimainen_lahiosoite: vec![
                kotimainen("Mökkitie 2", "20190601"),
                kotimainen("Rantatie 3", "20200601"),
            ],
            tilapainen_ulkomainen_lahiosoite: vec![
                ulkomainen("Calle Mayor 4", "Madrid, Espanja"),
                ulkomainen("Hauptstrasse 5", "Berlin, Saksa"),
            ],
            kotimainen_postiosoite: Some(KotimainenPostiosoite {
                postiosoite_s: text("PL 123"),
                postiosoite_r: text("PB 123"),
                postinumero: text("00101"),
                postitoimipaikka_s: text("HELSINKI"),
                postitoimipaikka_r: text("HELSINGFORS"),
                postiosoite_alkupvm: text("20100101"),
                postiosoite_loppupvm: text("20301231"),
            }),
            ulkomainen_postiosoite: Some(UlkomainenPostiosoite {
                ulkomainen_postiosoite: text("Box 6"),
                paikkakunta_ja_valtio_s: text("Oslo, Norja"),
                paikkakunta_ja_valtio_r: text("Oslo, Norge"),
                paikkakunta_ja_valtio_selvakielinen: text("Oslo, Norway"),
                valtiokoodi3: text("NOR"),
                postiosoite_alkupvm: text("20110101"),
                postiosoite_loppupvm: text("20111231"),
            }),
            kotikunta: Some(Kotikunta {
                kuntanumero: text("049"),
                kunta_s: text("Espoo"),
                kunta_r: text("Esbo"),
                kuntasuhde_alkupvm: text("20010101"),
            }),
            kuolintiedot: Some(Kuolintiedot {
                kuolinpvm: text("20190301"),
            }),
            kuolleeksijulistamistiedot: Some(Kuolleeksijulistamistiedot {
                kuolleeksijulistamispvm: text("20190401"),
            }),
            aidinkieli: Some(Aidinkieli {
                kielikoodi: text("fi"),
                kieli_s: text("suomi"),
                kieli_r: text("finska"),
                kieli_selvakielinen: text("Finnish"),
            }),
            turvakielto: Some(Turvakielto {
                turvakielto_tieto: text("1"),
                turvakielto_paattymispvm: text("20291231"),
            }),
            sukupuoli: Some(Sukupuoli {
                sukupuolikoodi: text("1"),
                sukupuoli_s: text("mies"),
                sukupuoli_r: text("man"),
            }),
            huoltaja: vec![related("131052-308T", "Virtanen", "Maija")],
            huollettava: vec![related("010118A9011", "Virtanen", "Aino")],
            lapsi: vec![
                related("010118A9011", "Virtanen", "Aino"),
                related("020220A902X", "Virtanen", "Eino"),
            ],
            kansalaisuus: vec![
                Kansalaisuus {
                    kansalaisuuskoodi3: text("FIN"),
                    kansalaisuus_s: text("Suomi"),
                    kansalaisuus_r: text("Finland"),
                    kansalaisuus_selvakielinen: text("Finland"),
                },
                Kansalaisuus {
                    kansalaisuuskoodi3: text("SWE"),
                    kansalaisuus_s: text("Ruotsi"),
                    kansalaisuus_r: text("Sverige"),
                    kansalaisuus_selvakielinen: text("Sweden"),
                },
            ],
            asukkaat_alle_18v: Some(AsukkaatAlle18V {
                asukas_lkm: text("2"),
            }),
            asukas_alle_18v: vec![
                AsukasAlle18V {
                    henkilotunnus: text("010118A9011"),
                    syntymaaika: text("20180101"),
                },
                AsukasAlle18V {
                    henkilotunnus: text("020220A902X"),
                    syntymaaika: text("20200202"),
                },
            ],
            syntymamaa: Some(Syntymamaa {
                valtiokoodi3: text("FIN"),
                valtio_s: text("Suomi"),
                valtio_r: text("Finland"),
                valtio_selvakielinen: text("Finland"),
            }),
            edunvalvonta: Some(Edunvalvonta {
                tehtavienjako: tehtavienjako.clone(),
                henkilo_edunvalvoja: vec![related("131052-308T", "Virtanen", "Maija")],
                yritys_ja_yhteiso_edunvalvoja: vec![YritysJaYhteisoEdunvalvoja {
                    ytunnus: text("1234567-8"),
                    nimi: text("Edunvalvonta Oy"),
                }],
                oikeusaputoimisto_edunvalvoja: vec![OikeusaputoimistoEdunvalvoja {
                    viranomaisen_koodi: text("123"),
                    viranomaisen_nimi_s: text("Helsingin oikeusaputoimisto"),
                    viranomaisen_nimi_r: text("Helsingfors rättshjälpsbyrå"),
                }],
            }),
            edunvalvontavaltuutus: Some(Edunvalvontavaltuutus {
                tehtavienjako,
                henkilo_edunvalvontavaltuutettu: vec![
                    related("131052-308T", "Virtanen", "Maija"),
                    related("150550-123A", "Korhonen", "Pekka"),
                ],
            }),
        }
    }

    #[test]
    fn fully_populated_person_round_trips_strictly() {
        let henkilo = populated();
        let extracted_at = NaiveDate::from_ymd_opt(2019, 7, 17)
            .and_then(|d| d.and_hms_opt(1, 59, 2))
            .expect("timestamp");
        let mut document = VtjHenkiloVastaussanoma::new(extracted_at, "PERUSJHHS2", "1.0");
        document.push(VastausEntry::Henkilo(Box::new(henkilo.clone())));

        for indent in [None, Some(2)] {
            let codec = Codec::new(CodecConfig::new(Strictness::Strict, indent, true));
            let xml = codec.encode(&document).expect("encode");
            let decoded = codec
                .decode_with_report::<VtjHenkiloVastaussanoma>(&xml)
                .expect("strict decode");

            assert!(decoded.violations.is_empty(), "violations: {:?}", decoded.violations);
            assert_eq!(decoded.value, document);
            assert_eq!(decoded.value.henkilo(), Some(&henkilo));
        }

        let element = to_element(&henkilo, Name::schema("Henkilo"));
        assert_eq!(element.children.len(), 33);
        assert!(check(&element, Henkilo::CONTENT, "Henkilo").is_empty());
    }

    #[test]
    fn death_date_and_non_disclosure_helpers() {
        let element = henkilo_xml(
            "<Kuolintiedot><Kuolinpvm>20190301</Kuolinpvm></Kuolintiedot>\
             <Turvakielto><TurvakieltoTieto>1</TurvakieltoTieto></Turvakielto>",
        );
        let mut ctx = DecodeContext::new(Strictness::Strict);
        let henkilo: Henkilo = decode(&element, &mut ctx).expect("decode");
        assert_eq!(
            henkilo.date_of_death().expect("valid date"),
            NaiveDate::from_ymd_opt(2019, 3, 1)
        );
        assert!(henkilo.has_non_disclosure());
        assert!(!Henkilo::default().has_non_disclosure());
    }
}
