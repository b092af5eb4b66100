//! Guardianship (edunvalvonta) and continuing power of attorney (edunvalvontavaltuutus).

use super::person::RelatedPerson;
use crate::binding::{read_children, text_record, write_children, XmlType};
use crate::schema::{ContentModel, DecodeContext, Particle};
use crate::xml::{Element, Name};
use crate::VtjResult;
use serde::{Deserialize, Serialize};

const ALKUPVM: Name = Name::schema("Alkupvm");
const PAATTYMISPVM: Name = Name::schema("Paattymispvm");
const TEHTAVIENJAKOKOODI: Name = Name::schema("Tehtavienjakokoodi");
const TEHTAVIENJAKO_S: Name = Name::schema("TehtavienjakoS");
const TEHTAVIENJAKO_R: Name = Name::schema("TehtavienjakoR");
const HENKILO_EDUNVALVOJA: Name = Name::schema("HenkiloEdunvalvoja");
const YRITYS_EDUNVALVOJA: Name = Name::schema("YritysJaYhteisoEdunvalvoja");
const OIKEUSAPUTOIMISTO_EDUNVALVOJA: Name = Name::schema("OikeusaputoimistoEdunvalvoja");
const HENKILO_VALTUUTETTU: Name = Name::schema("HenkiloEdunvalvontavaltuutettu");

const EDUNVALVONTA: &ContentModel = &ContentModel::sequence(&[
    Particle::optional(ALKUPVM),
    Particle::optional(PAATTYMISPVM),
    Particle::optional(TEHTAVIENJAKOKOODI),
    Particle::optional(TEHTAVIENJAKO_S),
    Particle::optional(TEHTAVIENJAKO_R),
    Particle::repeated(HENKILO_EDUNVALVOJA),
    Particle::repeated(YRITYS_EDUNVALVOJA),
    Particle::repeated(OIKEUSAPUTOIMISTO_EDUNVALVOJA),
]);

const EDUNVALVONTAVALTUUTUS: &ContentModel = &ContentModel::sequence(&[
    Particle::optional(ALKUPVM),
    Particle::optional(PAATTYMISPVM),
    Particle::optional(TEHTAVIENJAKOKOODI),
    Particle::optional(TEHTAVIENJAKO_S),
    Particle::optional(TEHTAVIENJAKO_R),
    Particle::repeated(HENKILO_VALTUUTETTU),
]);

/// Period and division of duties shared by guardianship and power of attorney.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tehtavienjako {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alkupvm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paattymispvm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tehtavienjakokoodi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tehtavienjako_s: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tehtavienjako_r: Option<String>,
}

impl Tehtavienjako {
    fn read(element: &Element) -> Self {
        Self {
            alkupvm: element.child_text(ALKUPVM),
            paattymispvm: element.child_text(PAATTYMISPVM),
            tehtavienjakokoodi: element.child_text(TEHTAVIENJAKOKOODI),
            tehtavienjako_s: element.child_text(TEHTAVIENJAKO_S),
            tehtavienjako_r: element.child_text(TEHTAVIENJAKO_R),
        }
    }

    fn write(&self, element: &mut Element) {
        element.push_text_child(ALKUPVM, self.alkupvm.as_deref());
        element.push_text_child(PAATTYMISPVM, self.paattymispvm.as_deref());
        element.push_text_child(TEHTAVIENJAKOKOODI, self.tehtavienjakokoodi.as_deref());
        element.push_text_child(TEHTAVIENJAKO_S, self.tehtavienjako_s.as_deref());
        element.push_text_child(TEHTAVIENJAKO_R, self.tehtavienjako_r.as_deref());
    }
}

/// Guardianship and the guardians appointed for it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edunvalvonta {
    #[serde(flatten)]
    pub tehtavienjako: Tehtavienjako,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub henkilo_edunvalvoja: Vec<RelatedPerson>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub yritys_ja_yhteiso_edunvalvoja: Vec<YritysJaYhteisoEdunvalvoja>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub oikeusaputoimisto_edunvalvoja: Vec<OikeusaputoimistoEdunvalvoja>,
}

impl Edunvalvonta {
    /// Number of guardians of any kind.
    pub fn guardian_count(&self) -> usize {
        self.henkilo_edunvalvoja.len()
            + self.yritys_ja_yhteiso_edunvalvoja.len()
            + self.oikeusaputoimisto_edunvalvoja.len()
    }
}

impl XmlType for Edunvalvonta {
    const CONTENT: &'static ContentModel = EDUNVALVONTA;

    fn read(element: &Element, ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            tehtavienjako: Tehtavienjako::read(element),
            henkilo_edunvalvoja: read_children(element, HENKILO_EDUNVALVOJA, ctx)?,
            yritys_ja_yhteiso_edunvalvoja: read_children(element, YRITYS_EDUNVALVOJA, ctx)?,
            oikeusaputoimisto_edunvalvoja: read_children(
                element,
                OIKEUSAPUTOIMISTO_EDUNVALVOJA,
                ctx,
            )?,
        })
    }

    fn write(&self, element: &mut Element) {
        self.tehtavienjako.write(element);
        write_children(element, HENKILO_EDUNVALVOJA, &self.henkilo_edunvalvoja);
        write_children(element, YRITYS_EDUNVALVOJA, &self.yritys_ja_yhteiso_edunvalvoja);
        write_children(
            element,
            OIKEUSAPUTOIMISTO_EDUNVALVOJA,
            &self.oikeusaputoimisto_edunvalvoja,
        );
    }
}

/// Confirmed continuing power of attorney and the people it names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edunvalvontavaltuutus {
    #[serde(flatten)]
    pub tehtavienjako: Tehtavienjako,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub henkilo_edunvalvontavaltuutettu: Vec<RelatedPerson>,
}

impl XmlType for Edunvalvontavaltuutus {
    const CONTENT: &'static ContentModel = EDUNVALVONTAVALTUUTUS;

    fn read(element: &Element, ctx: &mut DecodeContext) -> VtjResult<Self> {
        Ok(Self {
            tehtavienjako: Tehtavienjako::read(element),
            henkilo_edunvalvontavaltuutettu: read_children(element, HENKILO_VALTUUTETTU, ctx)?,
        })
    }

    fn write(&self, element: &mut Element) {
        self.tehtavienjako.write(element);
        write_children(element, HENKILO_VALTUUTETTU, &self.henkilo_edunvalvontavaltuutettu);
    }
}

text_record! {
    /// Company or organisation acting as guardian.
    pub struct YritysJaYhteisoEdunvalvoja in schema {
        ytunnus => "Ytunnus",
        nimi => "Nimi",
    }
}

text_record! {
    /// Public legal aid office acting as guardian.
    pub struct OikeusaputoimistoEdunvalvoja in schema {
        viranomaisen_koodi => "ViranomaisenKoodi",
        viranomaisen_nimi_s => "ViranomaisenNimiS",
        viranomaisen_nimi_r => "ViranomaisenNimiR",
    }
}
