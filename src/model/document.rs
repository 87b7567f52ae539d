/*!
 * Nested JSON interchange form of the sense tree.
 *
 * The external parser hands entries over in this shape, and the emitters
 * read the enriched tree back in the same shape. Enrichment fields are
 * optional on input so a freshly parsed tree and an enriched one share a
 * single schema.
 */

use serde::{Deserialize, Serialize};

use super::tree::{Entry, Indent, IndentId, Rubrique, Transition, Variante, VarianteId};
use super::types::{Citation, Classification, ClassificationMethod, IndentRole, RubriqueType, TransitionKind};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndentDoc {
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<IndentDoc>,
    #[serde(default)]
    pub role: IndentRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_method: Option<ClassificationMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub canonical_form: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionType {
    Strong,
    Medium,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VarianteDoc {
    #[serde(default)]
    pub num: Option<u32>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_supplement: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indents: Vec<IndentDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rubriques: Vec<RubriqueDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_type: Option<TransitionType>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub transition_content: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub transition_form: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub transition_pos: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_label: Option<Box<IndentDoc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_variantes: Vec<VarianteDoc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub label_lifted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubriqueDoc {
    #[serde(rename = "type")]
    pub kind: RubriqueType,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indents: Vec<IndentDoc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryDoc {
    pub headword: String,
    #[serde(default)]
    pub xml_id: String,
    #[serde(default)]
    pub homograph_index: Option<u32>,
    #[serde(default)]
    pub is_supplement: bool,
    #[serde(default)]
    pub pronunciation: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub source_letter: String,
    #[serde(default)]
    pub body_variantes: Vec<VarianteDoc>,
    #[serde(default)]
    pub rubriques: Vec<RubriqueDoc>,
}

impl Entry {
    /// Build the arena form of a parsed entry.
    pub fn from_doc(doc: EntryDoc) -> Self {
        let mut entry = Entry::new(&doc.headword);
        entry.xml_id = doc.xml_id;
        entry.homograph_index = doc.homograph_index;
        entry.is_supplement = doc.is_supplement;
        entry.pronunciation = doc.pronunciation;
        entry.pos = doc.pos;
        entry.source_letter = doc.source_letter;

        for variante in doc.body_variantes {
            let id = entry.insert_variante(variante);
            entry.body.push(id);
        }
        for rubrique in doc.rubriques {
            let rubrique = entry.insert_rubrique(rubrique);
            entry.rubriques.push(rubrique);
        }
        entry
    }

    /// Export the arena back to the nested interchange form.
    pub fn to_doc(&self) -> EntryDoc {
        EntryDoc {
            headword: self.headword.clone(),
            xml_id: self.xml_id.clone(),
            homograph_index: self.homograph_index,
            is_supplement: self.is_supplement,
            pronunciation: self.pronunciation.clone(),
            pos: self.pos.clone(),
            source_letter: self.source_letter.clone(),
            body_variantes: self.body.iter().map(|&id| self.export_variante(id)).collect(),
            rubriques: self.rubriques.iter().map(|r| self.export_rubrique(r)).collect(),
        }
    }

    fn insert_indent(&mut self, doc: IndentDoc) -> IndentId {
        let classification = match (doc.classification_method, doc.classification_confidence) {
            (Some(method), Some(confidence)) => Some(Classification::new(method, confidence)),
            _ => None,
        };
        let canonical_form = if doc.role == IndentRole::Locution && !doc.canonical_form.is_empty() {
            Some(doc.canonical_form)
        } else {
            None
        };
        let children: Vec<IndentId> = doc
            .children
            .into_iter()
            .map(|child| self.insert_indent(child))
            .collect();

        self.add_indent(Indent {
            content: doc.content,
            citations: doc.citations,
            children,
            role: doc.role,
            classification,
            canonical_form,
        })
    }

    fn insert_rubrique(&mut self, doc: RubriqueDoc) -> Rubrique {
        let indents = doc.indents.into_iter().map(|i| self.insert_indent(i)).collect();
        Rubrique {
            kind: doc.kind,
            content: doc.content,
            citations: doc.citations,
            indents,
        }
    }

    fn insert_variante(&mut self, doc: VarianteDoc) -> VarianteId {
        let transition = match doc.transition_type {
            Some(kind) => {
                let label = match doc.transition_label {
                    Some(label) => self.insert_indent(*label),
                    None => self.add_indent(Indent::new(&doc.transition_content)),
                };
                let kind = match kind {
                    TransitionType::Strong => TransitionKind::Strong {
                        form: doc.transition_form,
                        pos: doc.transition_pos,
                    },
                    TransitionType::Medium => TransitionKind::Medium,
                };
                Some(Transition {
                    kind,
                    label,
                    content: doc.transition_content,
                })
            }
            None => None,
        };
        let indents = doc.indents.into_iter().map(|i| self.insert_indent(i)).collect();
        let rubriques = doc.rubriques.into_iter().map(|r| self.insert_rubrique(r)).collect();
        let sub_variantes = doc
            .sub_variantes
            .into_iter()
            .map(|v| self.insert_variante(v))
            .collect();

        self.add_variante(Variante {
            num: doc.num,
            content: doc.content,
            is_supplement: doc.is_supplement,
            citations: doc.citations,
            indents,
            rubriques,
            transition,
            sub_variantes,
            label_lifted: doc.label_lifted,
        })
    }

    fn export_indent(&self, id: IndentId) -> IndentDoc {
        let indent = self.indent(id);
        IndentDoc {
            content: indent.content.clone(),
            citations: indent.citations.clone(),
            children: indent.children.iter().map(|&c| self.export_indent(c)).collect(),
            role: indent.role,
            classification_method: indent.method(),
            classification_confidence: indent.confidence(),
            canonical_form: indent.canonical_form.clone().unwrap_or_default(),
        }
    }

    fn export_rubrique(&self, rubrique: &Rubrique) -> RubriqueDoc {
        RubriqueDoc {
            kind: rubrique.kind,
            content: rubrique.content.clone(),
            citations: rubrique.citations.clone(),
            indents: rubrique.indents.iter().map(|&i| self.export_indent(i)).collect(),
        }
    }

    fn export_variante(&self, id: VarianteId) -> VarianteDoc {
        let variante = self.variante(id);
        let mut doc = VarianteDoc {
            num: variante.num,
            content: variante.content.clone(),
            is_supplement: variante.is_supplement,
            citations: variante.citations.clone(),
            indents: variante.indents.iter().map(|&i| self.export_indent(i)).collect(),
            rubriques: variante.rubriques.iter().map(|r| self.export_rubrique(r)).collect(),
            sub_variantes: variante.sub_variantes.iter().map(|&v| self.export_variante(v)).collect(),
            label_lifted: variante.label_lifted,
            ..Default::default()
        };
        if let Some(transition) = &variante.transition {
            doc.transition_content = transition.content.clone();
            doc.transition_label = Some(Box::new(self.export_indent(transition.label)));
            match &transition.kind {
                TransitionKind::Strong { form, pos } => {
                    doc.transition_type = Some(TransitionType::Strong);
                    doc.transition_form = form.clone();
                    doc.transition_pos = pos.clone();
                }
                TransitionKind::Medium => {
                    doc.transition_type = Some(TransitionType::Medium);
                }
            }
        }
        doc
    }
}
