/*!
 * Arena-backed sense tree.
 *
 * Each `Entry` owns two arenas, one for Indents and one for Variantes.
 * Parents refer to children through `IndentId` / `VarianteId`, so the scope
 * resolver can move a node from one sibling list to another by editing id
 * vectors, without ever dropping or cloning the node itself.
 */

use crate::errors::TreeError;
use crate::markup;

use super::types::{Citation, Classification, ClassificationMethod, IndentRole, RubriqueType, TransitionKind};

/// Index of an Indent inside its Entry's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndentId(usize);

impl IndentId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a Variante inside its Entry's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarianteId(usize);

impl VarianteId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A nested sense fragment, the unit of classification.
#[derive(Debug, Clone, Default)]
pub struct Indent {
    /// Lightly normalized source markup
    pub content: String,
    pub citations: Vec<Citation>,
    pub children: Vec<IndentId>,
    pub role: IndentRole,
    pub classification: Option<Classification>,
    pub canonical_form: Option<String>,
}

impl Indent {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
            ..Default::default()
        }
    }

    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }

    /// Set role, method and confidence together.
    pub fn assign(&mut self, role: IndentRole, classification: Classification) {
        self.role = role;
        self.classification = Some(classification);
        if role != IndentRole::Locution {
            self.canonical_form = None;
        }
    }

    pub fn confidence(&self) -> Option<f32> {
        self.classification.map(|c| c.confidence())
    }

    pub fn method(&self) -> Option<ClassificationMethod> {
        self.classification.map(|c| c.method())
    }

    /// Content with all tags removed and surrounding whitespace trimmed.
    pub fn plain_text(&self) -> String {
        markup::strip_tags(&self.content)
    }
}

/// Scope information carried by a synthetic container Variante.
#[derive(Debug, Clone)]
pub struct Transition {
    pub kind: TransitionKind,
    /// The governing label, re-parented from its originating Variante
    pub label: IndentId,
    /// Original markup of the label
    pub content: String,
}

/// A numbered top-level sense, or a scope container.
#[derive(Debug, Clone, Default)]
pub struct Variante {
    pub num: Option<u32>,
    pub content: String,
    pub is_supplement: bool,
    pub citations: Vec<Citation>,
    pub indents: Vec<IndentId>,
    pub rubriques: Vec<Rubrique>,
    pub transition: Option<Transition>,
    pub sub_variantes: Vec<VarianteId>,
    /// Set once this Variante's trailing label has been moved into a container
    pub label_lifted: bool,
}

impl Variante {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
            ..Default::default()
        }
    }

    pub fn numbered(num: u32, content: &str) -> Self {
        Self {
            num: Some(num),
            ..Self::new(content)
        }
    }

    pub fn is_container(&self) -> bool {
        self.transition.is_some()
    }
}

/// Typed back-matter section.
#[derive(Debug, Clone)]
pub struct Rubrique {
    pub kind: RubriqueType,
    pub content: String,
    pub citations: Vec<Citation>,
    pub indents: Vec<IndentId>,
}

impl Rubrique {
    pub fn new(kind: RubriqueType, content: &str) -> Self {
        Self {
            kind,
            content: content.to_string(),
            citations: Vec::new(),
            indents: Vec::new(),
        }
    }
}

/// One ordered sibling list of Indents, with its nearest enclosing Variante.
#[derive(Debug, Clone)]
pub struct IndentList {
    pub variante: Option<VarianteId>,
    pub ids: Vec<IndentId>,
}

/// A headword entry and the arenas of every node below it.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub headword: String,
    pub xml_id: String,
    pub homograph_index: Option<u32>,
    pub is_supplement: bool,
    pub pronunciation: String,
    pub pos: String,
    pub source_letter: String,
    pub body: Vec<VarianteId>,
    pub rubriques: Vec<Rubrique>,
    indents: Vec<Indent>,
    variantes: Vec<Variante>,
}

impl Entry {
    pub fn new(headword: &str) -> Self {
        Self {
            headword: headword.to_string(),
            ..Default::default()
        }
    }

    pub fn with_xml_id(mut self, xml_id: &str) -> Self {
        self.xml_id = xml_id.to_string();
        self
    }

    /// Store an Indent in the arena without attaching it anywhere.
    pub fn add_indent(&mut self, indent: Indent) -> IndentId {
        self.indents.push(indent);
        IndentId(self.indents.len() - 1)
    }

    /// Store a Variante in the arena without attaching it anywhere.
    pub fn add_variante(&mut self, variante: Variante) -> VarianteId {
        self.variantes.push(variante);
        VarianteId(self.variantes.len() - 1)
    }

    /// Store a Variante and append it to the body.
    pub fn push_variante(&mut self, variante: Variante) -> VarianteId {
        let id = self.add_variante(variante);
        self.body.push(id);
        id
    }

    /// Store an Indent and append it to a Variante's Indent list.
    pub fn push_indent(&mut self, variante: VarianteId, indent: Indent) -> IndentId {
        let id = self.add_indent(indent);
        self.variantes[variante.0].indents.push(id);
        id
    }

    /// Store an Indent and append it to another Indent's children.
    pub fn push_child(&mut self, parent: IndentId, indent: Indent) -> IndentId {
        let id = self.add_indent(indent);
        self.indents[parent.0].children.push(id);
        id
    }

    pub fn indent(&self, id: IndentId) -> &Indent {
        &self.indents[id.0]
    }

    pub fn indent_mut(&mut self, id: IndentId) -> &mut Indent {
        &mut self.indents[id.0]
    }

    pub fn variante(&self, id: VarianteId) -> &Variante {
        &self.variantes[id.0]
    }

    pub fn variante_mut(&mut self, id: VarianteId) -> &mut Variante {
        &mut self.variantes[id.0]
    }

    pub fn indent_count(&self) -> usize {
        self.indents.len()
    }

    pub fn variante_count(&self) -> usize {
        self.variantes.len()
    }

    /// Arena iteration, in insertion order.
    pub fn indents(&self) -> impl Iterator<Item = (IndentId, &Indent)> {
        self.indents.iter().enumerate().map(|(i, indent)| (IndentId(i), indent))
    }

    /// Body Variantes and all their sub-Variantes, depth first.
    pub fn variantes_preorder(&self) -> Vec<VarianteId> {
        let mut out = Vec::new();
        for &id in &self.body {
            self.collect_variantes(id, &mut out);
        }
        out
    }

    fn collect_variantes(&self, id: VarianteId, out: &mut Vec<VarianteId>) {
        out.push(id);
        for &sub in &self.variante(id).sub_variantes {
            self.collect_variantes(sub, out);
        }
    }

    /// Every Indent list that is not itself the children of an Indent,
    /// in document order.
    pub fn root_lists(&self) -> Vec<IndentList> {
        let mut lists = Vec::new();
        for vid in self.variantes_preorder() {
            let variante = self.variante(vid);
            if let Some(transition) = &variante.transition {
                lists.push(IndentList {
                    variante: Some(vid),
                    ids: vec![transition.label],
                });
            }
            lists.push(IndentList {
                variante: Some(vid),
                ids: variante.indents.clone(),
            });
            for rubrique in &variante.rubriques {
                lists.push(IndentList {
                    variante: Some(vid),
                    ids: rubrique.indents.clone(),
                });
            }
        }
        for rubrique in &self.rubriques {
            lists.push(IndentList {
                variante: None,
                ids: rubrique.indents.clone(),
            });
        }
        lists.retain(|list| !list.ids.is_empty());
        lists
    }

    /// Every non-empty Indent sibling list, including nested children lists.
    pub fn indent_lists(&self) -> Vec<IndentList> {
        let mut out = Vec::new();
        for list in self.root_lists() {
            let ids = list.ids.clone();
            let variante = list.variante;
            out.push(list);
            for id in ids {
                self.collect_child_lists(id, variante, &mut out);
            }
        }
        out
    }

    fn collect_child_lists(&self, id: IndentId, variante: Option<VarianteId>, out: &mut Vec<IndentList>) {
        let children = &self.indent(id).children;
        if children.is_empty() {
            return;
        }
        out.push(IndentList {
            variante,
            ids: children.clone(),
        });
        for &child in children {
            self.collect_child_lists(child, variante, out);
        }
    }

    /// All reachable Indents, each before its children.
    pub fn indents_preorder(&self) -> Vec<IndentId> {
        let mut out = Vec::new();
        for list in self.root_lists() {
            for id in list.ids {
                self.collect_indents(id, &mut out);
            }
        }
        out
    }

    fn collect_indents(&self, id: IndentId, out: &mut Vec<IndentId>) {
        out.push(id);
        for &child in &self.indent(id).children {
            self.collect_indents(child, out);
        }
    }

    /// Verify that every arena node is reachable exactly once.
    ///
    /// Restructuring only re-parents nodes, so a failure here means an
    /// enrichment phase lost or duplicated part of the tree.
    pub fn check_integrity(&self) -> Result<(), TreeError> {
        let mut seen_variantes = vec![false; self.variantes.len()];
        let mut seen_indents = vec![false; self.indents.len()];
        let mut pending_indents: Vec<IndentId> = Vec::new();

        let mut stack: Vec<VarianteId> = self.body.iter().rev().copied().collect();
        while let Some(vid) = stack.pop() {
            let slot = seen_variantes
                .get_mut(vid.0)
                .ok_or(TreeError::DanglingVariante(vid.0))?;
            if *slot {
                return Err(TreeError::SharedVariante(vid.0));
            }
            *slot = true;

            let variante = &self.variantes[vid.0];
            if let Some(transition) = &variante.transition {
                pending_indents.push(transition.label);
            }
            pending_indents.extend(variante.indents.iter().copied());
            for rubrique in &variante.rubriques {
                pending_indents.extend(rubrique.indents.iter().copied());
            }
            stack.extend(variante.sub_variantes.iter().rev().copied());
        }
        for rubrique in &self.rubriques {
            pending_indents.extend(rubrique.indents.iter().copied());
        }

        while let Some(id) = pending_indents.pop() {
            let slot = seen_indents
                .get_mut(id.0)
                .ok_or(TreeError::DanglingIndent(id.0))?;
            if *slot {
                return Err(TreeError::SharedIndent(id.0));
            }
            *slot = true;
            pending_indents.extend(self.indents[id.0].children.iter().copied());
        }

        if let Some(orphan) = seen_variantes.iter().position(|seen| !seen) {
            return Err(TreeError::OrphanVariante(orphan));
        }
        if let Some(orphan) = seen_indents.iter().position(|seen| !seen) {
            return Err(TreeError::OrphanIndent(orphan));
        }
        Ok(())
    }
}
