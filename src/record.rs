//! PubMed record types.

use crate::xml::Element;

/// PubMed identifier, kept as the opaque string the service returns
pub type Pmid = String;

/// One `<PubmedArticle>` as returned by EFetch, before flattening.
///
/// Nothing about its shape is guaranteed; see [`crate::extract`] for the
/// per-field access policies.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    element: Element,
}

impl RawRecord {
    /// Wrap a `<PubmedArticle>` element
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    /// The underlying element
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// `MedlineCitation` section
    pub fn citation(&self) -> Option<&Element> {
        self.element.child("MedlineCitation")
    }

    /// `MedlineCitation/Article` section
    pub fn article(&self) -> Option<&Element> {
        self.citation().and_then(|c| c.child("Article"))
    }

    /// `PubmedData` section
    pub fn pubmed_data(&self) -> Option<&Element> {
        self.element.child("PubmedData")
    }
}

impl From<Element> for RawRecord {
    fn from(element: Element) -> Self {
        Self::new(element)
    }
}
