//! Paged PDF document handle.
//!
//! [`PdfDocument`] wraps a [`lopdf::Document`] together with the id of its
//! root page tree node and exposes the page-level operations the rest of the
//! crate needs: counting pages, reading native page sizes, deleting a page,
//! and appending every page of another document.
//!
//! Closing a document is dropping it.

use lopdf::{Document, Object, ObjectId, dictionary};
use std::path::Path;

use crate::config::WriteOptions;
use crate::error::{PdfSmithError, Result};
use crate::io::{PdfReader, PdfWriter, WriteStatistics};
use crate::merge::PageGeometry;

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Upper bound on page tree depth; guards against `Parent` cycles.
const MAX_TREE_DEPTH: usize = 64;

/// An open PDF document.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    document: Document,
    pages_id: ObjectId,
}

impl PdfDocument {
    /// Create an empty document with a catalog and an empty page tree.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");

        let pages_id = document.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        });
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        Self { document, pages_id }
    }

    /// Open a PDF file. The file must contain at least one page.
    pub fn open(path: &Path) -> Result<Self> {
        PdfReader::new().read(path)
    }

    /// Parse a PDF held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_document(Document::load_mem(bytes)?)
    }

    /// Wrap a parsed document, locating its root page tree node.
    pub fn from_document(document: Document) -> Result<Self> {
        let pages_id = root_pages_id(&document)?;
        Ok(Self { document, pages_id })
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> Document {
        self.document
    }

    /// Number of pages reachable from the page tree.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    fn page_id(&self, index: usize) -> Result<ObjectId> {
        let pages = self.document.get_pages();
        let len = pages.len();
        pages
            .values()
            .nth(index)
            .copied()
            .ok_or_else(|| PdfSmithError::index(index, len))
    }

    /// Native size of the page at `index`, in points.
    ///
    /// The `MediaBox` may be set on the page or inherited from an ancestor.
    pub fn page_native_size(&self, index: usize) -> Result<PageGeometry> {
        let page_id = self.page_id(index)?;

        let media_box = inherited_attribute(&self.document, page_id, b"MediaBox")
            .ok_or_else(|| PdfSmithError::other(format!("Page {} has no MediaBox", index + 1)))?;

        let media_box = match media_box {
            Object::Reference(id) => self.document.get_object(id)?.clone(),
            other => other,
        };

        let values = media_box
            .as_array()?
            .iter()
            .map(Object::as_float)
            .collect::<std::result::Result<Vec<f32>, _>>()?;

        match values.as_slice() {
            [x0, y0, x1, y1] => Ok(PageGeometry::new((x1 - x0).abs(), (y1 - y0).abs())),
            _ => Err(PdfSmithError::other(format!(
                "Page {} has a malformed MediaBox",
                index + 1
            ))),
        }
    }

    /// Native sizes of every page, in page order.
    pub fn page_sizes(&self) -> Result<Vec<PageGeometry>> {
        (0..self.page_count())
            .map(|index| self.page_native_size(index))
            .collect()
    }

    /// Delete the page at `index`.
    ///
    /// The page is detached from its parent's `Kids`, every ancestor's
    /// `Count` is decremented, and the page object is removed. Later pages
    /// move down by one position.
    ///
    /// Either the deletion happens completely or the document is left as it
    /// was: a page that is listed more than once in the page tree is
    /// rejected up front, and any later failure restores every object that
    /// was touched.
    pub fn delete_page(&mut self, index: usize) -> Result<()> {
        let pages = self.document.get_pages();
        let before = pages.len();
        let page_id = pages
            .values()
            .nth(index)
            .copied()
            .ok_or_else(|| PdfSmithError::index(index, before))?;

        let listed = pages.values().filter(|&&id| id == page_id).count();
        if listed != 1 {
            return Err(PdfSmithError::other(format!(
                "Page {} is listed {listed} times in the page tree",
                index + 1
            )));
        }

        let ancestors = self.ancestors(page_id)?;
        let snapshot: Vec<(ObjectId, Object)> = std::iter::once(page_id)
            .chain(ancestors.iter().copied())
            .filter_map(|id| Some((id, self.document.objects.get(&id)?.clone())))
            .collect();

        if let Err(err) = self.detach_page(page_id, &ancestors, index, before) {
            self.document.objects.extend(snapshot);
            return Err(err);
        }

        Ok(())
    }

    /// Page tree nodes above `page_id`, nearest first.
    fn ancestors(&self, page_id: ObjectId) -> Result<Vec<ObjectId>> {
        let mut ancestors = Vec::new();
        let mut node = self.document.get_dictionary(page_id)?;

        while let Ok(parent_id) = node.get(b"Parent").and_then(Object::as_reference) {
            if ancestors.len() == MAX_TREE_DEPTH || ancestors.contains(&parent_id) {
                return Err(PdfSmithError::other("Page tree is too deep or cyclic"));
            }
            ancestors.push(parent_id);
            node = self.document.get_dictionary(parent_id)?;
        }

        Ok(ancestors)
    }

    fn detach_page(
        &mut self,
        page_id: ObjectId,
        ancestors: &[ObjectId],
        index: usize,
        before: usize,
    ) -> Result<()> {
        if let Some(&parent_id) = ancestors.first() {
            let kids = self
                .document
                .get_dictionary_mut(parent_id)?
                .get_mut(b"Kids")?
                .as_array_mut()?;
            kids.retain(|kid| kid.as_reference().map_or(true, |id| id != page_id));
        }

        for &node_id in ancestors {
            let node = self.document.get_dictionary_mut(node_id)?;
            let count = node.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
            node.set("Count", (count - 1).max(0));
        }

        self.document.objects.remove(&page_id);

        let after = self.page_count();
        if after + 1 != before {
            return Err(PdfSmithError::other(format!(
                "Page tree out of sync after deleting page {}: expected {} pages, found {after}",
                index + 1,
                before - 1
            )));
        }

        Ok(())
    }

    /// Append every page of `source`, in order, to the end of this document.
    ///
    /// Source objects are renumbered above this document's highest id and
    /// inherited page attributes are copied onto each page before it is
    /// re-parented under this document's root page tree node.
    ///
    /// Returns the number of pages appended.
    pub fn append_all_pages(&mut self, source: PdfDocument) -> Result<usize> {
        let mut source = source.document;

        let source_pages: Vec<ObjectId> = source.get_pages().into_values().collect();
        for page_id in source_pages {
            flatten_inherited_attributes(&mut source, page_id)?;
        }

        source.renumber_objects_with(self.document.max_id + 1);
        self.document.max_id = self.document.max_id.max(source.max_id);

        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
        self.document.objects.extend(source.objects);

        for &page_id in &page_ids {
            self.document
                .get_dictionary_mut(page_id)?
                .set("Parent", self.pages_id);
        }

        let pages = self
            .document
            .get_dictionary_mut(self.pages_id)
            .map_err(|e| PdfSmithError::merge_failed(format!("Failed to get pages object: {e}")))?;

        let kids = pages
            .get_mut(b"Kids")
            .and_then(Object::as_array_mut)
            .map_err(|_| PdfSmithError::merge_failed("Pages dictionary missing Kids array"))?;
        kids.extend(page_ids.iter().map(|&id| Object::Reference(id)));

        let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
        pages.set("Count", count + page_ids.len() as i64);

        Ok(page_ids.len())
    }

    /// Drop objects that are no longer reachable from the trailer.
    pub fn prune_unreachable(&mut self) {
        self.document.prune_objects();
    }

    /// Write the document to `path`.
    ///
    /// Objects are renumbered as part of writing, whether or not the write
    /// succeeds.
    pub fn save(&mut self, path: &Path, options: WriteOptions) -> Result<WriteStatistics> {
        let result = PdfWriter::with_options(options).save(&mut self.document, path);
        if let Ok(pages_id) = root_pages_id(&self.document) {
            self.pages_id = pages_id;
        }
        result
    }

    #[cfg(test)]
    pub(crate) fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.document.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn root_pages_id(document: &Document) -> lopdf::Result<ObjectId> {
    document
        .catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
}

/// Look up `key` on the page, falling back to its ancestors.
fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }

    None
}

fn flatten_inherited_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    for key in INHERITABLE_ATTRIBUTES {
        if doc.get_dictionary(page_id)?.has(key) {
            continue;
        }
        if let Some(value) = inherited_attribute(doc, page_id, key) {
            doc.get_dictionary_mut(page_id)?.set(key.to_vec(), value);
        }
    }
    Ok(())
}
