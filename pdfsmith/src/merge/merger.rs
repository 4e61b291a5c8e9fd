//! Core merge implementation.
//!
//! [`MergeEngine`] walks a [`MergeQueue`] snapshot in order and builds one
//! output document. PDF sources contribute all of their pages at native
//! size; image sources are normalized onto pages of the run's reference
//! geometry. Sources that cannot be read are skipped and reported, and the
//! output is written only after every source has been visited.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::MergeOptions;
use crate::error::{PdfSmithError, Result};
use crate::io::{PdfReader, WriteStatistics};
use crate::merge::geometry::PageGeometry;
use crate::merge::queue::{MergeQueue, SourceEntry, SourceKind};
use crate::pdf::PdfDocument;
use crate::raster;

/// A source that was left out of the output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedSource {
    /// Path to the source.
    pub path: PathBuf,

    /// Kind the source was queued as.
    pub kind: SourceKind,

    /// Why it could not be read.
    pub reason: String,
}

/// Outcome of a successful merge run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Where the output was written.
    pub output_path: PathBuf,

    /// Number of sources that made it into the output.
    pub sources_merged: usize,

    /// Number of pages in the output.
    pub total_pages: usize,

    /// Page size images were normalized to.
    pub reference_geometry: PageGeometry,

    /// Sources that were skipped, in queue order.
    pub skipped: Vec<SkippedSource>,

    /// Time spent reading, composing, and writing.
    pub elapsed: Duration,

    /// Details of the output write.
    pub write: WriteStatistics,
}

impl MergeReport {
    /// Whether every queued source was merged.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// One source as seen by a dry run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedSource {
    /// Path to the source.
    pub path: PathBuf,

    /// Kind the source was queued as.
    pub kind: SourceKind,

    /// Pages the source would contribute, if it is readable.
    pub pages: Option<usize>,

    /// Native size of the source's first page; pixel size for images.
    pub first_page_size: Option<PageGeometry>,

    /// Why the source would be skipped.
    pub error: Option<String>,
}

impl PlannedSource {
    /// Whether the source would be merged.
    pub fn is_readable(&self) -> bool {
        self.error.is_none()
    }
}

/// What a merge run would do, without writing anything.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePlan {
    /// Every queued source, in merge order.
    pub sources: Vec<PlannedSource>,

    /// Page size images would be normalized to.
    pub reference_geometry: PageGeometry,

    /// Pages the output would contain.
    pub total_pages: usize,
}

impl MergePlan {
    /// Number of sources that would be merged.
    pub fn readable_count(&self) -> usize {
        self.sources.iter().filter(|s| s.is_readable()).count()
    }

    /// Number of sources that would be skipped.
    pub fn skipped_count(&self) -> usize {
        self.sources.len() - self.readable_count()
    }
}

/// Builds merged documents from queued sources.
#[derive(Debug, Clone, Default)]
pub struct MergeEngine {
    options: MergeOptions,
}

impl MergeEngine {
    /// Create an engine with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom options.
    pub fn with_options(options: MergeOptions) -> Self {
        Self { options }
    }

    /// Merge every source in `queue` into a PDF at `destination`.
    ///
    /// The queue is not modified.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The queue is empty ([`PdfSmithError::EmptyQueue`])
    /// - No source could be read ([`PdfSmithError::MergeFailed`])
    /// - The output cannot be written ([`PdfSmithError::Write`])
    ///
    /// Nothing is written in any of these cases. Individual unreadable
    /// sources are not errors; they are listed in [`MergeReport::skipped`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfsmith::merge::{MergeEngine, MergeQueue};
    /// # use std::path::Path;
    /// # fn example() -> pdfsmith::Result<()> {
    /// let mut queue = MergeQueue::new();
    /// queue.add(["cover.pdf", "scan.jpg"]);
    ///
    /// let report = MergeEngine::new().run(&queue, Path::new("out.pdf"))?;
    /// println!("Merged {} sources into {} pages",
    ///          report.sources_merged,
    ///          report.total_pages);
    /// queue.clear();
    /// # Ok(())
    /// # }
    /// ```
    pub fn run(&self, queue: &MergeQueue, destination: &Path) -> Result<MergeReport> {
        self.run_with_progress(queue, destination, |_, _, _| {})
    }

    /// Like [`run`](Self::run), calling `progress(position, total, source)`
    /// before each source is processed. Positions are 1-based.
    pub fn run_with_progress<F>(
        &self,
        queue: &MergeQueue,
        destination: &Path,
        mut progress: F,
    ) -> Result<MergeReport>
    where
        F: FnMut(usize, usize, &SourceEntry),
    {
        let sources = queue.entries();
        if sources.is_empty() {
            return Err(PdfSmithError::EmptyQueue);
        }

        let start = Instant::now();
        let total = sources.len();
        let mut output = PdfDocument::new();
        let mut reference: Option<PageGeometry> = None;
        let mut skipped = Vec::new();
        let mut sources_merged = 0;

        for (position, source) in sources.iter().enumerate() {
            progress(position + 1, total, source);

            let (document, supplied) = match self.prepare_source(source, reference) {
                Ok(prepared) => prepared,
                Err(err) => {
                    let reason = failure_reason(err);
                    warn!(
                        path = %source.path.display(),
                        kind = %source.kind,
                        %reason,
                        "skipping unreadable source"
                    );
                    skipped.push(SkippedSource {
                        path: source.path.clone(),
                        kind: source.kind,
                        reason,
                    });

                    // The would-be supplier failed; later sources do not take its place
                    if reference.is_none() {
                        debug!(
                            path = %source.path.display(),
                            "reference supplier unreadable, using default page size"
                        );
                        reference = Some(self.default_size());
                    }
                    continue;
                }
            };

            if reference.is_none() {
                debug!(
                    width = supplied.width,
                    height = supplied.height,
                    path = %source.path.display(),
                    "reference geometry established"
                );
                reference = Some(supplied);
            }

            let pages = output.append_all_pages(document)?;
            sources_merged += 1;
            debug!(path = %source.path.display(), pages, "appended source");
        }

        if sources_merged == 0 {
            return Err(PdfSmithError::merge_failed(format!(
                "none of the {total} queued sources could be read"
            )));
        }
        let reference_geometry = reference.unwrap_or_else(|| self.default_size());

        output.prune_unreachable();
        let total_pages = output.page_count();
        let write = output.save(destination, self.options.write)?;

        let elapsed = start.elapsed();
        info!(
            output = %destination.display(),
            sources = sources_merged,
            skipped = skipped.len(),
            pages = total_pages,
            elapsed_ms = elapsed.as_millis() as u64,
            "merge complete"
        );

        Ok(MergeReport {
            output_path: destination.to_path_buf(),
            sources_merged,
            total_pages,
            reference_geometry,
            skipped,
            elapsed,
            write,
        })
    }

    /// Inspect every source in `queue` without composing or writing.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSmithError::EmptyQueue`] if nothing is queued.
    pub fn plan(&self, queue: &MergeQueue) -> Result<MergePlan> {
        if queue.is_empty() {
            return Err(PdfSmithError::EmptyQueue);
        }

        let mut reference = None;
        let mut total_pages = 0;
        let mut sources = Vec::with_capacity(queue.len());

        for source in queue.entries() {
            let inspected = match source.kind {
                SourceKind::Pdf => PdfReader::new().read(&source.path).map(|doc| {
                    let first = doc.page_native_size(0).ok();
                    if reference.is_none() {
                        reference = Some(self.usable_or_default(first));
                    }
                    (doc.page_count(), first)
                }),
                SourceKind::Image => raster::decode(&source.path).map(|image| {
                    if reference.is_none() {
                        reference = Some(self.default_size());
                    }
                    let (width, height) = image.dimensions();
                    (1, Some(PageGeometry::new(width as f32, height as f32)))
                }),
            };

            let planned = match inspected {
                Ok((pages, first_page_size)) => {
                    total_pages += pages;
                    PlannedSource {
                        path: source.path.clone(),
                        kind: source.kind,
                        pages: Some(pages),
                        first_page_size,
                        error: None,
                    }
                }
                Err(err) => {
                    if reference.is_none() {
                        reference = Some(self.default_size());
                    }
                    PlannedSource {
                        path: source.path.clone(),
                        kind: source.kind,
                        pages: None,
                        first_page_size: None,
                        error: Some(failure_reason(err)),
                    }
                }
            };
            sources.push(planned);
        }

        Ok(MergePlan {
            sources,
            reference_geometry: reference.unwrap_or_else(|| self.default_size()),
            total_pages,
        })
    }

    /// Open or compose one source as a document ready to append.
    ///
    /// Returns the document and the reference geometry this source would
    /// establish if none is set yet. Every failure is a
    /// [`PdfSmithError::SourceRead`].
    fn prepare_source(
        &self,
        source: &SourceEntry,
        reference: Option<PageGeometry>,
    ) -> Result<(PdfDocument, PageGeometry)> {
        let path = &source.path;
        let unreadable = |err: PdfSmithError| PdfSmithError::source_read(path, failure_reason(err));

        match source.kind {
            SourceKind::Pdf => {
                let document = PdfReader::new().read(path).map_err(unreadable)?;
                let supplied = self.usable_or_default(document.page_native_size(0).ok());
                Ok((document, supplied))
            }
            SourceKind::Image => {
                let image = raster::decode(path).map_err(unreadable)?;
                let geometry = reference.unwrap_or_else(|| self.default_size());

                let (page, placement) =
                    raster::compose_page(&image, geometry).map_err(unreadable)?;
                debug!(
                    path = %path.display(),
                    image_width = image.width(),
                    image_height = image.height(),
                    width = placement.width,
                    height = placement.height,
                    x = placement.x,
                    y = placement.y,
                    "composed image page"
                );

                let bytes = raster::encode_single_page_pdf(&page).map_err(unreadable)?;
                let document = PdfDocument::from_bytes(&bytes).map_err(unreadable)?;
                Ok((document, geometry))
            }
        }
    }

    fn usable_or_default(&self, size: Option<PageGeometry>) -> PageGeometry {
        match size {
            Some(size) if size.is_valid() => size,
            _ => {
                warn!("first page has no usable MediaBox, using default page size");
                self.default_size()
            }
        }
    }

    /// The configured default page size, or Letter if it is out of range.
    fn default_size(&self) -> PageGeometry {
        let size = self.options.default_page_size;
        if size.is_valid() {
            size
        } else {
            warn!(
                width = size.width,
                height = size.height,
                "configured default page size is out of range, using Letter"
            );
            PageGeometry::LETTER
        }
    }
}

/// The innermost human-readable cause of a source failure.
fn failure_reason(err: PdfSmithError) -> String {
    match err {
        PdfSmithError::Load { reason, .. } | PdfSmithError::SourceRead { reason, .. } => reason,
        other => other.to_string(),
    }
}
